//! Sans-IO registration state machine.
//!
//! This module tracks the connection phase and channel bookkeeping without
//! performing any I/O. It consumes decoded messages and produces actions;
//! the session in [`crate::client`] carries them out.
//!
//! # Example
//!
//! ```
//! use slirc_client::state::{Phase, RegistrationAction, RegistrationMachine};
//! use slirc_client::{ClientIdentity, Message};
//!
//! let identity = ClientIdentity::new("testbot", "bot", "Test Bot");
//! let mut machine = RegistrationMachine::new(identity, vec!["#rust".to_string()]);
//!
//! machine.connecting();
//! assert_eq!(machine.start(), vec!["NICK testbot", "USER bot 0 * :Test Bot"]);
//!
//! let welcome = Message::decode(":srv 001 testbot :Welcome\r\n", "srv").unwrap();
//! let actions = machine.feed(&welcome);
//! assert_eq!(machine.phase(), Phase::Registered);
//! assert_eq!(
//!     actions,
//!     vec![
//!         RegistrationAction::Complete,
//!         RegistrationAction::Join("#rust".to_string()),
//!         RegistrationAction::Deliver,
//!     ]
//! );
//! ```

use std::collections::HashSet;
use std::fmt;

use crate::config::ClientIdentity;
use crate::Message;

/// Numeric replies that mark registration as complete.
const WELCOME_NUMERICS: [&str; 4] = ["001", "002", "003", "004"];

/// Lifecycle phase of a connection.
///
/// `Disconnected` is both the initial and the terminal phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Phase {
    /// No transport.
    #[default]
    Disconnected,
    /// Opening TCP/TLS.
    Connecting,
    /// NICK/USER sent, waiting for a welcome numeric.
    AwaitingRegistration,
    /// Welcome received; messages go to the handler.
    Registered,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Disconnected => "disconnected",
            Phase::Connecting => "connecting",
            Phase::AwaitingRegistration => "awaiting registration",
            Phase::Registered => "registered",
        };
        f.write_str(name)
    }
}

/// Channels joined and channels waiting for registration.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChannelSet {
    current: HashSet<String>,
    queued: Vec<String>,
}

impl ChannelSet {
    /// A set with `queued` channels waiting for registration.
    pub fn with_queue(queued: Vec<String>) -> Self {
        Self {
            current: HashSet::new(),
            queued,
        }
    }

    /// Channels this client has sent JOIN for and not left.
    ///
    /// Server confirmations are not tracked.
    pub fn current(&self) -> &HashSet<String> {
        &self.current
    }

    /// Channels still waiting for registration, in join order.
    pub fn queued(&self) -> &[String] {
        &self.queued
    }

    /// Whether a JOIN for `channel` has been sent.
    pub fn contains(&self, channel: &str) -> bool {
        self.current.contains(channel)
    }

    pub(crate) fn joined(&mut self, channel: &str) {
        self.current.insert(channel.to_owned());
    }

    pub(crate) fn parted(&mut self, channel: &str) {
        self.current.remove(channel);
    }

    fn take_queue(&mut self) -> Vec<String> {
        std::mem::take(&mut self.queued)
    }
}

/// Actions produced by [`RegistrationMachine::feed`], in execution order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RegistrationAction {
    /// Registration just completed.
    Complete,
    /// Send a JOIN for this queued channel.
    Join(String),
    /// Hand the message to the external handler.
    Deliver,
}

/// Sans-IO tracker for the connection phase and channel queue.
#[derive(Clone, Debug)]
pub struct RegistrationMachine {
    identity: ClientIdentity,
    phase: Phase,
    channels: ChannelSet,
}

impl RegistrationMachine {
    /// Create a machine in [`Phase::Disconnected`] with `queued` channels.
    #[must_use]
    pub fn new(identity: ClientIdentity, queued: Vec<String>) -> Self {
        Self {
            identity,
            phase: Phase::Disconnected,
            channels: ChannelSet::with_queue(queued),
        }
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The identity used for registration.
    pub fn identity(&self) -> &ClientIdentity {
        &self.identity
    }

    /// Channel bookkeeping.
    pub fn channels(&self) -> &ChannelSet {
        &self.channels
    }

    pub(crate) fn channels_mut(&mut self) -> &mut ChannelSet {
        &mut self.channels
    }

    /// The transport is being opened.
    pub fn connecting(&mut self) {
        self.phase = Phase::Connecting;
    }

    /// The transport is open. Returns the NICK and USER lines to send.
    #[must_use]
    pub fn start(&mut self) -> Vec<String> {
        self.phase = Phase::AwaitingRegistration;
        vec![
            format!("NICK {}", self.identity.nick),
            format!("USER {} 0 * :{}", self.identity.ident, self.identity.gecos),
        ]
    }

    /// Feed a decoded inbound message.
    ///
    /// The first welcome numeric (`001`-`004`) seen while awaiting
    /// registration completes it and drains the channel queue; later
    /// welcome numerics are ordinary messages. Every message seen once
    /// registered, including the completing one, is delivered.
    #[must_use]
    pub fn feed(&mut self, msg: &Message) -> Vec<RegistrationAction> {
        let mut actions = Vec::new();

        if self.phase == Phase::AwaitingRegistration
            && WELCOME_NUMERICS.contains(&msg.command.as_str())
        {
            self.phase = Phase::Registered;
            actions.push(RegistrationAction::Complete);
            actions.extend(
                self.channels
                    .take_queue()
                    .into_iter()
                    .map(RegistrationAction::Join),
            );
        }

        if self.phase == Phase::Registered {
            actions.push(RegistrationAction::Deliver);
        }

        actions
    }

    /// The transport closed or failed to open.
    pub fn disconnect(&mut self) {
        self.phase = Phase::Disconnected;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machine(queued: &[&str]) -> RegistrationMachine {
        let identity = ClientIdentity::new("bot", "ident", "Real Name");
        let mut machine =
            RegistrationMachine::new(identity, queued.iter().map(|c| c.to_string()).collect());
        machine.connecting();
        let _ = machine.start();
        machine
    }

    fn msg(line: &str) -> Message {
        Message::decode(line, "irc.example.net").unwrap()
    }

    #[test]
    fn test_initial_phase() {
        let identity = ClientIdentity::new("bot", "ident", "Real Name");
        let machine = RegistrationMachine::new(identity, vec![]);
        assert_eq!(machine.phase(), Phase::Disconnected);
    }

    #[test]
    fn test_start_sends_nick_then_user() {
        let identity = ClientIdentity::new("bot", "ident", "Real Name");
        let mut machine = RegistrationMachine::new(identity, vec![]);
        machine.connecting();
        assert_eq!(machine.phase(), Phase::Connecting);
        assert_eq!(machine.start(), vec!["NICK bot", "USER ident 0 * :Real Name"]);
        assert_eq!(machine.phase(), Phase::AwaitingRegistration);
    }

    #[test]
    fn test_messages_before_registration_are_not_delivered() {
        let mut machine = machine(&["#a"]);
        let actions = machine.feed(&msg(":srv NOTICE * :*** Looking up your hostname\r\n"));
        assert!(actions.is_empty());
        assert_eq!(machine.phase(), Phase::AwaitingRegistration);
        assert_eq!(machine.channels().queued(), ["#a".to_string()]);
    }

    #[test]
    fn test_welcome_joins_queue_in_order_once() {
        let mut machine = machine(&["#a", "#b", "#c"]);

        let actions = machine.feed(&msg(":srv 001 bot :Welcome\r\n"));
        assert_eq!(
            actions,
            vec![
                RegistrationAction::Complete,
                RegistrationAction::Join("#a".into()),
                RegistrationAction::Join("#b".into()),
                RegistrationAction::Join("#c".into()),
                RegistrationAction::Deliver,
            ]
        );
        assert_eq!(machine.phase(), Phase::Registered);
        assert!(machine.channels().queued().is_empty());

        for numeric in ["002", "003", "004"] {
            let line = format!(":srv {} bot :info\r\n", numeric);
            assert_eq!(machine.feed(&msg(&line)), vec![RegistrationAction::Deliver]);
        }
    }

    #[test]
    fn test_any_welcome_numeric_completes() {
        let mut machine = machine(&[]);
        let actions = machine.feed(&msg(":srv 004 bot srv ircd-1.0 iow ntk\r\n"));
        assert_eq!(
            actions,
            vec![RegistrationAction::Complete, RegistrationAction::Deliver]
        );
    }

    #[test]
    fn test_other_numerics_do_not_complete() {
        let mut machine = machine(&[]);
        assert!(machine.feed(&msg(":srv 005 bot CHANTYPES=# :are supported\r\n")).is_empty());
        assert!(machine.feed(&msg(":srv 433 * bot :Nickname is already in use\r\n")).is_empty());
        assert_eq!(machine.phase(), Phase::AwaitingRegistration);
    }

    #[test]
    fn test_disconnect_is_terminal() {
        let mut machine = machine(&[]);
        let _ = machine.feed(&msg(":srv 001 bot :Welcome\r\n"));
        machine.disconnect();
        assert_eq!(machine.phase(), Phase::Disconnected);
        assert!(machine.feed(&msg(":srv 001 bot :Welcome\r\n")).is_empty());
    }

    #[test]
    fn test_channel_set_tracking() {
        let mut channels = ChannelSet::with_queue(vec!["#q".into()]);
        channels.joined("#a");
        assert!(channels.contains("#a"));
        channels.parted("#a");
        assert!(!channels.contains("#a"));
        assert_eq!(channels.queued(), ["#q".to_string()]);
    }
}

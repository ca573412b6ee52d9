//! Connection driver, handler hook and command façade.
//!
//! A [`Client`] is built from a connection URI, an identity, a
//! configuration and a [`MessageHandler`]. [`Client::connect`] opens the
//! transport and registers; [`Session::run`] then reads until the server
//! closes the connection. [`Client::run`] does both and logs a failed
//! connect instead of returning it.
//!
//! # Example
//!
//! ```no_run
//! use slirc_client::{async_trait, Client, ClientConfig, ClientIdentity, Commands, Message, MessageHandler};
//!
//! struct Greeter;
//!
//! #[async_trait]
//! impl MessageHandler for Greeter {
//!     async fn on_message(&mut self, commands: &mut Commands<'_>, message: Option<&Message>) {
//!         let Some(msg) = message else { return };
//!         if msg.command == "JOIN" && msg.nick() != "greeter" {
//!             if let Some(channel) = msg.param(0) {
//!                 let _ = commands.privmsg(channel, &format!("hello {}", msg.nick())).await;
//!             }
//!         }
//!     }
//! }
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::new(
//!     "irc://irc.example.net:+6697/rust",
//!     ClientIdentity::new("greeter", "greeter", "Greeting bot"),
//!     ClientConfig::default(),
//!     Greeter,
//! )?;
//! client.run().await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Handler contract
//!
//! The handler runs on the session's task and is awaited before the next
//! line is read. A handler that never returns stalls the connection.

use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use crate::config::{ClientConfig, ClientIdentity};
use crate::encode::{encode_line, strip_protocol_control_chars, MAX_BODY_LEN};
use crate::endpoint::EndpointDescriptor;
use crate::error::{ConfigError, ConnectError, ProtocolError};
use crate::message::strip_terminator;
use crate::responder::{respond, AutoReply};
use crate::state::{ChannelSet, Phase, RegistrationAction, RegistrationMachine};
use crate::transport::{self, Transport};
use crate::Message;

/// Target for raw wire logging.
const WIRE_TARGET: &str = "slirc_client::wire";

/// Receives every post-registration message, and `None` on idle timeouts.
#[async_trait]
pub trait MessageHandler: Send {
    /// Called once per delivered line, or with `None` when no line arrived
    /// within the configured callback timeout.
    async fn on_message(&mut self, commands: &mut Commands<'_>, message: Option<&Message>);
}

#[async_trait]
impl<H: MessageHandler + ?Sized> MessageHandler for &mut H {
    async fn on_message(&mut self, commands: &mut Commands<'_>, message: Option<&Message>) {
        (**self).on_message(commands, message).await
    }
}

#[async_trait]
impl<H: MessageHandler + ?Sized> MessageHandler for Box<H> {
    async fn on_message(&mut self, commands: &mut Commands<'_>, message: Option<&Message>) {
        (**self).on_message(commands, message).await
    }
}

/// Outbound command helpers bound to an open transport.
///
/// Each call formats one line, strips line breaks from it, bounds it to
/// 510 bytes and writes it immediately.
pub struct Commands<'a> {
    transport: &'a mut Transport,
    channels: &'a mut ChannelSet,
    log_raw: bool,
}

impl<'a> Commands<'a> {
    fn new(transport: &'a mut Transport, channels: &'a mut ChannelSet, log_raw: bool) -> Self {
        Self {
            transport,
            channels,
            log_raw,
        }
    }

    /// Channels this client has joined.
    pub fn channels(&self) -> &ChannelSet {
        self.channels
    }

    /// Send a preformatted line (without terminator).
    ///
    /// NUL, CR and LF inside `line` are removed, so one call writes one
    /// protocol line.
    pub async fn raw(&mut self, line: &str) -> Result<(), ProtocolError> {
        let wire = encode_line(line);
        if wire.was_sanitized() {
            warn!("outbound line contained CR, LF or NUL, removed");
        }
        if wire.was_truncated() {
            warn!(
                len = wire.original_len(),
                limit = MAX_BODY_LEN,
                "outbound line too long, truncating"
            );
        }
        if self.log_raw {
            info!(target: WIRE_TARGET, "<< {}", wire.body());
        }
        self.transport.write_line(wire).await
    }

    /// `NICK <nick>`
    pub async fn nick(&mut self, nick: &str) -> Result<(), ProtocolError> {
        self.raw(&format!("NICK {}", nick)).await
    }

    /// `JOIN <channel>`
    pub async fn join(&mut self, channel: &str) -> Result<(), ProtocolError> {
        self.raw(&format!("JOIN {}", channel)).await?;
        self.channels.joined(&strip_protocol_control_chars(channel));
        Ok(())
    }

    /// `PART <channel> :<message>`
    pub async fn part(&mut self, channel: &str, message: &str) -> Result<(), ProtocolError> {
        self.raw(&format!("PART {} :{}", channel, message)).await?;
        self.channels.parted(&strip_protocol_control_chars(channel));
        Ok(())
    }

    /// `QUIT :<message>`
    pub async fn quit(&mut self, message: &str) -> Result<(), ProtocolError> {
        self.raw(&format!("QUIT :{}", message)).await
    }

    /// `KICK <channel> <nick> :<message>`
    pub async fn kick(
        &mut self,
        channel: &str,
        nick: &str,
        message: &str,
    ) -> Result<(), ProtocolError> {
        self.raw(&format!("KICK {} {} :{}", channel, nick, message))
            .await
    }

    /// `PRIVMSG <target> :<text>`
    pub async fn privmsg(&mut self, target: &str, text: &str) -> Result<(), ProtocolError> {
        self.raw(&format!("PRIVMSG {} :{}", target, text)).await
    }

    /// `NOTICE <target> :<text>`
    pub async fn notice(&mut self, target: &str, text: &str) -> Result<(), ProtocolError> {
        self.raw(&format!("NOTICE {} :{}", target, text)).await
    }
}

/// A configured, not yet connected client.
pub struct Client<H> {
    endpoint: EndpointDescriptor,
    config: ClientConfig,
    machine: RegistrationMachine,
    handler: H,
}

impl<H: MessageHandler> Client<H> {
    /// Build a client from a connection URI.
    ///
    /// # Errors
    ///
    /// A malformed URI or an invalid configuration is a [`ConfigError`];
    /// no connection is attempted.
    pub fn new(
        uri: &str,
        identity: ClientIdentity,
        config: ClientConfig,
        handler: H,
    ) -> Result<Self, ConfigError> {
        let endpoint = EndpointDescriptor::parse(uri)?;
        Self::with_endpoint(endpoint, identity, config, handler)
    }

    /// Build a client from an already parsed endpoint.
    ///
    /// # Errors
    ///
    /// Fails if `config` does not pass [`ClientConfig::validate`].
    pub fn with_endpoint(
        endpoint: EndpointDescriptor,
        identity: ClientIdentity,
        config: ClientConfig,
        handler: H,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        if config.verbose_log {
            info!(
                server = %endpoint.addr(),
                tls = endpoint.use_tls,
                channels = %endpoint.initial_channels.join(", "),
                "client configured"
            );
        }
        let machine = RegistrationMachine::new(identity, endpoint.initial_channels.clone());
        Ok(Self {
            endpoint,
            config,
            machine,
            handler,
        })
    }

    /// The endpoint this client dials.
    pub fn endpoint(&self) -> &EndpointDescriptor {
        &self.endpoint
    }

    /// Current phase; always [`Phase::Disconnected`] before connecting.
    pub fn phase(&self) -> Phase {
        self.machine.phase()
    }

    /// Open the transport and send NICK/USER.
    pub async fn connect(mut self) -> Result<Session<H>, ConnectError> {
        self.machine.connecting();
        if self.config.verbose_log {
            info!(server = %self.endpoint.addr(), tls = self.endpoint.use_tls, "connecting");
        }
        let transport = transport::connect(
            &self.endpoint,
            self.config.connection_timeout(),
            self.config.accept_invalid_certs,
        )
        .await?;
        self.connect_with(transport).await
    }

    /// Register over an already open transport.
    pub async fn connect_with(mut self, transport: Transport) -> Result<Session<H>, ConnectError> {
        if self.machine.phase() == Phase::Disconnected {
            self.machine.connecting();
        }
        if self.config.verbose_log {
            info!("connection established, registering with server");
        }

        let mut session = Session {
            transport,
            endpoint: self.endpoint,
            config: self.config,
            machine: self.machine,
            handler: self.handler,
        };
        for line in session.machine.start() {
            session
                .commands()
                .raw(&line)
                .await
                .map_err(ConnectError::Register)?;
        }
        Ok(session)
    }

    /// Connect and run until the server closes the connection.
    ///
    /// A failed connect is logged and ends the call with `Ok(())`; use
    /// [`Client::connect`] to inspect the error instead.
    pub async fn run(self) -> Result<(), ProtocolError> {
        match self.connect().await {
            Ok(session) => session.run().await,
            Err(e) => {
                error!(error = %e, "server connection failed");
                Ok(())
            }
        }
    }
}

/// A registered or registering connection.
pub struct Session<H> {
    transport: Transport,
    endpoint: EndpointDescriptor,
    config: ClientConfig,
    machine: RegistrationMachine,
    handler: H,
}

impl<H: MessageHandler> Session<H> {
    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.machine.phase()
    }

    /// Channel bookkeeping.
    pub fn channels(&self) -> &ChannelSet {
        self.machine.channels()
    }

    /// Command façade outside of a handler callback.
    pub fn commands(&mut self) -> Commands<'_> {
        Commands::new(
            &mut self.transport,
            self.machine.channels_mut(),
            self.config.log_raw_sockets,
        )
    }

    /// Read until end of stream.
    ///
    /// Returns `Ok(())` when the server closes the connection, or the I/O
    /// error that ended it. Either way the session ends disconnected.
    pub async fn run(mut self) -> Result<(), ProtocolError> {
        let result = self.read_loop().await;
        self.machine.disconnect();
        match &result {
            Ok(()) if self.config.verbose_log => info!("socket disconnected"),
            Ok(()) => {}
            Err(e) => warn!(error = %e, "socket disconnected"),
        }
        result
    }

    async fn read_loop(&mut self) -> Result<(), ProtocolError> {
        let idle = self.config.callback_timeout();
        loop {
            match tokio::time::timeout(idle, self.transport.read_line()).await {
                Err(_) => self.deliver(None).await,
                Ok(Ok(Some(line))) => self.handle_line(&line).await?,
                Ok(Ok(None)) => return Ok(()),
                Ok(Err(e)) => return Err(e),
            }
        }
    }

    async fn handle_line(&mut self, line: &str) -> Result<(), ProtocolError> {
        if self.config.log_raw_sockets {
            info!(target: WIRE_TARGET, ">> {}", strip_terminator(line));
        }

        let message = match Message::decode(line, &self.endpoint.host) {
            Ok(message) => message,
            Err(e) => {
                warn!(raw = %strip_terminator(line), error = %e, "dropping malformed message");
                return Ok(());
            }
        };

        if let Some(reply) = respond(&message, &self.config.ctcp_version_reply) {
            match &reply {
                AutoReply::Pong(_) => debug!("answering server PING"),
                AutoReply::CtcpVersion { target, .. } | AutoReply::CtcpPing { target, .. } => {
                    if self.config.verbose_log {
                        info!(from = %target, "received {} request", reply.kind());
                    }
                }
            }
            self.commands().raw(&reply.to_string()).await?;
        }

        for action in self.machine.feed(&message) {
            match action {
                RegistrationAction::Complete => {
                    if self.config.verbose_log {
                        info!(command = %message.command, "registration complete");
                    }
                }
                RegistrationAction::Join(channel) => self.commands().join(&channel).await?,
                RegistrationAction::Deliver => self.deliver(Some(&message)).await,
            }
        }
        Ok(())
    }

    async fn deliver(&mut self, message: Option<&Message>) {
        let mut commands = Commands::new(
            &mut self.transport,
            self.machine.channels_mut(),
            self.config.log_raw_sockets,
        );
        self.handler.on_message(&mut commands, message).await;
    }
}

use std::fmt;

use crate::error::MessageParseError;
use crate::prefix::Prefix;

/// A decoded inbound IRC line.
///
/// Every decoded message has a source: lines the server sent without a
/// prefix are attributed to the server hostname the client dialed.
///
/// # Example
///
/// ```
/// use slirc_client::Message;
///
/// let msg = Message::decode(":nick!user@host PRIVMSG #channel :hi: there\r\n", "irc.example.net")
///     .unwrap();
/// assert_eq!(msg.nick(), "nick");
/// assert_eq!(msg.command, "PRIVMSG");
/// assert_eq!(msg.parameters, vec!["#channel", "hi: there"]);
/// ```
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Message {
    /// Message source (`nick!user@host` or a single name).
    pub prefix: Prefix,
    /// The command token exactly as received, e.g. `PRIVMSG` or `001`.
    pub command: String,
    /// Parameters in wire order; the trailing parameter, if any, is last.
    pub parameters: Vec<String>,
    /// The line as read from the transport, terminator included.
    pub raw: String,
}

impl Message {
    /// Decode one raw line.
    ///
    /// `fallback_host` is used as the source of lines sent without a prefix.
    ///
    /// # Errors
    ///
    /// Returns [`MessageParseError`] when the line is empty or lacks a
    /// command and at least one parameter.
    pub fn decode(line: &str, fallback_host: &str) -> Result<Self, MessageParseError> {
        super::parse::decode(line, fallback_host)
    }

    /// Nickname of the sender, or the server name.
    pub fn nick(&self) -> &str {
        self.prefix.nick()
    }

    /// Username of the sender, if the prefix was a full mask.
    pub fn user(&self) -> Option<&str> {
        self.prefix.user()
    }

    /// Hostname of the sender, if the prefix was a full mask.
    pub fn host(&self) -> Option<&str> {
        self.prefix.host()
    }

    /// Get the parameter at `index`.
    pub fn param(&self, index: usize) -> Option<&str> {
        self.parameters.get(index).map(String::as_str)
    }

    /// Whether the command is a three-digit numeric reply.
    pub fn is_numeric(&self) -> bool {
        self.command.len() == 3 && self.command.bytes().all(|b| b.is_ascii_digit())
    }
}

impl fmt::Display for Message {
    /// Writes the raw line without its terminator.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(super::parse::strip_terminator(&self.raw))
    }
}

//! Automatic protocol replies.
//!
//! Two kinds of inbound traffic are answered without involving the message
//! handler: server `PING` (liveness) and CTCP `VERSION`/`PING` requests
//! (introspection). [`respond`] decides; the session writes the reply
//! before the handler sees the message.

use std::fmt;

use crate::ctcp::Ctcp;
use crate::encode::strip_protocol_control_chars;
use crate::Message;

/// A reply the client must send on its own.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AutoReply {
    /// `PONG :<token>` for a server PING.
    Pong(String),
    /// CTCP VERSION answer, sent as a NOTICE to `target`.
    CtcpVersion {
        /// Nick that asked.
        target: String,
        /// Configured version string.
        version: String,
    },
    /// CTCP PING echo, sent as a NOTICE to `target`.
    CtcpPing {
        /// Nick that asked.
        target: String,
        /// The full CTCP body, delimiters included, without NUL/CR/LF.
        payload: String,
    },
}

impl AutoReply {
    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            AutoReply::Pong(_) => "PONG",
            AutoReply::CtcpVersion { .. } => "CTCP VERSION",
            AutoReply::CtcpPing { .. } => "CTCP PING",
        }
    }
}

impl fmt::Display for AutoReply {
    /// Formats the reply as an unterminated protocol line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AutoReply::Pong(token) => write!(f, "PONG :{}", token),
            AutoReply::CtcpVersion { target, version } => {
                write!(f, "NOTICE {} :{}", target, version)
            }
            AutoReply::CtcpPing { target, payload } => write!(f, "NOTICE {} :{}", target, payload),
        }
    }
}

/// Decide whether `msg` needs an automatic reply.
///
/// ```
/// use slirc_client::{responder::{respond, AutoReply}, Message};
///
/// let ping = Message::decode("PING :server1\r\n", "irc.example.net").unwrap();
/// let reply = respond(&ping, "mybot 1.0").unwrap();
/// assert_eq!(reply, AutoReply::Pong("server1".into()));
/// assert_eq!(reply.to_string(), "PONG :server1");
/// ```
pub fn respond(msg: &Message, version_reply: &str) -> Option<AutoReply> {
    match msg.command.as_str() {
        "PING" => msg.param(0).map(|token| AutoReply::Pong(token.to_owned())),
        "PRIVMSG" | "NOTICE" => {
            let body = msg.param(1)?;
            let ctcp = Ctcp::parse(body)?;
            if ctcp.payload() == "VERSION" {
                Some(AutoReply::CtcpVersion {
                    target: msg.nick().to_owned(),
                    version: version_reply.to_owned(),
                })
            } else if ctcp.payload().starts_with("PING") {
                Some(AutoReply::CtcpPing {
                    target: msg.nick().to_owned(),
                    payload: strip_protocol_control_chars(body).into_owned(),
                })
            } else {
                None
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOST: &str = "irc.example.net";
    const VERSION: &str = "testbot 0.1";

    fn reply_to(line: &str) -> Option<AutoReply> {
        let msg = Message::decode(line, HOST).unwrap();
        respond(&msg, VERSION)
    }

    #[test]
    fn test_server_ping() {
        let reply = reply_to("PING :server1\r\n").unwrap();
        assert_eq!(reply.to_string(), "PONG :server1");
    }

    #[test]
    fn test_ctcp_version() {
        let reply = reply_to(":n!u@h PRIVMSG n2 :\x01VERSION\x01\r\n").unwrap();
        assert_eq!(
            reply,
            AutoReply::CtcpVersion {
                target: "n".into(),
                version: VERSION.into(),
            }
        );
        assert_eq!(reply.to_string(), "NOTICE n :testbot 0.1");
    }

    #[test]
    fn test_ctcp_ping_echoes_payload() {
        let reply = reply_to(":n!u@h PRIVMSG n2 :\x01PING 1700000000 123\x01\r\n").unwrap();
        assert_eq!(reply.to_string(), "NOTICE n :\x01PING 1700000000 123\x01");
        assert_eq!(reply.kind(), "CTCP PING");
    }

    #[test]
    fn test_ctcp_ping_echo_cannot_smuggle_a_command() {
        let reply =
            reply_to(":evil!u@h PRIVMSG bot :\x01PING x\rQUIT :owned\x01\r\n").unwrap();
        assert_eq!(reply.to_string(), "NOTICE evil :\x01PING xQUIT :owned\x01");

        let wire = crate::encode_line(&reply.to_string());
        assert_eq!(wire.as_str().matches('\r').count(), 1);
        assert!(wire.as_str().ends_with("\x01\r\n"));
    }

    #[test]
    fn test_ctcp_over_notice_is_answered() {
        let reply = reply_to(":n!u@h NOTICE me :\x01VERSION\x01\r\n").unwrap();
        assert_eq!(reply.kind(), "CTCP VERSION");
    }

    #[test]
    fn test_version_with_params_is_ignored() {
        assert!(reply_to(":n!u@h PRIVMSG me :\x01VERSION please\x01\r\n").is_none());
    }

    #[test]
    fn test_no_reply_for_plain_or_unknown() {
        assert!(reply_to(":n!u@h PRIVMSG #c :VERSION\r\n").is_none());
        assert!(reply_to(":n!u@h PRIVMSG #c :\x01VERSION\r\n").is_none());
        assert!(reply_to(":n!u@h PRIVMSG #c :\x01ACTION waves\x01\r\n").is_none());
        assert!(reply_to(":srv 001 me :Welcome\r\n").is_none());
        assert!(reply_to(":n!u@h PRIVMSG #c\r\n").is_none());
    }
}

//! CTCP (Client-to-Client Protocol) message handling.
//!
//! CTCP requests and replies travel inside PRIVMSG and NOTICE bodies,
//! delimited by the `\x01` byte at both ends.
//!
//! # Reference
//! - CTCP specification: <https://modern.ircdocs.horse/ctcp.html>
//!
//! # Example
//!
//! ```
//! use slirc_client::ctcp::Ctcp;
//!
//! let ctcp = Ctcp::parse("\x01PING 1700000000\x01").unwrap();
//! assert_eq!(ctcp.command(), "PING");
//! assert_eq!(ctcp.params(), Some("1700000000"));
//! assert_eq!(ctcp.to_string(), "\x01PING 1700000000\x01");
//! ```

use std::fmt;

/// The CTCP delimiter character (`\x01`).
pub const CTCP_DELIM: char = '\x01';

/// A CTCP payload borrowed from a message body.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ctcp<'a> {
    payload: &'a str,
}

impl<'a> Ctcp<'a> {
    /// Parse a PRIVMSG/NOTICE body.
    ///
    /// Returns `None` unless the body starts and ends with the delimiter.
    /// The payload between the delimiters may be empty.
    pub fn parse(text: &'a str) -> Option<Self> {
        let payload = text
            .strip_prefix(CTCP_DELIM)?
            .strip_suffix(CTCP_DELIM)?;
        Some(Self { payload })
    }

    /// Everything between the delimiters.
    pub fn payload(&self) -> &'a str {
        self.payload
    }

    /// The CTCP command, e.g. `VERSION`.
    pub fn command(&self) -> &'a str {
        self.payload
            .split_once(' ')
            .map_or(self.payload, |(command, _)| command)
    }

    /// Text after the command, if any.
    pub fn params(&self) -> Option<&'a str> {
        self.payload
            .split_once(' ')
            .map(|(_, params)| params)
            .filter(|params| !params.is_empty())
    }
}

impl fmt::Display for Ctcp<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", CTCP_DELIM, self.payload, CTCP_DELIM)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_version() {
        let ctcp = Ctcp::parse("\x01VERSION\x01").unwrap();
        assert_eq!(ctcp.payload(), "VERSION");
        assert_eq!(ctcp.command(), "VERSION");
        assert_eq!(ctcp.params(), None);
    }

    #[test]
    fn test_requires_both_delimiters() {
        assert!(Ctcp::parse("VERSION").is_none());
        assert!(Ctcp::parse("\x01VERSION").is_none());
        assert!(Ctcp::parse("VERSION\x01").is_none());
        assert!(Ctcp::parse("\x01").is_none());
    }

    #[test]
    fn test_empty_payload() {
        let ctcp = Ctcp::parse("\x01\x01").unwrap();
        assert_eq!(ctcp.payload(), "");
        assert_eq!(ctcp.command(), "");
    }

    #[test]
    fn test_action_with_params() {
        let ctcp = Ctcp::parse("\x01ACTION waves hello\x01").unwrap();
        assert_eq!(ctcp.command(), "ACTION");
        assert_eq!(ctcp.params(), Some("waves hello"));
    }
}

//! IRC message prefix (source) types.
//!
//! A prefix identifies the origin of a message. It is either a full
//! `nick!user@host` mask or a single name (a server, or a nick sent
//! without a mask).

use std::fmt;

use nom::{
    bytes::complete::take_till1,
    character::complete::char,
    combinator::all_consuming,
    sequence::{preceded, tuple},
    IResult,
};

/// IRC message prefix.
#[derive(Clone, Eq, PartialEq, Debug, Hash)]
pub enum Prefix {
    /// A single name: a server hostname or a bare nickname.
    Name(String),
    /// User prefix: (nickname, username, hostname)
    Nickname(String, String, String),
}

fn is_mask_delim(c: char) -> bool {
    c == '!' || c == '@'
}

fn parse_mask(input: &str) -> IResult<&str, (&str, &str, &str)> {
    all_consuming(tuple((
        take_till1(is_mask_delim),
        preceded(char('!'), take_till1(is_mask_delim)),
        preceded(char('@'), take_till1(is_mask_delim)),
    )))(input)
}

impl Prefix {
    /// Decompose a prefix token (without its leading `:`).
    ///
    /// Exactly `nick!user@host`, with all three parts non-empty, yields
    /// [`Prefix::Nickname`]. Anything else keeps the whole token as the
    /// name; a partial mask never produces a user or host.
    ///
    /// ```
    /// use slirc_client::Prefix;
    ///
    /// assert_eq!(
    ///     Prefix::parse("nick!user@host"),
    ///     Prefix::Nickname("nick".into(), "user".into(), "host".into())
    /// );
    /// assert_eq!(Prefix::parse("nick@host"), Prefix::Name("nick@host".into()));
    /// ```
    pub fn parse(token: &str) -> Self {
        match parse_mask(token) {
            Ok((_, (nick, user, host))) => {
                Prefix::Nickname(nick.to_owned(), user.to_owned(), host.to_owned())
            }
            Err(_) => Prefix::Name(token.to_owned()),
        }
    }

    /// The nickname, or the whole name for a single-name prefix.
    pub fn nick(&self) -> &str {
        match self {
            Prefix::Name(name) | Prefix::Nickname(name, _, _) => name,
        }
    }

    /// The username, present only for a full mask.
    pub fn user(&self) -> Option<&str> {
        match self {
            Prefix::Name(_) => None,
            Prefix::Nickname(_, user, _) => Some(user),
        }
    }

    /// The hostname, present only for a full mask.
    pub fn host(&self) -> Option<&str> {
        match self {
            Prefix::Name(_) => None,
            Prefix::Nickname(_, _, host) => Some(host),
        }
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Prefix::Name(name) => f.write_str(name),
            Prefix::Nickname(nick, user, host) => write!(f, "{}!{}@{}", nick, user, host),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_mask() {
        let prefix = Prefix::parse("nick!user@host.example.com");
        assert_eq!(prefix.nick(), "nick");
        assert_eq!(prefix.user(), Some("user"));
        assert_eq!(prefix.host(), Some("host.example.com"));
        assert_eq!(prefix.to_string(), "nick!user@host.example.com");
    }

    #[test]
    fn test_server_name() {
        let prefix = Prefix::parse("irc.example.net");
        assert_eq!(prefix, Prefix::Name("irc.example.net".into()));
        assert_eq!(prefix.user(), None);
        assert_eq!(prefix.host(), None);
    }

    #[test]
    fn test_partial_masks_stay_whole() {
        for token in ["nick!user", "nick@host", "nick!@host", "!user@host", "a!b@c@d", "a@b!c"] {
            let prefix = Prefix::parse(token);
            assert_eq!(prefix, Prefix::Name(token.into()), "token {:?}", token);
            assert_eq!(prefix.nick(), token);
        }
    }
}

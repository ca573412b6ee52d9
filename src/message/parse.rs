//! Line decoding.
//!
//! IRC message format:
//! ```text
//! [:prefix] <command> [middle params...] [:trailing]
//! ```
//!
//! The trailing parameter runs from the first parameter-leading `:` to the
//! end of the line and may itself contain spaces and colons.

use nom::{bytes::complete::take_until, IResult};

use crate::error::MessageParseError;
use crate::prefix::Prefix;

use super::types::Message;

/// Remove exactly one line terminator (`\r\n`, or a bare `\n`).
///
/// ```
/// use slirc_client::message::strip_terminator;
///
/// assert_eq!(strip_terminator("PING :a\r\n"), "PING :a");
/// assert_eq!(strip_terminator("PING :a\n"), "PING :a");
/// assert_eq!(strip_terminator("PING :a"), "PING :a");
/// assert_eq!(strip_terminator("PING :a\r\n\r\n"), "PING :a\r\n");
/// ```
pub fn strip_terminator(line: &str) -> &str {
    line.strip_suffix("\r\n")
        .or_else(|| line.strip_suffix('\n'))
        .unwrap_or(line)
}

/// Split off the part before the trailing-parameter marker.
fn take_middle(input: &str) -> IResult<&str, &str> {
    take_until(" :")(input)
}

/// Split `body` into the space-delimited region and the trailing parameter.
fn split_trailing(body: &str) -> (&str, Option<&str>) {
    match take_middle(body) {
        Ok((rest, middle)) => (middle, Some(&rest[2..])),
        Err(_) => (body, None),
    }
}

pub(super) fn decode(line: &str, fallback_host: &str) -> Result<Message, MessageParseError> {
    let body = strip_terminator(line);
    if body.trim().is_empty() {
        return Err(MessageParseError::EmptyMessage);
    }

    let synthesized;
    let body = match body.strip_prefix(':') {
        Some(rest) => rest,
        None => {
            synthesized = format!("{} {}", fallback_host, body);
            synthesized.as_str()
        }
    };

    let (middle, trailing) = split_trailing(body);
    let mut tokens = middle.split(' ').filter(|token| !token.is_empty());

    let prefix = tokens.next();
    let command = tokens.next();
    let mut parameters: Vec<String> = tokens.map(str::to_owned).collect();
    if let Some(trailing) = trailing {
        parameters.push(trailing.to_owned());
    }

    match (prefix, command) {
        (Some(prefix), Some(command)) if !parameters.is_empty() => Ok(Message {
            prefix: Prefix::parse(prefix),
            command: command.to_owned(),
            parameters,
            raw: line.to_owned(),
        }),
        _ => Err(MessageParseError::Malformed {
            got: usize::from(prefix.is_some()) + usize::from(command.is_some()) + parameters.len(),
        }),
    }
}

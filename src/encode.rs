//! Outbound line encoding.
//!
//! IRC lines are limited to 512 bytes including the trailing CR LF, leaving
//! 510 bytes of content. [`encode_line`] removes NUL, CR and LF from a
//! formatted command line, bounds it to that limit and appends the
//! terminator, so one call always puts exactly one line on the wire.
//!
//! # Example
//!
//! ```
//! use slirc_client::encode::encode_line;
//!
//! let line = encode_line("PRIVMSG #channel :Hello!");
//! assert_eq!(line.as_bytes(), b"PRIVMSG #channel :Hello!\r\n");
//! assert!(!line.was_truncated());
//!
//! let line = encode_line("PRIVMSG #channel :hi\r\nQUIT :bye");
//! assert_eq!(line.as_bytes(), b"PRIVMSG #channel :hiQUIT :bye\r\n");
//! assert!(line.was_sanitized());
//! ```

use std::borrow::Cow;

/// Maximum length of an IRC line, terminator included.
pub const MAX_LINE_LEN: usize = 512;

/// Maximum length of line content before the CR LF.
pub const MAX_BODY_LEN: usize = MAX_LINE_LEN - 2;

/// Characters that would end or corrupt a line on the wire.
const PROTOCOL_CONTROL_CHARS: [char; 3] = ['\0', '\r', '\n'];

/// A terminated line ready to be written to the transport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WireLine {
    line: String,
    original_len: usize,
    sanitized: bool,
}

impl WireLine {
    /// The encoded line, CR LF included.
    pub fn as_str(&self) -> &str {
        &self.line
    }

    /// The encoded line as bytes.
    pub fn as_bytes(&self) -> &[u8] {
        self.line.as_bytes()
    }

    /// The line content without the terminator.
    pub fn body(&self) -> &str {
        &self.line[..self.line.len() - 2]
    }

    /// Whether content was dropped to fit [`MAX_BODY_LEN`].
    pub fn was_truncated(&self) -> bool {
        self.original_len > self.body().len()
    }

    /// Length of the content before truncation, after control characters
    /// were removed.
    pub fn original_len(&self) -> usize {
        self.original_len
    }

    /// Whether NUL, CR or LF characters were removed from the content.
    pub fn was_sanitized(&self) -> bool {
        self.sanitized
    }

    /// Consume into the owned line.
    pub fn into_string(self) -> String {
        self.line
    }
}

/// Cut `s` to at most `max_bytes` without splitting a UTF-8 code point.
#[inline]
pub fn truncate_utf8_safe(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }

    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }

    &s[..end]
}

/// Returns `true` for NUL, CR and LF.
#[inline]
pub fn is_protocol_control_char(c: char) -> bool {
    PROTOCOL_CONTROL_CHARS.contains(&c)
}

/// Remove NUL, CR and LF from `s`, borrowing when there is nothing to remove.
pub fn strip_protocol_control_chars(s: &str) -> Cow<'_, str> {
    if !s.contains(is_protocol_control_char) {
        return Cow::Borrowed(s);
    }
    Cow::Owned(s.chars().filter(|c| !is_protocol_control_char(*c)).collect())
}

/// Strip protocol control characters, bound `line` to [`MAX_BODY_LEN`]
/// bytes and append CR LF.
///
/// Both changes are silent here; callers check [`WireLine::was_sanitized`]
/// and [`WireLine::was_truncated`] and log them.
pub fn encode_line(line: &str) -> WireLine {
    let clean = strip_protocol_control_chars(line);
    let sanitized = matches!(clean, Cow::Owned(_));
    let body = truncate_utf8_safe(&clean, MAX_BODY_LEN);
    let mut encoded = String::with_capacity(body.len() + 2);
    encoded.push_str(body);
    encoded.push_str("\r\n");
    WireLine {
        line: encoded,
        original_len: clean.len(),
        sanitized,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_line() {
        let line = encode_line("PONG :server1");
        assert_eq!(line.as_str(), "PONG :server1\r\n");
        assert_eq!(line.body(), "PONG :server1");
        assert!(!line.was_truncated());
    }

    #[test]
    fn test_exact_limit_is_kept() {
        let body = "x".repeat(MAX_BODY_LEN);
        let line = encode_line(&body);
        assert_eq!(line.as_bytes().len(), MAX_LINE_LEN);
        assert!(!line.was_truncated());
    }

    #[test]
    fn test_long_line_is_truncated() {
        let body = format!("PRIVMSG #x :{}", "y".repeat(600));
        let line = encode_line(&body);
        assert_eq!(line.as_bytes().len(), MAX_LINE_LEN);
        assert!(line.as_str().ends_with("y\r\n"));
        assert!(line.was_truncated());
        assert_eq!(line.original_len(), body.len());
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        // 509 ASCII bytes followed by a 4-byte emoji: the emoji cannot fit.
        let body = format!("{}👋", "a".repeat(509));
        let line = encode_line(&body);
        assert_eq!(line.body(), "a".repeat(509));
        assert!(line.was_truncated());
    }

    #[test]
    fn test_embedded_line_breaks_are_removed() {
        let line = encode_line("PRIVMSG #x :hi\r\nQUIT :owned");
        assert_eq!(line.as_str(), "PRIVMSG #x :hiQUIT :owned\r\n");
        assert_eq!(line.as_str().matches("\r\n").count(), 1);
        assert!(line.was_sanitized());
        assert!(!line.was_truncated());
    }

    #[test]
    fn test_bare_cr_lf_and_nul_are_removed() {
        let line = encode_line("NOTICE n :\x01PING x\rQUIT :owned\x01\n\0");
        assert_eq!(line.body(), "NOTICE n :\x01PING xQUIT :owned\x01");
        assert!(!line.body().contains(is_protocol_control_char));
    }

    #[test]
    fn test_clean_line_is_borrowed() {
        assert!(matches!(
            strip_protocol_control_chars("JOIN #rust"),
            Cow::Borrowed("JOIN #rust")
        ));
        assert!(!encode_line("JOIN #rust").was_sanitized());
    }

    #[test]
    fn test_stripping_happens_before_truncation() {
        // The line breaks don't count against the limit.
        let body = format!("{}\r\n", "z".repeat(MAX_BODY_LEN));
        let line = encode_line(&body);
        assert_eq!(line.body(), "z".repeat(MAX_BODY_LEN));
        assert!(line.was_sanitized());
        assert!(!line.was_truncated());
    }

    #[test]
    fn test_truncate_utf8_safe() {
        assert_eq!(truncate_utf8_safe("hello world", 5), "hello");
        assert_eq!(truncate_utf8_safe("café", 4), "caf");
        assert_eq!(truncate_utf8_safe("日本語", 6), "日本");
        assert_eq!(truncate_utf8_safe("hi", 10), "hi");
        assert_eq!(truncate_utf8_safe("hello", 0), "");
    }
}

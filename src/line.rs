//! Line-based codec for tokio.
//!
//! Splits the inbound byte stream into newline-terminated lines of at most
//! 512 bytes and writes pre-encoded [`WireLine`]s outbound.

use bytes::{Buf, BytesMut};
use tokio_util::codec::{Decoder, Encoder};
use tracing::warn;

use crate::encode::{WireLine, MAX_LINE_LEN};
use crate::error::ProtocolError;

/// Line codec with a bounded frame length.
///
/// Decoded frames keep their terminator. A line longer than the bound is
/// cut at the bound and the remainder up to its newline is skipped, so a
/// misbehaving peer costs one truncated line rather than the connection.
/// Bytes that are not valid UTF-8 are replaced rather than rejected.
#[derive(Debug)]
pub struct LineCodec {
    /// Index of next byte to check for newline
    next_index: usize,
    /// Maximum line length, terminator included
    max_len: usize,
    /// Skipping the tail of an over-long line
    discarding: bool,
}

impl Default for LineCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl LineCodec {
    /// Create a codec bounded to [`MAX_LINE_LEN`] bytes.
    pub fn new() -> Self {
        Self::with_max_len(MAX_LINE_LEN)
    }

    /// Create a codec with a custom bound.
    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            next_index: 0,
            max_len: max_len.max(1),
            discarding: false,
        }
    }

    /// The frame length bound.
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    fn into_text(bytes: &[u8]) -> String {
        String::from_utf8_lossy(bytes).into_owned()
    }
}

impl Decoder for LineCodec {
    type Item = String;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<String>, ProtocolError> {
        loop {
            if self.discarding {
                match src.iter().position(|b| *b == b'\n') {
                    Some(offset) => {
                        src.advance(offset + 1);
                        self.discarding = false;
                        continue;
                    }
                    None => {
                        src.clear();
                        return Ok(None);
                    }
                }
            }

            let newline = src[self.next_index..]
                .iter()
                .position(|b| *b == b'\n')
                .map(|offset| self.next_index + offset);

            return match newline {
                Some(end) if end < self.max_len => {
                    let line = src.split_to(end + 1);
                    self.next_index = 0;
                    Ok(Some(Self::into_text(&line)))
                }
                Some(end) => {
                    warn!(len = end + 1, limit = self.max_len, "inbound line too long, truncating");
                    let line = src.split_to(self.max_len);
                    src.advance(end + 1 - self.max_len);
                    self.next_index = 0;
                    Ok(Some(Self::into_text(&line)))
                }
                None if src.len() >= self.max_len => {
                    warn!(limit = self.max_len, "inbound line too long, truncating");
                    let line = src.split_to(self.max_len);
                    self.next_index = 0;
                    self.discarding = true;
                    Ok(Some(Self::into_text(&line)))
                }
                None => {
                    self.next_index = src.len();
                    Ok(None)
                }
            };
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<String>, ProtocolError> {
        if let Some(line) = self.decode(src)? {
            return Ok(Some(line));
        }
        if src.is_empty() || self.discarding {
            src.clear();
            return Ok(None);
        }
        // Unterminated final line.
        let line = src.split_to(src.len());
        self.next_index = 0;
        Ok(Some(Self::into_text(&line)))
    }
}

impl Encoder<WireLine> for LineCodec {
    type Error = ProtocolError;

    fn encode(&mut self, line: WireLine, dst: &mut BytesMut) -> Result<(), ProtocolError> {
        dst.extend_from_slice(line.as_bytes());
        Ok(())
    }
}

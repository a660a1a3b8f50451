//! Newline framing for tokio.
//!
//! [`LineFramer`] turns a byte stream into newline-terminated lines and back.
//! Decoded lines have their `\r\n` or `\n` terminator removed; encoded lines
//! get a single `\n` appended.
//!
//! Line content never fails decoding. Invalid UTF-8 is replaced with U+FFFD
//! and a line longer than the limit is cut to the limit, with the rest of it
//! skipped up to its newline. Only socket errors end the stream.

use bytes::{BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::error::{ProtocolError, Result};

/// Default maximum line length in bytes, terminator included (IRC standard).
pub const DEFAULT_MAX_LINE_LEN: usize = 512;

/// Newline-delimited line codec.
#[derive(Debug, Clone)]
pub struct LineFramer {
    /// Index of next byte to check for newline
    next_index: usize,
    /// Maximum line length
    max_len: usize,
    /// Kept head of an over-long line whose newline has not arrived yet
    overflow: Option<BytesMut>,
}

impl LineFramer {
    /// Create a framer with the IRC standard 512 byte limit.
    pub fn new() -> Self {
        Self::with_max_len(DEFAULT_MAX_LINE_LEN)
    }

    /// Create a framer with a custom max line length.
    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            next_index: 0,
            max_len,
            overflow: None,
        }
    }

    /// Whether `buf` already holds at least one complete line.
    pub fn has_complete_line(buf: &[u8]) -> bool {
        buf.contains(&b'\n')
    }
}

impl Default for LineFramer {
    fn default() -> Self {
        Self::new()
    }
}

fn lossy(bytes: &[u8]) -> String {
    let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
    String::from_utf8_lossy(bytes).into_owned()
}

impl Decoder for LineFramer {
    type Item = String;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<String>> {
        // Resume the newline search where the previous call stopped
        let Some(offset) = src[self.next_index..].iter().position(|b| *b == b'\n') else {
            if self.overflow.is_some() {
                // Still inside an over-long line
                src.clear();
                self.next_index = 0;
            } else if src.len() > self.max_len {
                self.overflow = Some(src.split_to(self.max_len));
                src.clear();
                self.next_index = 0;
            } else {
                self.next_index = src.len();
            }
            return Ok(None);
        };

        let line = src.split_to(self.next_index + offset + 1);
        self.next_index = 0;

        if let Some(head) = self.overflow.take() {
            return Ok(Some(lossy(&head)));
        }

        let content = &line[..line.len() - 1];
        let content = &content[..content.len().min(self.max_len)];
        Ok(Some(lossy(content)))
    }
}

impl Encoder<&str> for LineFramer {
    type Error = ProtocolError;

    fn encode(&mut self, line: &str, dst: &mut BytesMut) -> Result<()> {
        let line = line.trim_end_matches(['\r', '\n']);
        dst.reserve(line.len() + 1);
        dst.put_slice(line.as_bytes());
        dst.put_u8(b'\n');
        Ok(())
    }
}

impl Encoder<String> for LineFramer {
    type Error = ProtocolError;

    fn encode(&mut self, line: String, dst: &mut BytesMut) -> Result<()> {
        self.encode(line.as_str(), dst)
    }
}

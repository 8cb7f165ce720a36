//! Line-based codec for tokio.
//!
//! Reads newline-terminated UTF-8 lines and writes lines back with a single
//! `\n` terminator. A trailing `\r` before the newline is dropped so telnet
//! style clients work unchanged.

use bytes::{BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::error::{ProtocolError, Result};

/// Default maximum line length in bytes, terminator excluded.
pub const DEFAULT_MAX_LINE_LEN: usize = 4096;

/// Line-based codec that handles newline-terminated messages.
#[derive(Debug, Clone)]
pub struct LineCodec {
    /// Index of next byte to check for newline
    next_index: usize,
    max_len: usize,
}

impl LineCodec {
    /// Create a codec with [`DEFAULT_MAX_LINE_LEN`].
    pub fn new() -> Self {
        Self::with_max_len(DEFAULT_MAX_LINE_LEN)
    }

    /// Create a codec with a custom maximum line length.
    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            next_index: 0,
            max_len,
        }
    }

    /// Maximum accepted line length in bytes.
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    fn to_text(raw: &[u8]) -> Result<String> {
        std::str::from_utf8(raw)
            .map(str::to_owned)
            .map_err(|e| ProtocolError::InvalidUtf8 {
                byte_pos: e.valid_up_to(),
            })
    }
}

impl Default for LineCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for LineCodec {
    type Item = String;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<String>> {
        if let Some(offset) = src[self.next_index..].iter().position(|b| *b == b'\n') {
            let line = src.split_to(self.next_index + offset + 1);
            self.next_index = 0;

            let content = &line[..line.len() - 1];
            let content = content.strip_suffix(b"\r").unwrap_or(content);
            if content.len() > self.max_len {
                return Err(ProtocolError::LineTooLong {
                    actual: content.len(),
                    limit: self.max_len,
                });
            }

            Self::to_text(content).map(Some)
        } else {
            self.next_index = src.len();

            // One spare byte for a `\r` whose `\n` has not arrived yet.
            if src.len() > self.max_len + 1 {
                return Err(ProtocolError::LineTooLong {
                    actual: src.len(),
                    limit: self.max_len,
                });
            }

            Ok(None)
        }
    }

    /// A peer that closes without a final newline still gets its last line read.
    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<String>> {
        if let Some(line) = self.decode(src)? {
            return Ok(Some(line));
        }
        if src.is_empty() {
            return Ok(None);
        }
        let rest = src.split_to(src.len());
        self.next_index = 0;
        let rest = rest.strip_suffix(b"\r").unwrap_or(&rest[..]);
        if rest.len() > self.max_len {
            return Err(ProtocolError::LineTooLong {
                actual: rest.len(),
                limit: self.max_len,
            });
        }
        Self::to_text(rest).map(Some)
    }
}

impl<T: AsRef<str>> Encoder<T> for LineCodec {
    type Error = ProtocolError;

    fn encode(&mut self, line: T, dst: &mut BytesMut) -> Result<()> {
        let line = line.as_ref();
        dst.reserve(line.len() + 1);
        dst.put_slice(line.as_bytes());
        dst.put_u8(b'\n');
        Ok(())
    }
}

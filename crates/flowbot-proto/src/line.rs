//! Line-based codec for tokio.
//!
//! The streaming API sends one JSON document per line. This module provides a
//! codec that splits the response body into newline-terminated lines and
//! strips the terminator (`\n` or `\r\n`).

use bytes::{Bytes, BytesMut};
use tokio_util::codec::Decoder;

use crate::error;

/// Default maximum line length (1 MiB).
///
/// Event records carrying large message bodies can be a few hundred KiB;
/// anything beyond this is treated as a broken stream.
pub const DEFAULT_MAX_LINE_LEN: usize = 1024 * 1024;

/// Line-based codec that handles newline-terminated records.
///
/// Lines are yielded as raw bytes. UTF-8 validation is left to the JSON
/// decoder so that a single bad line does not terminate the stream.
#[derive(Debug, Clone)]
pub struct LineCodec {
    /// Index of next byte to check for newline
    next_index: usize,
    /// Maximum line length
    max_len: usize,
}

impl LineCodec {
    /// Create a new codec with the default line limit.
    pub fn new() -> Self {
        Self::with_max_len(DEFAULT_MAX_LINE_LEN)
    }

    /// Create a new codec with custom max line length.
    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            next_index: 0,
            max_len,
        }
    }

    /// Maximum line length this codec accepts, terminator included.
    pub fn max_len(&self) -> usize {
        self.max_len
    }
}

impl Default for LineCodec {
    fn default() -> Self {
        Self::new()
    }
}

fn strip_terminator(mut line: BytesMut) -> Bytes {
    if line.last() == Some(&b'\n') {
        line.truncate(line.len() - 1);
        if line.last() == Some(&b'\r') {
            line.truncate(line.len() - 1);
        }
    }
    line.freeze()
}

impl Decoder for LineCodec {
    type Item = Bytes;
    type Error = error::ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> error::Result<Option<Bytes>> {
        // Look for newline starting from where we left off
        if let Some(offset) = src[self.next_index..].iter().position(|b| *b == b'\n') {
            let line = src.split_to(self.next_index + offset + 1);
            self.next_index = 0;

            if line.len() > self.max_len {
                return Err(error::ProtocolError::LineTooLong {
                    actual: line.len(),
                    limit: self.max_len,
                });
            }

            Ok(Some(strip_terminator(line)))
        } else {
            // No complete line yet - remember where we stopped
            self.next_index = src.len();

            if src.len() > self.max_len {
                return Err(error::ProtocolError::LineTooLong {
                    actual: src.len(),
                    limit: self.max_len,
                });
            }

            Ok(None)
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> error::Result<Option<Bytes>> {
        // A final record without a trailing newline still counts as a line.
        match self.decode(src)? {
            Some(line) => Ok(Some(line)),
            None if src.is_empty() => Ok(None),
            None => {
                self.next_index = 0;
                let line = src.split_to(src.len());
                Ok(Some(strip_terminator(line)))
            }
        }
    }
}

//! Line acquisition from a byte stream.

use crate::buffer::ChunkedBuf;
use std::io::{BufRead, ErrorKind};

/// Initial size of the line buffer, and the step it grows by.
pub const READ_BUFSIZE: usize = 1024;

/// One line of operator input, without its trailing newline.
///
/// Kept as raw bytes: whatever the operator typed reaches the command as is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    bytes: Vec<u8>,
    capacity: usize,
    eof: bool,
}

impl Line {
    /// The line's bytes, newline excluded.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Whether nothing was read before the newline or end of input.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Whether the input ended while this line was being read.
    pub fn is_eof(&self) -> bool {
        self.eof
    }

    /// Size the read buffer had grown to when the line was complete.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Reads lines one byte at a time from a buffered source.
pub struct LineReader<R> {
    input: R,
}

impl<R: BufRead> LineReader<R> {
    /// Wrap a buffered source; nothing is read until [`read_line`](Self::read_line).
    pub fn new(input: R) -> Self {
        Self { input }
    }

    /// Read up to the next newline or the end of input.
    ///
    /// The newline is consumed and dropped. Read errors other than
    /// `Interrupted` end the input, the same as running out of bytes.
    pub fn read_line(&mut self) -> Line {
        let mut buf = ChunkedBuf::new(READ_BUFSIZE, "allocation error");
        let eof = loop {
            match self.next_byte() {
                Some(b'\n') => break false,
                Some(byte) => buf.push(byte),
                None => break true,
            }
        };
        let capacity = buf.capacity();
        Line {
            bytes: buf.into_vec(),
            capacity,
            eof,
        }
    }

    fn next_byte(&mut self) -> Option<u8> {
        loop {
            match self.input.fill_buf() {
                Ok([]) => return None,
                Ok(available) => {
                    let byte = available[0];
                    self.input.consume(1);
                    return Some(byte);
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    log::warn!("reading input failed, treating as end of input: {e}");
                    return None;
                }
            }
        }
    }
}

//! Splitting a command line into words.

use crate::buffer::ChunkedBuf;
use std::ops::Deref;

/// Bytes that separate words: space, tab, carriage return, newline, bell.
pub const DELIMITERS: [u8; 5] = [b' ', b'\t', b'\r', b'\n', 0x07];

/// Initial number of token slots, and the step the token list grows by.
pub const TOK_BUFSIZE: usize = 64;

/// Words of a command line, borrowed from the line they were split from.
///
/// Dereferences to `[&[u8]]`; an empty slice means no command was entered.
/// Words are raw bytes and need not be UTF-8.
#[derive(Debug)]
pub struct Tokens<'a> {
    words: Vec<&'a [u8]>,
    capacity: usize,
}

impl Tokens<'_> {
    /// Number of token slots the list had grown to.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<'a> Deref for Tokens<'a> {
    type Target = [&'a [u8]];

    fn deref(&self) -> &Self::Target {
        &self.words
    }
}

/// Whether `b` is one of the [`DELIMITERS`].
pub fn is_delimiter(b: u8) -> bool {
    DELIMITERS.contains(&b)
}

/// Split `line` on runs of [`DELIMITERS`].
///
/// Consecutive delimiters collapse, so no empty words are produced.
pub fn split_into_tokens(line: &[u8]) -> Tokens<'_> {
    let mut words = ChunkedBuf::new(TOK_BUFSIZE, "splitline allocation error");
    for word in line.split(|&b| is_delimiter(b)).filter(|w| !w.is_empty()) {
        words.push(word);
    }
    let capacity = words.capacity();
    Tokens {
        words: words.into_vec(),
        capacity,
    }
}

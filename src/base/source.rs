//! Module for reading source text as a stream of positioned characters.

use std::{fmt::Display, io::Read};

use getset::CopyGetters;

/// Number of bytes requested from the underlying byte source per refill.
const CHUNK_SIZE: usize = 1024;

/// Pointing to a particular location in the source text.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    /// Line number of the location (starts at 1).
    pub line: usize,

    /// Column number of the location (starts at 0, counted in characters).
    pub column: usize,
}

impl Default for Position {
    fn default() -> Self {
        Self { line: 1, column: 0 }
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Represents an element that is located within the source text.
pub trait Located {
    /// Get the position of the element.
    fn position(&self) -> Position;
}

/// Buffered, position-tracking supplier of characters over an in-memory
/// buffer or a readable byte source.
///
/// A reader over a fixed buffer reports end of input once the buffer is
/// consumed. A reader backed by a byte source refills its buffer in
/// fixed-size chunks; a refill that yields no bytes (or fails) ends the
/// input permanently.
///
/// [`SourceReader::peek`] provides exactly one character of lookahead; the
/// position only advances when a character is consumed with
/// [`SourceReader::next`].
#[derive(Debug, CopyGetters)]
pub struct SourceReader<R = std::io::Empty> {
    source: Option<R>,
    buffer: Vec<u8>,
    offset: usize,
    /// Get the position of the next character to be consumed.
    #[get_copy = "pub"]
    position: Position,
    peeked: Option<(char, usize)>,
    exhausted: bool,
}

impl SourceReader {
    /// Creates a reader over a fixed in-memory buffer.
    #[must_use]
    pub fn from_source(source: impl Into<Vec<u8>>) -> Self {
        Self {
            source: None,
            buffer: source.into(),
            offset: 0,
            position: Position::default(),
            peeked: None,
            exhausted: false,
        }
    }
}

impl<R: Read> SourceReader<R> {
    /// Creates a reader that refills its buffer from the given byte source.
    #[must_use]
    pub fn from_reader(reader: R) -> Self {
        Self {
            source: Some(reader),
            buffer: Vec::with_capacity(CHUNK_SIZE),
            offset: 0,
            position: Position::default(),
            peeked: None,
            exhausted: false,
        }
    }

    /// Consumes and returns the next character of the source text.
    ///
    /// A `\n` increments the line and resets the column to 0; every other
    /// character increments the column.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<char> {
        if self.peeked.is_none() {
            self.peeked = self.decode();
        }
        let (character, width) = self.peeked.take()?;

        self.offset += width;
        if character == '\n' {
            self.position.line += 1;
            self.position.column = 0;
        } else {
            self.position.column += 1;
        }

        Some(character)
    }

    /// Returns the next character without consuming it.
    pub fn peek(&mut self) -> Option<char> {
        if self.peeked.is_none() {
            self.peeked = self.decode();
        }
        self.peeked.map(|(character, _)| character)
    }

    /// Decodes the character at the current offset, refilling the buffer as
    /// needed. Invalid byte sequences decode to U+FFFD one byte at a time.
    fn decode(&mut self) -> Option<(char, usize)> {
        loop {
            if self.offset >= self.buffer.len() && !self.refill() {
                return None;
            }

            let bytes = &self.buffer[self.offset..];
            let width = utf8_sequence_width(bytes[0]);
            if width == 0 {
                return Some((char::REPLACEMENT_CHARACTER, 1));
            }
            let remaining = bytes.len();
            if remaining < width {
                // the chunk boundary split a multi-byte character
                if self.refill() {
                    continue;
                }
                return Some((char::REPLACEMENT_CHARACTER, remaining));
            }

            return match std::str::from_utf8(&bytes[..width]) {
                Ok(text) => text.chars().next().map(|character| (character, width)),
                Err(_) => Some((char::REPLACEMENT_CHARACTER, 1)),
            };
        }
    }

    /// Attempts to pull the next chunk of bytes from the underlying source.
    /// Returns whether any new bytes arrived.
    fn refill(&mut self) -> bool {
        if self.exhausted {
            return false;
        }
        let Some(source) = self.source.as_mut() else {
            self.exhausted = true;
            return false;
        };

        // drop the consumed prefix so the buffer stays one chunk large
        self.buffer.drain(..self.offset);
        self.offset = 0;

        let mut chunk = [0u8; CHUNK_SIZE];
        match source.read(&mut chunk) {
            Ok(0) | Err(_) => {
                self.exhausted = true;
                false
            }
            Ok(count) => {
                self.buffer.extend_from_slice(&chunk[..count]);
                true
            }
        }
    }
}

/// Expected length of the UTF-8 sequence introduced by `byte`, or 0 if the
/// byte cannot start a sequence.
fn utf8_sequence_width(byte: u8) -> usize {
    match byte {
        0x00..=0x7F => 1,
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => 0,
    }
}

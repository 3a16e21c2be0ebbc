use std::fmt::Display;

use crate::base::{
    log::{Message, PositionDisplay, Severity},
    source::{Located, Position},
};

/// Represents an error that occurred during the lexical analysis of the source code.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("Literal is not terminated.")]
    UnterminatedLiteral(#[from] UnterminatedLiteral),
    #[error("Lexeme exceeds the maximum length.")]
    BufferOverflow(#[from] BufferOverflow),
}

impl Located for Error {
    fn position(&self) -> Position {
        match self {
            Self::UnterminatedLiteral(error) => error.position,
            Self::BufferOverflow(error) => error.position,
        }
    }
}

/// The kind of quoted literal a lexical error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LiteralKind {
    /// A character literal, delimited by `'`.
    Char,

    /// A string literal, delimited by `"`.
    String,
}

impl LiteralKind {
    /// The quote character delimiting this kind of literal.
    #[must_use]
    pub fn quote(self) -> char {
        match self {
            Self::Char => '\'',
            Self::String => '"',
        }
    }

    /// The name of this kind of literal as used in diagnostics.
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::Char => "character",
            Self::String => "string",
        }
    }
}

/// A character or string literal is still open when the input ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub struct UnterminatedLiteral {
    /// Position of the opening quote.
    pub position: Position,

    /// Kind of the literal.
    pub kind: LiteralKind,
}

impl Display for UnterminatedLiteral {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}\n{}",
            Message::new(
                Severity::Error,
                format!("found an unterminated {} literal", self.kind.description()),
            ),
            PositionDisplay::new(
                self.position,
                Some("this quote is never closed before the end of the input"),
            )
        )
    }
}

/// A lexeme grew past [`MAX_LEXEME_LEN`](super::token::MAX_LEXEME_LEN) before it was terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub struct BufferOverflow {
    /// Position of the first character of the lexeme.
    pub position: Position,

    /// The length limit that was exceeded.
    pub limit: usize,
}

impl Display for BufferOverflow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}\n{}",
            Message::new(
                Severity::Error,
                format!("found a lexeme longer than {} bytes", self.limit),
            ),
            PositionDisplay::new(self.position, Option::<u8>::None)
        )
    }
}

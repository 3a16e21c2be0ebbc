//! Contains the [`Token`] struct and its related types.

use std::{fmt::Display, io::Read};

use getset::{CopyGetters, Getters};

use crate::base::{
    self,
    source::{Located, Position, SourceReader},
    Handler,
};

use super::error::{BufferOverflow, LiteralKind, UnterminatedLiteral};

/// Maximum number of bytes a single lexeme may occupy.
///
/// Scanning buffers grow on demand; the cap exists so that a runaway
/// unterminated literal cannot consume arbitrary amounts of memory without a
/// diagnostic. Exceeding it reports [`BufferOverflow`] and yields a
/// [`TokenKind::Error`] token.
pub const MAX_LEXEME_LEN: usize = 64 * 1024;

/// Is an enumeration containing all kinds of tokens in the Tactic language.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(missing_docs)]
pub enum TokenKind {
    /// Sentinel opening every token stream.
    StreamStart,

    /// Sentinel closing every token stream; it is its own successor.
    StreamEnd,

    /// Placeholder for a lexeme that could not be scanned.
    Error,

    Ident,
    Number,
    Char,
    String,

    /// `[`
    ListOpen,

    /// `l[`
    LiteralListOpen,

    /// `q[`
    QuasiListOpen,

    /// `^[`
    LambdaOpen,

    /// `]`
    ListClose,
}

/// Represents a single classified lexeme of Tactic source text, carrying the
/// position of its first character.
///
/// Tokens are read-only once scanned. `Ident`, `Number`, `Char`, `String`
/// and `Error` tokens carry a payload; for quoted literals the payload is
/// already escape-decoded.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Getters, CopyGetters)]
pub struct Token {
    /// Get the kind of the token.
    #[get_copy = "pub"]
    kind: TokenKind,

    /// Get the position of the first character of the token.
    #[get_copy = "pub"]
    position: Position,

    /// Get the payload of the token, if it carries one.
    #[get = "pub"]
    value: Option<String>,
}

impl Located for Token {
    fn position(&self) -> Position {
        self.position
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            TokenKind::StreamStart => f.write_str("<start>"),
            TokenKind::StreamEnd => f.write_str("<end>"),
            TokenKind::Error => write!(f, "<error {}>", self.text()),
            TokenKind::Ident => write!(f, "<ident {}>", self.text()),
            TokenKind::Number => write!(f, "<num {}>", self.text()),
            TokenKind::Char => write!(f, "'{}'", self.text()),
            TokenKind::String => write!(f, "\"{}\"", self.text()),
            TokenKind::ListOpen => f.write_str("["),
            TokenKind::ListClose => f.write_str("]"),
            TokenKind::LiteralListOpen => f.write_str("l["),
            TokenKind::QuasiListOpen => f.write_str("q["),
            TokenKind::LambdaOpen => f.write_str("^["),
        }
    }
}

/// Is an error that can occur when invoking the [`Token::tokenize`] method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, thiserror::Error)]
#[allow(missing_docs)]
pub enum TokenizeError {
    #[error("the reader is at the end of the source input.")]
    EndOfSource,
}

impl Token {
    pub(super) fn new(kind: TokenKind, position: Position) -> Self {
        Self {
            kind,
            position,
            value: None,
        }
    }

    fn with_value(kind: TokenKind, position: Position, value: String) -> Self {
        Self {
            kind,
            position,
            value: Some(value),
        }
    }

    /// The payload of the token, or the empty string for payload-free kinds.
    #[must_use]
    pub fn text(&self) -> &str {
        self.value.as_deref().unwrap_or_default()
    }

    /// Scans one token from the reader.
    ///
    /// Whitespace before the token is skipped. The scan uses at most one
    /// character of lookahead, which is what distinguishes the two-character
    /// prefixes `l[`, `q[` and `^[` from ordinary identifiers. Lexical
    /// problems (unterminated literals, over-long lexemes) are reported to
    /// `handler` and produce an [`TokenKind::Error`] token rather than
    /// stopping the scan.
    ///
    /// # Errors
    /// - [`TokenizeError::EndOfSource`] - The reader has no characters left.
    pub fn tokenize<R: Read>(
        reader: &mut SourceReader<R>,
        handler: &impl Handler<base::Error>,
    ) -> Result<Self, TokenizeError> {
        while reader.peek().is_some_and(char::is_whitespace) {
            reader.next();
        }

        let position = reader.position();
        let Some(character) = reader.next() else {
            return Err(TokenizeError::EndOfSource);
        };

        let token = match character {
            '[' => Self::new(TokenKind::ListOpen, position),
            ']' => Self::new(TokenKind::ListClose, position),
            'l' if reader.peek() == Some('[') => {
                reader.next();
                Self::new(TokenKind::LiteralListOpen, position)
            }
            'q' if reader.peek() == Some('[') => {
                reader.next();
                Self::new(TokenKind::QuasiListOpen, position)
            }
            '^' if reader.peek() == Some('[') => {
                reader.next();
                Self::new(TokenKind::LambdaOpen, position)
            }
            // lets the unquote marker stand alone before a bracketed form
            '$' if reader.peek() == Some('[') => {
                Self::with_value(TokenKind::Ident, position, "$".to_owned())
            }
            '\'' => Self::handle_quoted(reader, handler, position, LiteralKind::Char),
            '"' => Self::handle_quoted(reader, handler, position, LiteralKind::String),
            _ => Self::handle_run(reader, handler, position, character),
        };

        Ok(token)
    }

    /// Scans a quoted literal after its opening quote, decoding escape
    /// sequences into the payload.
    fn handle_quoted<R: Read>(
        reader: &mut SourceReader<R>,
        handler: &impl Handler<base::Error>,
        position: Position,
        kind: LiteralKind,
    ) -> Self {
        let quote = kind.quote();
        let mut text = String::new();
        let mut overflowed = false;

        loop {
            let Some(character) = reader.next() else {
                report(handler, UnterminatedLiteral { position, kind }.into());
                return Self::with_value(TokenKind::Error, position, text);
            };
            if character == quote {
                break;
            }

            let decoded = if character == '\\' {
                let Some(escaped) = reader.next() else {
                    report(handler, UnterminatedLiteral { position, kind }.into());
                    return Self::with_value(TokenKind::Error, position, text);
                };
                decode_escape(escaped)
            } else {
                character
            };

            if text.len() >= MAX_LEXEME_LEN {
                overflowed = true;
            } else {
                text.push(decoded);
            }
        }

        if overflowed {
            report(
                handler,
                BufferOverflow {
                    position,
                    limit: MAX_LEXEME_LEN,
                }
                .into(),
            );
            return Self::with_value(TokenKind::Error, position, text);
        }

        let kind = match kind {
            LiteralKind::Char => TokenKind::Char,
            LiteralKind::String => TokenKind::String,
        };
        Self::with_value(kind, position, text)
    }

    /// Scans the verbatim run of characters forming an identifier or number
    /// token. A run ends at whitespace or `]`.
    fn handle_run<R: Read>(
        reader: &mut SourceReader<R>,
        handler: &impl Handler<base::Error>,
        position: Position,
        first: char,
    ) -> Self {
        let kind = if first.is_ascii_digit() {
            TokenKind::Number
        } else {
            TokenKind::Ident
        };

        let mut text = String::from(first);
        let mut overflowed = false;
        while let Some(character) = reader.peek() {
            if character.is_whitespace() || character == ']' {
                break;
            }
            reader.next();

            if text.len() >= MAX_LEXEME_LEN {
                overflowed = true;
            } else {
                text.push(character);
            }
        }

        if overflowed {
            report(
                handler,
                BufferOverflow {
                    position,
                    limit: MAX_LEXEME_LEN,
                }
                .into(),
            );
            return Self::with_value(TokenKind::Error, position, text);
        }

        Self::with_value(kind, position, text)
    }
}

/// Forwards a lexical error to the diagnostic handler.
fn report(handler: &impl Handler<base::Error>, error: super::Error) {
    handler.receive(error.into());
}

/// Decodes the character following a backslash in a quoted literal. Escapes
/// without a special meaning stand for themselves.
fn decode_escape(escaped: char) -> char {
    match escaped {
        'a' => '\u{07}',
        'b' => '\u{08}',
        'f' => '\u{0C}',
        'n' => '\n',
        'r' => '\r',
        't' => '\t',
        'v' => '\u{0B}',
        other => other,
    }
}

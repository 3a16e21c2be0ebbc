//! Contains the [`TokenStream`] struct and its related types.

use std::{
    fmt::{Debug, Display},
    io::Read,
};

use derive_more::Deref;
use itertools::Itertools;

use crate::base::{self, source::SourceReader, Handler};

use super::token::{Token, TokenKind, TokenizeError};

/// Is the ordered sequence of [`Token`]s scanned from one source input.
///
/// This struct is the final output of the lexical analysis phase and is meant
/// to be consumed by the parser. A stream always begins with a
/// [`TokenKind::StreamStart`] sentinel and ends with a
/// [`TokenKind::StreamEnd`] sentinel whose position is greater than or equal
/// to the position of every token before it.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, PartialEq, Eq, Deref)]
pub struct TokenStream {
    #[deref]
    tokens: Vec<Token>,
}

impl Debug for TokenStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.tokens.iter()).finish()
    }
}

impl Display for TokenStream {
    /// Renders the diagnostic dump of the stream, tokens separated by single
    /// spaces, e.g. `<start> [ <ident def> <ident a> <num 1> ] <end>`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tokens.iter().format(" "))
    }
}

impl TokenStream {
    /// Tokenizes the given source input.
    ///
    /// This function scans the reader by calling [`Token::tokenize()`]
    /// repeatedly until the input is exhausted. Lexical errors are reported
    /// to `handler` and leave [`TokenKind::Error`] tokens in the stream;
    /// scanning continues past them.
    #[must_use]
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn tokenize<R: Read>(
        reader: &mut SourceReader<R>,
        handler: &impl Handler<base::Error>,
    ) -> Self {
        let mut tokens = vec![Token::new(TokenKind::StreamStart, reader.position())];

        loop {
            match Token::tokenize(reader, handler) {
                Ok(token) => tokens.push(token),
                Err(TokenizeError::EndOfSource) => break,
            }
        }

        tokens.push(Token::new(TokenKind::StreamEnd, reader.position()));
        tracing::debug!("scanned {} tokens", tokens.len());

        Self { tokens }
    }

    /// The [`TokenKind::StreamStart`] sentinel opening the stream.
    #[must_use]
    pub fn first(&self) -> &Token {
        &self.tokens[0]
    }

    /// A cursor positioned on the stream's opening sentinel.
    #[must_use]
    pub fn cursor(&self) -> Cursor {
        Cursor {
            stream: self,
            index: 0,
        }
    }
}

/// Forward-only cursor over a [`TokenStream`].
///
/// Advancing saturates at the [`TokenKind::StreamEnd`] sentinel: the end
/// token is its own successor.
#[derive(Debug, Clone, Copy)]
pub struct Cursor<'a> {
    stream: &'a TokenStream,
    index: usize,
}

impl<'a> Cursor<'a> {
    /// The token the cursor is currently on.
    #[must_use]
    pub fn current(&self) -> &'a Token {
        &self.stream.tokens[self.index]
    }

    /// Advances to the next token and returns it.
    pub fn advance(&mut self) -> &'a Token {
        if !self.is_end() {
            self.index += 1;
        }
        self.current()
    }

    /// Whether the cursor has reached the [`TokenKind::StreamEnd`] sentinel.
    #[must_use]
    pub fn is_end(&self) -> bool {
        self.current().kind() == TokenKind::StreamEnd
    }
}

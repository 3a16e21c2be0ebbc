//! Contains the error types that can occur while parsing the syntax of the language.

use std::fmt::Display;

use crate::{
    base::{
        log::{Message, PositionDisplay, Severity},
        source::{Located, Position},
    },
    lexical::token::{Token, TokenKind},
};

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, Error>;

/// An enumeration containing all kinds of syntactic errors that can occur
/// while parsing the language.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[allow(missing_docs)]
pub enum Error {
    #[error(transparent)]
    UnexpectedToken(#[from] UnexpectedToken),
    #[error(transparent)]
    MalformedLambda(#[from] MalformedLambda),
    #[error(transparent)]
    MalformedNumber(#[from] MalformedNumber),
    #[error(transparent)]
    MalformedChar(#[from] MalformedChar),
}

impl Located for Error {
    fn position(&self) -> Position {
        match self {
            Self::UnexpectedToken(error) => error.position,
            Self::MalformedLambda(error) => error.position,
            Self::MalformedNumber(error) => error.position,
            Self::MalformedChar(error) => error.position,
        }
    }
}

/// Enumeration naming the kinds of syntax the parser can be waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(missing_docs)]
pub enum SyntaxKind {
    Form,
    CloseBracket,
    Parameters,
    UnquotedForm,
}

impl SyntaxKind {
    fn expected_binding_str(self) -> &'static str {
        match self {
            Self::Form => "a form",
            Self::CloseBracket => "a closing `]`",
            Self::Parameters => "a parameter name or a bracketed parameter list",
            Self::UnquotedForm => "a form to unquote",
        }
    }
}

/// A syntax/token is expected but the parser found another token instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub struct UnexpectedToken {
    /// The kind of syntax that was expected.
    pub expected: SyntaxKind,

    /// The token that was found instead; `None` stands for the end of the
    /// stream.
    pub found: Option<Token>,

    /// The position at which the parser stopped.
    pub position: Position,
}

impl Display for UnexpectedToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let found_binding = self.found.as_ref().map_or_else(
            || "the end of the input".to_owned(),
            |token| match token.kind() {
                TokenKind::Ident => format!("an identifier token `{}`", token.text()),
                TokenKind::Number => format!("a number token `{}`", token.text()),
                TokenKind::Char => "a character literal".to_owned(),
                TokenKind::String => "a string literal".to_owned(),
                TokenKind::ListOpen => "a `[` token".to_owned(),
                TokenKind::ListClose => "a `]` token".to_owned(),
                TokenKind::LiteralListOpen => "a `l[` token".to_owned(),
                TokenKind::QuasiListOpen => "a `q[` token".to_owned(),
                TokenKind::LambdaOpen => "a `^[` token".to_owned(),
                TokenKind::Error => "an invalid token".to_owned(),
                TokenKind::StreamStart | TokenKind::StreamEnd => "the end of the input".to_owned(),
            },
        );

        let message = format!(
            "expected {}, but found {}",
            self.expected.expected_binding_str(),
            found_binding
        );

        write!(
            f,
            "{}\n{}",
            Message::new(Severity::Error, message),
            PositionDisplay::new(self.position, Option::<u8>::None)
        )
    }
}

/// A lambda form whose parameter specification or body does not follow the
/// grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub struct MalformedLambda {
    /// Why the lambda is malformed.
    pub message: &'static str,

    /// The position of the offending form.
    pub position: Position,
}

impl Display for MalformedLambda {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}\n{}",
            Message::new(Severity::Error, format!("malformed lambda: {}", self.message)),
            PositionDisplay::new(self.position, Option::<u8>::None)
        )
    }
}

/// A number token whose text cannot be interpreted as a literal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub struct MalformedNumber {
    /// The verbatim text of the token.
    pub text: String,

    /// The position of the token.
    pub position: Position,
}

impl Display for MalformedNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}\n{}",
            Message::new(
                Severity::Error,
                format!("`{}` is not a valid number literal", self.text),
            ),
            PositionDisplay::new(
                self.position,
                Some("only plain integers and decimal floats are supported"),
            )
        )
    }
}

/// A character token whose payload is not exactly one character.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub struct MalformedChar {
    /// The decoded payload of the token.
    pub text: String,

    /// The position of the token.
    pub position: Position,
}

impl Display for MalformedChar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}\n{}",
            Message::new(
                Severity::Error,
                "a character literal must contain exactly one character",
            ),
            PositionDisplay::new(self.position, Option::<u8>::None)
        )
    }
}

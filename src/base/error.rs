/// An error that occurred while reading Tactic source code.
#[allow(missing_docs)]
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("An error occurred while working with Input/Output: {0}")]
    IoError(String),
    #[error("An error occurred while lexing the source code: {0}")]
    LexicalError(#[from] crate::lexical::Error),
    #[error(transparent)]
    ParseError(#[from] crate::syntax::error::Error),
    #[error("An error occurred: {0}")]
    Other(&'static str),
}

/// A specialized [`Result`] type for this crate.
pub type Result<T> = std::result::Result<T, Error>;

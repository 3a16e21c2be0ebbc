//! The front end of the `Tactic` language.
//!
//! `Tactic` is a small Lisp-family language that uses brackets instead of
//! parentheses. Characters and strings are delimited by the usual single and
//! double quotes, literal lists begin with a leading `l`, quasi lists with a
//! leading `q`, unquoted expressions inside them with a leading `$`, and
//! lambdas with a leading `^`:
//!
//! ```text
//! [def a 1]
//! [def c ^[[a b] [cat a b]]]
//! [def d l[1 2 3]]
//! [def e q[$a $b 3]]
//! [def f ^[x [pow x 5]]]
//! [def g 'c']
//! [def h "hello"]
//! [def i 3.14]
//! ```
//!
//! This crate turns source text into a stream of classified tokens
//! ([`lexical`]) and assembles the stream into trees of typed nodes
//! ([`syntax`]). Evaluation is left to whatever consumes the trees.

#![deny(
    missing_debug_implementations,
    missing_copy_implementations,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    clippy::missing_errors_doc
)]
#![warn(missing_docs, clippy::all, clippy::pedantic)]
#![allow(clippy::missing_panics_doc, clippy::missing_const_for_fn)]

pub mod base;
pub mod lexical;
pub mod syntax;

use std::{io::Read, path::Path};

use base::{source::SourceReader, Error, Handler, Result};
use lexical::{token::TokenKind, token_stream::TokenStream};
use syntax::{parser::Parser, syntax_tree::Node};

/// Converts the given source text to a token stream.
///
/// Lexical diagnostics go to `handler`; the returned stream keeps an error
/// token wherever a lexeme could not be scanned. The stream's `Display`
/// implementation renders the diagnostic token dump.
#[must_use]
pub fn tokenize(handler: &impl Handler<Error>, source: &str) -> TokenStream {
    let mut reader = SourceReader::from_source(source);
    TokenStream::tokenize(&mut reader, handler)
}

/// Converts the contents of the given byte source to a token stream,
/// reading it in fixed-size chunks.
#[must_use]
pub fn tokenize_reader<R: Read>(handler: &impl Handler<Error>, reader: R) -> TokenStream {
    let mut reader = SourceReader::from_reader(reader);
    TokenStream::tokenize(&mut reader, handler)
}

/// Parses the given source text into its top-level forms.
///
/// # Errors
/// - [`Error::Other`] if the source contains lexical errors (reported to
///   `handler` individually).
/// - [`Error::ParseError`] for the first syntactic error.
pub fn parse(handler: &impl Handler<Error>, source: &str) -> Result<Vec<Node>> {
    parse_stream(&tokenize(handler, source))
}

/// Parses the contents of the given byte source into its top-level forms.
///
/// # Errors
/// - [`Error::Other`] if the source contains lexical errors (reported to
///   `handler` individually).
/// - [`Error::ParseError`] for the first syntactic error.
pub fn parse_reader<R: Read>(handler: &impl Handler<Error>, reader: R) -> Result<Vec<Node>> {
    parse_stream(&tokenize_reader(handler, reader))
}

/// Loads and parses the given file.
///
/// # Errors
/// - [`Error::IoError`] if the file cannot be read.
/// - [`Error::Other`] if the source contains lexical errors (reported to
///   `handler` individually).
/// - [`Error::ParseError`] for the first syntactic error.
pub fn parse_file(handler: &impl Handler<Error>, path: &Path) -> Result<Vec<Node>> {
    let source =
        std::fs::read_to_string(path).map_err(|error| Error::IoError(error.to_string()))?;
    parse(handler, &source)
}

#[tracing::instrument(level = "debug", skip_all)]
fn parse_stream(tokens: &TokenStream) -> Result<Vec<Node>> {
    if tokens.iter().any(|token| token.kind() == TokenKind::Error) {
        return Err(Error::Other(
            "An error occurred while tokenizing the source code.",
        ));
    }

    let mut parser = Parser::new(tokens);
    let mut forms = Vec::new();
    while !parser.is_finished() {
        forms.push(parser.parse()?);
    }
    tracing::debug!("parsed {} top-level forms", forms.len());

    Ok(forms)
}

//! Contains the recursive-descent [`Parser`] consuming a [`TokenStream`].

use crate::{
    base::source::Position,
    lexical::{
        token::TokenKind,
        token_stream::{Cursor, TokenStream},
    },
};

use super::{
    error::{
        MalformedChar, MalformedLambda, MalformedNumber, ParseResult, SyntaxKind, UnexpectedToken,
    },
    syntax_tree::{Lambda, Node},
};

/// Is the recursive-descent consumer of a [`TokenStream`], producing one
/// syntax tree per top-level form.
///
/// [`Parser::parse`] consumes exactly one top-level form; callers loop until
/// [`Parser::is_finished`] reports that the cursor sits on the end sentinel.
#[derive(Debug, Clone, Copy)]
pub struct Parser<'a> {
    cursor: Cursor<'a>,
    depth: usize,
}

impl<'a> Parser<'a> {
    /// Creates a parser positioned on the first form of the stream, past the
    /// opening sentinel.
    #[must_use]
    pub fn new(stream: &'a TokenStream) -> Self {
        let mut cursor = stream.cursor();
        if cursor.current().kind() == TokenKind::StreamStart {
            cursor.advance();
        }
        Self { cursor, depth: 0 }
    }

    /// Whether every top-level form has been consumed.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.cursor.is_end()
    }

    /// Parses exactly one top-level form.
    ///
    /// # Errors
    /// Returns the first syntactic error encountered inside the form; the
    /// cursor is left where the error was found, see [`Parser::recover`].
    #[tracing::instrument(level = "trace", skip_all)]
    pub fn parse(&mut self) -> ParseResult<Node> {
        self.parse_form()
    }

    /// Discards the remainder of the current top-level form after an error,
    /// so that parsing can resume at the next one.
    ///
    /// Skips tokens until every bracket opened by the broken form is closed
    /// again, then steps over stray closing brackets and invalid tokens
    /// sitting at the top level. REPL-style callers use this to keep reading
    /// after reporting a syntax error; whole-file callers typically abort
    /// instead.
    pub fn recover(&mut self) {
        while self.depth > 0 && !self.cursor.is_end() {
            match self.cursor.current().kind() {
                TokenKind::ListOpen
                | TokenKind::LiteralListOpen
                | TokenKind::QuasiListOpen
                | TokenKind::LambdaOpen => self.depth += 1,
                TokenKind::ListClose => self.depth -= 1,
                _ => {}
            }
            self.cursor.advance();
        }
        self.depth = 0;

        while matches!(
            self.cursor.current().kind(),
            TokenKind::ListClose | TokenKind::Error
        ) {
            self.cursor.advance();
        }
    }

    /// Parses one form, dispatching on the kind of the current token.
    fn parse_form(&mut self) -> ParseResult<Node> {
        let token = self.cursor.current().clone();
        match token.kind() {
            // the opening sentinel is consumed transparently
            TokenKind::StreamStart => {
                self.cursor.advance();
                self.parse_form()
            }
            TokenKind::ListOpen => {
                self.cursor.advance();
                self.depth += 1;
                self.parse_list()
            }
            TokenKind::LiteralListOpen => {
                self.cursor.advance();
                self.depth += 1;
                self.parse_list()
                    .map(|list| Node::LiteralList(Box::new(list)))
            }
            TokenKind::QuasiListOpen => {
                self.cursor.advance();
                self.depth += 1;
                self.parse_quasi_list()
            }
            TokenKind::LambdaOpen => {
                self.cursor.advance();
                self.depth += 1;
                self.parse_lambda(token.position())
            }
            TokenKind::Ident => {
                self.cursor.advance();
                Ok(Node::Ident(token.text().to_owned()))
            }
            TokenKind::Number => {
                self.cursor.advance();
                numeric_node(token.text(), token.position())
            }
            TokenKind::Char => {
                self.cursor.advance();
                char_node(token.text(), token.position())
            }
            TokenKind::String => {
                self.cursor.advance();
                Ok(Node::StringLit(token.text().to_owned()))
            }
            TokenKind::ListClose | TokenKind::StreamEnd | TokenKind::Error => {
                Err(self.unexpected(SyntaxKind::Form).into())
            }
        }
    }

    /// Parses forms until the matching `]`, building a proper list in order.
    fn parse_list(&mut self) -> ParseResult<Node> {
        let mut elements = Vec::new();
        loop {
            match self.cursor.current().kind() {
                TokenKind::ListClose => {
                    self.cursor.advance();
                    self.depth -= 1;
                    return Ok(Node::list(elements));
                }
                TokenKind::StreamEnd => {
                    return Err(self.unexpected(SyntaxKind::CloseBracket).into())
                }
                _ => elements.push(self.parse_form()?),
            }
        }
    }

    /// Parses a quasi list. A `$` marker at element level wraps the next
    /// atom or bracketed form in an unquote; nested lists are not scanned
    /// for markers.
    fn parse_quasi_list(&mut self) -> ParseResult<Node> {
        let mut elements = Vec::new();
        loop {
            let token = self.cursor.current().clone();
            match token.kind() {
                TokenKind::ListClose => {
                    self.cursor.advance();
                    self.depth -= 1;
                    return Ok(Node::QuasiList(Box::new(Node::list(elements))));
                }
                TokenKind::StreamEnd => {
                    return Err(self.unexpected(SyntaxKind::CloseBracket).into())
                }
                TokenKind::Ident if token.text().starts_with('$') => {
                    self.cursor.advance();
                    let inner = if token.text() == "$" {
                        if matches!(
                            self.cursor.current().kind(),
                            TokenKind::ListClose | TokenKind::StreamEnd
                        ) {
                            return Err(self.unexpected(SyntaxKind::UnquotedForm).into());
                        }
                        self.parse_form()?
                    } else {
                        atom_node(&token.text()[1..], token.position())?
                    };
                    elements.push(Node::Unquote(Box::new(inner)));
                }
                _ => elements.push(self.parse_form()?),
            }
        }
    }

    /// Parses `^[<params> <body-form>+]` after its opening token.
    fn parse_lambda(&mut self, position: Position) -> ParseResult<Node> {
        let params = match self.cursor.current().kind() {
            TokenKind::Ident => {
                let token = self.cursor.current().clone();
                self.cursor.advance();
                Node::Ident(token.text().to_owned())
            }
            TokenKind::ListOpen => {
                self.cursor.advance();
                self.depth += 1;
                self.parse_params()?
            }
            TokenKind::ListClose | TokenKind::StreamEnd => {
                return Err(MalformedLambda {
                    message: "the parameter specification is missing",
                    position,
                }
                .into())
            }
            _ => {
                return Err(MalformedLambda {
                    message: "formal parameters must be identifiers",
                    position: self.cursor.current().position(),
                }
                .into())
            }
        };

        let mut body = Vec::new();
        loop {
            match self.cursor.current().kind() {
                TokenKind::ListClose => {
                    self.cursor.advance();
                    self.depth -= 1;
                    break;
                }
                TokenKind::StreamEnd => {
                    return Err(self.unexpected(SyntaxKind::CloseBracket).into())
                }
                _ => body.push(self.parse_form()?),
            }
        }

        if body.is_empty() {
            return Err(MalformedLambda {
                message: "the body requires at least one form",
                position,
            }
            .into());
        }

        Ok(Node::Lambda(Box::new(Lambda::new(params, body))))
    }

    /// Parses the bracketed formal-parameter list of a lambda.
    fn parse_params(&mut self) -> ParseResult<Node> {
        let mut params = Vec::new();
        loop {
            let token = self.cursor.current().clone();
            match token.kind() {
                TokenKind::ListClose => {
                    self.cursor.advance();
                    self.depth -= 1;
                    return Ok(Node::list(params));
                }
                TokenKind::StreamEnd => {
                    return Err(self.unexpected(SyntaxKind::CloseBracket).into())
                }
                TokenKind::Ident => {
                    self.cursor.advance();
                    params.push(Node::Ident(token.text().to_owned()));
                }
                _ => {
                    return Err(MalformedLambda {
                        message: "the formal parameter list may only contain identifiers",
                        position: token.position(),
                    }
                    .into())
                }
            }
        }
    }

    /// Builds an [`UnexpectedToken`] error for the current token.
    fn unexpected(&self, expected: SyntaxKind) -> UnexpectedToken {
        let token = self.cursor.current();
        UnexpectedToken {
            expected,
            found: (token.kind() != TokenKind::StreamEnd).then(|| token.clone()),
            position: token.position(),
        }
    }
}

/// Interprets the verbatim text of a number token.
///
/// Plain optionally-signed decimal integers become [`Node::IntLit`];
/// decimals with a fractional part and/or exponent become
/// [`Node::FloatLit`]. Every other spelling (radix prefixes, rationals,
/// complex suffixes, group separators) and any out-of-range value is
/// rejected.
fn numeric_node(text: &str, position: Position) -> ParseResult<Node> {
    let malformed = || {
        MalformedNumber {
            text: text.to_owned(),
            position,
        }
        .into()
    };

    if is_integer_literal(text) {
        text.parse::<i64>()
            .map(Node::IntLit)
            .map_err(|_| malformed())
    } else if is_float_literal(text) {
        text.parse::<f64>()
            .map(Node::FloatLit)
            .map_err(|_| malformed())
    } else {
        Err(malformed())
    }
}

/// Whether `text` spells an optionally-signed decimal integer.
fn is_integer_literal(text: &str) -> bool {
    let digits = text.strip_prefix(['+', '-']).unwrap_or(text);
    !digits.is_empty() && digits.bytes().all(|byte| byte.is_ascii_digit())
}

/// Whether `text` spells a decimal float: an integer part followed by a
/// fractional part and/or an exponent.
fn is_float_literal(text: &str) -> bool {
    let rest = text.strip_prefix(['+', '-']).unwrap_or(text);
    let (mantissa, exponent) = match rest.split_once(['e', 'E']) {
        Some((mantissa, exponent)) => (mantissa, Some(exponent)),
        None => (rest, None),
    };

    let mantissa_ok = match mantissa.split_once('.') {
        Some((whole, fraction)) => {
            !whole.is_empty()
                && whole.bytes().all(|byte| byte.is_ascii_digit())
                && !fraction.is_empty()
                && fraction.bytes().all(|byte| byte.is_ascii_digit())
        }
        None => !mantissa.is_empty() && mantissa.bytes().all(|byte| byte.is_ascii_digit()),
    };

    let exponent_ok = match exponent {
        Some(exponent) => {
            let digits = exponent.strip_prefix(['+', '-']).unwrap_or(exponent);
            !digits.is_empty() && digits.bytes().all(|byte| byte.is_ascii_digit())
        }
        // without an exponent the fractional part is what makes it a float
        None => mantissa.contains('.'),
    };

    mantissa_ok && exponent_ok
}

/// Interprets the decoded payload of a character token.
fn char_node(text: &str, position: Position) -> ParseResult<Node> {
    let mut characters = text.chars();
    match (characters.next(), characters.next()) {
        (Some(character), None) => Ok(Node::CharLit(character)),
        _ => Err(MalformedChar {
            text: text.to_owned(),
            position,
        }
        .into()),
    }
}

/// Builds the atom spelled directly after a `$` unquote marker.
fn atom_node(text: &str, position: Position) -> ParseResult<Node> {
    if text.starts_with(|character: char| character.is_ascii_digit()) {
        numeric_node(text, position)
    } else {
        Ok(Node::Ident(text.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        base::{source::SourceReader, VoidHandler},
        syntax::error::Error,
    };

    fn stream(source: &str) -> TokenStream {
        let mut reader = SourceReader::from_source(source);
        TokenStream::tokenize(&mut reader, &VoidHandler)
    }

    fn parse_one(source: &str) -> ParseResult<Node> {
        Parser::new(&stream(source)).parse()
    }

    fn ident(text: &str) -> Node {
        Node::Ident(text.to_owned())
    }

    #[test]
    fn parses_atoms() {
        assert_eq!(parse_one("foo"), Ok(ident("foo")));
        assert_eq!(parse_one("42"), Ok(Node::IntLit(42)));
        assert_eq!(parse_one("3.14"), Ok(Node::FloatLit(3.14)));
        assert_eq!(parse_one("34e13"), Ok(Node::FloatLit(34e13)));
        assert_eq!(parse_one("1.5e-3"), Ok(Node::FloatLit(1.5e-3)));
        assert_eq!(parse_one("'c'"), Ok(Node::CharLit('c')));
        assert_eq!(
            parse_one("\"hello\""),
            Ok(Node::StringLit("hello".to_owned()))
        );
    }

    #[test]
    fn parses_proper_lists() {
        assert_eq!(parse_one("[]"), Ok(Node::Nil));
        assert_eq!(
            parse_one("[def a 1]"),
            Ok(Node::list(vec![ident("def"), ident("a"), Node::IntLit(1)]))
        );
        assert_eq!(
            parse_one("[a [b c] d]"),
            Ok(Node::list(vec![
                ident("a"),
                Node::list(vec![ident("b"), ident("c")]),
                ident("d"),
            ]))
        );
    }

    #[test]
    fn parses_literal_lists() {
        assert_eq!(
            parse_one("l[1 2 3]"),
            Ok(Node::LiteralList(Box::new(Node::list(vec![
                Node::IntLit(1),
                Node::IntLit(2),
                Node::IntLit(3),
            ]))))
        );
    }

    #[test]
    fn parses_quasi_lists_with_unquotes() {
        assert_eq!(
            parse_one("q[$a $b 3]"),
            Ok(Node::QuasiList(Box::new(Node::list(vec![
                Node::Unquote(Box::new(ident("a"))),
                Node::Unquote(Box::new(ident("b"))),
                Node::IntLit(3),
            ]))))
        );
    }

    #[test]
    fn unquote_marker_can_precede_a_bracketed_form() {
        assert_eq!(
            parse_one("q[$[add 1 2]]"),
            Ok(Node::QuasiList(Box::new(Node::list(vec![Node::Unquote(
                Box::new(Node::list(vec![
                    ident("add"),
                    Node::IntLit(1),
                    Node::IntLit(2),
                ]))
            )]))))
        );
    }

    #[test]
    fn unquote_markers_only_apply_at_quasi_element_level() {
        // inside a plain list the marker is an ordinary identifier
        assert_eq!(
            parse_one("[$a]"),
            Ok(Node::list(vec![ident("$a")]))
        );
        // nested lists inside a quasi list are not scanned for markers
        assert_eq!(
            parse_one("q[[$a]]"),
            Ok(Node::QuasiList(Box::new(Node::list(vec![Node::list(
                vec![ident("$a")]
            )]))))
        );
    }

    #[test]
    fn parses_single_parameter_lambdas() {
        assert_eq!(
            parse_one("^[x [pow x 5]]"),
            Ok(Node::Lambda(Box::new(Lambda::new(
                ident("x"),
                vec![Node::list(vec![ident("pow"), ident("x"), Node::IntLit(5)])],
            ))))
        );
    }

    #[test]
    fn parses_parameter_list_lambdas() {
        assert_eq!(
            parse_one("^[[a b] [cat a b]]"),
            Ok(Node::Lambda(Box::new(Lambda::new(
                Node::list(vec![ident("a"), ident("b")]),
                vec![Node::list(vec![ident("cat"), ident("a"), ident("b")])],
            ))))
        );
    }

    #[test]
    fn lambda_bodies_may_hold_several_forms() {
        let lambda = parse_one("^[x [log x] [pow x 2]]").expect("expected a lambda");
        let Node::Lambda(lambda) = lambda else {
            panic!("expected a lambda node");
        };
        assert_eq!(lambda.body().len(), 2);
    }

    #[test]
    fn rejects_empty_lambda_bodies() {
        assert!(matches!(
            parse_one("^[x]"),
            Err(Error::MalformedLambda(MalformedLambda {
                message: "the body requires at least one form",
                ..
            }))
        ));
    }

    #[test]
    fn rejects_non_identifier_parameters() {
        assert!(matches!(
            parse_one("^[[a 1] [cat a]]"),
            Err(Error::MalformedLambda(_))
        ));
        assert!(matches!(
            parse_one("^[3 x]"),
            Err(Error::MalformedLambda(_))
        ));
    }

    #[test]
    fn rejects_exotic_number_spellings() {
        for source in ["0x1a1c", "0b01010", "1/3", "56%", "10^3", "3+6i", "102,000", "1."] {
            assert!(
                matches!(parse_one(source), Err(Error::MalformedNumber(_))),
                "expected {source} to be rejected",
            );
        }
    }

    #[test]
    fn rejects_out_of_range_integers() {
        assert!(matches!(
            parse_one("99999999999999999999999"),
            Err(Error::MalformedNumber(_))
        ));
    }

    #[test]
    fn rejects_multi_character_char_literals() {
        assert!(matches!(
            parse_one("'ab'"),
            Err(Error::MalformedChar(_))
        ));
        assert!(matches!(parse_one("''"), Err(Error::MalformedChar(_))));
    }

    #[test]
    fn rejects_unexpected_closes_and_end_of_input() {
        assert!(matches!(
            parse_one("]"),
            Err(Error::UnexpectedToken(UnexpectedToken {
                expected: SyntaxKind::Form,
                found: Some(_),
                ..
            }))
        ));
        assert!(matches!(
            parse_one("[a b"),
            Err(Error::UnexpectedToken(UnexpectedToken {
                expected: SyntaxKind::CloseBracket,
                found: None,
                ..
            }))
        ));
    }

    #[test]
    fn parses_consecutive_top_level_forms() {
        let stream = stream("[def a 1] [def b 2]");
        let mut parser = Parser::new(&stream);

        let first = parser.parse().expect("expected the first form");
        let second = parser.parse().expect("expected the second form");
        assert!(parser.is_finished());

        assert_eq!(
            first,
            Node::list(vec![ident("def"), ident("a"), Node::IntLit(1)])
        );
        assert_eq!(
            second,
            Node::list(vec![ident("def"), ident("b"), Node::IntLit(2)])
        );
    }

    #[test]
    fn recovers_to_the_next_top_level_form() {
        let stream = stream("[def a 0x1] [def b 2]");
        let mut parser = Parser::new(&stream);

        assert!(parser.parse().is_err());
        parser.recover();

        assert_eq!(
            parser.parse(),
            Ok(Node::list(vec![ident("def"), ident("b"), Node::IntLit(2)]))
        );
        assert!(parser.is_finished());
    }

    #[test]
    fn recovers_past_stray_closes() {
        let stream = stream("] [ok]");
        let mut parser = Parser::new(&stream);

        assert!(parser.parse().is_err());
        parser.recover();

        assert_eq!(parser.parse(), Ok(Node::list(vec![ident("ok")])));
    }

    #[test]
    fn parsing_is_idempotent_across_readers() {
        let source = "[def c ^[[a b] [cat a b]]] q[$a 3]";

        let first = Parser::new(&stream(source)).parse().expect("parses once");
        let second = Parser::new(&stream(source)).parse().expect("parses twice");
        assert_eq!(first, second);
    }

    #[test]
    fn every_parsed_list_terminates_in_nil() {
        fn assert_proper(node: &Node) {
            match node {
                Node::Cons(car, cdr) => {
                    assert_proper(car);
                    let mut tail = cdr.as_ref();
                    while let Node::Cons(head, rest) = tail {
                        assert_proper(head);
                        tail = rest.as_ref();
                    }
                    assert_eq!(tail, &Node::Nil);
                }
                Node::LiteralList(inner) | Node::QuasiList(inner) | Node::Unquote(inner) => {
                    assert_proper(inner);
                }
                Node::Lambda(lambda) => {
                    assert_proper(lambda.params());
                    lambda.body().iter().for_each(assert_proper);
                }
                _ => {}
            }
        }

        let parsed = parse_one("[a l[1 2] q[$x [y]] ^[[p] [id p]]]").expect("parses");
        assert_proper(&parsed);
    }
}

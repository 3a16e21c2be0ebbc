use tactic::{
    base::{PrintHandler, VoidHandler},
    lexical::token::TokenKind,
};

#[test]
fn tokenizing_renders_a_dump() {
    let tokens = tactic::tokenize(&PrintHandler::default(), "[def e q[$a $b 3]]");

    assert_eq!(
        tokens.to_string(),
        "<start> [ <ident def> <ident e> q[ <ident $a> <ident $b> <num 3> ] ] <end>"
    );
}

#[test]
fn tokenizing_keeps_positions_in_order() {
    let tokens = tactic::tokenize(
        &PrintHandler::default(),
        "[def a 1]\n[def b 2]\n[def g 'c']\n",
    );

    let positions = tokens
        .iter()
        .map(tactic::lexical::token::Token::position)
        .collect::<Vec<_>>();
    assert!(positions.windows(2).all(|pair| pair[0] <= pair[1]));

    assert_eq!(
        tokens.last().map(tactic::lexical::token::Token::kind),
        Some(TokenKind::StreamEnd)
    );
}

#[test]
fn tokenizing_an_unterminated_literal_yields_an_error_token() {
    let tokens = tactic::tokenize(&VoidHandler, "['x]");

    assert!(tokens.iter().any(|token| token.kind() == TokenKind::Error));
}

#[test]
fn parsing_aborts_on_lexical_errors() {
    tactic::parse(&VoidHandler, "[def g 'c]")
        .expect_err("Expecting lexical failure to abort the parse");
}

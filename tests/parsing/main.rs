use tactic::{
    base::PrintHandler,
    syntax::syntax_tree::Node,
};

fn ident(text: &str) -> Node {
    Node::Ident(text.to_owned())
}

#[test]
fn parsing_test1() {
    let source = include_str!("./test1.tt");

    let parsed = tactic::parse(&PrintHandler::default(), source).expect("Failed to parse");
    assert_eq!(parsed.len(), 9);

    // [def a 1]
    assert_eq!(
        parsed[0],
        Node::list(vec![ident("def"), ident("a"), Node::IntLit(1)])
    );

    // [def c ^[[a b] [cat a b]]]
    let Node::Cons(_, rest) = &parsed[2] else {
        panic!("Expected a definition list");
    };
    let Node::Cons(_, rest) = rest.as_ref() else {
        panic!("Expected a definition body");
    };
    let Node::Cons(value, _) = rest.as_ref() else {
        panic!("Expected a defined value");
    };
    let Node::Lambda(lambda) = value.as_ref() else {
        panic!("Expected a lambda definition");
    };
    let parameters = lambda
        .params()
        .list_iter()
        .filter_map(Node::as_ident)
        .map(String::as_str)
        .collect::<Vec<_>>();
    assert_eq!(parameters, ["a", "b"]);
    assert_eq!(lambda.body().len(), 1);

    // [def d l[1 2 3]]
    let literal = parsed[3].list_iter().nth(2).expect("Expected a defined value");
    assert_eq!(
        literal,
        &Node::LiteralList(Box::new(Node::list(vec![
            Node::IntLit(1),
            Node::IntLit(2),
            Node::IntLit(3),
        ])))
    );

    // [def e q[$a $b 3]]
    let quasi = parsed[4].list_iter().nth(2).expect("Expected a defined value");
    assert_eq!(
        quasi,
        &Node::QuasiList(Box::new(Node::list(vec![
            Node::Unquote(Box::new(ident("a"))),
            Node::Unquote(Box::new(ident("b"))),
            Node::IntLit(3),
        ])))
    );

    // [def g 'c'] and [def h "hello"] and [def i 3.14]
    assert_eq!(
        parsed[6].list_iter().nth(2),
        Some(&Node::CharLit('c'))
    );
    assert_eq!(
        parsed[7].list_iter().nth(2),
        Some(&Node::StringLit("hello".to_owned()))
    );
    assert_eq!(
        parsed[8].list_iter().nth(2),
        Some(&Node::FloatLit(3.14))
    );
}

#[test]
fn parsing_invalid() {
    let source = include_str!("./invalid.tt");

    tactic::parse(&PrintHandler::default(), source).expect_err("Expecting parsing failure");
}

#[test]
fn parsing_from_a_reader_matches_parsing_from_text() {
    let source = include_str!("./test1.tt");

    let from_text = tactic::parse(&PrintHandler::default(), source).expect("Failed to parse");
    let from_reader =
        tactic::parse_reader(&PrintHandler::default(), std::io::Cursor::new(source.as_bytes()))
            .expect("Failed to parse from reader");

    assert_eq!(from_text, from_reader);
}

#[test]
fn parsing_is_idempotent() {
    let source = include_str!("./test1.tt");

    let first = tactic::parse(&PrintHandler::default(), source).expect("Failed to parse");
    let second = tactic::parse(&PrintHandler::default(), source).expect("Failed to parse");

    assert_eq!(first, second);
}

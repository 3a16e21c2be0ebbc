//! Contains the syntax tree nodes produced by the parser.

use std::fmt::{Display, Write};

use enum_as_inner::EnumAsInner;
use getset::Getters;
use itertools::Itertools;

/// Is an enumeration of every node the parser can produce.
///
/// A proper list is either [`Node::Nil`] or a [`Node::Cons`] whose cdr is
/// itself a proper list; the parser only ever builds proper lists. Ownership
/// is a strict tree: every child is owned by exactly one parent edge and no
/// back-references exist.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, EnumAsInner)]
pub enum Node {
    /// The empty list and canonical list terminator.
    Nil,

    /// An identifier leaf carrying its raw text.
    Ident(String),

    /// A string literal with escape sequences already decoded.
    StringLit(String),

    /// A character literal.
    CharLit(char),

    /// An integer literal.
    IntLit(i64),

    /// A floating-point literal.
    FloatLit(f64),

    /// A pair of car and cdr.
    Cons(Box<Node>, Box<Node>),

    /// A list whose elements are data, not code (`l[...]`).
    LiteralList(Box<Node>),

    /// A mostly-literal list that may contain unquoted elements (`q[...]`).
    QuasiList(Box<Node>),

    /// An element of a quasi list marked for evaluation (`$x`).
    Unquote(Box<Node>),

    /// A function literal (`^[params body...]`).
    Lambda(Box<Lambda>),
}

impl Node {
    /// Creates a pair from the given car and cdr.
    #[must_use]
    pub fn cons(car: Self, cdr: Self) -> Self {
        Self::Cons(Box::new(car), Box::new(cdr))
    }

    /// Builds a proper list from the given elements, terminated by
    /// [`Node::Nil`].
    #[must_use]
    pub fn list(elements: Vec<Self>) -> Self {
        elements
            .into_iter()
            .rev()
            .fold(Self::Nil, |tail, head| Self::cons(head, tail))
    }

    /// Iterates over the elements of a proper list. Iteration stops at the
    /// first tail that is not a [`Node::Cons`].
    #[must_use]
    pub fn list_iter(&self) -> ListIter {
        ListIter { node: self }
    }
}

impl From<i64> for Node {
    fn from(value: i64) -> Self {
        Self::IntLit(value)
    }
}

impl From<f64> for Node {
    fn from(value: f64) -> Self {
        Self::FloatLit(value)
    }
}

impl From<char> for Node {
    fn from(value: char) -> Self {
        Self::CharLit(value)
    }
}

impl Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Nil => f.write_str("[]"),
            Self::Ident(text) => f.write_str(text),
            Self::StringLit(text) => {
                f.write_char('"')?;
                write_escaped(f, text, '"')?;
                f.write_char('"')
            }
            Self::CharLit(character) => {
                f.write_char('\'')?;
                write_escaped(f, &character.to_string(), '\'')?;
                f.write_char('\'')
            }
            Self::IntLit(value) => write!(f, "{value}"),
            Self::FloatLit(value) => write!(f, "{value}"),
            Self::Cons(..) => {
                f.write_char('[')?;
                let mut node = self;
                let mut first = true;
                while let Self::Cons(car, cdr) = node {
                    if !first {
                        f.write_char(' ')?;
                    }
                    write!(f, "{car}")?;
                    first = false;
                    node = cdr;
                }
                if !matches!(node, Self::Nil) {
                    write!(f, " . {node}")?;
                }
                f.write_char(']')
            }
            Self::LiteralList(inner) => write!(f, "l{inner}"),
            Self::QuasiList(inner) => write!(f, "q{inner}"),
            Self::Unquote(inner) => write!(f, "${inner}"),
            Self::Lambda(lambda) => write!(
                f,
                "^[{} {}]",
                lambda.params(),
                lambda.body().iter().format(" ")
            ),
        }
    }
}

/// Re-escapes the control characters the tokenizer decodes, so a rendered
/// literal scans back to the same payload.
fn write_escaped(f: &mut std::fmt::Formatter<'_>, text: &str, quote: char) -> std::fmt::Result {
    for character in text.chars() {
        match character {
            '\\' => f.write_str("\\\\")?,
            '\u{07}' => f.write_str("\\a")?,
            '\u{08}' => f.write_str("\\b")?,
            '\u{0C}' => f.write_str("\\f")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            '\u{0B}' => f.write_str("\\v")?,
            other if other == quote => {
                f.write_char('\\')?;
                f.write_char(other)?;
            }
            other => f.write_char(other)?,
        }
    }
    Ok(())
}

/// Iterator over the elements of a proper list.
#[derive(Debug, Clone, Copy)]
pub struct ListIter<'a> {
    node: &'a Node,
}

impl<'a> Iterator for ListIter<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        match self.node {
            Node::Cons(car, cdr) => {
                self.node = cdr;
                Some(car)
            }
            _ => None,
        }
    }
}

/// Is a function literal pairing a formal-parameter specification with a
/// non-empty body sequence.
///
/// `params` is either a single [`Node::Ident`] or a proper list of them; the
/// body forms are evaluated left to right by whatever consumes the tree.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Getters)]
pub struct Lambda {
    /// Get the formal parameter specification.
    #[get = "pub"]
    params: Node,

    /// Get the body forms.
    #[get = "pub"]
    body: Vec<Node>,
}

impl Lambda {
    /// Creates a lambda from its parameter specification and body.
    #[must_use]
    pub fn new(params: Node, body: Vec<Node>) -> Self {
        Self { params, body }
    }

    /// Dissolves this struct into a tuple of its components.
    #[must_use]
    pub fn dissolve(self) -> (Node, Vec<Node>) {
        (self.params, self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_builds_in_order_and_terminates_in_nil() {
        let list = Node::list(vec![Node::from(1), Node::from(2), Node::from(3)]);

        assert_eq!(
            list,
            Node::cons(
                Node::IntLit(1),
                Node::cons(Node::IntLit(2), Node::cons(Node::IntLit(3), Node::Nil)),
            )
        );
        assert_eq!(Node::list(Vec::new()), Node::Nil);
    }

    #[test]
    fn list_iter_walks_the_elements() {
        let list = Node::list(vec![
            Node::Ident("a".to_owned()),
            Node::Ident("b".to_owned()),
        ]);

        let names = list
            .list_iter()
            .filter_map(|element| element.as_ident())
            .map(String::as_str)
            .collect::<Vec<_>>();
        assert_eq!(names, ["a", "b"]);
    }

    #[test]
    fn renders_surface_syntax() {
        let list = Node::list(vec![
            Node::Ident("def".to_owned()),
            Node::Ident("h".to_owned()),
            Node::StringLit("hel\nlo".to_owned()),
        ]);
        assert_eq!(list.to_string(), "[def h \"hel\\nlo\"]");

        let lambda = Node::Lambda(Box::new(Lambda::new(
            Node::Ident("x".to_owned()),
            vec![Node::Ident("x".to_owned())],
        )));
        assert_eq!(lambda.to_string(), "^[x x]");

        let quasi = Node::QuasiList(Box::new(Node::list(vec![
            Node::Unquote(Box::new(Node::Ident("a".to_owned()))),
            Node::from(3),
        ])));
        assert_eq!(quasi.to_string(), "q[$a 3]");
    }
}

//! Parse tree tokens.
//!
//! Three variants: a leaf holding text, an immutable key/value pair, and a
//! named node holding ordered children. Rules accumulate into a
//! [`LeafBuilder`] or [`NodeBuilder`] and freeze the result once they are
//! done.

use std::fmt::{self, Write as _};
use std::ops::Index;

use serde::Serialize;

use crate::TokenError;

/// A parse result.
#[derive(Debug, Clone, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Token {
    Leaf(String),
    Pair { key: String, value: String },
    Node(Node),
}

/// Named, ordered aggregate of child tokens.
///
/// Equality looks at the children only, never at the name.
#[derive(Debug, Clone, Default, Eq, Serialize)]
pub struct Node {
    name: String,
    children: Vec<Token>,
}

impl Token {
    pub fn leaf(text: impl Into<String>) -> Self {
        Token::Leaf(text.into())
    }

    pub fn pair(key: impl Into<String>, value: impl Into<String>) -> Self {
        Token::Pair {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Node named `name`; empty leaves among `children` are dropped.
    pub fn node(name: impl Into<String>, children: impl IntoIterator<Item = Token>) -> Self {
        let mut builder = NodeBuilder::new(name);
        builder.extend(children);
        builder.finish()
    }

    /// The empty leaf, for rules that match without yielding a value.
    pub fn empty() -> Self {
        Token::Leaf(String::new())
    }

    /// True for an empty leaf. Such tokens vanish when appended to a node.
    pub fn is_empty(&self) -> bool {
        matches!(self, Token::Leaf(text) if text.is_empty())
    }

    pub fn as_leaf(&self) -> Option<&str> {
        match self {
            Token::Leaf(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_pair(&self) -> Option<(&str, &str)> {
        match self {
            Token::Pair { key, value } => Some((key, value)),
            _ => None,
        }
    }

    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Token::Node(node) => Some(node),
            _ => None,
        }
    }

    /// Node name, `None` for leaves and pairs.
    pub fn name(&self) -> Option<&str> {
        self.as_node().map(Node::name)
    }

    /// Node children; leaves and pairs have none.
    pub fn children(&self) -> &[Token] {
        match self {
            Token::Node(node) => &node.children,
            _ => &[],
        }
    }

    pub fn get(&self, index: usize) -> Option<&Token> {
        self.children().get(index)
    }

    /// Leaf text, or the `Display` form of any other token.
    pub fn into_string(self) -> String {
        match self {
            Token::Leaf(text) => text,
            other => other.to_string(),
        }
    }

    pub fn into_children(self) -> Vec<Token> {
        match self {
            Token::Node(node) => node.children,
            _ => Vec::new(),
        }
    }

    /// In-place append.
    ///
    /// A leaf concatenates another leaf's text, a node takes `other` as its
    /// last child (skipping empty leaves), a pair refuses.
    pub fn append(&mut self, other: Token) -> Result<(), TokenError> {
        match (self, other) {
            (Token::Pair { key, .. }, _) => Err(TokenError::AppendToPair { key: key.clone() }),
            (Token::Leaf(text), Token::Leaf(more)) => {
                text.push_str(&more);
                Ok(())
            }
            (Token::Leaf(_), other) => Err(TokenError::NotText {
                found: other.kind(),
            }),
            (Token::Node(node), other) => {
                node.push(other);
                Ok(())
            }
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Token::Leaf(_) => "leaf",
            Token::Pair { .. } => "pair",
            Token::Node(_) => "node",
        }
    }

    /// Indented multi-line rendering of the whole tree.
    pub fn to_tree_string(&self) -> String {
        let mut out = String::new();
        self.write_tree(&mut out, 0);
        out
    }

    fn write_tree(&self, out: &mut String, depth: usize) {
        let indent = "  ".repeat(depth);
        match self {
            Token::Leaf(text) => {
                let _ = writeln!(out, "{indent}{text:?}");
            }
            Token::Pair { key, value } => {
                let _ = writeln!(out, "{indent}{key} = {value}");
            }
            Token::Node(node) => {
                let _ = writeln!(out, "{indent}[{}]", node.name);
                for child in node {
                    child.write_tree(out, depth + 1);
                }
            }
        }
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Token::Leaf(a), Token::Leaf(b)) => a == b,
            (
                Token::Pair { key, value },
                Token::Pair {
                    key: other_key,
                    value: other_value,
                },
            ) => key == other_key && value == other_value,
            (Token::Node(a), Token::Node(b)) => a == b,
            _ => false,
        }
    }
}

impl PartialEq<str> for Token {
    fn eq(&self, other: &str) -> bool {
        self.as_leaf() == Some(other)
    }
}

impl PartialEq<&str> for Token {
    fn eq(&self, other: &&str) -> bool {
        self.as_leaf() == Some(*other)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Leaf(text) => f.write_str(text),
            Token::Pair { key, value } => write!(f, "{key} = {value}"),
            Token::Node(node) => f.write_str(&node.name),
        }
    }
}

impl From<Node> for Token {
    fn from(node: Node) -> Self {
        Token::Node(node)
    }
}

impl Node {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn children(&self) -> &[Token] {
        &self.children
    }

    pub fn into_children(self) -> Vec<Token> {
        self.children
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// First child node called `name`.
    pub fn find(&self, name: &str) -> Option<&Node> {
        self.children
            .iter()
            .filter_map(Token::as_node)
            .find(|node| node.name == name)
    }

    /// Append a child, skipping empty leaves.
    pub fn push(&mut self, child: Token) {
        if !child.is_empty() {
            self.children.push(child);
        }
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.children == other.children
    }
}

impl Index<usize> for Node {
    type Output = Token;

    fn index(&self, index: usize) -> &Token {
        &self.children[index]
    }
}

impl<'a> IntoIterator for &'a Node {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.children.iter()
    }
}

/// Accumulates the text of a leaf token.
#[derive(Debug, Clone, Default)]
pub struct LeafBuilder {
    text: String,
}

impl LeafBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, c: char) {
        self.text.push(c);
    }

    pub fn push_str(&mut self, s: &str) {
        self.text.push_str(s);
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn finish(self) -> Token {
        Token::Leaf(self.text)
    }
}

/// Accumulates the children of a node token.
#[derive(Debug, Clone, Default)]
pub struct NodeBuilder {
    node: Node,
}

impl NodeBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            node: Node::new(name),
        }
    }

    pub fn push(&mut self, child: Token) {
        self.node.push(child);
    }

    pub fn extend(&mut self, children: impl IntoIterator<Item = Token>) {
        for child in children {
            self.push(child);
        }
    }

    pub fn len(&self) -> usize {
        self.node.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node.is_empty()
    }

    pub fn finish(self) -> Token {
        Token::Node(self.node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // =========================================================================
    // Equality
    // =========================================================================

    #[test]
    fn test_leaf_equals_str() {
        let t = Token::leaf("abc");
        assert_eq!(t, "abc");
        assert!(t != "abd");
        assert!(Token::pair("abc", "x") != "abc");
    }

    #[test]
    fn test_node_equality_ignores_name() {
        let a = Token::node("<and>", [Token::leaf("x")]);
        let b = Token::node("section", [Token::leaf("x")]);
        assert_eq!(a, b);
        assert!(a != Token::node("<and>", [Token::leaf("y")]));
    }

    #[test]
    fn test_children_compare_with_strs() {
        let t = Token::node("<repeat>", [Token::leaf("bar"), Token::leaf("bar")]);
        assert_eq!(t.children(), ["bar", "bar"]);
    }

    // =========================================================================
    // Building
    // =========================================================================

    #[test]
    fn test_empty_leaves_are_dropped() {
        let mut b = NodeBuilder::new("<many>");
        b.push(Token::empty());
        b.push(Token::leaf("a"));
        b.push(Token::leaf(""));
        assert_eq!(b.len(), 1);
        assert_eq!(b.finish().children(), ["a"]);
    }

    #[test]
    fn test_empty_node_is_kept() {
        let t = Token::node("outer", [Token::from(Node::new("inner"))]);
        assert_eq!(t.children().len(), 1);
        assert!(!Token::from(Node::new("n")).is_empty());
    }

    #[test]
    fn test_leaf_builder() {
        let mut b = LeafBuilder::new();
        assert!(b.is_empty());
        b.push('4');
        b.push_str("2");
        assert_eq!(b.finish(), "42");
    }

    // =========================================================================
    // Append
    // =========================================================================

    #[test]
    fn test_append_leaf_concatenates() {
        let mut t = Token::leaf("ab");
        t.append(Token::leaf("c")).unwrap();
        assert_eq!(t, "abc");
    }

    #[test]
    fn test_append_node_pushes() {
        let mut t = Token::from(Node::new("s"));
        t.append(Token::pair("a", "1")).unwrap();
        t.append(Token::empty()).unwrap();
        assert_eq!(t.children(), [Token::pair("a", "1")]);
    }

    #[test]
    fn test_append_to_pair_is_rejected() {
        let mut t = Token::pair("a", "1");
        let err = t.append(Token::leaf("x")).unwrap_err();
        assert_eq!(err, TokenError::AppendToPair { key: "a".into() });
        assert_eq!(t, Token::pair("a", "1"));
    }

    #[test]
    fn test_append_node_to_leaf_is_rejected() {
        let mut t = Token::leaf("a");
        let err = t.append(Token::from(Node::new("n"))).unwrap_err();
        assert_eq!(err, TokenError::NotText { found: "node" });
    }

    // =========================================================================
    // Access and rendering
    // =========================================================================

    #[test]
    fn test_accessors() {
        let t = Token::node("root", [Token::node("s", [Token::pair("k", "v")])]);
        assert_eq!(t.name(), Some("root"));
        let s = t.as_node().unwrap().find("s").unwrap();
        assert_eq!(s[0].as_pair(), Some(("k", "v")));
        assert_eq!(t.get(1), None);
        assert!(t.as_node().unwrap().find("missing").is_none());
        assert_eq!(Token::leaf("x").children().len(), 0);
    }

    #[test]
    fn test_into_conversions() {
        assert_eq!(Token::leaf("v").into_string(), "v");
        assert_eq!(Token::pair("k", "v").into_string(), "k = v");
        let t = Token::node("s", [Token::leaf("a"), Token::leaf("b")]);
        assert_eq!(t.into_children(), vec![Token::leaf("a"), Token::leaf("b")]);
        assert!(Token::leaf("a").into_children().is_empty());
    }

    #[test]
    fn test_display() {
        assert_eq!(Token::leaf("x").to_string(), "x");
        assert_eq!(Token::pair("k", "v").to_string(), "k = v");
        assert_eq!(Token::from(Node::new("s")).to_string(), "s");
    }

    #[test]
    fn test_tree_string() {
        let t = Token::node("<repeat>", [Token::node("s", [Token::pair("a", "1")])]);
        assert_eq!(t.to_tree_string(), "[<repeat>]\n  [s]\n    a = 1\n");
    }
}

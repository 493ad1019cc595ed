//! Abstract syntax tree produced by the parser engine.
//!
//! The engine is grammar-agnostic, so nodes are untyped: a node carries the kind (rule tag) that produced it, the
//! global offset where matching began, and a value. Language definitions give the tree meaning by matching on kinds.

use crate::lexer::Token;

/// One parse result. `position` is the offset where matching began.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AstNode {
    pub position: usize,
    pub kind: String,
    pub value: AstValue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AstValue {
    /// A matched token (token mode).
    Leaf(Token),
    /// A matched literal or pattern capture (character mode).
    Text(String),
    /// Ordered named fields. An `opt` miss is stored as `None`.
    Composite(Vec<Field>),
    List(Vec<AstNode>),
}

/// A named slot of a composite node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub node: Option<AstNode>,
}

impl AstValue {
    /// Build a composite value from `(name, node)` pairs.
    pub fn composite<I>(fields: I) -> Self
    where
        I: IntoIterator<Item = (&'static str, Option<AstNode>)>,
    {
        Self::Composite(
            fields
                .into_iter()
                .map(|(name, node)| Field { name, node })
                .collect(),
        )
    }
}

impl AstNode {
    pub fn new(position: usize, kind: impl Into<String>, value: AstValue) -> Self {
        Self {
            position,
            kind: kind.into(),
            value,
        }
    }

    pub fn is(&self, kind: &str) -> bool {
        self.kind == kind
    }

    pub fn token(&self) -> Option<&Token> {
        match &self.value {
            AstValue::Leaf(token) => Some(token),
            _ => None,
        }
    }

    /// Text carried by a leaf (its capture) or a character-mode match.
    pub fn text(&self) -> Option<&str> {
        match &self.value {
            AstValue::Leaf(token) => token.text.as_deref(),
            AstValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Named field of a composite node; `None` if absent, not matched, or the node is not composite.
    pub fn field(&self, name: &str) -> Option<&AstNode> {
        match &self.value {
            AstValue::Composite(fields) => fields
                .iter()
                .find(|f| f.name == name)
                .and_then(|f| f.node.as_ref()),
            _ => None,
        }
    }

    /// Items of a list node; empty for every other value.
    pub fn items(&self) -> &[AstNode] {
        match &self.value {
            AstValue::List(items) => items,
            _ => &[],
        }
    }
}

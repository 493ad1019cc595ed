//! Primitive type vocabulary.
//!
//! Jay's type system is deliberately minimal: three primitive kinds that literals map onto and that
//! declarations may name explicitly (`var count int`).
//!
//! ## Examples
//! ```rust
//! use jay_core::lang::tokens::TokenId;
//! use jay_core::lang::types::{self, PrimitiveType};
//!
//! assert_eq!(types::from_str("string"), Some(PrimitiveType::String));
//! assert_eq!(types::from_literal(TokenId::Float), Some(PrimitiveType::Float));
//! assert_eq!(PrimitiveType::Int.to_string(), "int");
//! ```

use std::fmt;

use super::tokens::TokenId;

/// A primitive value kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    String,
    Int,
    Float,
}

/// Metadata for a primitive type.
#[derive(Debug, Clone, Copy)]
pub struct TypeInfo {
    pub id: PrimitiveType,
    pub canonical: &'static str,
    pub aliases: &'static [&'static str],
    /// Literal token that produces values of this type.
    pub literal: TokenId,
}

pub const PRIMITIVE_TYPES: &[TypeInfo] = &[
    TypeInfo {
        id: PrimitiveType::String,
        canonical: "string",
        aliases: &["str"],
        literal: TokenId::String,
    },
    TypeInfo {
        id: PrimitiveType::Int,
        canonical: "int",
        aliases: &["integer"],
        literal: TokenId::Integer,
    },
    TypeInfo {
        id: PrimitiveType::Float,
        canonical: "float",
        aliases: &[],
        literal: TokenId::Float,
    },
];

pub fn info(id: PrimitiveType) -> &'static TypeInfo {
    PRIMITIVE_TYPES
        .iter()
        .find(|t| t.id == id)
        .expect("INVARIANT: every PrimitiveType has a registry entry")
}

pub fn as_str(id: PrimitiveType) -> &'static str {
    info(id).canonical
}

/// Resolve a type name (canonical spelling or alias).
pub fn from_str(name: &str) -> Option<PrimitiveType> {
    PRIMITIVE_TYPES
        .iter()
        .find(|t| t.canonical == name || t.aliases.contains(&name))
        .map(|t| t.id)
}

/// Map a literal token to the primitive type of its value.
pub fn from_literal(token: TokenId) -> Option<PrimitiveType> {
    PRIMITIVE_TYPES.iter().find(|t| t.literal == token).map(|t| t.id)
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", as_str(*self))
    }
}

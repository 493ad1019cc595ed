//! Jay language vocabulary registries.
//!
//! Callers work with **stable IDs** (`TokenId`, `PrimitiveType`) and look up spellings and metadata via
//! registry tables instead of comparing strings all over the compiler.
//!
//! ## Notes
//! - Registries are intentionally **pure**: no AST types, no IO, no side effects.
//! - The lexer owns tokenization; the registry only provides rule names, patterns and ordering.
//!
//! ## Examples
//! ```rust
//! use jay_core::lang::tokens::{self, TokenId};
//! use jay_core::lang::types::{self, PrimitiveType};
//!
//! assert_eq!(tokens::from_str("VAR"), Some(TokenId::Var));
//! assert_eq!(types::from_str("int"), Some(PrimitiveType::Int));
//! ```

pub mod tokens;
pub mod types;

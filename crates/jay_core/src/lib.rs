//! Provide the canonical language vocabulary for the Jay compiler front end.
//!
//! This crate is intentionally small and dependency-free. It holds the registries that both the
//! reference language definition and the semantic analyzer consult, so spellings and type names
//! live in exactly one place.
//!
//! ## Notes
//!
//! - This is a “vocabulary” crate: **no IO**, no global mutable state, and no compiler-specific types.
//! - The lexer/parser engines in `jay_syntax` are generic; they never read these tables directly.

pub mod lang;

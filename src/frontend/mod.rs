//! Jay Compiler Frontend
//!
//! This module contains all frontend components:
//! - `symbols`: scope tree and symbol table
//! - `analyzer`: per-module declaration registration and type inference
//! - `linker`: local and cross-module reference resolution
//! - `module`: module table and module locators
//! - `language`: the language definition collaborator
//! - `pipeline`: the phase state machine driving a compilation

// Syntax components are provided by the shared jay_syntax crate.
pub use jay_syntax::{ast, diagnostics, grammar, lexer, parser, source};

// Compiler-specific pieces remain local.
pub mod analyzer;
pub mod language;
pub mod linker;
pub mod module;
pub mod pipeline;
pub mod symbols;

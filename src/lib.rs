#![forbid(unsafe_code)]
//! Jay Programming Language Compiler Front End
//!
//! A rule-driven lexer, a backtracking parser-combinator engine and a multi-pass analyzer that resolves symbols
//! across nested scopes and modules. The generic engine lives in `jay_syntax`; this crate adds module loading,
//! analysis, linking and the reference [`lang::Jay`] language definition.
//!
//! ## Examples
//! ```rust
//! use jay::{Compiler, Jay, Phase};
//! use jay::frontend::module::MemoryLocator;
//!
//! let jay = Jay::new().unwrap();
//! let locator = MemoryLocator::new()
//!     .with_module("main", "import \"util\"\n\nfunc main() {\n    util.greet()\n}\n")
//!     .with_module("util", "func greet() {}\n");
//!
//! let mut compiler = Compiler::new(&jay, &locator);
//! let compilation = compiler.compile().unwrap();
//! assert_eq!(compiler.phase(), Phase::Done);
//! assert_eq!(compilation.modules.len(), 2);
//! ```
//!
//! ## Panic Policy
//!
//! This codebase follows explicit error handling:
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! - **True invariants**: If a panic represents a compiler bug (logic error), use `.expect("INVARIANT: reason")` with a
//!   clear explanation.

pub mod config;
pub mod frontend;
pub mod lang;

pub use frontend::ast;
pub use frontend::diagnostics;
pub use frontend::grammar;
pub use frontend::lexer;
pub use frontend::parser;
pub use frontend::source;
pub use frontend::symbols;

pub use config::CompileConfig;
pub use frontend::pipeline::{Compilation, CompileFailure, Compiler, Phase};
pub use lang::Jay;

//! Backtracking parser-combinator engine.
//!
//! The engine evaluates a caller-supplied [`Grammar`] over either a token stream (produced by
//! [`crate::lexer`]) or raw characters. Grammar rules are plain functions that drive a [`Parser`] through the
//! combinators [`Parser::one`], [`Parser::opt`], [`Parser::any`] and [`Parser::many`], each of which takes an ordered
//! list of [`Atom`]s.
//!
//! ## Notes
//! - Backtracking is explicit: a failed alternative restores the cursor to the checkpoint taken before it.
//! - The parser keeps one furthest error across the whole parse, including abandoned branches. That is the error
//!   reported when the parse ultimately fails.
//! - [`Failure::Fatal`] errors (grammar misconfiguration) are never swallowed by a combinator.
//!
//! ## Examples
//!
//! ```rust
//! use jay_syntax::ast::AstValue;
//! use jay_syntax::grammar::Grammar;
//! use jay_syntax::parser::{self, Atom, Input, Parser, ParseResult, Parsed};
//! use regex::Regex;
//!
//! fn digits(p: &mut Parser<'_>) -> ParseResult<Parsed> {
//!     let number = Regex::new("[0-9]+").unwrap();
//!     let items = p.many(&[Atom::Pattern(&number), Atom::Literal(",")])?;
//!     Ok(AstValue::List(items).into())
//! }
//!
//! let grammar = Grammar::new("digits").rule("digits", digits);
//! let output = parser::parse(&grammar, Input::Text("1,22,333")).unwrap();
//! assert_eq!(output.ast.items().len(), 5);
//! ```

use regex::Regex;

use crate::ast::{AstNode, AstValue};
use crate::diagnostics::CompileError;
use crate::grammar::Grammar;
use crate::lexer::{EOS, NEWLINE, Token};
use crate::source::ModuleLocator;

// NOTE: This module is split across multiple files using `include!` to keep all parser
// methods in the same Rust module (preserving privacy + call patterns) while avoiding
// a single large source file.

include!("parser/core.rs");
include!("parser/atoms.rs");
include!("parser/combinators.rs");
include!("parser/api.rs");
include!("parser/tests.rs");

//! Shared syntax frontend for the Jay language: source mapping, lexer, parser-combinator engine, AST, diagnostics.
//!
//! This crate is dependency-light and language-agnostic: token rules and grammars are supplied by a language
//! definition, the engines here only evaluate them.
//!
//! ## Notes
//! - This crate is intentionally “syntax-only”: it does not do name resolution or type inference.
//! - The reference token vocabulary lives in `jay_core::lang`; the reference grammar lives in `jay::lang`.
//!
//! ## Examples
//! ```rust
//! use jay_syntax::ast::AstValue;
//! use jay_syntax::grammar::Grammar;
//! use jay_syntax::lexer::{self, TokenRule, TokenRules};
//! use jay_syntax::parser::{self, Atom, Input, Parser, ParseResult, Parsed};
//!
//! fn root(p: &mut Parser<'_>) -> ParseResult<Parsed> {
//!     Ok(AstValue::List(p.many(&[Atom::Token("WORD")])?).into())
//! }
//!
//! let rules = TokenRules::new()
//!     .with(TokenRule::new("WORD", "[a-z]+").unwrap())
//!     .with(TokenRule::omitted("SPACE", " +").unwrap());
//! let grammar = Grammar::new("root").rule("root", root);
//!
//! let tokens = lexer::lex("hello world", &rules).unwrap();
//! let output = parser::parse(&grammar, Input::Tokens(&tokens)).unwrap();
//! assert_eq!(output.ast.items().len(), 2);
//! ```

pub mod ast;
pub mod diagnostics;
pub mod grammar;
pub mod lexer;
pub mod parser;
pub mod source;

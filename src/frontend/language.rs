//! Language definition collaborator.
//!
//! The frontend core prescribes no concrete syntax. A [`Language`] supplies the token rules and grammar that drive
//! the lexer and parser engine, and an analysis hook that walks a parsed module and drives an [`Analyzer`].

use jay_syntax::ast::AstNode;
use jay_syntax::diagnostics::CompileError;
use jay_syntax::grammar::Grammar;
use jay_syntax::lexer::TokenRules;

use crate::frontend::analyzer::Analyzer;

pub trait Language {
    /// Ordered lexical rules.
    fn token_rules(&self) -> &TokenRules;

    /// Grammar whose root rule parses one module.
    fn grammar(&self) -> &Grammar;

    /// Register the declarations and references of one parsed module.
    ///
    /// ## Errors
    /// Any analysis failure (duplicate symbol, type mismatch, unknown type); it aborts the compilation.
    fn analyze(&self, analyzer: &mut Analyzer<'_>, ast: &AstNode) -> Result<(), CompileError>;
}

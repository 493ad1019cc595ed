//! The Jay reference language.
//!
//! A concrete language definition built on the generic frontend: token rules come from the
//! `jay_core::lang::tokens` registry, the grammar lives in [`grammar`], and the analysis hook in [`analysis`].
//!
//! ```text
//! import "util"
//!
//! var greeting string = "hi"
//!
//! func main() {
//!     var n = 1 + 2
//!     util.print(greeting, n)
//! }
//! ```
//!
//! ## Examples
//! ```rust
//! use jay::frontend::module::MemoryLocator;
//! use jay::frontend::pipeline::Compiler;
//! use jay::lang::Jay;
//!
//! let jay = Jay::new().unwrap();
//! let locator = MemoryLocator::new().with_module("main", "func f() { g() }\nfunc g() {}\n");
//! let compilation = Compiler::new(&jay, &locator).compile().unwrap();
//! assert!(compilation.module("main").is_some());
//! ```

pub mod analysis;
pub mod grammar;

use jay_core::lang::tokens::TOKENS;
use jay_syntax::ast::AstNode;
use jay_syntax::diagnostics::CompileError;
use jay_syntax::grammar::Grammar;
use jay_syntax::lexer::{TokenRule, TokenRules};

use crate::frontend::analyzer::Analyzer;
use crate::frontend::language::Language;

/// Node kinds of the reference grammar. Every tag except the binary operators is also a registered rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeTag {
    Root,
    Import,
    DeclStatement,
    Statement,
    VariableDecl,
    FunctionDecl,
    Params,
    Param,
    Block,
    Assignment,
    FunctionCall,
    CallArgs,
    Expression,
    Add,
    Subtract,
    Multiply,
    Divide,
    Parenthesis,
    BasicExpression,
}

impl NodeTag {
    pub const ALL: &'static [NodeTag] = &[
        NodeTag::Root,
        NodeTag::Import,
        NodeTag::DeclStatement,
        NodeTag::Statement,
        NodeTag::VariableDecl,
        NodeTag::FunctionDecl,
        NodeTag::Params,
        NodeTag::Param,
        NodeTag::Block,
        NodeTag::Assignment,
        NodeTag::FunctionCall,
        NodeTag::CallArgs,
        NodeTag::Expression,
        NodeTag::Add,
        NodeTag::Subtract,
        NodeTag::Multiply,
        NodeTag::Divide,
        NodeTag::Parenthesis,
        NodeTag::BasicExpression,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            NodeTag::Root => "root",
            NodeTag::Import => "import",
            NodeTag::DeclStatement => "declStatement",
            NodeTag::Statement => "statement",
            NodeTag::VariableDecl => "variableDecl",
            NodeTag::FunctionDecl => "functionDecl",
            NodeTag::Params => "params",
            NodeTag::Param => "param",
            NodeTag::Block => "block",
            NodeTag::Assignment => "assignment",
            NodeTag::FunctionCall => "functionCall",
            NodeTag::CallArgs => "callArgs",
            NodeTag::Expression => "expression",
            NodeTag::Add => "add",
            NodeTag::Subtract => "subtract",
            NodeTag::Multiply => "multiply",
            NodeTag::Divide => "divide",
            NodeTag::Parenthesis => "parenthesis",
            NodeTag::BasicExpression => "basicExpression",
        }
    }

    /// Whether the grammar registers a rule under this tag. Binary operator nodes are built inside `expression`.
    pub const fn is_rule(self) -> bool {
        !matches!(self, NodeTag::Add | NodeTag::Subtract | NodeTag::Multiply | NodeTag::Divide)
    }

    /// Map a node kind back to its tag. Token leaves have no tag.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.name() == name)
    }
}

/// Build the ordered token rules from the vocabulary registry.
///
/// ## Errors
/// [`CompileError::Grammar`] if a registry pattern does not compile.
pub fn token_rules() -> Result<TokenRules, CompileError> {
    TOKENS
        .iter()
        .map(|t| {
            if t.omit {
                TokenRule::omitted(t.name, t.pattern)
            } else {
                TokenRule::new(t.name, t.pattern)
            }
        })
        .collect()
}

/// The reference language definition.
#[derive(Debug, Clone)]
pub struct Jay {
    token_rules: TokenRules,
    grammar: Grammar,
}

impl Jay {
    /// ## Errors
    /// [`CompileError::Grammar`] if the token rules or grammar are inconsistent.
    pub fn new() -> Result<Self, CompileError> {
        let grammar = grammar::grammar();
        grammar.validate()?;
        Ok(Self {
            token_rules: token_rules()?,
            grammar,
        })
    }
}

impl Language for Jay {
    fn token_rules(&self) -> &TokenRules {
        &self.token_rules
    }

    fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    fn analyze(&self, analyzer: &mut Analyzer<'_>, ast: &AstNode) -> Result<(), CompileError> {
        analysis::analyze_module(analyzer, ast)
    }
}

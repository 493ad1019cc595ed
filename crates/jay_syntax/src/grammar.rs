//! Named grammar rules.
//!
//! A [`Grammar`] is a plain value: a root rule name plus a table of rule name → parse function. It is built once by
//! a language definition and passed to the parser by reference. Rules refer to each other by name through
//! [`Atom::Rule`](crate::parser::Atom::Rule), so the table is open to extension and recursion.

use std::collections::HashMap;
use std::fmt;

use crate::diagnostics::CompileError;
use crate::parser::{ParseResult, Parsed, Parser};

/// Parse function of a rule.
pub type ParseFn = fn(&mut Parser<'_>) -> ParseResult<Parsed>;

/// A registered rule. Its name becomes the kind of the nodes it wraps.
#[derive(Clone, Copy)]
pub struct Rule {
    name: &'static str,
    parse: ParseFn,
}

impl Rule {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn parse_fn(&self) -> ParseFn {
        self.parse
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule").field("name", &self.name).finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub struct Grammar {
    root: &'static str,
    rules: HashMap<&'static str, Rule>,
}

impl Grammar {
    /// An empty grammar whose parse starts at `root`.
    pub fn new(root: &'static str) -> Self {
        Self {
            root,
            rules: HashMap::new(),
        }
    }

    /// Register a rule (builder style). A later registration under the same name replaces the earlier one.
    pub fn rule(mut self, name: &'static str, parse: ParseFn) -> Self {
        self.register(name, parse);
        self
    }

    pub fn register(&mut self, name: &'static str, parse: ParseFn) {
        self.rules.insert(name, Rule { name, parse });
    }

    pub fn get(&self, name: &str) -> Option<&Rule> {
        self.rules.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    pub fn root(&self) -> &'static str {
        self.root
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Check that the root rule is registered.
    ///
    /// ## Errors
    /// Returns [`CompileError::Grammar`] when it is not.
    pub fn validate(&self) -> Result<(), CompileError> {
        if self.contains(self.root) {
            Ok(())
        } else {
            Err(CompileError::grammar(format!(
                "root rule '{}' is not registered",
                self.root
            )))
        }
    }
}

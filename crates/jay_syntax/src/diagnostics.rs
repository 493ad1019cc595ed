//! Error taxonomy and diagnostic rendering.
//!
//! Every failure the frontend can produce is a [`CompileError`]. Errors carry a global source offset (see
//! [`crate::source`]); turning that into something a human can read needs the [`Source`] the offset refers to, which
//! is what [`Diagnostic`] and [`SourceDiagnostic`] do.

// Suppress unused_assignments for struct fields used by derive macros
#![allow(unused_assignments)]

use std::fmt;

use miette::{NamedSource, SourceSpan};
use thiserror::Error;

use crate::source::Source;

/// A terminal frontend failure. None of these are retried.
#[derive(Debug, Clone, PartialEq, Eq, Error, miette::Diagnostic)]
pub enum CompileError {
    #[error("unexpected input")]
    #[diagnostic(code(jay::lex))]
    Lex { offset: usize },

    #[error("{message}")]
    #[diagnostic(code(jay::parse))]
    Parse { offset: usize, message: String },

    #[error("symbol '{name}' already defined here: ({original_link})")]
    #[diagnostic(code(jay::duplicate_symbol))]
    DuplicateSymbol {
        name: String,
        offset: usize,
        original_offset: usize,
        original_link: String,
    },

    #[error("symbol '{name}' is not defined")]
    #[diagnostic(
        code(jay::unresolved_symbol),
        help("declare it in this scope or an enclosing one")
    )]
    UnresolvedSymbol { name: String, offset: usize },

    #[error("module '{module}' was never loaded")]
    #[diagnostic(code(jay::unknown_module), help("add an import directive for the module"))]
    UnknownModule { module: String, offset: usize },

    #[error("symbol '{name}' is not defined in module '{module}'")]
    #[diagnostic(code(jay::unresolved_remote_symbol))]
    UnresolvedRemoteSymbol {
        module: String,
        name: String,
        offset: usize,
    },

    #[error("type mismatch. Expected {expected} but got {found}")]
    #[diagnostic(code(jay::type_mismatch))]
    TypeMismatch {
        expected: String,
        found: String,
        offset: usize,
    },

    #[error("unknown type '{name}'")]
    #[diagnostic(code(jay::unknown_type))]
    UnknownType { name: String, offset: usize },

    #[error("could not load module '{module}': {reason}")]
    #[diagnostic(code(jay::module_load))]
    ModuleLoad {
        module: String,
        offset: Option<usize>,
        reason: String,
    },

    #[error("invalid grammar: {message}")]
    #[diagnostic(code(jay::grammar))]
    Grammar { message: String },

    #[error("position {offset} is outside the source")]
    #[diagnostic(code(jay::position_out_of_range))]
    PositionOutOfRange { offset: usize },
}

impl CompileError {
    pub fn parse(message: impl Into<String>, offset: usize) -> Self {
        Self::Parse {
            offset,
            message: message.into(),
        }
    }

    pub fn grammar(message: impl Into<String>) -> Self {
        Self::Grammar {
            message: message.into(),
        }
    }

    /// Global source offset the error points at, if it has one.
    pub fn offset(&self) -> Option<usize> {
        match self {
            Self::Lex { offset }
            | Self::Parse { offset, .. }
            | Self::DuplicateSymbol { offset, .. }
            | Self::UnresolvedSymbol { offset, .. }
            | Self::UnknownModule { offset, .. }
            | Self::UnresolvedRemoteSymbol { offset, .. }
            | Self::TypeMismatch { offset, .. }
            | Self::UnknownType { offset, .. }
            | Self::PositionOutOfRange { offset } => Some(*offset),
            Self::ModuleLoad { offset, .. } => *offset,
            Self::Grammar { .. } => None,
        }
    }
}

/// Plain-text rendering of a positioned error.
///
/// Renders as three lines:
///
/// ```text
/// error: <message> --> <file:line:col>
///     <source line>
///     <caret>
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub source_link: String,
    pub message: String,
    pub source_line: String,
    pub caret_column: usize,
}

impl Diagnostic {
    /// Resolve `error`'s offset against `source`.
    ///
    /// Returns `None` when the error has no offset or the offset cannot be mapped.
    pub fn new(source: &Source, error: &CompileError) -> Option<Self> {
        let info = source.position_info(error.offset()?).ok()?;
        Some(Self {
            source_link: info.link(),
            message: error.to_string(),
            source_line: info.line_text,
            caret_column: info.column,
        })
    }

    /// The caret line: the source line's leading columns blanked out (tabs kept so widths match), then `^`.
    pub fn caret(&self) -> String {
        let mut caret: String = self
            .source_line
            .chars()
            .chain(std::iter::repeat(' '))
            .take(self.caret_column)
            .map(|c| if c == '\t' { '\t' } else { ' ' })
            .collect();
        caret.push('^');
        caret
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "error: {} --> {}", self.message, self.source_link)?;
        writeln!(f, "    {}", self.source_line)?;
        write!(f, "    {}", self.caret())
    }
}

/// A positioned error with rich formatting.
#[derive(Debug, Error, miette::Diagnostic)]
#[error("{message}")]
#[diagnostic(code(jay::compile))]
pub struct SourceDiagnostic {
    /// Human-readable error message
    pub message: String,
    /// Source code for context
    #[source_code]
    pub src: NamedSource<String>,
    /// Location of the error
    #[label("{label}")]
    pub span: SourceSpan,
    /// Label for the error span (interpolated by miette derive macro)
    pub label: String,
}

impl SourceDiagnostic {
    /// Attach the joined source text to `error`. Errors without an offset point at the start of the text.
    pub fn new(source: &Source, name: &str, error: &CompileError) -> Self {
        let offset = error.offset().unwrap_or(0).min(source.len());
        Self {
            message: error.to_string(),
            src: NamedSource::new(name, source.join().to_string()),
            span: (offset, 0).into(),
            label: "error here".to_string(),
        }
    }
}

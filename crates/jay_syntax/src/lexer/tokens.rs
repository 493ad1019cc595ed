//! Token type produced by the lexer.

use std::fmt;

/// Kind of the synthetic line-break token. Token rules that match line breaks must use this name so consecutive
/// breaks coalesce.
pub const NEWLINE: &str = "NEWLINE";

/// Kind of the synthetic end-of-stream token.
pub const EOS: &str = "EOS";

/// A lexed token. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Global offset of the first byte of the match.
    pub position: usize,
    /// Name of the rule that produced the token.
    pub kind: String,
    /// First capture group of the rule's pattern, if it has one.
    pub text: Option<String>,
}

impl Token {
    pub fn new(position: usize, kind: impl Into<String>, text: Option<String>) -> Self {
        Self {
            position,
            kind: kind.into(),
            text,
        }
    }

    pub fn is(&self, kind: &str) -> bool {
        self.kind == kind
    }

    /// Captured text, or `""` for tokens without a capture.
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.text {
            Some(text) => write!(f, "{}({:?})", self.kind, text),
            None => write!(f, "{}", self.kind),
        }
    }
}

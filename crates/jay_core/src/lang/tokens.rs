//! Define the token rule vocabulary for the Jay reference language.
//!
//! This module is the single source of truth for lexical rules: a stable identifier ([`TokenId`])
//! plus a const table ([`TOKENS`]) recording each rule's name, regular pattern, `omit` flag and
//! category.
//!
//! ## Notes
//! - **Order matters.** The lexer is first-match, so [`TOKENS`] is listed in lexing priority order:
//!   keywords precede `IDENTIFIER`, `FLOAT` precedes `INTEGER`, and `COMMENT` precedes `DIV`.
//! - Patterns are unanchored here; the lexer anchors them at the cursor.
//! - Where a rule has a capture group, the group becomes the token text (e.g. the body of a string).
//!
//! ## Examples
//! ```rust
//! use jay_core::lang::tokens::{self, TokenId};
//!
//! assert_eq!(tokens::as_str(TokenId::ParenStart), "PARENT_START");
//! assert!(tokens::info(TokenId::Whitespace).omit);
//! ```

/// Stable identifier for every lexical rule of the reference language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenId {
    // Trivia / layout
    Comment,
    Newline,
    Whitespace,

    // Keywords
    Import,
    Var,
    Func,

    // Literals and names
    String,
    Float,
    Integer,
    Identifier,

    // Punctuation
    ParenStart,
    ParenEnd,
    CurlStart,
    CurlEnd,
    Comma,
    Equals,
    Dot,

    // Operators
    Add,
    Sub,
    Mul,
    Div,
}

/// High-level grouping for documentation and tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenCategory {
    Trivia,
    Layout,
    Keyword,
    Literal,
    Name,
    Punctuation,
    Operator,
}

/// Metadata for a lexical rule.
#[derive(Debug, Clone, Copy)]
pub struct TokenInfo {
    pub id: TokenId,
    /// Rule name; this is the token kind the lexer emits.
    pub name: &'static str,
    pub pattern: &'static str,
    /// Matches advance the lexer without emitting a token.
    pub omit: bool,
    pub category: TokenCategory,
}

const fn rule(id: TokenId, name: &'static str, pattern: &'static str, category: TokenCategory) -> TokenInfo {
    TokenInfo {
        id,
        name,
        pattern,
        omit: false,
        category,
    }
}

const fn omitted(id: TokenId, name: &'static str, pattern: &'static str) -> TokenInfo {
    TokenInfo {
        id,
        name,
        pattern,
        omit: true,
        category: TokenCategory::Trivia,
    }
}

/// Registry of lexical rules, in lexing priority order.
pub const TOKENS: &[TokenInfo] = &[
    omitted(TokenId::Comment, "COMMENT", r"//[^\n]*"),
    rule(TokenId::Newline, "NEWLINE", r"(?:\r?\n)+", TokenCategory::Layout),
    omitted(TokenId::Whitespace, "WHITESPACE", r"[ \t]+"),
    rule(TokenId::Import, "IMPORT", r"import\b", TokenCategory::Keyword),
    rule(TokenId::Var, "VAR", r"var\b", TokenCategory::Keyword),
    rule(TokenId::Func, "FUNC", r"func\b", TokenCategory::Keyword),
    rule(TokenId::String, "STRING", r#""([^"\n]*)""#, TokenCategory::Literal),
    rule(TokenId::Float, "FLOAT", r"([0-9]+\.[0-9]+)", TokenCategory::Literal),
    rule(TokenId::Integer, "INTEGER", r"([0-9]+)", TokenCategory::Literal),
    rule(TokenId::Identifier, "IDENTIFIER", r"([a-zA-Z_][a-zA-Z0-9_]*)", TokenCategory::Name),
    rule(TokenId::ParenStart, "PARENT_START", r"\(", TokenCategory::Punctuation),
    rule(TokenId::ParenEnd, "PARENT_END", r"\)", TokenCategory::Punctuation),
    rule(TokenId::CurlStart, "CURL_START", r"\{", TokenCategory::Punctuation),
    rule(TokenId::CurlEnd, "CURL_END", r"\}", TokenCategory::Punctuation),
    rule(TokenId::Comma, "COMMA", r",", TokenCategory::Punctuation),
    rule(TokenId::Equals, "EQUALS", r"=", TokenCategory::Punctuation),
    rule(TokenId::Dot, "DOT", r"\.", TokenCategory::Punctuation),
    rule(TokenId::Add, "ADD", r"\+", TokenCategory::Operator),
    rule(TokenId::Sub, "SUB", r"-", TokenCategory::Operator),
    rule(TokenId::Mul, "MUL", r"\*", TokenCategory::Operator),
    rule(TokenId::Div, "DIV", r"/", TokenCategory::Operator),
];

/// Return the registry entry for `id`.
pub fn info(id: TokenId) -> &'static TokenInfo {
    TOKENS
        .iter()
        .find(|t| t.id == id)
        .expect("INVARIANT: every TokenId has a registry entry")
}

/// Return the rule name (token kind) for `id`.
pub fn as_str(id: TokenId) -> &'static str {
    info(id).name
}

/// Resolve a rule name to its id. Case-sensitive.
pub fn from_str(name: &str) -> Option<TokenId> {
    TOKENS.iter().find(|t| t.name == name).map(|t| t.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_id_is_registered_once() {
        let mut seen = HashSet::new();
        for t in TOKENS {
            assert!(seen.insert(t.id), "duplicate registry entry for {:?}", t.id);
            assert_eq!(from_str(t.name), Some(t.id));
        }
    }

    #[test]
    fn test_keywords_precede_identifier() {
        let position = |id| TOKENS.iter().position(|t| t.id == id).unwrap();
        let ident = position(TokenId::Identifier);
        for kw in [TokenId::Import, TokenId::Var, TokenId::Func] {
            assert!(position(kw) < ident, "{:?} must be tried before IDENTIFIER", kw);
        }
        assert!(position(TokenId::Float) < position(TokenId::Integer));
        assert!(position(TokenId::Comment) < position(TokenId::Div));
    }

    #[test]
    fn test_only_trivia_is_omitted() {
        for t in TOKENS {
            assert_eq!(t.omit, t.category == TokenCategory::Trivia, "{}", t.name);
        }
    }
}

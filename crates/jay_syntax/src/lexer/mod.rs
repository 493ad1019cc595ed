//! Rule-driven lexer.
//!
//! Converts raw text into a token stream using an **ordered** list of named [`TokenRule`]s. At every offset the rules
//! are tried in declaration order and the first one whose pattern matches a non-empty prefix wins. This is
//! first-match, not longest-match: keywords must be declared before the identifier rule or `var` lexes as an
//! identifier.
//!
//! ## Notes
//! - Rules flagged `omit` (whitespace, comments) advance the cursor without emitting a token.
//! - Consecutive [`NEWLINE`] tokens coalesce into one.
//! - If any token was emitted and the last is not a [`NEWLINE`], a synthetic one is appended, then exactly one
//!   [`EOS`]. Both synthetic tokens sit at `source.len()`.

pub mod tokens;

pub use tokens::{EOS, NEWLINE, Token};

use regex::Regex;

use crate::diagnostics::CompileError;

/// A named token pattern.
#[derive(Debug, Clone)]
pub struct TokenRule {
    name: String,
    /// Pattern anchored at the cursor.
    pattern: Regex,
    omit: bool,
}

impl TokenRule {
    /// A rule whose matches are emitted as tokens.
    ///
    /// ## Errors
    /// Returns [`CompileError::Grammar`] if `pattern` is not a valid regular expression.
    pub fn new(name: impl Into<String>, pattern: &str) -> Result<Self, CompileError> {
        Self::build(name.into(), pattern, false)
    }

    /// A rule whose matches are consumed silently.
    ///
    /// ## Errors
    /// Returns [`CompileError::Grammar`] if `pattern` is not a valid regular expression.
    pub fn omitted(name: impl Into<String>, pattern: &str) -> Result<Self, CompileError> {
        Self::build(name.into(), pattern, true)
    }

    fn build(name: String, pattern: &str, omit: bool) -> Result<Self, CompileError> {
        let pattern = Regex::new(&format!("^(?:{pattern})"))
            .map_err(|e| CompileError::grammar(format!("token rule '{name}': {e}")))?;
        Ok(Self { name, pattern, omit })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_omitted(&self) -> bool {
        self.omit
    }

    /// Match at the start of `rest`: `(consumed bytes, first capture)`. Empty matches do not count.
    fn match_at<'t>(&self, rest: &'t str) -> Option<(usize, Option<&'t str>)> {
        let captures = self.pattern.captures(rest)?;
        let whole = captures.get(0)?;
        if whole.end() == 0 {
            return None;
        }
        Some((whole.end(), captures.get(1).map(|m| m.as_str())))
    }
}

/// Ordered rule list. Order is load-bearing.
#[derive(Debug, Clone, Default)]
pub struct TokenRules {
    rules: Vec<TokenRule>,
}

impl TokenRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule (builder style).
    pub fn with(mut self, rule: TokenRule) -> Self {
        self.push(rule);
        self
    }

    pub fn push(&mut self, rule: TokenRule) {
        self.rules.push(rule);
    }

    pub fn iter(&self) -> impl Iterator<Item = &TokenRule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl FromIterator<TokenRule> for TokenRules {
    fn from_iter<I: IntoIterator<Item = TokenRule>>(iter: I) -> Self {
        Self {
            rules: iter.into_iter().collect(),
        }
    }
}

/// Lexer over one joined source text.
pub struct Lexer<'a> {
    source: &'a str,
    rules: &'a TokenRules,
    current_pos: usize,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str, rules: &'a TokenRules) -> Self {
        Self {
            source,
            rules,
            current_pos: 0,
            tokens: Vec::new(),
        }
    }

    /// Tokenize the entire source.
    ///
    /// ## Errors
    /// Returns [`CompileError::Lex`] at the first offset no rule matches.
    pub fn tokenize(mut self) -> Result<Vec<Token>, CompileError> {
        while self.current_pos < self.source.len() {
            self.scan_token()?;
        }

        let end = self.source.len();
        if self.tokens.last().is_some_and(|t| !t.is(NEWLINE)) {
            self.tokens.push(Token::new(end, NEWLINE, None));
        }
        self.tokens.push(Token::new(end, EOS, None));
        Ok(self.tokens)
    }

    fn scan_token(&mut self) -> Result<(), CompileError> {
        let (source, rules) = (self.source, self.rules);
        let rest = &source[self.current_pos..];
        for rule in rules.iter() {
            let Some((consumed, text)) = rule.match_at(rest) else {
                continue;
            };
            if !rule.is_omitted() {
                self.emit(rule.name(), text);
            }
            self.current_pos += consumed;
            return Ok(());
        }
        Err(CompileError::Lex {
            offset: self.current_pos,
        })
    }

    fn emit(&mut self, kind: &str, text: Option<&str>) {
        if kind == NEWLINE && self.tokens.last().is_some_and(|t| t.is(NEWLINE)) {
            return;
        }
        self.tokens
            .push(Token::new(self.current_pos, kind, text.map(str::to_string)));
    }
}

/// Convenience function to lex a source string.
///
/// This is a shorthand for `Lexer::new(source, rules).tokenize()`.
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn lex(source: &str, rules: &TokenRules) -> Result<Vec<Token>, CompileError> {
    Lexer::new(source, rules).tokenize()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules(keywords_first: bool) -> TokenRules {
        let var = TokenRule::new("VAR", r"var\b").unwrap();
        let ident = TokenRule::new("IDENTIFIER", "([a-zA-Z_][a-zA-Z0-9_]*)").unwrap();
        let (first, second) = if keywords_first { (var, ident) } else { (ident, var) };
        TokenRules::new()
            .with(TokenRule::new(NEWLINE, r"(?:\r?\n)+").unwrap())
            .with(TokenRule::omitted("WHITESPACE", "[ \t]+").unwrap())
            .with(first)
            .with(second)
            .with(TokenRule::new("EQUALS", "=").unwrap())
    }

    fn kinds(tokens: &[Token]) -> Vec<String> {
        tokens.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_keyword_before_identifier() {
        let tokens = lex("var  x", &rules(true)).unwrap();
        assert_eq!(kinds(&tokens), ["VAR", "IDENTIFIER(\"x\")", "NEWLINE", "EOS"]);
        assert_eq!(tokens[1].position, 5);
        assert_eq!(tokens[2].position, 6);
        assert_eq!(tokens[3].position, 6);
    }

    #[test]
    fn test_rule_order_is_first_match() {
        let tokens = lex("var", &rules(false)).unwrap();
        assert_eq!(kinds(&tokens), ["IDENTIFIER(\"var\")", "NEWLINE", "EOS"]);
    }

    #[test]
    fn test_newlines_coalesce() {
        let tokens = lex("a\n\n  \n b\n", &rules(true)).unwrap();
        assert_eq!(
            kinds(&tokens),
            ["IDENTIFIER(\"a\")", "NEWLINE", "IDENTIFIER(\"b\")", "NEWLINE", "EOS"]
        );
    }

    #[test]
    fn test_empty_input_is_only_eos() {
        let tokens = lex("", &rules(true)).unwrap();
        assert_eq!(kinds(&tokens), ["EOS"]);
        let tokens = lex("   ", &rules(true)).unwrap();
        assert_eq!(kinds(&tokens), ["EOS"]);
    }

    #[test]
    fn test_unmatched_input_is_lex_error() {
        assert_eq!(
            lex("x = ?", &rules(true)),
            Err(CompileError::Lex { offset: 4 })
        );
    }

    #[test]
    fn test_empty_match_is_no_match() {
        let rules = TokenRules::new()
            .with(TokenRule::new("NOTHING", "a*").unwrap())
            .with(TokenRule::new("B", "b").unwrap());
        let tokens = lex("b", &rules).unwrap();
        assert_eq!(kinds(&tokens), ["B", "NEWLINE", "EOS"]);
    }

    #[test]
    fn test_invalid_pattern_is_grammar_error() {
        let err = TokenRule::new("BROKEN", "(").unwrap_err();
        assert!(matches!(err, CompileError::Grammar { .. }));
    }
}

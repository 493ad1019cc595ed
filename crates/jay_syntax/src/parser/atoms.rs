/// Node kind of a character-mode literal match.
pub const LITERAL_KIND: &str = "literal";

/// Node kind of a character-mode pattern match.
pub const PATTERN_KIND: &str = "pattern";

/// What a grammar rule returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parsed {
    /// Wrapped by the engine into a node of the rule's kind at the rule's start offset.
    Value(AstValue),
    /// Passed through unchanged (choice rules that just forward an alternative).
    Node(AstNode),
}

impl From<AstValue> for Parsed {
    fn from(value: AstValue) -> Self {
        Parsed::Value(value)
    }
}

impl From<AstNode> for Parsed {
    fn from(node: AstNode) -> Self {
        Parsed::Node(node)
    }
}

/// Anonymous parse step.
pub type InlineFn<'f> = &'f dyn Fn(&mut Parser<'_>) -> ParseResult<AstNode>;

/// One alternative handed to a combinator.
#[derive(Clone, Copy)]
pub enum Atom<'f> {
    /// A token of this kind (token mode).
    Token(&'f str),
    /// Exact text (character mode).
    Literal(&'f str),
    /// A regex match at the cursor (character mode). The node text is capture group 1 when present.
    Pattern(&'f Regex),
    /// A named grammar rule.
    Rule(&'f str),
    Inline(InlineFn<'f>),
    /// `atom`, but a non-fatal failure is reported as `expected <label>` at the atom's start.
    Named(&'f str, &'f Atom<'f>),
}

impl std::fmt::Debug for Atom<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Atom::Token(kind) => write!(f, "Token({kind})"),
            Atom::Literal(text) => write!(f, "Literal({text:?})"),
            Atom::Pattern(regex) => write!(f, "Pattern(/{}/)", regex.as_str()),
            Atom::Rule(name) => write!(f, "Rule({name})"),
            Atom::Inline(_) => write!(f, "Inline(..)"),
            Atom::Named(label, atom) => write!(f, "Named({label}, {atom:?})"),
        }
    }
}

impl<'a> Parser<'a> {
    /// Evaluate a single atom. The cursor is left wherever the atom stopped; combinators restore it.
    fn attempt(&mut self, atom: &Atom<'_>) -> ParseResult<AstNode> {
        match *atom {
            Atom::Token(kind) => self.match_token(kind),
            Atom::Literal(text) => self.match_literal(text),
            Atom::Pattern(regex) => self.match_pattern(regex),
            Atom::Rule(name) => self.apply_rule(name),
            Atom::Inline(step) => step(self),
            Atom::Named(label, inner) => {
                let start = self.offset();
                match self.attempt(inner) {
                    Err(Failure::Backtrack(_)) => Err(self.error(format!("expected {label}"), start)),
                    other => other,
                }
            }
        }
    }

    fn match_token(&mut self, kind: &str) -> ParseResult<AstNode> {
        let Input::Tokens(tokens) = self.input else {
            return Err(CompileError::grammar(format!("token atom '{kind}' used on character input")).into());
        };
        let Some(token) = tokens.get(self.pos) else {
            return self.fail(format!("expected {kind}, but got end of input"));
        };
        if !token.is(kind) {
            return Err(self.error(format!("expected {kind}, but got {}", token.kind), token.position));
        }
        self.pos += 1;
        Ok(AstNode::new(token.position, kind, AstValue::Leaf(token.clone())))
    }

    fn match_literal(&mut self, literal: &str) -> ParseResult<AstNode> {
        let Input::Text(text) = self.input else {
            return Err(CompileError::grammar(format!("literal atom {literal:?} used on token input")).into());
        };
        let start = self.pos;
        if !text.get(start..).unwrap_or_default().starts_with(literal) {
            return self.fail(format!("expected {literal:?}"));
        }
        self.pos += literal.len();
        Ok(AstNode::new(start, LITERAL_KIND, AstValue::Text(literal.to_string())))
    }

    fn match_pattern(&mut self, pattern: &Regex) -> ParseResult<AstNode> {
        let Input::Text(text) = self.input else {
            return Err(CompileError::grammar(format!("pattern atom /{}/ used on token input", pattern.as_str())).into());
        };
        let start = self.pos;
        let rest = text.get(start..).unwrap_or_default();
        // Leftmost-first: if a match at the cursor exists, it is the one found.
        let matched = pattern
            .captures(rest)
            .and_then(|caps| {
                let whole = caps.get(0)?;
                (whole.start() == 0).then(|| (whole.end(), caps.get(1).unwrap_or(whole).as_str().to_string()))
            });
        let Some((consumed, value)) = matched else {
            return self.fail(format!("expected /{}/", pattern.as_str()));
        };
        self.pos += consumed;
        Ok(AstNode::new(start, PATTERN_KIND, AstValue::Text(value)))
    }

    fn apply_rule(&mut self, name: &str) -> ParseResult<AstNode> {
        let grammar = self.grammar;
        let Some(rule) = grammar.get(name) else {
            return Err(CompileError::grammar(format!("unknown rule '{name}'")).into());
        };
        let start = self.offset();
        match (rule.parse_fn())(self)? {
            Parsed::Value(value) => Ok(AstNode::new(start, rule.name(), value)),
            Parsed::Node(node) => Ok(node),
        }
    }
}

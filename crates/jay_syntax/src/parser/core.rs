/// Backtrackable failure: where parsing stopped and what was expected there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub offset: usize,
    pub message: String,
}

impl From<ParseError> for CompileError {
    fn from(error: ParseError) -> Self {
        CompileError::Parse {
            offset: error.offset,
            message: error.message,
        }
    }
}

/// Why an atom did not produce a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    /// The input did not match; the enclosing combinator may try something else.
    Backtrack(ParseError),
    /// The grammar itself is broken, or a collaborator failed. Aborts the parse.
    Fatal(CompileError),
}

impl From<CompileError> for Failure {
    fn from(error: CompileError) -> Self {
        Failure::Fatal(error)
    }
}

pub type ParseResult<T> = Result<T, Failure>;

/// What the parser walks over.
#[derive(Debug, Clone, Copy)]
pub enum Input<'a> {
    Tokens(&'a [Token]),
    Text(&'a str),
}

impl Input<'_> {
    /// Number of tokens, or bytes of text.
    pub fn len(&self) -> usize {
        match self {
            Input::Tokens(tokens) => tokens.len(),
            Input::Text(text) => text.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Saved cursor position. Only meaningful for the parser that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint(usize);

/// A module name queued by an import directive, with the offset of the directive's name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    pub module: String,
    pub position: usize,
}

/// Parser state.
///
/// ## Notes
/// - `pos` indexes tokens in token mode and bytes in character mode.
/// - Import registration is a side effect that survives backtracking; it is idempotent per module name.
pub struct Parser<'a> {
    grammar: &'a Grammar,
    input: Input<'a>,
    pos: usize,
    furthest: Option<ParseError>,
    locator: Option<&'a dyn ModuleLocator>,
    imports: Vec<Import>,
}

impl<'a> Parser<'a> {
    pub fn new(grammar: &'a Grammar, input: Input<'a>) -> Self {
        Self {
            grammar,
            input,
            pos: 0,
            furthest: None,
            locator: None,
            imports: Vec::new(),
        }
    }

    /// Consult `locator` when import directives are parsed.
    pub fn with_locator(mut self, locator: &'a dyn ModuleLocator) -> Self {
        self.locator = Some(locator);
        self
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.pos)
    }

    pub fn restore(&mut self, checkpoint: Checkpoint) {
        self.pos = checkpoint.0;
    }

    /// Global source offset of the cursor.
    pub fn offset(&self) -> usize {
        match self.input {
            Input::Tokens(tokens) => tokens
                .get(self.pos)
                .or(tokens.last())
                .map_or(0, |t| t.position),
            Input::Text(_) => self.pos,
        }
    }

    /// The token under the cursor (token mode only).
    pub fn peek(&self) -> Option<&'a Token> {
        match self.input {
            Input::Tokens(tokens) => tokens.get(self.pos),
            Input::Text(_) => None,
        }
    }

    /// Whether the token under the cursor has kind `kind`. Never consumes.
    pub fn at(&self, kind: &str) -> bool {
        self.peek().is_some_and(|t| t.is(kind))
    }

    /// Whether only trailing layout remains: `NEWLINE`/`EOS` tokens, or nothing in character mode.
    pub fn at_end(&self) -> bool {
        match self.input {
            Input::Tokens(tokens) => tokens
                .get(self.pos..)
                .unwrap_or_default()
                .iter()
                .all(|t| t.is(NEWLINE) || t.is(EOS)),
            Input::Text(text) => self.pos >= text.len(),
        }
    }

    pub fn furthest_error(&self) -> Option<&ParseError> {
        self.furthest.as_ref()
    }

    pub fn imports(&self) -> &[Import] {
        &self.imports
    }

    /// Build a backtrackable failure at `offset`, recording it as the furthest error if nothing later was seen.
    pub fn error(&mut self, message: impl Into<String>, offset: usize) -> Failure {
        let error = ParseError {
            offset,
            message: message.into(),
        };
        if self.furthest.as_ref().is_none_or(|f| offset >= f.offset) {
            self.furthest = Some(error.clone());
        }
        Failure::Backtrack(error)
    }

    /// Fail at the cursor.
    pub fn fail<T>(&mut self, message: impl Into<String>) -> ParseResult<T> {
        let offset = self.offset();
        Err(self.error(message, offset))
    }

    /// Register an import of `module` found at `position`.
    ///
    /// With a locator attached, an unknown module fails the current branch with `could not locate module`. Known
    /// modules are queued once per parse, no matter how many branches see the directive.
    pub fn import_module(&mut self, module: &str, position: usize) -> ParseResult<()> {
        if self.locator.is_some_and(|l| l.locate(module).is_none()) {
            return Err(self.error(format!("could not locate module '{module}'"), position));
        }
        if !self.imports.iter().any(|i| i.module == module) {
            tracing::debug!(module, position, "queued module import");
            self.imports.push(Import {
                module: module.to_string(),
                position,
            });
        }
        Ok(())
    }
}

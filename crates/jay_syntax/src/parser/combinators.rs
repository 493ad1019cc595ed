/// Combinators.
///
/// Every combinator takes an ordered slice of alternatives. Fatal failures propagate immediately through all of
/// them; only [`Failure::Backtrack`] is ever caught.
impl<'a> Parser<'a> {
    /// Try each atom in order from the same checkpoint; the first success wins.
    ///
    /// ## Errors
    /// If every atom fails, returns the failure with the greatest offset (ties go to the later atom).
    pub fn one(&mut self, atoms: &[Atom<'_>]) -> ParseResult<AstNode> {
        if atoms.is_empty() {
            return Err(CompileError::grammar("combinator called without alternatives").into());
        }
        let checkpoint = self.checkpoint();
        let mut best: Option<ParseError> = None;
        for atom in atoms {
            match self.attempt(atom) {
                Ok(node) => return Ok(node),
                Err(Failure::Backtrack(error)) => {
                    self.restore(checkpoint);
                    tracing::trace!(?atom, offset = error.offset, message = %error.message, "alternative failed");
                    if best.as_ref().is_none_or(|b| error.offset >= b.offset) {
                        best = Some(error);
                    }
                }
                Err(fatal) => return Err(fatal),
            }
        }
        match best {
            Some(error) => Err(Failure::Backtrack(error)),
            None => self.fail("no alternative matched"),
        }
    }

    /// Like [`Parser::one`], but a miss yields `None` with the cursor restored.
    pub fn opt(&mut self, atoms: &[Atom<'_>]) -> ParseResult<Option<AstNode>> {
        let checkpoint = self.checkpoint();
        match self.one(atoms) {
            Ok(node) => Ok(Some(node)),
            Err(Failure::Backtrack(_)) => {
                self.restore(checkpoint);
                Ok(None)
            }
            Err(fatal) => Err(fatal),
        }
    }

    /// Zero or more repetitions of [`Parser::one`]. Only fails on fatal errors.
    pub fn any(&mut self, atoms: &[Atom<'_>]) -> ParseResult<Vec<AstNode>> {
        self.repeat(atoms).map(|(nodes, _)| nodes)
    }

    /// One or more repetitions of [`Parser::one`].
    ///
    /// ## Errors
    /// Propagates the first repetition's failure when nothing matched.
    pub fn many(&mut self, atoms: &[Atom<'_>]) -> ParseResult<Vec<AstNode>> {
        match self.repeat(atoms)? {
            (nodes, Some(error)) if nodes.is_empty() => Err(Failure::Backtrack(error)),
            (nodes, _) => Ok(nodes),
        }
    }

    /// Repeat until a repetition fails or stops consuming input. Returns the nodes and the failure that ended it.
    fn repeat(&mut self, atoms: &[Atom<'_>]) -> ParseResult<(Vec<AstNode>, Option<ParseError>)> {
        let mut nodes = Vec::new();
        loop {
            let checkpoint = self.checkpoint();
            match self.one(atoms) {
                Ok(node) => {
                    nodes.push(node);
                    if self.checkpoint() == checkpoint {
                        return Ok((nodes, None));
                    }
                }
                Err(Failure::Backtrack(error)) => {
                    self.restore(checkpoint);
                    return Ok((nodes, Some(error)));
                }
                Err(fatal) => return Err(fatal),
            }
        }
    }

    /// Match one token of `kind`.
    pub fn token(&mut self, kind: &str) -> ParseResult<AstNode> {
        self.one(&[Atom::Token(kind)])
    }

    /// Apply the rule registered as `name`.
    pub fn rule(&mut self, name: &str) -> ParseResult<AstNode> {
        self.one(&[Atom::Rule(name)])
    }
}

/// Result of a successful parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOutput {
    pub ast: AstNode,
    /// Modules queued by import directives, in first-seen order.
    pub imports: Vec<Import>,
}

impl<'a> Parser<'a> {
    /// Apply the grammar's root rule and check that the whole input was consumed.
    ///
    /// ## Errors
    /// - The furthest error seen anywhere in the parse, if the root rule fails or stops before the end.
    /// - `did not parse further` at the stopping offset, if the root stopped early without any recorded error.
    /// - Any fatal error raised by a rule or atom.
    pub fn run(mut self) -> Result<ParseOutput, CompileError> {
        let grammar = self.grammar;
        grammar.validate()?;
        match self.rule(grammar.root()) {
            Ok(ast) => {
                if !self.at_end() {
                    let offset = self.offset();
                    return Err(match self.furthest.take() {
                        Some(error) => error.into(),
                        None => CompileError::parse("did not parse further", offset),
                    });
                }
                Ok(ParseOutput {
                    ast,
                    imports: self.imports,
                })
            }
            Err(Failure::Backtrack(error)) => Err(self.furthest.take().unwrap_or(error).into()),
            Err(Failure::Fatal(error)) => Err(error),
        }
    }
}

/// Parse `input` with `grammar`, starting at its root rule.
///
/// This is the main public entrypoint for parsing. Import directives are registered without a locator check.
///
/// ## Errors
/// See [`Parser::run`].
#[tracing::instrument(skip_all, fields(root = grammar.root(), input_len = input.len()))]
pub fn parse(grammar: &Grammar, input: Input<'_>) -> Result<ParseOutput, CompileError> {
    Parser::new(grammar, input).run()
}

/// Parse `input` with `grammar`, checking import directives against `locator`.
///
/// ## Errors
/// See [`Parser::run`]. An import of a module `locator` does not know fails with `could not locate module`.
#[tracing::instrument(skip_all, fields(root = grammar.root(), input_len = input.len()))]
pub fn parse_with_locator(
    grammar: &Grammar,
    input: Input<'_>,
    locator: &dyn ModuleLocator,
) -> Result<ParseOutput, CompileError> {
    Parser::new(grammar, input).with_locator(locator).run()
}

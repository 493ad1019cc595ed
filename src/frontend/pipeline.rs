//! Compilation pipeline.
//!
//! A [`Compiler`] runs one compilation through a fixed sequence of phases:
//!
//! ```text
//! ParseAllModules → AnalyzeLocal → LinkLocal → LinkRemote → Done
//!        ↘              ↘             ↘            ↘
//!                          Failed
//! ```
//!
//! - **ParseAllModules**: starting from the entry module, read, lex and parse each module; every import directive
//!   queues its module (once). The module table is complete before anything is resolved across modules.
//! - **AnalyzeLocal**: the language's analysis hook builds each module's scope tree.
//! - **LinkLocal**: each module's forward references are resolved within the module.
//! - **LinkRemote**: `module.name` references are resolved against the finished table.
//!
//! Any failure moves the compiler to `Failed` and aborts: there is no partial result.

use std::collections::{HashSet, VecDeque};
use std::fmt;

use jay_syntax::ast::AstNode;
use jay_syntax::diagnostics::{CompileError, Diagnostic, SourceDiagnostic};
use jay_syntax::lexer;
use jay_syntax::parser::{self, Input};
use jay_syntax::source::{ModuleLocator, Source};

use crate::config::CompileConfig;
use crate::frontend::analyzer::Analyzer;
use crate::frontend::language::Language;
use crate::frontend::linker;
use crate::frontend::module::{self, Module, ModuleTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    ParseAllModules,
    AnalyzeLocal,
    LinkLocal,
    LinkRemote,
    Done,
    Failed,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::ParseAllModules => "PARSE_ALL_MODULES",
            Phase::AnalyzeLocal => "ANALYZE_LOCAL",
            Phase::LinkLocal => "LINK_LOCAL",
            Phase::LinkRemote => "LINK_REMOTE",
            Phase::Done => "DONE",
            Phase::Failed => "FAILED",
        };
        f.write_str(name)
    }
}

/// A failed compilation: the error, the module it is attributed to, and its rendered location when it has one.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{}", render(.module, .error, .diagnostic))]
pub struct CompileFailure {
    pub module: String,
    /// Phase the compilation was in when it failed.
    pub phase: Phase,
    #[source]
    pub error: CompileError,
    pub diagnostic: Option<Diagnostic>,
    /// Source of the module the failure is attributed to, when it was loaded.
    pub module_source: Option<Source>,
}

impl CompileFailure {
    /// The failure as a miette report: labelled over the module's source when there is one, otherwise the bare
    /// error with its code.
    pub fn report(&self) -> miette::Report {
        match &self.module_source {
            Some(source) if self.error.offset().is_some() => {
                miette::Report::new(SourceDiagnostic::new(source, &self.module, &self.error))
            }
            _ => miette::Report::new(self.error.clone()),
        }
    }
}

fn render(module: &str, error: &CompileError, diagnostic: &Option<Diagnostic>) -> String {
    match diagnostic {
        Some(diagnostic) => diagnostic.to_string(),
        None => format!("error: {error} (module '{module}')"),
    }
}

/// A successful compilation: every module with its linked scope tree.
#[derive(Debug, Clone)]
pub struct Compilation {
    pub modules: ModuleTable,
}

impl Compilation {
    pub fn module(&self, name: &str) -> Option<&Module> {
        self.modules.get(name)
    }
}

/// Output of the parse phase for one module.
struct ParsedModule {
    name: String,
    source: Source,
    ast: AstNode,
}

/// Drives one compilation
pub struct Compiler<'l> {
    language: &'l dyn Language,
    locator: &'l dyn ModuleLocator,
    config: CompileConfig,
    phase: Phase,
}

impl<'l> Compiler<'l> {
    pub fn new(language: &'l dyn Language, locator: &'l dyn ModuleLocator) -> Self {
        Self {
            language,
            locator,
            config: CompileConfig::default(),
            phase: Phase::ParseAllModules,
        }
    }

    pub fn with_config(mut self, config: CompileConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &CompileConfig {
        &self.config
    }

    /// Current phase; `Done` or `Failed` once [`Compiler::compile`] returns.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Run the compilation from the configured entry module.
    ///
    /// ## Errors
    /// The first failure of any phase, attributed to a module and rendered against its source when possible.
    #[tracing::instrument(skip_all, fields(entry = %self.config.entry_module))]
    pub fn compile(&mut self) -> Result<Compilation, CompileFailure> {
        self.transition(Phase::ParseAllModules);
        let parsed = self.parse_all_modules()?;

        self.transition(Phase::AnalyzeLocal);
        let mut modules = Vec::with_capacity(parsed.len());
        for ParsedModule { name, source, ast } in parsed {
            let mut analyzer = Analyzer::new(&name, &source);
            if let Err(error) = self.language.analyze(&mut analyzer, &ast) {
                return Err(self.fail(&name, Some(&source), error));
            }
            let scopes = analyzer.finish();
            modules.push(Module {
                name,
                source,
                ast,
                scopes,
            });
        }

        self.transition(Phase::LinkLocal);
        for module in &mut modules {
            if let Err(error) = linker::link_local(&module.name, &mut module.scopes) {
                return Err(self.fail(&module.name, Some(&module.source), error));
            }
        }

        let mut table = ModuleTable::new();
        for module in modules {
            table.insert(module);
        }

        self.transition(Phase::LinkRemote);
        let mut outcomes = Vec::with_capacity(table.len());
        for module in table.iter() {
            match linker::link_remote(module, &table) {
                Ok(resolutions) => outcomes.push((module.name.clone(), resolutions)),
                Err(error) => return Err(self.fail(&module.name, Some(&module.source), error)),
            }
        }
        for (name, resolutions) in outcomes {
            if let Some(module) = table.get_mut(&name) {
                linker::apply_remote(&mut module.scopes, resolutions);
            }
        }

        self.transition(Phase::Done);
        Ok(Compilation { modules: table })
    }

    /// Read, lex and parse the entry module and everything it transitively imports, in queue order.
    fn parse_all_modules(&mut self) -> Result<Vec<ParsedModule>, CompileFailure> {
        let entry = self.config.entry_module.clone();
        let mut parsed: Vec<ParsedModule> = Vec::new();
        let mut seen: HashSet<String> = HashSet::from([entry.clone()]);
        // (module, importing module and import offset)
        let mut queue: VecDeque<(String, Option<(String, usize)>)> = VecDeque::from([(entry, None)]);

        while let Some((name, imported_from)) = queue.pop_front() {
            if parsed.len() >= self.config.max_modules {
                tracing::warn!(module = %name, limit = self.config.max_modules, "module limit reached");
                let error = CompileError::ModuleLoad {
                    module: name.clone(),
                    offset: imported_from.as_ref().map(|(_, offset)| *offset),
                    reason: format!("module limit of {} reached", self.config.max_modules),
                };
                return Err(self.fail_at_import(&parsed, &name, imported_from, error));
            }

            let offset = imported_from.as_ref().map(|(_, offset)| *offset);
            let source = match module::load_module(self.locator, &name, offset) {
                Ok(source) => source,
                Err(error) => return Err(self.fail_at_import(&parsed, &name, imported_from, error)),
            };

            let tokens = match lexer::lex(source.join(), self.language.token_rules()) {
                Ok(tokens) => tokens,
                Err(error) => return Err(self.fail(&name, Some(&source), error)),
            };
            let output =
                match parser::parse_with_locator(self.language.grammar(), Input::Tokens(&tokens), self.locator) {
                    Ok(output) => output,
                    Err(error) => return Err(self.fail(&name, Some(&source), error)),
                };

            for import in output.imports {
                if seen.insert(import.module.clone()) {
                    tracing::debug!(module = %import.module, from = %name, "queued module");
                    queue.push_back((import.module, Some((name.clone(), import.position))));
                }
            }
            parsed.push(ParsedModule {
                name,
                source,
                ast: output.ast,
            });
        }
        Ok(parsed)
    }

    /// Attribute a load failure to the importing module (where the directive is), or to `name` for the entry module.
    fn fail_at_import(
        &mut self,
        parsed: &[ParsedModule],
        name: &str,
        imported_from: Option<(String, usize)>,
        error: CompileError,
    ) -> CompileFailure {
        match imported_from {
            Some((importer, _)) => {
                let source = parsed.iter().find(|m| m.name == importer).map(|m| &m.source);
                self.fail(&importer, source, error)
            }
            None => self.fail(name, None, error),
        }
    }

    fn fail(&mut self, module: &str, source: Option<&Source>, error: CompileError) -> CompileFailure {
        let phase = self.phase;
        self.transition(Phase::Failed);
        let diagnostic = source.and_then(|source| Diagnostic::new(source, &error));
        CompileFailure {
            module: module.to_string(),
            phase,
            error,
            diagnostic,
            module_source: source.cloned(),
        }
    }

    fn transition(&mut self, next: Phase) {
        tracing::debug!(from = %self.phase, to = %next, "phase transition");
        self.phase = next;
    }
}

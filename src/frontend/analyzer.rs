//! Local analysis of one module.
//!
//! An [`Analyzer`] is driven by a language definition while it walks a module's AST. It maintains the current scope,
//! registers declarations (rejecting duplicates immediately), records references for the linker, and performs the
//! minimal assignment-driven type inference.
//!
//! ## Notes
//! - References are *deferred*: [`Analyzer::expect_local`] and [`Analyzer::expect_remote`] only record the use. The
//!   linker resolves them once every declaration of the module (or program) is known, which is what makes forward
//!   references work.
//! - Type inference is first-assignment-wins: the first assignment (or an explicit declared type) fixes a variable's
//!   type and every later assignment must match exactly.

use jay_core::lang::types::{self, PrimitiveType};
use jay_syntax::diagnostics::CompileError;
use jay_syntax::source::Source;

use crate::frontend::symbols::{FunctionInfo, ScopeId, ScopeKind, ScopeTree, SymbolKind, VariableInfo};

/// Analysis state for a single module
pub struct Analyzer<'s> {
    module: String,
    source: &'s Source,
    scopes: ScopeTree,
    current: ScopeId,
}

impl<'s> Analyzer<'s> {
    /// Start analyzing `module`, whose offsets refer to `source`.
    pub fn new(module: &str, source: &'s Source) -> Self {
        Self {
            module: module.to_string(),
            source,
            scopes: ScopeTree::new(module),
            current: ScopeId::ROOT,
        }
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn current_scope(&self) -> ScopeId {
        self.current
    }

    pub fn scopes(&self) -> &ScopeTree {
        &self.scopes
    }

    /// Enter a new child of the current scope
    pub fn enter_scope(&mut self, name: &str, kind: ScopeKind) -> ScopeId {
        self.current = self.scopes.add_child(self.current, name, kind);
        self.current
    }

    /// Exit the current scope. The module scope is never exited.
    pub fn exit_scope(&mut self) {
        if let Some(parent) = self.scopes.scope(self.current).parent {
            self.current = parent;
        }
    }

    /// Run `f` inside a fresh child scope, restoring the current scope afterwards even if `f` fails.
    pub fn in_scope<T>(
        &mut self,
        name: &str,
        kind: ScopeKind,
        f: impl FnOnce(&mut Self) -> Result<T, CompileError>,
    ) -> Result<T, CompileError> {
        let previous = self.current;
        self.enter_scope(name, kind);
        let result = f(self);
        self.current = previous;
        result
    }

    /// Declare a function in the current scope.
    ///
    /// ## Errors
    /// [`CompileError::DuplicateSymbol`] if the current scope already declares `name`.
    pub fn register_function(
        &mut self,
        name: &str,
        decl_position: usize,
        param_types: Vec<PrimitiveType>,
        return_type: Option<PrimitiveType>,
    ) -> Result<(), CompileError> {
        let kind = SymbolKind::Function(FunctionInfo {
            param_types,
            return_type,
        });
        self.register(name, kind, decl_position)
    }

    /// Declare a variable in the current scope. A declared type counts as the first assignment.
    ///
    /// ## Errors
    /// [`CompileError::DuplicateSymbol`] if the current scope already declares `name`.
    pub fn register_variable(
        &mut self,
        name: &str,
        decl_position: usize,
        ty: Option<PrimitiveType>,
    ) -> Result<(), CompileError> {
        self.register(name, SymbolKind::Variable(VariableInfo { ty }), decl_position)
    }

    fn register(&mut self, name: &str, kind: SymbolKind, decl_position: usize) -> Result<(), CompileError> {
        match self.scopes.define(self.current, name, kind, decl_position) {
            Ok(_) => Ok(()),
            Err(existing) => {
                let original_offset = self
                    .scopes
                    .symbol(existing)
                    .map_or(decl_position, |s| s.decl_position);
                let original_link = self
                    .source
                    .position_info(original_offset)
                    .map_or_else(|_| format!("offset {original_offset}"), |info| info.link());
                Err(CompileError::DuplicateSymbol {
                    name: name.to_string(),
                    offset: decl_position,
                    original_offset,
                    original_link,
                })
            }
        }
    }

    /// Record a use of `name` from the current scope, resolved during local linking.
    pub fn expect_local(&mut self, name: &str, position: usize) {
        self.scopes.add_local_ref(self.current, name, position);
    }

    /// Record a use of `module.name` from the current scope, resolved during remote linking.
    pub fn expect_remote(&mut self, module: &str, name: &str, position: usize) {
        self.scopes.add_remote_ref(self.current, module, name, position);
    }

    /// Resolve a declared type name through the primitive type registry.
    ///
    /// ## Errors
    /// [`CompileError::UnknownType`] for names the registry does not know.
    pub fn resolve_type(&self, name: &str, position: usize) -> Result<PrimitiveType, CompileError> {
        types::from_str(name).ok_or_else(|| CompileError::UnknownType {
            name: name.to_string(),
            offset: position,
        })
    }

    /// Current type of the variable `name` visible from the current scope, if it is visible and typed.
    pub fn variable_type(&self, name: &str) -> Option<PrimitiveType> {
        self.scopes
            .lookup(self.current, name)
            .and_then(|id| self.scopes.symbol(id))
            .and_then(|s| s.variable_type())
    }

    /// Apply an assignment of a value of type `value_type` (found at `value_position`) to the variable `name`.
    ///
    /// Names that are not visible variables are left alone: unresolved names are reported by the linker.
    ///
    /// ## Errors
    /// [`CompileError::TypeMismatch`] when the variable already has a different type.
    pub fn assign(
        &mut self,
        name: &str,
        value_type: Option<PrimitiveType>,
        value_position: usize,
    ) -> Result<(), CompileError> {
        let Some(value_type) = value_type else {
            return Ok(());
        };
        let Some(id) = self.scopes.lookup(self.current, name) else {
            return Ok(());
        };
        let Some(symbol) = self.scopes.symbol_mut(id) else {
            return Ok(());
        };
        let SymbolKind::Variable(info) = &mut symbol.kind else {
            return Ok(());
        };
        match info.ty {
            None => {
                tracing::trace!(variable = name, ty = %value_type, "variable type fixed by first assignment");
                info.ty = Some(value_type);
                Ok(())
            }
            Some(expected) if expected == value_type => Ok(()),
            Some(expected) => Err(CompileError::TypeMismatch {
                expected: expected.to_string(),
                found: value_type.to_string(),
                offset: value_position,
            }),
        }
    }

    /// Finish analysis and hand over the scope tree.
    pub fn finish(self) -> ScopeTree {
        self.scopes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jay_syntax::source::SourceFile;

    fn source() -> Source {
        Source::from_files([SourceFile::new("main.j", "var x = \"hi\"\nvar x = \"bye\"\n")])
    }

    #[test]
    fn test_duplicate_links_to_first_declaration() {
        let src = source();
        let mut analyzer = Analyzer::new("main", &src);
        analyzer.register_variable("x", 4, None).unwrap();
        let err = analyzer.register_variable("x", 17, None).unwrap_err();
        assert_eq!(
            err,
            CompileError::DuplicateSymbol {
                name: "x".to_string(),
                offset: 17,
                original_offset: 4,
                original_link: "main.j:1:5".to_string(),
            }
        );
        assert_eq!(err.to_string(), "symbol 'x' already defined here: (main.j:1:5)");
    }

    #[test]
    fn test_functions_and_variables_share_namespace() {
        let src = source();
        let mut analyzer = Analyzer::new("main", &src);
        analyzer.register_function("f", 5, Vec::new(), None).unwrap();
        assert!(analyzer.register_variable("f", 20, None).is_err());
    }

    #[test]
    fn test_shadowing_in_child_scope() {
        let src = source();
        let mut analyzer = Analyzer::new("main", &src);
        analyzer.register_variable("x", 4, None).unwrap();
        analyzer
            .in_scope("f", ScopeKind::Function, |a| a.register_variable("x", 17, None))
            .unwrap();
        assert_eq!(analyzer.current_scope(), ScopeId::ROOT);
        assert_eq!(analyzer.scopes().len(), 2);
    }

    #[test]
    fn test_in_scope_restores_after_failure() {
        let src = source();
        let mut analyzer = Analyzer::new("main", &src);
        let result: Result<(), _> = analyzer.in_scope("f", ScopeKind::Function, |a| {
            a.register_variable("y", 1, None)?;
            a.register_variable("y", 2, None)
        });
        assert!(result.is_err());
        assert_eq!(analyzer.current_scope(), ScopeId::ROOT);
    }

    #[test]
    fn test_first_assignment_fixes_type() {
        let src = source();
        let mut analyzer = Analyzer::new("main", &src);
        analyzer.register_variable("x", 4, None).unwrap();
        analyzer.assign("x", Some(PrimitiveType::String), 8).unwrap();
        assert_eq!(analyzer.variable_type("x"), Some(PrimitiveType::String));
        analyzer.assign("x", Some(PrimitiveType::String), 30).unwrap();
        assert_eq!(
            analyzer.assign("x", Some(PrimitiveType::Int), 40),
            Err(CompileError::TypeMismatch {
                expected: "string".to_string(),
                found: "int".to_string(),
                offset: 40,
            })
        );
    }

    #[test]
    fn test_declared_type_is_first_assignment() {
        let src = source();
        let mut analyzer = Analyzer::new("main", &src);
        analyzer.register_variable("n", 4, Some(PrimitiveType::Int)).unwrap();
        assert!(analyzer.assign("n", Some(PrimitiveType::Float), 10).is_err());
    }

    #[test]
    fn test_unknown_value_type_fixes_nothing() {
        let src = source();
        let mut analyzer = Analyzer::new("main", &src);
        analyzer.register_variable("x", 4, None).unwrap();
        analyzer.assign("x", None, 8).unwrap();
        assert_eq!(analyzer.variable_type("x"), None);
        // Not visible: left for the linker.
        analyzer.assign("missing", Some(PrimitiveType::Int), 8).unwrap();
    }

    #[test]
    fn test_resolve_type_uses_registry() {
        let src = source();
        let analyzer = Analyzer::new("main", &src);
        assert_eq!(analyzer.resolve_type("str", 0), Ok(PrimitiveType::String));
        assert_eq!(
            analyzer.resolve_type("bool", 3),
            Err(CompileError::UnknownType {
                name: "bool".to_string(),
                offset: 3,
            })
        );
    }

    #[test]
    fn test_expectations_are_recorded_on_current_scope() {
        let src = source();
        let mut analyzer = Analyzer::new("main", &src);
        let func = analyzer.enter_scope("f", ScopeKind::Function);
        analyzer.expect_local("g", 10);
        analyzer.expect_remote("util", "h", 12);
        analyzer.exit_scope();
        let scopes = analyzer.finish();
        assert_eq!(scopes.scope(func).local_refs[0].name, "g");
        assert_eq!(scopes.scope(func).remote_refs[0].module, "util");
        assert!(scopes.scope(ScopeId::ROOT).local_refs.is_empty());
    }
}

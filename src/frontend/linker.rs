//! Two-phase reference linking.
//!
//! - [`link_local`] resolves each module's deferred local references against its own scope tree, walking from the
//!   referencing scope outward through its ancestors.
//! - [`link_remote`] resolves `module.name` references against the root scopes of the other modules. It only reads
//!   the module table; the outcomes are returned and applied by the caller with [`apply_remote`].
//!
//! Both traverse scopes depth-first with children in declaration order, and references in first-use order, so the
//! reported failure is deterministic: the first offender of that traversal.

use jay_syntax::diagnostics::CompileError;

use crate::frontend::module::{Module, ModuleTable};
use crate::frontend::symbols::{RefStatus, ScopeId, ScopeTree};

/// Resolve every local reference of one module.
///
/// ## Errors
/// [`CompileError::UnresolvedSymbol`] for the first reference no enclosing scope declares. That reference is marked
/// [`RefStatus::Failed`].
#[tracing::instrument(skip_all, fields(module = module))]
pub fn link_local(module: &str, scopes: &mut ScopeTree) -> Result<(), CompileError> {
    for scope in scopes.walk() {
        for index in 0..scopes.scope(scope).local_refs.len() {
            let reference = &scopes.scope(scope).local_refs[index];
            let found = scopes
                .ancestors(scope)
                .find(|&s| scopes.lookup_local(s, &reference.name).is_some());
            let (status, error) = match found {
                Some(declared_in) => (RefStatus::Resolved(declared_in), None),
                None => (
                    RefStatus::Failed,
                    Some(CompileError::UnresolvedSymbol {
                        name: reference.name.clone(),
                        offset: reference.position,
                    }),
                ),
            };
            scopes.scope_mut(scope).local_refs[index].status = status;
            if let Some(error) = error {
                return Err(error);
            }
        }
    }
    Ok(())
}

/// Outcome for one remote reference: which scope and which entry of its `remote_refs`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteResolution {
    pub scope: ScopeId,
    pub index: usize,
    pub status: RefStatus,
}

/// Resolve every remote reference of `module` against `table`, without modifying anything.
///
/// ## Errors
/// - [`CompileError::UnknownModule`] if the referenced module was never parsed.
/// - [`CompileError::UnresolvedRemoteSymbol`] if its root scope does not declare the name.
#[tracing::instrument(skip_all, fields(module = %module.name))]
pub fn link_remote(module: &Module, table: &ModuleTable) -> Result<Vec<RemoteResolution>, CompileError> {
    let mut resolutions = Vec::new();
    for scope in module.scopes.walk() {
        for (index, reference) in module.scopes.scope(scope).remote_refs.iter().enumerate() {
            let Some(target) = table.get(&reference.module) else {
                return Err(CompileError::UnknownModule {
                    module: reference.module.clone(),
                    offset: reference.position,
                });
            };
            if target.scopes.lookup_local(ScopeId::ROOT, &reference.name).is_none() {
                return Err(CompileError::UnresolvedRemoteSymbol {
                    module: reference.module.clone(),
                    name: reference.name.clone(),
                    offset: reference.position,
                });
            }
            resolutions.push(RemoteResolution {
                scope,
                index,
                status: RefStatus::ResolvedRemote(reference.module.clone()),
            });
        }
    }
    Ok(resolutions)
}

/// Record remote outcomes on the module they were computed for.
pub fn apply_remote(scopes: &mut ScopeTree, resolutions: Vec<RemoteResolution>) {
    for resolution in resolutions {
        if let Some(reference) = scopes
            .scope_mut(resolution.scope)
            .remote_refs
            .get_mut(resolution.index)
        {
            reference.status = resolution.status;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::symbols::{ScopeKind, SymbolKind, VariableInfo};

    fn variable() -> SymbolKind {
        SymbolKind::Variable(VariableInfo { ty: None })
    }

    #[test]
    fn test_forward_reference_resolves() {
        let mut tree = ScopeTree::new("main");
        let f = tree.add_child(ScopeId::ROOT, "f", ScopeKind::Function);
        tree.add_local_ref(f, "g", 12);
        tree.define(ScopeId::ROOT, "g", variable(), 30).unwrap();

        link_local("main", &mut tree).unwrap();
        assert_eq!(tree.scope(f).local_refs[0].status, RefStatus::Resolved(ScopeId::ROOT));
    }

    #[test]
    fn test_reference_resolves_to_nearest_scope() {
        let mut tree = ScopeTree::new("main");
        let f = tree.add_child(ScopeId::ROOT, "f", ScopeKind::Function);
        let block = tree.add_child(f, "block", ScopeKind::Block);
        tree.define(ScopeId::ROOT, "x", variable(), 4).unwrap();
        tree.define(f, "x", variable(), 20).unwrap();
        tree.add_local_ref(block, "x", 40);

        link_local("main", &mut tree).unwrap();
        assert_eq!(tree.scope(block).local_refs[0].status, RefStatus::Resolved(f));
    }

    #[test]
    fn test_first_unresolved_in_traversal_order_is_reported() {
        let mut tree = ScopeTree::new("main");
        let f = tree.add_child(ScopeId::ROOT, "f", ScopeKind::Function);
        let g = tree.add_child(ScopeId::ROOT, "g", ScopeKind::Function);
        // Source order differs from traversal order on purpose.
        tree.add_local_ref(g, "late", 5);
        tree.add_local_ref(f, "early", 50);

        let err = link_local("main", &mut tree).unwrap_err();
        assert_eq!(
            err,
            CompileError::UnresolvedSymbol {
                name: "early".to_string(),
                offset: 50,
            }
        );
        assert_eq!(tree.scope(f).local_refs[0].status, RefStatus::Failed);
        assert_eq!(tree.scope(g).local_refs[0].status, RefStatus::Pending);
    }

    #[test]
    fn test_sibling_scopes_are_not_visible() {
        let mut tree = ScopeTree::new("main");
        let f = tree.add_child(ScopeId::ROOT, "f", ScopeKind::Function);
        let g = tree.add_child(ScopeId::ROOT, "g", ScopeKind::Function);
        tree.define(f, "local", variable(), 10).unwrap();
        tree.add_local_ref(g, "local", 30);
        assert!(link_local("main", &mut tree).is_err());
    }
}

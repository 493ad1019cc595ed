//! Symbol table and scope tree for one module
//!
//! Scopes live in an arena addressed by [`ScopeId`]; a scope's parent is an index, so the tree never holds
//! references into itself. Symbols live in a second arena addressed by [`SymbolId`] and each scope maps names to ids.
//!
//! Besides declarations, every scope records the references made from inside it that could not be checked when
//! they were seen (forward references and cross-module references). The linker resolves those later and marks them;
//! they are never removed.

use std::collections::HashMap;

use jay_core::lang::types::PrimitiveType;

/// Unique identifier for symbols
pub type SymbolId = usize;

/// Index of a scope in its [`ScopeTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(usize);

impl ScopeId {
    /// The module (root) scope of every tree.
    pub const ROOT: ScopeId = ScopeId(0);

    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Module,
    Function,
    Block,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionInfo {
    pub param_types: Vec<PrimitiveType>,
    pub return_type: Option<PrimitiveType>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableInfo {
    /// `None` until declared or inferred from the first assignment.
    pub ty: Option<PrimitiveType>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolKind {
    Function(FunctionInfo),
    Variable(VariableInfo),
}

/// A declared name. Functions and variables share one namespace per scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    /// Global source offset of the declared name.
    pub decl_position: usize,
    pub scope: ScopeId,
}

impl Symbol {
    pub fn is_function(&self) -> bool {
        matches!(self.kind, SymbolKind::Function(_))
    }

    /// Current type of a variable; `None` for functions and untyped variables.
    pub fn variable_type(&self) -> Option<PrimitiveType> {
        match &self.kind {
            SymbolKind::Variable(info) => info.ty,
            SymbolKind::Function(_) => None,
        }
    }
}

/// Resolution state of a deferred reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefStatus {
    Pending,
    /// Found in this scope (the referencing scope or one of its ancestors).
    Resolved(ScopeId),
    /// Found in the root scope of the named module.
    ResolvedRemote(String),
    Failed,
}

/// A use of a name that must be declared in the referencing scope or an ancestor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalRef {
    pub name: String,
    /// First use of `name` from this scope.
    pub position: usize,
    pub status: RefStatus,
}

/// A use of `module.name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteRef {
    pub module: String,
    pub name: String,
    pub position: usize,
    pub status: RefStatus,
}

/// A scope in the tree
#[derive(Debug, Clone)]
pub struct Scope {
    pub name: String,
    pub kind: ScopeKind,
    pub parent: Option<ScopeId>,
    /// Child scopes in declaration order
    pub children: Vec<ScopeId>,
    pub symbols: HashMap<String, SymbolId>,
    /// Deferred local references in first-use order, one per name
    pub local_refs: Vec<LocalRef>,
    /// Deferred remote references in first-use order, one per `module.name`
    pub remote_refs: Vec<RemoteRef>,
}

impl Scope {
    fn new(name: String, kind: ScopeKind, parent: Option<ScopeId>) -> Self {
        Self {
            name,
            kind,
            parent,
            children: Vec::new(),
            symbols: HashMap::new(),
            local_refs: Vec::new(),
            remote_refs: Vec::new(),
        }
    }
}

/// All scopes and symbols of one module.
#[derive(Debug, Clone)]
pub struct ScopeTree {
    scopes: Vec<Scope>,
    symbols: Vec<Symbol>,
}

impl ScopeTree {
    /// A tree holding only the module scope.
    pub fn new(module: &str) -> Self {
        Self {
            scopes: vec![Scope::new(module.to_string(), ScopeKind::Module, None)],
            symbols: Vec::new(),
        }
    }

    pub fn root(&self) -> ScopeId {
        ScopeId::ROOT
    }

    /// Get a scope by id. Ids are only minted by this tree.
    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0]
    }

    pub fn scope_mut(&mut self, id: ScopeId) -> &mut Scope {
        &mut self.scopes[id.0]
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Create a child of `parent`. Scopes are never reused or merged.
    pub fn add_child(&mut self, parent: ScopeId, name: &str, kind: ScopeKind) -> ScopeId {
        let id = ScopeId(self.scopes.len());
        self.scopes.push(Scope::new(name.to_string(), kind, Some(parent)));
        self.scopes[parent.0].children.push(id);
        id
    }

    /// Define a symbol in `scope`.
    ///
    /// ## Errors
    /// Returns the id of the existing symbol if `scope` already declares the name.
    pub fn define(&mut self, scope: ScopeId, name: &str, kind: SymbolKind, decl_position: usize) -> Result<SymbolId, SymbolId> {
        if let Some(&existing) = self.scopes[scope.0].symbols.get(name) {
            return Err(existing);
        }
        let id = self.symbols.len();
        self.symbols.push(Symbol {
            name: name.to_string(),
            kind,
            decl_position,
            scope,
        });
        self.scopes[scope.0].symbols.insert(name.to_string(), id);
        Ok(id)
    }

    /// Get a symbol by ID
    pub fn symbol(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id)
    }

    /// Get a mutable symbol by ID
    pub fn symbol_mut(&mut self, id: SymbolId) -> Option<&mut Symbol> {
        self.symbols.get_mut(id)
    }

    /// Look up a symbol only in `scope` (no parent lookup)
    pub fn lookup_local(&self, scope: ScopeId, name: &str) -> Option<SymbolId> {
        self.scopes[scope.0].symbols.get(name).copied()
    }

    /// Look up a symbol by name from `scope` outward through its ancestors
    pub fn lookup(&self, scope: ScopeId, name: &str) -> Option<SymbolId> {
        self.ancestors(scope).find_map(|s| self.lookup_local(s, name))
    }

    /// `scope` followed by its parent chain up to the root.
    pub fn ancestors(&self, scope: ScopeId) -> impl Iterator<Item = ScopeId> + '_ {
        std::iter::successors(Some(scope), |s| self.scopes[s.0].parent)
    }

    /// Depth-first pre-order over all scopes, children in declaration order.
    pub fn walk(&self) -> Vec<ScopeId> {
        let mut order = Vec::with_capacity(self.scopes.len());
        let mut stack = vec![ScopeId::ROOT];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.scopes[id.0].children.iter().rev());
        }
        order
    }

    /// Record a use of `name` from `scope`. Only the first use per name is kept.
    pub fn add_local_ref(&mut self, scope: ScopeId, name: &str, position: usize) {
        let refs = &mut self.scopes[scope.0].local_refs;
        if !refs.iter().any(|r| r.name == name) {
            refs.push(LocalRef {
                name: name.to_string(),
                position,
                status: RefStatus::Pending,
            });
        }
    }

    /// Record a use of `module.name` from `scope`. Only the first use per pair is kept.
    pub fn add_remote_ref(&mut self, scope: ScopeId, module: &str, name: &str, position: usize) {
        let refs = &mut self.scopes[scope.0].remote_refs;
        if !refs.iter().any(|r| r.module == module && r.name == name) {
            refs.push(RemoteRef {
                module: module.to_string(),
                name: name.to_string(),
                position,
                status: RefStatus::Pending,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variable() -> SymbolKind {
        SymbolKind::Variable(VariableInfo { ty: None })
    }

    #[test]
    fn test_scope_lookup() {
        let mut tree = ScopeTree::new("main");
        let root = tree.root();
        tree.define(root, "x", variable(), 4).unwrap();

        let func = tree.add_child(root, "f", ScopeKind::Function);
        assert!(tree.lookup(func, "x").is_some());

        tree.define(func, "y", variable(), 20).unwrap();
        assert!(tree.lookup(func, "y").is_some());

        // x still visible from the root, y not
        assert!(tree.lookup(root, "x").is_some());
        assert!(tree.lookup(root, "y").is_none());
    }

    #[test]
    fn test_duplicate_in_same_scope_returns_original() {
        let mut tree = ScopeTree::new("main");
        let first = tree.define(ScopeId::ROOT, "x", variable(), 4).unwrap();
        assert_eq!(tree.define(ScopeId::ROOT, "x", variable(), 30), Err(first));
    }

    #[test]
    fn test_shadowing_in_child_scope() {
        let mut tree = ScopeTree::new("main");
        let outer = tree.define(ScopeId::ROOT, "x", variable(), 4).unwrap();
        let block = tree.add_child(ScopeId::ROOT, "block", ScopeKind::Block);
        let inner = tree.define(block, "x", variable(), 30).unwrap();
        assert_eq!(tree.lookup(block, "x"), Some(inner));
        assert_eq!(tree.lookup(ScopeId::ROOT, "x"), Some(outer));
        assert_eq!(tree.symbol(inner).map(|s| s.scope), Some(block));
    }

    #[test]
    fn test_walk_is_depth_first_in_declaration_order() {
        let mut tree = ScopeTree::new("main");
        let f = tree.add_child(ScopeId::ROOT, "f", ScopeKind::Function);
        let g = tree.add_child(ScopeId::ROOT, "g", ScopeKind::Function);
        let f_block = tree.add_child(f, "block", ScopeKind::Block);
        assert_eq!(tree.walk(), vec![ScopeId::ROOT, f, f_block, g]);
        assert_eq!(tree.ancestors(f_block).collect::<Vec<_>>(), vec![f_block, f, ScopeId::ROOT]);
    }

    #[test]
    fn test_refs_keep_first_use() {
        let mut tree = ScopeTree::new("main");
        tree.add_local_ref(ScopeId::ROOT, "g", 10);
        tree.add_local_ref(ScopeId::ROOT, "g", 50);
        tree.add_remote_ref(ScopeId::ROOT, "util", "h", 60);
        tree.add_remote_ref(ScopeId::ROOT, "util", "h", 70);
        let scope = tree.scope(ScopeId::ROOT);
        assert_eq!(scope.local_refs.len(), 1);
        assert_eq!(scope.local_refs[0].position, 10);
        assert_eq!(scope.remote_refs.len(), 1);
        assert_eq!(scope.remote_refs[0].status, RefStatus::Pending);
    }
}

//! Modules, the module table, and module locators
//!
//! A module is a named set of source files. Locators map a module name to its files; the table collects every
//! module of one compilation in parse order (entry module first, then imports in queue order). That order is the
//! deterministic traversal order of remote linking.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use jay_syntax::ast::AstNode;
use jay_syntax::diagnostics::CompileError;
use jay_syntax::source::{ModuleLocator, Source, SourceFile};

use crate::frontend::symbols::ScopeTree;

/// An analyzed module
#[derive(Debug, Clone)]
pub struct Module {
    pub name: String,
    pub source: Source,
    pub ast: AstNode,
    pub scopes: ScopeTree,
}

/// All modules of one compilation, in parse order.
#[derive(Debug, Clone, Default)]
pub struct ModuleTable {
    modules: Vec<Module>,
    index: HashMap<String, usize>,
}

impl ModuleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a module. A module with the same name replaces the earlier entry in place.
    pub fn insert(&mut self, module: Module) {
        match self.index.get(&module.name) {
            Some(&i) => self.modules[i] = module,
            None => {
                self.index.insert(module.name.clone(), self.modules.len());
                self.modules.push(module);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Module> {
        self.index.get(name).map(|&i| &self.modules[i])
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Module> {
        self.index.get(name).map(|&i| &mut self.modules[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Module> {
        self.modules.iter()
    }

    /// Module names in parse order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.modules.iter().map(|m| m.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

/// Locate `module` and read its files into a [`Source`].
///
/// ## Parameters
/// - `offset`: where the module was imported from, attached to load errors.
///
/// ## Errors
/// [`CompileError::ModuleLoad`] if the locator does not know the module or a file cannot be read.
pub fn load_module(locator: &dyn ModuleLocator, module: &str, offset: Option<usize>) -> Result<Source, CompileError> {
    let load_error = |reason: String| CompileError::ModuleLoad {
        module: module.to_string(),
        offset,
        reason,
    };
    let paths = locator
        .locate(module)
        .ok_or_else(|| load_error("could not locate module".to_string()))?;
    let mut source = Source::new();
    for path in paths {
        let text = locator
            .read(&path)
            .map_err(|e| load_error(format!("{}: {e}", path.display())))?;
        source.push(SourceFile::new(path.display().to_string(), text));
    }
    Ok(source)
}

/// Locator backed by an explicit module name → file paths table. Reads from disk; never scans directories.
#[derive(Debug, Clone, Default)]
pub struct FileLocator {
    modules: HashMap<String, Vec<PathBuf>>,
}

impl FileLocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `module` as the given files, in order (builder style).
    pub fn with_module<P: Into<PathBuf>>(mut self, module: &str, paths: impl IntoIterator<Item = P>) -> Self {
        self.insert(module, paths);
        self
    }

    pub fn insert<P: Into<PathBuf>>(&mut self, module: &str, paths: impl IntoIterator<Item = P>) {
        self.modules
            .insert(module.to_string(), paths.into_iter().map(Into::into).collect());
    }
}

impl ModuleLocator for FileLocator {
    fn locate(&self, module: &str) -> Option<Vec<PathBuf>> {
        self.modules.get(module).cloned()
    }
}

/// Locator over in-memory buffers, for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MemoryLocator {
    modules: HashMap<String, Vec<PathBuf>>,
    files: HashMap<PathBuf, String>,
}

impl MemoryLocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a single-file module; the file is named `<module>.j`.
    pub fn with_module(self, module: &str, text: impl Into<String>) -> Self {
        let path = format!("{module}.j");
        self.with_file(module, path, text)
    }

    /// Append a file to `module` (builder style). Files of a module are joined in insertion order.
    pub fn with_file(mut self, module: &str, path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        let path = path.into();
        self.modules.entry(module.to_string()).or_default().push(path.clone());
        self.files.insert(path, text.into());
        self
    }
}

impl ModuleLocator for MemoryLocator {
    fn locate(&self, module: &str) -> Option<Vec<PathBuf>> {
        self.modules.get(module).cloned()
    }

    fn read(&self, path: &Path) -> io::Result<String> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("no buffer for {}", path.display())))
    }
}

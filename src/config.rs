//! Compilation configuration.

/// Default name of the module a compilation starts from.
pub const DEFAULT_ENTRY_MODULE: &str = "main";

/// Default upper bound on the number of modules one compilation may parse.
pub const DEFAULT_MAX_MODULES: usize = 256;

/// Compilation configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileConfig {
    /// Module the compilation starts from; imports are followed from here
    pub entry_module: String,
    /// Maximum number of modules parsed before the compilation fails
    pub max_modules: usize,
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self {
            entry_module: DEFAULT_ENTRY_MODULE.to_string(),
            max_modules: DEFAULT_MAX_MODULES,
        }
    }
}

impl CompileConfig {
    /// Create a new config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the entry module
    pub fn with_entry_module(mut self, module: impl Into<String>) -> Self {
        self.entry_module = module.into();
        self
    }

    /// Set the module limit
    pub fn with_max_modules(mut self, max: usize) -> Self {
        self.max_modules = max;
        self
    }
}

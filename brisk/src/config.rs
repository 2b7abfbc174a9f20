//! Interpreter configuration
//!
//! Built in code with the builder methods, or loaded from a TOML file:
//!
//! ```toml
//! trace = true
//! max_call_depth = 5000
//! ```

use serde::Deserialize;
use std::path::Path;

/// Default limit on nested calls before a run is aborted
pub const DEFAULT_MAX_CALL_DEPTH: usize = 10_000;

/// Interpreter configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InterpConfig {
    /// Log every executed statement at debug level
    pub trace: bool,
    /// Nested calls allowed before the run fails with a stack overflow
    pub max_call_depth: usize,
}

impl Default for InterpConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl InterpConfig {
    /// Create a configuration with defaults
    pub fn new() -> Self {
        InterpConfig {
            trace: false,
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
        }
    }

    /// Parse a configuration from TOML text
    pub fn from_toml_str(source: &str) -> crate::Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Load a configuration file
    pub fn load(path: &Path) -> crate::Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Set statement tracing
    pub fn trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    /// Set the call depth limit
    pub fn max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = depth;
        self
    }
}

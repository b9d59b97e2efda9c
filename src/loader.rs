//! The definition loader (C1) is an external collaborator: in the real
//! system it is a scripting host that evaluates the module source files
//! and exposes them as in-memory sequences. This crate only needs a
//! narrow trait over that host, plus an in-memory reference
//! implementation good enough to drive the compiler end-to-end in tests.

use std::collections::HashMap;

use crate::value::Value;

/// The three opcode-classification lists exposed by `header_operations`
/// (`spec.md` §6).
#[derive(Debug, Clone, Default)]
pub struct HeaderOperations {
    pub lhs_operations: Vec<i64>,
    pub global_lhs_operations: Vec<i64>,
    pub can_fail_operations: Vec<i64>,
}

/// Failure to evaluate a module. Per `spec.md` §7 this always maps onto
/// the `critical` diagnostic level and aborts the compile session.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{0}")]
pub struct LoaderError(pub String);

/// A narrow view of the host-side definition evaluator. One call loads
/// one named top-level sequence out of one named module.
pub trait ModuleLoader {
    /// Load the sequence named `list_name` from `module_<module_name>`.
    fn load_sequence(&self, module_name: &str, list_name: &str) -> Result<Vec<Value>, LoaderError>;

    /// `module_info.export_dir`, if the module declares one.
    fn export_dir(&self) -> Result<Option<String>, LoaderError>;

    /// `header_operations`'s three opcode-classification lists.
    fn header_operations(&self) -> Result<HeaderOperations, LoaderError>;

    /// Torn-down-and-reconstructed between pass 1 and pass 2, mirroring
    /// the source's restart of the scripting interpreter so pass-1 side
    /// effects cannot leak into pass 2. Stateless loaders can ignore this.
    fn reset(&mut self) {}
}

/// A loader backed by values supplied directly in Rust, keyed by
/// `(module_name, list_name)`. Used by the test suite and by any
/// embedder that already has the definitions in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    modules: HashMap<(String, String), Vec<Value>>,
    export_dir: Option<String>,
    header_operations: HeaderOperations,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_export_dir(mut self, dir: impl Into<String>) -> Self {
        self.export_dir = Some(dir.into());
        self
    }

    pub fn with_header_operations(mut self, ops: HeaderOperations) -> Self {
        self.header_operations = ops;
        self
    }

    /// Register `module_<module_name>`'s `list_name` sequence.
    pub fn with_module(mut self, module_name: &str, list_name: &str, items: Vec<Value>) -> Self {
        self.modules
            .insert((module_name.to_string(), list_name.to_string()), items);
        self
    }
}

impl ModuleLoader for MemoryLoader {
    fn load_sequence(&self, module_name: &str, list_name: &str) -> Result<Vec<Value>, LoaderError> {
        Ok(self
            .modules
            .get(&(module_name.to_string(), list_name.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    fn export_dir(&self) -> Result<Option<String>, LoaderError> {
        Ok(self.export_dir.clone())
    }

    fn header_operations(&self) -> Result<HeaderOperations, LoaderError> {
        Ok(self.header_operations.clone())
    }
}

//! A `ModuleLoader` backed by a single JSON manifest file, for driving
//! the `mbcc` binary without embedding the host scripting interpreter
//! the original tool relies on (that host is an external collaborator
//! this crate never implements). Grounded in the `serde`/`serde_json`
//! config-loading pattern used by `colinrozzi-runtime_v2`.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::loader::{HeaderOperations, LoaderError, ModuleLoader};
use crate::value::Value;

#[derive(Debug, Default, Deserialize)]
struct HeaderOperationsManifest {
    #[serde(default)]
    lhs_operations: Vec<i64>,
    #[serde(default)]
    global_lhs_operations: Vec<i64>,
    #[serde(default)]
    can_fail_operations: Vec<i64>,
}

#[derive(Debug, Default, Deserialize)]
struct Manifest {
    #[serde(default)]
    export_dir: Option<String>,
    #[serde(default)]
    header_operations: HeaderOperationsManifest,
    #[serde(default)]
    modules: HashMap<String, HashMap<String, Vec<Value>>>,
}

/// Loads every `module_<name>.<list>` the manifest declares. `reset()` is
/// a no-op since there is no interpreter state to tear down between
/// passes.
#[derive(Debug)]
pub struct JsonLoader {
    manifest: Manifest,
}

impl JsonLoader {
    pub fn load(path: &Path) -> Result<Self, LoaderError> {
        let text = fs::read_to_string(path).map_err(|e| LoaderError(format!("{}: {e}", path.display())))?;
        let manifest: Manifest =
            serde_json::from_str(&text).map_err(|e| LoaderError(format!("{}: {e}", path.display())))?;
        Ok(Self { manifest })
    }
}

impl ModuleLoader for JsonLoader {
    fn load_sequence(&self, module_name: &str, list_name: &str) -> Result<Vec<Value>, LoaderError> {
        Ok(self
            .manifest
            .modules
            .get(module_name)
            .and_then(|lists| lists.get(list_name))
            .cloned()
            .unwrap_or_default())
    }

    fn export_dir(&self) -> Result<Option<String>, LoaderError> {
        Ok(self.manifest.export_dir.clone())
    }

    fn header_operations(&self) -> Result<HeaderOperations, LoaderError> {
        Ok(HeaderOperations {
            lhs_operations: self.manifest.header_operations.lhs_operations.clone(),
            global_lhs_operations: self.manifest.header_operations.global_lhs_operations.clone(),
            can_fail_operations: self.manifest.header_operations.can_fail_operations.clone(),
        })
    }
}

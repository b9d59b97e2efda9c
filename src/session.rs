//! Bundles every piece of mutable compiler state for one pass of one
//! compile session, and the handful of helpers every entity emitter (C9)
//! needs: resolving IDs/resources, opening output files, and borrowing a
//! `WriteContext` for statement-block encoding.

use std::fs;
use std::path::{Path, PathBuf};

use crate::diagnostics::{Diagnostics, Level};
use crate::error::Result;
use crate::opcodes::OpcodeMetadata;
use crate::quickstrings::QuickStringPool;
use crate::registry::Registry;
use crate::resources::{ResourceKind, ResourceTracker};
use crate::value::Value;
use crate::variables::VariableTable;
use crate::writer::WriteContext;
use crate::CompileOptions;

pub struct Session {
    pub registry: Registry,
    pub globals: VariableTable,
    pub quick_strings: QuickStringPool,
    pub resources: ResourceTracker,
    pub opcodes: OpcodeMetadata,
    pub diagnostics: Diagnostics,
    pub options: CompileOptions,
    pub out_dir: PathBuf,
}

impl Session {
    pub fn new(options: CompileOptions, out_dir: PathBuf, opcodes: OpcodeMetadata) -> Self {
        Self {
            registry: Registry::new(),
            globals: VariableTable::new(),
            quick_strings: QuickStringPool::new(),
            resources: ResourceTracker::new(),
            opcodes,
            diagnostics: Diagnostics::new(options.warnings_disabled(), options.strict()),
            options,
            out_dir,
        }
    }

    /// Raise a diagnostic and map it onto the `spec.md` §7 fatality
    /// policy: `critical` always aborts, `error` aborts only under
    /// `-strict`, `warning` never does.
    pub fn raise(&mut self, level: Level, message: impl Into<String>, context: Option<String>) -> Result<()> {
        self.diagnostics.raise(level, message, context)
    }

    pub fn lookup(&mut self, prefix: &str, obj: &Value, context: &str) -> Result<i64> {
        match obj {
            Value::Int(v) => Ok(*v),
            Value::Str(name) => {
                let idx = self.registry.resolve(prefix, name, &mut self.diagnostics, context)?;
                Ok(idx as i64)
            }
            other => {
                self.raise(
                    Level::Critical,
                    format!("unrecognized identifier type {}", other.kind()),
                    Some(context.to_string()),
                )?;
                Ok(-1)
            }
        }
    }

    pub fn resource(&mut self, kind: ResourceKind, obj: &Value) -> String {
        self.resources.use_resource(kind, obj)
    }

    pub fn write_ctx(&mut self) -> WriteContext<'_> {
        WriteContext {
            registry: &mut self.registry,
            globals: &mut self.globals,
            quick_strings: &mut self.quick_strings,
            opcodes: &self.opcodes,
            diagnostics: &mut self.diagnostics,
        }
    }

    pub fn write_file(&self, name: &str, contents: &str) -> Result<()> {
        let path = self.resolve_output_path(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, contents)?;
        Ok(())
    }

    fn resolve_output_path(&self, name: &str) -> PathBuf {
        self.out_dir.join(name)
    }
}

/// Lowercase a declared entity name for registry/resource keys, mirroring
/// the `std::transform(..., ::tolower)` calls throughout the original.
pub fn lower(s: &str) -> String {
    s.to_lowercase()
}

pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    fs::create_dir_all(path)
}

//! Variable Table (C3): global and local scopes, each tracking index,
//! assignment/usage counts, and (globals only) a legacy-compat flag.
//! Ported from the `m_global_vars`/`m_local_vars` handling spread across
//! `ModuleSystem::ParseOperand` and `DoCompile` in
//! `original_source/ModuleSystem.cpp`.

use std::collections::HashMap;

use crate::diagnostics::{Diagnostics, Level};
use crate::error::Result;

#[derive(Debug, Clone, Copy, Default)]
pub struct VariableRecord {
    pub index: u32,
    pub assignments: u32,
    pub usages: u32,
    pub compat: bool,
}

/// Insertion-ordered `name -> VariableRecord` map. Both the global and
/// local tables are instances of this; only globals ever set `compat`.
#[derive(Debug, Default)]
pub struct VariableTable {
    records: HashMap<String, VariableRecord>,
    order: Vec<String>,
}

impl VariableTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.order.clear();
    }

    pub fn get(&self, name: &str) -> Option<&VariableRecord> {
        self.records.get(name)
    }

    /// Preload an entry (used to seed the global table from
    /// `variables.txt` between passes, marking it `compat = true`).
    pub fn preload(&mut self, name: &str, index: u32) {
        if !self.records.contains_key(name) {
            self.order.push(name.to_string());
            self.records.insert(
                name.to_string(),
                VariableRecord {
                    index,
                    assignments: 0,
                    usages: 0,
                    compat: true,
                },
            );
        }
    }

    /// Access a global variable by name at operand position `is_lhs_write`
    /// (true iff this is operand 1 of an opcode with LHS or GHS flags).
    /// Allocates the variable on first sight. Any write through the
    /// operand parser clears `compat` (`spec.md` §4.3).
    pub fn touch_global(&mut self, name: &str, is_lhs_write: bool) -> u32 {
        if let Some(record) = self.records.get_mut(name) {
            if is_lhs_write {
                record.assignments += 1;
            } else {
                record.usages += 1;
            }
            record.compat = false;
            record.index
        } else {
            let index = self.records.len() as u32;
            self.order.push(name.to_string());
            self.records.insert(
                name.to_string(),
                VariableRecord {
                    index,
                    assignments: is_lhs_write as u32,
                    usages: (!is_lhs_write) as u32,
                    compat: false,
                },
            );
            index
        }
    }

    /// Access a local variable by name at operand position 1 of an LHS
    /// opcode (`is_lhs_write`). First access to a name that is *not* such
    /// a write is a diagnostic ("usage of unassigned local variable"),
    /// after which the variable is inserted with `usages = 1` to avoid
    /// cascading further errors for the same name, matching
    /// `ParseOperand`'s local-variable branch.
    pub fn touch_local(
        &mut self,
        name: &str,
        is_lhs_write: bool,
        diagnostics: &mut Diagnostics,
        context: &str,
    ) -> Result<u32> {
        if let Some(record) = self.records.get_mut(name) {
            if is_lhs_write {
                record.assignments += 1;
            } else {
                record.usages += 1;
            }
            Ok(record.index)
        } else {
            let index = self.records.len() as u32;
            self.order.push(name.to_string());
            let mut record = VariableRecord {
                index,
                assignments: 1,
                usages: 0,
                compat: false,
            };
            if !is_lhs_write {
                diagnostics.raise(
                    Level::Error,
                    format!("usage of unassigned local variable :{name}"),
                    Some(context.to_string()),
                )?;
                record.usages = 1;
            }
            self.records.insert(name.to_string(), record);
            Ok(index)
        }
    }

    /// Emit in index order. `name_for` lets the caller obfuscate the
    /// textual form (e.g. `global_var_<i>`) without touching storage.
    pub fn iter_in_order(&self) -> Vec<(&str, &VariableRecord)> {
        let mut out: Vec<_> = self
            .order
            .iter()
            .map(|name| (name.as_str(), &self.records[name]))
            .collect();
        out.sort_by_key(|(_, record)| record.index);
        out
    }

    /// Warn on every local whose name doesn't start with `unused` and
    /// has zero usages, per `spec.md` §4.3 block-end rule.
    pub fn warn_unused_locals(&self, diagnostics: &mut Diagnostics, context: &str) {
        for (name, record) in self.iter_in_order() {
            if record.usages == 0 && !name.starts_with("unused") {
                diagnostics.warning(
                    format!("unused local variable :{name}"),
                    Some(context.to_string()),
                );
            }
        }
    }

    /// Warn on unassigned/unused globals that aren't legacy-compat
    /// entries, per the end-of-pass-2 walk in `DoCompile`.
    pub fn warn_unused_globals(&self, diagnostics: &mut Diagnostics) {
        for (name, record) in self.iter_in_order() {
            if !record.compat && record.assignments == 0 {
                diagnostics.warning(format!("usage of unassigned global variable ${name}"), None);
            }
            if !record.compat && record.usages == 0 {
                diagnostics.warning(format!("unused global variable ${name}"), None);
            }
        }
    }
}

//! Identifier Registry (C2): per-prefix symbolic-name → index mapping
//! plus a usage counter, and the pass-2 tag table. Ported from
//! `ModuleSystem::AddModule`/`GetId`/`GetOperandId` in
//! `original_source/ModuleSystem.cpp`.

use std::collections::HashMap;

use crate::diagnostics::{Diagnostics, Level};
use crate::error::Result;

#[derive(Debug, Default)]
struct PrefixTable {
    index: HashMap<String, u32>,
    usages: HashMap<String, u64>,
}

/// Two-level mapping `prefix -> name -> index`, with a parallel usage
/// count per name and a pass-2-only tag table per prefix.
#[derive(Debug, Default)]
pub struct Registry {
    tables: HashMap<String, PrefixTable>,
    tags: HashMap<String, u64>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `name` (lowercased) at `index` under `prefix`. Duplicate
    /// names are a warning; the first occurrence wins (`spec.md` §3).
    pub fn declare(&mut self, prefix: &str, name: &str, index: u32, diagnostics: &mut Diagnostics, context: &str) {
        let name = name.to_lowercase();
        let table = self.tables.entry(prefix.to_string()).or_default();
        if table.index.contains_key(&name) {
            diagnostics.warning(
                format!("duplicate entry {prefix}_{name}"),
                Some(context.to_string()),
            );
        } else {
            table.index.insert(name.clone(), index);
        }
        table.usages.entry(name).or_insert(0);
    }

    /// Record the tag bits for `prefix` (pass 2 only), honoring the
    /// obfuscate-tags flag except for `str`, which always keeps its tag
    /// (`spec.md` §3).
    pub fn set_tag(&mut self, prefix: &str, tag: i64, obfuscate_tags: bool) {
        if tag < 0 {
            return;
        }
        if obfuscate_tags && prefix != "str" {
            return;
        }
        self.tags.insert(prefix.to_string(), (tag as u64) << 56);
    }

    pub fn tag_bits(&self, prefix: &str) -> u64 {
        self.tags.get(prefix).copied().unwrap_or(0)
    }

    /// Lookup without incrementing the usage counter — used by emitters
    /// reading a plain identifier field (`GetId` in the original source).
    /// On a miss, raises an `error` diagnostic and returns a placeholder
    /// `0` unless `-strict` turns it fatal.
    pub fn resolve(&self, prefix: &str, name: &str, diagnostics: &mut Diagnostics, context: &str) -> Result<u32> {
        let name = name.to_lowercase();
        let found = self
            .tables
            .get(prefix)
            .and_then(|table| table.index.get(&name))
            .copied();
        match found {
            Some(idx) => Ok(idx),
            None => {
                let missing_prefix = !self.tables.contains_key(prefix);
                let message = if missing_prefix {
                    format!("unrecognized identifier prefix {prefix}")
                } else {
                    format!("unrecognized identifier {prefix}_{name}")
                };
                diagnostics.raise(Level::Error, message, Some(context.to_string()))?;
                Ok(0)
            }
        }
    }

    /// Lookup that increments the usage counter and ORs in the prefix's
    /// tag bits — used exclusively by the operand parser (`GetOperandId`
    /// in the original source). See DESIGN.md for why this is split from
    /// `resolve`.
    pub fn resolve_operand(&mut self, prefix: &str, name: &str, diagnostics: &mut Diagnostics, context: &str) -> Result<u64> {
        let name = name.to_lowercase();
        let found = self
            .tables
            .get(prefix)
            .and_then(|table| table.index.get(&name))
            .copied();
        let index = match found {
            Some(idx) => idx,
            None => {
                let missing_prefix = !self.tables.contains_key(prefix);
                let message = if missing_prefix {
                    format!("unrecognized identifier prefix {prefix}")
                } else {
                    format!("unrecognized identifier {prefix}_{name}")
                };
                diagnostics.raise(Level::Error, message, Some(context.to_string()))?;
                0
            }
        };
        if let Some(table) = self.tables.get_mut(prefix) {
            *table.usages.entry(name).or_insert(0) += 1;
        }
        Ok(index as u64 | self.tag_bits(prefix))
    }

    pub fn usage_count(&self, prefix: &str, name: &str) -> u64 {
        self.tables
            .get(prefix)
            .and_then(|t| t.usages.get(&name.to_lowercase()))
            .copied()
            .unwrap_or(0)
    }

    /// Iterate `(name, usage_count)` for every declared entry under
    /// `prefix`, used by the `-list-unreferenced-scripts` diagnostic.
    pub fn usages(&self, prefix: &str) -> Vec<(String, u64)> {
        match self.tables.get(prefix) {
            Some(table) => {
                let mut out: Vec<_> = table
                    .usages
                    .iter()
                    .map(|(name, count)| (name.clone(), *count))
                    .collect();
                out.sort();
                out
            }
            None => Vec::new(),
        }
    }

    pub fn reset(&mut self) {
        self.tables.clear();
        self.tags.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declaration_order_fixes_indices() {
        let mut diagnostics = Diagnostics::new(false, false);
        let mut registry = Registry::new();
        registry.declare("fac", "kingdom_1", 0, &mut diagnostics, "module_factions");
        registry.declare("fac", "kingdom_2", 1, &mut diagnostics, "module_factions");

        assert_eq!(registry.resolve("fac", "kingdom_1", &mut diagnostics, "").unwrap(), 0);
        assert_eq!(registry.resolve("fac", "kingdom_2", &mut diagnostics, "").unwrap(), 1);
        assert!(diagnostics.entries().is_empty());
    }

    #[test]
    fn duplicate_declaration_warns_and_keeps_first() {
        let mut diagnostics = Diagnostics::new(false, false);
        let mut registry = Registry::new();
        registry.declare("trp", "recruit", 0, &mut diagnostics, "module_troops");
        registry.declare("trp", "recruit", 1, &mut diagnostics, "module_troops");

        assert_eq!(registry.resolve("trp", "recruit", &mut diagnostics, "").unwrap(), 0);
        assert_eq!(diagnostics.entries().len(), 1);
        assert_eq!(diagnostics.entries()[0].level, Level::Warning);
    }

    #[test]
    fn unresolved_name_raises_error_and_returns_placeholder() {
        let mut diagnostics = Diagnostics::new(false, false);
        let registry = Registry::new();
        let result = registry.resolve("fac", "does_not_exist", &mut diagnostics, "ctx").unwrap();
        assert_eq!(result, 0);
        assert_eq!(diagnostics.entries()[0].level, Level::Error);
    }

    #[test]
    fn tag_bits_are_ored_into_operand_resolution() {
        let mut diagnostics = Diagnostics::new(false, false);
        let mut registry = Registry::new();
        registry.declare("itm", "sword", 3, &mut diagnostics, "module_items");
        registry.set_tag("itm", 4, false);

        let encoded = registry.resolve_operand("itm", "sword", &mut diagnostics, "ctx").unwrap();
        assert_eq!(encoded, 3 | (4u64 << 56));
        assert_eq!(registry.usage_count("itm", "sword"), 1);
    }
}

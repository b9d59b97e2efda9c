//! Quick String Pool (C4): interns `@"..."` operand text with a
//! deterministic auto-generated key. Ported from the `@`-branch of
//! `ModuleSystem::ParseOperand` in `original_source/ModuleSystem.cpp`;
//! behavior and the iteration order (grow prefix length first, then add
//! a numeric suffix) are specified in `spec.md` §4.7 and must be
//! preserved exactly — it is the one fixed-point loop in the whole
//! compiler.

use std::collections::HashMap;

use crate::encode::{encode_full, encode_str};

#[derive(Debug, Clone)]
pub struct QuickStringRecord {
    pub index: u32,
    pub value: String,
}

#[derive(Debug, Default)]
pub struct QuickStringPool {
    entries: HashMap<String, QuickStringRecord>,
    order: Vec<String>,
}

impl QuickStringPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Intern `raw` (the text following the leading `@`) and return its
    /// pool index. Implements the auto-ID algorithm of `spec.md` §4.7:
    /// grow the prefix length first, then fall back to a numeric suffix.
    pub fn intern(&mut self, raw: &str) -> u32 {
        let id = encode_full(raw);
        let text = encode_str(raw);

        let mut len = 20.min(id.len());
        let mut auto_id;
        loop {
            auto_id = format!("qstr_{}", &id[..len]);
            len += 1;
            if len > id.len() {
                break;
            }
            let collides = matches!(self.entries.get(&auto_id), Some(existing) if existing.value != text);
            if !collides {
                break;
            }
        }

        if len > id.len() {
            let base = auto_id.clone();
            let mut candidate = base.clone();
            let mut i = 1u32;
            while matches!(self.entries.get(&candidate), Some(existing) if existing.value != text) {
                candidate = format!("{base}{i}");
                i += 1;
            }
            auto_id = candidate;
        }

        if let Some(existing) = self.entries.get(&auto_id) {
            return existing.index;
        }

        let index = self.entries.len() as u32;
        self.order.push(auto_id.clone());
        self.entries.insert(auto_id, QuickStringRecord { index, value: text });
        index
    }

    /// Dump the pool in allocation order, for `quick_strings.txt`.
    pub fn iter_in_order(&self) -> impl Iterator<Item = (&str, &QuickStringRecord)> {
        self.order.iter().map(|key| (key.as_str(), &self.entries[key]))
    }

    pub fn reset(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distinct_punctuation_never_collides() {
        let mut pool = QuickStringPool::new();
        let a = pool.intern("Attack!");
        let b = pool.intern("Attack.");
        assert_ne!(a, b);
        let order: Vec<_> = pool.iter_in_order().map(|(k, _)| k.to_string()).collect();
        assert_eq!(order, vec!["qstr_Attack!", "qstr_Attack."]);
    }

    #[test]
    fn identical_text_reuses_entry() {
        let mut pool = QuickStringPool::new();
        let a = pool.intern("Hello there");
        let b = pool.intern("Hello there");
        assert_eq!(a, b);
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn long_shared_prefix_disambiguates_by_growth() {
        let mut pool = QuickStringPool::new();
        let a = pool.intern("this text is over twenty chars one");
        let b = pool.intern("this text is over twenty chars two");
        assert_ne!(a, b);
    }
}

//! Resource Tracker (C5): per-resource-kind name → reference-count map.
//! Ported from `ModuleSystem::GetResource` in
//! `original_source/ModuleSystem.cpp`.

use std::collections::HashMap;

use crate::encode::encode_res;
use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Mesh,
    Material,
    Skeleton,
    Body,
    Animation,
}

impl ResourceKind {
    pub fn label(&self) -> &'static str {
        match self {
            ResourceKind::Mesh => "mesh",
            ResourceKind::Material => "material",
            ResourceKind::Skeleton => "skeleton",
            ResourceKind::Body => "body",
            ResourceKind::Animation => "animation",
        }
    }

    pub const ALL: [ResourceKind; 5] = [
        ResourceKind::Mesh,
        ResourceKind::Material,
        ResourceKind::Skeleton,
        ResourceKind::Body,
        ResourceKind::Animation,
    ];
}

#[derive(Debug, Default)]
pub struct ResourceTracker {
    counts: HashMap<ResourceKind, HashMap<String, u64>>,
}

impl ResourceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize and track one resource reference, returning the
    /// normalized text for the caller to emit. Numeric references pass
    /// through untracked; `"0"`/`"none"` are never counted
    /// (`spec.md` §4.8).
    pub fn use_resource(&mut self, kind: ResourceKind, raw: &Value) -> String {
        match raw {
            Value::Str(s) => {
                let normalized = encode_res(s);
                if normalized != "0" && normalized != "none" {
                    *self
                        .counts
                        .entry(kind)
                        .or_default()
                        .entry(normalized.clone())
                        .or_insert(0) += 1;
                }
                normalized
            }
            other => other.to_string(),
        }
    }

    pub fn iter_kind(&self, kind: ResourceKind) -> Vec<(&str, u64)> {
        match self.counts.get(&kind) {
            Some(map) => {
                let mut out: Vec<_> = map.iter().map(|(name, count)| (name.as_str(), *count)).collect();
                out.sort();
                out
            }
            None => Vec::new(),
        }
    }

    pub fn reset(&mut self) {
        self.counts.clear();
    }
}

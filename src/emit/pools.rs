//! `quick_strings.txt`, `variables.txt` and `resource_usage.txt`.
//! Grounded in `WriteQuickStrings`, `WriteGlobalVars`, and the
//! `-list-resources` block of `ModuleSystem::Compile` in
//! `original_source/ModuleSystem.cpp`.

use std::fmt::Write as _;

use crate::error::Result;
use crate::resources::ResourceKind;
use crate::session::Session;

pub fn write_quick_strings(session: &mut Session) -> Result<()> {
    let mut out = String::new();
    let _ = writeln!(out, "{}", session.quick_strings.len());
    for (key, record) in session.quick_strings.iter_in_order() {
        let _ = writeln!(out, "{key} {}", record.value);
    }
    session.write_file("quick_strings.txt", &out)
}

pub fn write_global_vars(session: &mut Session) -> Result<()> {
    let obfuscate = session.options.obfuscate_global_vars();
    let mut out = String::new();
    for (i, (name, _record)) in session.globals.iter_in_order().into_iter().enumerate() {
        if obfuscate {
            let _ = writeln!(out, "global_var_{i}");
        } else {
            let _ = writeln!(out, "{name}");
        }
    }
    session.write_file("variables.txt", &out)
}

pub fn write_resource_usage(session: &mut Session) -> Result<()> {
    if !session.options.list_resources() {
        return Ok(());
    }

    let mut out = String::new();
    for kind in ResourceKind::ALL {
        let label = match kind {
            ResourceKind::Mesh => "Meshes",
            ResourceKind::Material => "Materials",
            ResourceKind::Skeleton => "Skeleton Models",
            ResourceKind::Body => "Bodies",
            ResourceKind::Animation => "Skeleton Animations",
        };
        let _ = writeln!(out, "== {label} ==");
        for (name, count) in session.resources.iter_kind(kind) {
            let _ = writeln!(out, "{name} {count}");
        }
        out.push('\n');
    }

    session.write_file("resource_usage.txt", &out)
}

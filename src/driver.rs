//! Driver (C10): two-pass compile orchestration. Ported from
//! `ModuleSystem::Compile`/`DoCompile`/`AddModule` in
//! `original_source/ModuleSystem.cpp`.
//!
//! Pass 1 (skipped under `-skip-id-files`) walks every module purely to
//! emit `ID_<name>.py` id-files, then the loader is reset so no pass-1
//! state leaks into pass 2. Pass 2 registers every entity in the
//! identifier registry, loads the legacy-compat global-variable table
//! from `variables.txt`, and runs every entity emitter in the fixed
//! order the original writes its output files.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use crate::diagnostics::Level;
use crate::emit::{catalog, dialogs, factions, items, parties, pools, scenes, scripts, skins, sounds, triggers, troops};
use crate::error::Result;
use crate::loader::{HeaderOperations, ModuleLoader};
use crate::opcodes::OpcodeMetadata;
use crate::session::Session;
use crate::value::Value;
use crate::CompileOptions;

struct ModuleSpec {
    module_name: &'static str,
    list_name: &'static str,
    prefix: &'static str,
    id_name: &'static str,
    id_prefix: &'static str,
    tag: i64,
}

/// Declaration order mirrors `DoCompile`'s `AddModule` call sequence
/// exactly, not the (different) order the entities are later written in.
const MODULES: &[ModuleSpec] = &[
    ModuleSpec { module_name: "animations", list_name: "animations", prefix: "anim", id_name: "animations", id_prefix: "anim", tag: 25 },
    ModuleSpec { module_name: "dialogs", list_name: "dialogs", prefix: "", id_name: "dialogs", id_prefix: "", tag: 0 },
    ModuleSpec { module_name: "factions", list_name: "factions", prefix: "fac", id_name: "factions", id_prefix: "fac", tag: 6 },
    ModuleSpec { module_name: "game_menus", list_name: "game_menus", prefix: "menu", id_name: "menus", id_prefix: "menu", tag: 12 },
    ModuleSpec { module_name: "info_pages", list_name: "info_pages", prefix: "ip", id_name: "info_pages", id_prefix: "ip", tag: 0 },
    ModuleSpec { module_name: "items", list_name: "items", prefix: "itm", id_name: "items", id_prefix: "itm", tag: 4 },
    ModuleSpec { module_name: "map_icons", list_name: "map_icons", prefix: "icon", id_name: "map_icons", id_prefix: "icon", tag: 18 },
    ModuleSpec { module_name: "meshes", list_name: "meshes", prefix: "mesh", id_name: "meshes", id_prefix: "mesh", tag: 20 },
    ModuleSpec { module_name: "music", list_name: "tracks", prefix: "track", id_name: "music", id_prefix: "track", tag: 23 },
    ModuleSpec { module_name: "mission_templates", list_name: "mission_templates", prefix: "mt", id_name: "mission_templates", id_prefix: "mst", tag: 11 },
    ModuleSpec { module_name: "particle_systems", list_name: "particle_systems", prefix: "psys", id_name: "particle_systems", id_prefix: "psys", tag: 14 },
    ModuleSpec { module_name: "parties", list_name: "parties", prefix: "p", id_name: "parties", id_prefix: "p", tag: 9 },
    ModuleSpec { module_name: "party_templates", list_name: "party_templates", prefix: "pt", id_name: "party_templates", id_prefix: "pt", tag: 8 },
    ModuleSpec { module_name: "postfx", list_name: "postfx_params", prefix: "pfx", id_name: "postfx_params", id_prefix: "pfx", tag: 0 },
    ModuleSpec { module_name: "presentations", list_name: "presentations", prefix: "prsnt", id_name: "presentations", id_prefix: "prsnt", tag: 21 },
    ModuleSpec { module_name: "quests", list_name: "quests", prefix: "qst", id_name: "quests", id_prefix: "qst", tag: 7 },
    ModuleSpec { module_name: "scene_props", list_name: "scene_props", prefix: "spr", id_name: "scene_props", id_prefix: "spr", tag: 15 },
    ModuleSpec { module_name: "scenes", list_name: "scenes", prefix: "scn", id_name: "scenes", id_prefix: "scn", tag: 10 },
    ModuleSpec { module_name: "scripts", list_name: "scripts", prefix: "script", id_name: "scripts", id_prefix: "script", tag: 13 },
    ModuleSpec { module_name: "simple_triggers", list_name: "simple_triggers", prefix: "", id_name: "simple_triggers", id_prefix: "", tag: 0 },
    ModuleSpec { module_name: "skills", list_name: "skills", prefix: "skl", id_name: "skills", id_prefix: "skl", tag: 19 },
    ModuleSpec { module_name: "skins", list_name: "skins", prefix: "", id_name: "skins", id_prefix: "", tag: 0 },
    ModuleSpec { module_name: "sounds", list_name: "sounds", prefix: "snd", id_name: "sounds", id_prefix: "snd", tag: 16 },
    ModuleSpec { module_name: "strings", list_name: "strings", prefix: "str", id_name: "strings", id_prefix: "str", tag: 3 },
    ModuleSpec { module_name: "tableau_materials", list_name: "tableaus", prefix: "tableau", id_name: "tableau_materials", id_prefix: "tableau", tag: 24 },
    ModuleSpec { module_name: "triggers", list_name: "triggers", prefix: "", id_name: "triggers", id_prefix: "", tag: 0 },
    ModuleSpec { module_name: "troops", list_name: "troops", prefix: "trp", id_name: "troops", id_prefix: "trp", tag: 5 },
];

const MODULE_DATA_MODULES: &[ModuleSpec] = &[
    ModuleSpec { module_name: "flora_kinds", list_name: "fauna_kinds", prefix: "", id_name: "flora_kinds", id_prefix: "", tag: 0 },
    ModuleSpec { module_name: "skyboxes", list_name: "skyboxes", prefix: "", id_name: "skyboxes", id_prefix: "", tag: 0 },
    ModuleSpec { module_name: "ground_specs", list_name: "ground_specs", prefix: "", id_name: "ground_specs", id_prefix: "", tag: 0 },
];

/// Run both compile passes over `loader` and return the session the
/// emitted output was produced with (its accumulated `diagnostics` are
/// the caller's compile report).
pub fn compile<L: ModuleLoader>(loader: &mut L, options: CompileOptions) -> Result<Session> {
    let in_dir = options.in_path.clone().unwrap_or_else(|| PathBuf::from("."));
    let out_dir = resolve_out_dir(loader, &options)?;

    if !options.skip_id_files() {
        let opcodes = OpcodeMetadata::initialize(&HeaderOperations::default());
        let mut pass1 = Session::new(options.clone(), out_dir.clone(), opcodes);
        register_all(loader, &mut pass1, 1, Some(&in_dir))?;
        loader.reset();
    }

    let header_operations = loader.header_operations()?;
    let opcodes = OpcodeMetadata::initialize(&header_operations);
    let mut session = Session::new(options, out_dir.clone(), opcodes);
    preload_compat_globals(&mut session, &out_dir)?;

    let lists = register_all(loader, &mut session, 2, None)?;
    emit_all(&mut session, &lists)?;

    session.globals.warn_unused_globals(&mut session.diagnostics);

    if session.options.list_unreferenced_scripts() {
        for (name, count) in session.registry.usages("script") {
            if count == 0 && !name.starts_with("game_") && !name.starts_with("wse_") {
                session.diagnostics.warning(format!("unreferenced script {name}"), None);
            }
        }
    }

    pools::write_resource_usage(&mut session)?;

    Ok(session)
}

fn resolve_out_dir<L: ModuleLoader>(loader: &L, options: &CompileOptions) -> Result<PathBuf> {
    if let Some(path) = &options.out_path {
        return Ok(path.clone());
    }
    match loader.export_dir()? {
        Some(dir) if !dir.trim().is_empty() => Ok(PathBuf::from(dir.trim())),
        _ => Ok(PathBuf::from(".")),
    }
}

/// Seed the global-variable table from a preexisting `variables.txt`
/// (checked first in the working directory, then the output directory),
/// marking every loaded name `compat = true` so pass 2 doesn't flag them
/// as newly unassigned. Skipped entirely under `-obfuscate-global-vars`.
fn preload_compat_globals(session: &mut Session, out_dir: &Path) -> Result<()> {
    if session.options.obfuscate_global_vars() {
        return Ok(());
    }

    let candidates = [PathBuf::from("variables.txt"), out_dir.join("variables.txt")];
    for path in candidates {
        if let Ok(contents) = fs::read_to_string(&path) {
            let mut next_index = 0u32;
            for name in contents.split_whitespace() {
                if session.globals.get(name).is_none() {
                    session.globals.preload(name, next_index);
                    next_index += 1;
                }
            }
            break;
        }
    }
    Ok(())
}

/// Register every module in `DoCompile`'s order, returning each module's
/// loaded list keyed by module name for pass 2's emitters to consume.
fn register_all<L: ModuleLoader>(
    loader: &mut L,
    session: &mut Session,
    pass: u8,
    in_dir: Option<&Path>,
) -> Result<HashMap<&'static str, Vec<Value>>> {
    let mut lists = HashMap::new();

    for spec in MODULES {
        let items = register_module(loader, session, spec, pass, in_dir)?;
        lists.insert(spec.module_name, items);
    }

    if session.options.compile_module_data() {
        for spec in MODULE_DATA_MODULES {
            let items = register_module(loader, session, spec, pass, in_dir)?;
            lists.insert(spec.module_name, items);
        }
    }

    Ok(lists)
}

fn register_module<L: ModuleLoader>(
    loader: &mut L,
    session: &mut Session,
    spec: &ModuleSpec,
    pass: u8,
    in_dir: Option<&Path>,
) -> Result<Vec<Value>> {
    let items = loader.load_sequence(spec.module_name, spec.list_name)?;
    let module_name_full = format!("module_{}", spec.module_name);

    if spec.prefix.is_empty() {
        return Ok(items);
    }

    let mut names = Vec::with_capacity(items.len());
    for item in &items {
        let name = match item {
            Value::Seq(seq) if !seq.is_empty() => match &seq[0] {
                Value::Str(s) => s.to_lowercase(),
                other => {
                    session.diagnostics.raise(
                        Level::Critical,
                        format!("unrecognized list format for {}", spec.list_name),
                        Some(module_name_full.clone()),
                    )?;
                    other.to_string()
                }
            },
            _ => {
                session.diagnostics.raise(
                    Level::Critical,
                    format!("unrecognized list format for {}", spec.list_name),
                    Some(module_name_full.clone()),
                )?;
                String::new()
            }
        };
        names.push(name);
    }

    if pass == 2 {
        for (i, name) in names.iter().enumerate() {
            session
                .registry
                .declare(spec.prefix, name, i as u32, &mut session.diagnostics, &module_name_full);
        }
        if spec.tag > 0 {
            session.registry.set_tag(spec.prefix, spec.tag, session.options.obfuscate_tags());
        }
    }

    if pass == 1 && !session.options.skip_id_files() {
        if let Some(dir) = in_dir {
            let mut out = String::new();
            for (i, name) in names.iter().enumerate() {
                let _ = writeln!(out, "{}_{name} = {i}", spec.id_prefix);
            }
            fs::create_dir_all(dir)?;
            fs::write(dir.join(format!("ID_{}.py", spec.id_name)), out)?;
        }
    }

    Ok(items)
}

fn emit_all(session: &mut Session, lists: &HashMap<&'static str, Vec<Value>>) -> Result<()> {
    let get = |name: &str| lists.get(name).map(Vec::as_slice).unwrap_or(&[]);

    catalog::write_strings(session, get("strings"))?;
    catalog::write_skills(session, get("skills"))?;
    catalog::write_music(session, get("music"))?;
    catalog::write_animations(session, get("animations"))?;
    catalog::write_meshes(session, get("meshes"))?;
    sounds::write_sounds(session, get("sounds"))?;
    skins::write_skins(session, get("skins"))?;
    catalog::write_map_icons(session, get("map_icons"))?;
    factions::write_factions(session, get("factions"))?;
    items::write_items(session, get("items"))?;
    scenes::write_scenes(session, get("scenes"))?;
    troops::write_troops(session, get("troops"))?;
    scenes::write_particle_systems(session, get("particle_systems"))?;
    scenes::write_scene_props(session, get("scene_props"))?;
    scenes::write_tableaus(session, get("tableau_materials"))?;
    scenes::write_presentations(session, get("presentations"))?;
    parties::write_party_templates(session, get("party_templates"))?;
    parties::write_parties(session, get("parties"))?;
    catalog::write_quests(session, get("quests"))?;
    catalog::write_info_pages(session, get("info_pages"))?;
    scripts::write_scripts(session, get("scripts"))?;
    triggers::write_mission_templates(session, get("mission_templates"))?;
    triggers::write_menus(session, get("game_menus"))?;

    let simple_triggers_block = Value::Seq(lists.get("simple_triggers").cloned().unwrap_or_default());
    triggers::write_simple_triggers(session, &simple_triggers_block)?;
    let triggers_block = Value::Seq(lists.get("triggers").cloned().unwrap_or_default());
    triggers::write_triggers(session, &triggers_block)?;

    dialogs::write_dialogs(session, get("dialogs"))?;
    catalog::write_postfx(session, get("postfx"))?;

    if session.options.compile_module_data() {
        catalog::write_flora_kinds(session, get("flora_kinds"))?;
        catalog::write_skyboxes(session, get("skyboxes"))?;
        catalog::write_ground_specs(session, get("ground_specs"))?;
    }

    pools::write_quick_strings(session)?;
    pools::write_global_vars(session)?;

    Ok(())
}

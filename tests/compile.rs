//! End-to-end compile scenarios, driving `mbcompiler::compile` through a
//! `MemoryLoader` and asserting on the generated output files the way a
//! module author would read them back.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};

use mbcompiler::loader::MemoryLoader;
use mbcompiler::options::Flags;
use mbcompiler::value::Value;
use mbcompiler::CompileOptions;

fn str(s: &str) -> Value {
    Value::Str(s.to_string())
}

fn seq(values: Vec<Value>) -> Value {
    Value::Seq(values)
}

static COUNTER: AtomicU32 = AtomicU32::new(0);

/// A scratch output directory, unique per test, cleaned up on drop.
struct ScratchDir(PathBuf);

impl ScratchDir {
    fn new(label: &str) -> Self {
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        let path = std::env::temp_dir().join(format!("mbcompiler-test-{label}-{}-{n}", std::process::id()));
        fs::create_dir_all(&path).unwrap();
        Self(path)
    }

    fn path(&self) -> &Path {
        &self.0
    }

    fn read(&self, name: &str) -> String {
        fs::read_to_string(self.0.join(name)).unwrap_or_else(|e| panic!("reading {name}: {e}"))
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.0);
    }
}

fn options(flags: Flags, out_dir: &Path) -> CompileOptions {
    CompileOptions {
        flags: flags | Flags::SKIP_ID_FILES,
        in_path: None,
        out_path: Some(out_dir.to_path_buf()),
    }
}

// S1: a single string entry produces the expected strings.txt line.
#[test]
fn strings_round_trip() {
    let out = ScratchDir::new("strings");
    let mut loader = MemoryLoader::new().with_module(
        "strings",
        "strings",
        vec![seq(vec![str("hello"), str("Hello, World")])],
    );

    mbcompiler::compile(&mut loader, options(Flags::empty(), out.path())).unwrap();

    let contents = out.read("strings.txt");
    let lines: Vec<_> = contents.lines().collect();
    assert_eq!(lines[0], "stringsfile version 1");
    assert_eq!(lines[1], "1");
    assert_eq!(lines[2].trim_end(), "str_hello Hello,_World");
}

// S4 / P7: one-sided faction relation mirrors into the other row, and the
// diagonal holds each faction's self-relation.
#[test]
fn faction_relation_mirrors_and_diagonal_is_self_relation() {
    let out = ScratchDir::new("factions");
    let f0 = seq(vec![
        str("kingdom_1"),
        str("Kingdom One"),
        Value::Int(0),
        Value::Float(1.0),
        seq(vec![seq(vec![str("fac_kingdom_2"), Value::Float(-0.5)])]),
    ]);
    let f1 = seq(vec![
        str("kingdom_2"),
        str("Kingdom Two"),
        Value::Int(0),
        Value::Float(1.0),
        seq(vec![]),
    ]);
    let mut loader = MemoryLoader::new().with_module("factions", "factions", vec![f0, f1]);

    mbcompiler::compile(&mut loader, options(Flags::empty(), out.path())).unwrap();

    let contents = out.read("factions.txt");
    let lines: Vec<_> = contents.lines().collect();
    // header, count, then one row per faction.
    assert_eq!(lines[1], "2");
    let row0: Vec<&str> = lines[2].split_whitespace().collect();
    let row1: Vec<&str> = lines[3].split_whitespace().collect();

    // fac_<name> color relation[0] relation[1] ...
    assert_eq!(row0[0], "fac_kingdom_1");
    assert_eq!(row1[0], "fac_kingdom_2");

    // column indices of the two relation entries (after name/display/color/flags).
    let relations0: Vec<f64> = row0[4..6].iter().map(|s| s.parse().unwrap()).collect();
    let relations1: Vec<f64> = row1[4..6].iter().map(|s| s.parse().unwrap()).collect();

    assert_eq!(relations0[0], 1.0); // self-relation on the diagonal
    assert_eq!(relations0[1], -0.5); // declared relation to kingdom_2
    assert_eq!(relations1[0], -0.5); // mirrored into the undeclared direction
    assert_eq!(relations1[1], 1.0);
}

// S6: body armor difficulty recompute under -rusmod_rebalanser.
#[test]
fn rusmod_rebalanser_recomputes_body_armor_difficulty() {
    let out = ScratchDir::new("items");
    // item_stats: weight byte (bits 24-31) = 64 -> 64 * 0.25 = 16.0
    let item_stats = 64i64 << 24;
    let item = seq(vec![
        str("plate_armor"),
        str("Plate Armor"),
        seq(vec![]),
        Value::Int(0xD), // item type: body armor
        Value::Int(0),
        Value::Int(0),
        Value::Int(item_stats),
        Value::Int(0),
    ]);
    let mut loader = MemoryLoader::new().with_module("items", "items", vec![item]);

    mbcompiler::compile(&mut loader, options(Flags::RUSMOD_REBALANSER, out.path())).unwrap();

    let contents = out.read("item_kinds1.txt");
    let body = contents.lines().nth(2).unwrap();
    let fields: Vec<&str> = body.split_whitespace().collect();
    // weight abundance head_armor body_armor leg_armor difficulty ...
    let difficulty_idx = fields.iter().position(|f| *f == "16").unwrap() + 5;
    assert_eq!(fields[difficulty_idx], "11");
}

// Without the rebalancer flag the packed difficulty passes through
// unchanged (P6: pack/unpack is the identity outside the override).
#[test]
fn item_stats_pack_unpack_identity_without_rebalancer() {
    let out = ScratchDir::new("items-plain");
    // weight=16.0 (bits 24-31 = 64), difficulty=30 (bits 32-39 = 30)
    let item_stats = (64i64 << 24) | (30i64 << 32);
    let item = seq(vec![
        str("plate_armor"),
        str("Plate Armor"),
        seq(vec![]),
        Value::Int(0xD),
        Value::Int(0),
        Value::Int(0),
        Value::Int(item_stats),
        Value::Int(0),
    ]);
    let mut loader = MemoryLoader::new().with_module("items", "items", vec![item]);

    mbcompiler::compile(&mut loader, options(Flags::empty(), out.path())).unwrap();

    let contents = out.read("item_kinds1.txt");
    let body = contents.lines().nth(2).unwrap();
    let fields: Vec<&str> = body.split_whitespace().collect();
    let weight_idx = fields.iter().position(|f| *f == "16").unwrap();
    assert_eq!(fields[weight_idx + 5], "30");
}

// P4: a global referenced in a script survives into variables.txt; one
// that's merely preloaded from a stale compat file but never touched does
// not (it isn't compat here, so the unassigned/unused warnings fire, but
// the preload path itself is exercised by a second compile over the same
// output directory).
#[test]
fn referenced_global_variable_is_retained() {
    let out = ScratchDir::new("globals");
    // opcode 30 is an LHS opcode; "$counter" is assigned then read.
    let script = seq(vec![
        str("script_use_counter"),
        seq(vec![
            seq(vec![Value::Int(30), str("$counter"), Value::Int(1)]),
            seq(vec![Value::Int(31), str("$counter")]),
        ]),
    ]);
    let mut loader = MemoryLoader::new()
        .with_module("scripts", "scripts", vec![script])
        .with_header_operations(mbcompiler::loader::HeaderOperations {
            lhs_operations: vec![30],
            global_lhs_operations: vec![30],
            can_fail_operations: vec![],
        });

    mbcompiler::compile(&mut loader, options(Flags::empty(), out.path())).unwrap();

    let contents = out.read("variables.txt");
    assert!(contents.lines().any(|l| l == "counter"));
}

// P5: rerunning the compile over unchanged inputs produces byte-identical
// output files.
#[test]
fn repeated_compiles_are_byte_identical() {
    let out_a = ScratchDir::new("stable-a");
    let out_b = ScratchDir::new("stable-b");
    let make_loader = || {
        MemoryLoader::new().with_module(
            "factions",
            "factions",
            vec![seq(vec![str("neutral"), str("Neutral"), Value::Int(0), Value::Float(0.0), seq(vec![])])],
        )
    };

    let mut loader_a = make_loader();
    mbcompiler::compile(&mut loader_a, options(Flags::empty(), out_a.path())).unwrap();
    let mut loader_b = make_loader();
    mbcompiler::compile(&mut loader_b, options(Flags::empty(), out_b.path())).unwrap();

    assert_eq!(out_a.read("factions.txt"), out_b.read("factions.txt"));
}

// Boundary: item variation count beyond 16 is truncated, with a warning
// (not a fatal diagnostic).
#[test]
fn item_variation_count_over_16_is_truncated_with_warning() {
    let out = ScratchDir::new("variations");
    let variations: Vec<Value> = (0..17).map(|i| seq(vec![str("mesh"), Value::Int(i)])).collect();
    let item = seq(vec![
        str("arrow"),
        str("Arrow"),
        seq(variations),
        Value::Int(0),
        Value::Int(0),
        Value::Int(0),
        Value::Int(0),
        Value::Int(0),
    ]);
    let mut loader = MemoryLoader::new().with_module("items", "items", vec![item]);

    let session = mbcompiler::compile(&mut loader, options(Flags::empty(), out.path())).unwrap();

    assert!(session
        .diagnostics
        .entries()
        .iter()
        .any(|d| d.message == "item variation count exceeds 16"));
    let contents = out.read("item_kinds1.txt");
    let body = contents.lines().nth(2).unwrap();
    assert!(body.split_whitespace().any(|f| f == "16"));
}

// -obfuscate-global-vars renames every global in variables.txt but keeps
// the declaration count and order stable.
#[test]
fn obfuscated_global_vars_are_renamed_by_position() {
    let out = ScratchDir::new("obfuscate");
    let script = seq(vec![
        str("cf_script_set_two_globals"),
        seq(vec![
            seq(vec![Value::Int(30), str("$alpha"), Value::Int(1)]),
            seq(vec![Value::Int(30), str("$beta"), Value::Int(2)]),
        ]),
    ]);
    let mut loader = MemoryLoader::new()
        .with_module("scripts", "scripts", vec![script])
        .with_header_operations(mbcompiler::loader::HeaderOperations {
            lhs_operations: vec![30],
            global_lhs_operations: vec![30],
            can_fail_operations: vec![],
        });

    mbcompiler::compile(&mut loader, options(Flags::OBFUSCATE_GLOBAL_VARS, out.path())).unwrap();

    let contents = out.read("variables.txt");
    let names: Vec<&str> = contents.lines().collect();
    assert_eq!(names, vec!["global_var_0", "global_var_1"]);
}

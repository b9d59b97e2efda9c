//! Entity Emitters (C9): one function per output file, each walking a
//! loaded top-level sequence and writing the exact text format the game
//! reads. Grounded line-for-line in the corresponding `Write*` member of
//! `ModuleSystem` in `original_source/ModuleSystem.cpp`; every emitter
//! shares the small field-access helpers below instead of re-deriving
//! them, matching the way the original leans on `CPyObject::operator[]`
//! everywhere.

pub mod catalog;
pub mod dialogs;
pub mod factions;
pub mod items;
pub mod parties;
pub mod pools;
pub mod scenes;
pub mod scripts;
pub mod skins;
pub mod sounds;
pub mod triggers;
pub mod troops;

use crate::value::Value;

const ZERO: Value = Value::Int(0);

/// Field `idx` of `item`, or a zero placeholder if absent — for the
/// trailing optional fields nearly every entity has.
pub(crate) fn field(item: &Value, idx: usize) -> &Value {
    item.get(idx).unwrap_or(&ZERO)
}

pub(crate) fn int_at(item: &Value, idx: usize) -> i64 {
    item.get(idx).and_then(Value::as_int).unwrap_or(0)
}

pub(crate) fn str_at<'a>(item: &'a Value, idx: usize) -> &'a str {
    item.get(idx).and_then(Value::as_str).unwrap_or("")
}

pub(crate) fn seq_at<'a>(item: &'a Value, idx: usize) -> &'a [Value] {
    item.get(idx).and_then(Value::as_seq).unwrap_or(&[])
}

//! Opcode Metadata Table (C6): per-opcode LHS/GHS/can-fail flags and
//! try-block depth delta, indexed by the low 28 bits of the opcode.
//! Ported from the `m_operations`/`m_operation_depths` arrays and their
//! initialization in `ModuleSystem::DoCompile`
//! (`original_source/ModuleSystem.cpp`).

use bitflags::bitflags;

use crate::loader::HeaderOperations;

/// Low 28 bits of an opcode value mask off any tag bits a caller may
/// have OR'd in (mirrors the `OPCODE()` macro).
pub const OPCODE_MASK: i64 = 0xFFF_FFFF;
pub const MAX_NUM_OPCODES: usize = 8192;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct OpFlags: u8 {
        /// Assigns to operand 1 (local or global).
        const LHS = 0x1;
        /// Assigns to a *global* in operand 1 only.
        const GHS = 0x2;
        /// Can-fail: operand 1 is a predicate whose failure aborts the
        /// surrounding block outside any try.
        const CF = 0x4;
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct OpcodeMeta {
    pub flags: OpFlags,
    pub depth_delta: i8,
}

/// Fixed-size table, one entry per opcode up to `MAX_NUM_OPCODES`.
pub struct OpcodeMetadata {
    entries: Vec<OpcodeMeta>,
}

impl OpcodeMetadata {
    /// Zero-fill, then mark the fixed set of try-block-opening opcodes
    /// with `depth_delta = +1`, `try_end` (3) with `-1`, and OR in the
    /// LHS/GHS/CF flag bits from the loader's three classification
    /// lists, exactly as `DoCompile` does.
    pub fn initialize(header_operations: &HeaderOperations) -> Self {
        let mut entries = vec![OpcodeMeta::default(); MAX_NUM_OPCODES];

        entries[3].depth_delta = -1; // try_end
        for &opener in &[4, 6, 7, 11, 12, 15, 16, 17, 18] {
            entries[opener].depth_delta = 1;
        }

        for &opcode in &header_operations.lhs_operations {
            if let Some(entry) = entries.get_mut(Self::index(opcode)) {
                entry.flags |= OpFlags::LHS;
            }
        }
        for &opcode in &header_operations.global_lhs_operations {
            if let Some(entry) = entries.get_mut(Self::index(opcode)) {
                entry.flags |= OpFlags::GHS;
            }
        }
        for &opcode in &header_operations.can_fail_operations {
            if let Some(entry) = entries.get_mut(Self::index(opcode)) {
                entry.flags |= OpFlags::CF;
            }
        }

        Self { entries }
    }

    fn index(opcode: i64) -> usize {
        (opcode & OPCODE_MASK) as usize
    }

    pub fn get(&self, opcode: i64) -> OpcodeMeta {
        self.entries
            .get(Self::index(opcode))
            .copied()
            .unwrap_or_default()
    }

    pub fn is_lhs(&self, opcode: i64) -> bool {
        self.get(opcode).flags.contains(OpFlags::LHS)
    }

    pub fn is_global_lhs(&self, opcode: i64) -> bool {
        let flags = self.get(opcode).flags;
        flags.contains(OpFlags::LHS) || flags.contains(OpFlags::GHS)
    }

    pub fn depth_delta(&self, opcode: i64) -> i8 {
        self.get(opcode).depth_delta
    }

    pub fn can_fail(&self, opcode: i64) -> bool {
        self.get(opcode).flags.contains(OpFlags::CF)
    }
}

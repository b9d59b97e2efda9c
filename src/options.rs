//! Compile-session flags, one bit per `spec.md` §6 CLI flag. Named and
//! shaped after the original `msf_*` bit constants
//! (`original_source/ModuleSystem.h`), kept as a `bitflags!` set rather
//! than a raw integer so flag tests read as `options.contains(...)`
//! instead of magic-number masking.

use bitflags::bitflags;
use std::path::PathBuf;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Flags: u32 {
        const STRICT                      = 0x1;
        const OBFUSCATE_GLOBAL_VARS       = 0x2;
        const OBFUSCATE_DIALOG_STATES     = 0x4;
        const OBFUSCATE_SCRIPTS           = 0x8;
        const OBFUSCATE_TAGS              = 0x10;
        const SKIP_ID_FILES               = 0x20;
        const LIST_RESOURCES              = 0x40;
        const COMPILE_MODULE_DATA         = 0x80;
        const LIST_OBFUSCATED_SCRIPTS     = 0x100;
        const LIST_UNREFERENCED_SCRIPTS   = 0x200;
        const DISABLE_WARNINGS            = 0x400;
        const RUSMOD_REBALANSER           = 0x800;
    }
}

/// Fully resolved compile-session configuration: the flag set plus the
/// two path overrides that aren't simple booleans.
#[derive(Debug, Clone, Default)]
pub struct CompileOptions {
    pub flags: Flags,
    pub in_path: Option<PathBuf>,
    pub out_path: Option<PathBuf>,
}

impl CompileOptions {
    pub fn strict(&self) -> bool {
        self.flags.contains(Flags::STRICT)
    }

    pub fn obfuscate_global_vars(&self) -> bool {
        self.flags.contains(Flags::OBFUSCATE_GLOBAL_VARS)
    }

    pub fn obfuscate_dialog_states(&self) -> bool {
        self.flags.contains(Flags::OBFUSCATE_DIALOG_STATES)
    }

    pub fn obfuscate_scripts(&self) -> bool {
        self.flags.contains(Flags::OBFUSCATE_SCRIPTS)
    }

    pub fn obfuscate_tags(&self) -> bool {
        self.flags.contains(Flags::OBFUSCATE_TAGS)
    }

    pub fn skip_id_files(&self) -> bool {
        self.flags.contains(Flags::SKIP_ID_FILES)
    }

    pub fn list_resources(&self) -> bool {
        self.flags.contains(Flags::LIST_RESOURCES)
    }

    pub fn compile_module_data(&self) -> bool {
        self.flags.contains(Flags::COMPILE_MODULE_DATA)
    }

    pub fn list_obfuscated_scripts(&self) -> bool {
        self.flags.contains(Flags::LIST_OBFUSCATED_SCRIPTS)
    }

    pub fn list_unreferenced_scripts(&self) -> bool {
        self.flags.contains(Flags::LIST_UNREFERENCED_SCRIPTS)
    }

    pub fn warnings_disabled(&self) -> bool {
        self.flags.contains(Flags::DISABLE_WARNINGS)
    }

    pub fn rusmod_rebalanser(&self) -> bool {
        self.flags.contains(Flags::RUSMOD_REBALANSER)
    }
}

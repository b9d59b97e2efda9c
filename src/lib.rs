//! Build-time compiler for a Mount&Blade-style module system: reads the
//! in-memory definitions a [`loader::ModuleLoader`] exposes and emits the
//! fixed set of engine data files the runtime loads, in two passes.

pub mod diagnostics;
pub mod emit;
pub mod encode;
pub mod error;
pub mod json_loader;
pub mod loader;
pub mod opcodes;
pub mod operand;
pub mod options;
pub mod quickstrings;
pub mod registry;
pub mod resources;
pub mod session;
pub mod value;
pub mod variables;
pub mod writer;

pub mod driver;

pub use crate::diagnostics::{Diagnostic, Diagnostics, Level};
pub use crate::driver::compile;
pub use crate::error::{Error, Result};
pub use crate::loader::ModuleLoader;
pub use crate::options::CompileOptions;
pub use crate::session::Session;
pub use crate::value::Value;

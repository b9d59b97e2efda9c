//! Command-line entry point. Wires the CLI flags onto a
//! [`mbcompiler::CompileOptions`] and drives the two-pass compile
//! against a [`mbcompiler::json_loader::JsonLoader`] manifest. The real
//! scripting host that evaluates module definitions is an external
//! collaborator this crate never implements (`mbcompiler::loader`); the
//! JSON manifest is this binary's stand-in for it.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use mbcompiler::json_loader::JsonLoader;
use mbcompiler::options::Flags;
use mbcompiler::CompileOptions;

#[derive(Parser, Debug)]
#[command(name = "mbcc", about = "Compiles Mount&Blade-style module definitions into engine data files")]
struct Cli {
    /// Promote non-fatal errors to fatal.
    #[arg(long)]
    strict: bool,

    /// Skip pass 1 (ID-file generation).
    #[arg(long)]
    skip_id_files: bool,

    /// Emit resource_usage.txt.
    #[arg(long)]
    list_resources: bool,

    /// Rename global variables to global_var_<i> in output.
    #[arg(long)]
    hide_global_vars: bool,

    /// Rename non-game_/wse_ scripts to script_<i>.
    #[arg(long)]
    hide_scripts: bool,

    /// Emit the script_<i>=<name> mapping table.
    #[arg(long)]
    list_obfuscated_scripts: bool,

    /// Rename non-builtin dialog states to state_<n>.
    #[arg(long)]
    hide_dialog_states: bool,

    /// Zero the prefix tag table, except for `str`.
    #[arg(long)]
    hide_tags: bool,

    /// Also emit Data/flora_kinds.txt, Data/skyboxes.txt, Data/ground_specs.txt.
    #[arg(long)]
    compile_data: bool,

    /// Warn on scripts that are declared but never referenced.
    #[arg(long)]
    list_unreferenced_scripts: bool,

    /// Suppress non-fatal diagnostics.
    #[arg(long)]
    no_warnings: bool,

    /// Apply the item difficulty rebalance override.
    #[arg(long)]
    rusmod_rebalanser: bool,

    /// Input directory (default: current directory).
    #[arg(long, value_name = "DIR")]
    in_path: Option<PathBuf>,

    /// Output directory (default: the manifest's export_dir).
    #[arg(long, value_name = "DIR")]
    out_path: Option<PathBuf>,

    /// JSON manifest describing the module definitions to compile,
    /// resolved relative to `-in-path` unless absolute.
    #[arg(long, value_name = "FILE", default_value = "modules.json")]
    manifest: PathBuf,
}

impl Cli {
    fn flags(&self) -> Flags {
        let mut flags = Flags::empty();
        flags.set(Flags::STRICT, self.strict);
        flags.set(Flags::SKIP_ID_FILES, self.skip_id_files);
        flags.set(Flags::LIST_RESOURCES, self.list_resources);
        flags.set(Flags::OBFUSCATE_GLOBAL_VARS, self.hide_global_vars);
        flags.set(Flags::OBFUSCATE_SCRIPTS, self.hide_scripts);
        flags.set(Flags::LIST_OBFUSCATED_SCRIPTS, self.list_obfuscated_scripts);
        flags.set(Flags::OBFUSCATE_DIALOG_STATES, self.hide_dialog_states);
        flags.set(Flags::OBFUSCATE_TAGS, self.hide_tags);
        flags.set(Flags::COMPILE_MODULE_DATA, self.compile_data);
        flags.set(Flags::LIST_UNREFERENCED_SCRIPTS, self.list_unreferenced_scripts);
        flags.set(Flags::DISABLE_WARNINGS, self.no_warnings);
        flags.set(Flags::RUSMOD_REBALANSER, self.rusmod_rebalanser);
        flags
    }

    fn manifest_path(&self) -> PathBuf {
        if self.manifest.is_absolute() {
            self.manifest.clone()
        } else {
            self.in_path
                .clone()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(&self.manifest)
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let options = CompileOptions {
        flags: cli.flags(),
        in_path: cli.in_path.clone(),
        out_path: cli.out_path.clone(),
    };

    let mut loader = match JsonLoader::load(&cli.manifest_path()) {
        Ok(loader) => loader,
        Err(err) => {
            tracing::error!("{err}");
            return ExitCode::FAILURE;
        }
    };

    match mbcompiler::compile(&mut loader, options) {
        Ok(session) if session.diagnostics.has_errors() => ExitCode::FAILURE,
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

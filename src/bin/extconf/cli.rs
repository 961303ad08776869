//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// extconf - build configuration for Cython extensions
///
/// `--use-cython` / `--cython-coverage` (or USE_CYTHON / CYTHON_COVERAGE in
/// the environment) select regeneration from the .pyx source and line-trace
/// coverage. They may appear anywhere on the command line.
#[derive(Parser)]
#[command(name = "extconf")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Path to Extconf.toml (defaults to searching upward from the cwd)
    #[arg(long, global = true, value_name = "PATH")]
    pub manifest_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve the extension and emit its descriptor as JSON
    Build(BuildArgs),

    /// Show the resolved compile/link flags
    Flags(FlagsArgs),

    /// Check that pkg-config, Cython and the libraries are available
    Doctor(DoctorArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct BuildArgs {
    /// Write the descriptor to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub out: Option<PathBuf>,

    /// Skip the Cython translation step even when regenerating
    #[arg(long)]
    pub no_translate: bool,
}

#[derive(Args)]
pub struct FlagsArgs {
    /// Show compile flags only
    #[arg(long, conflicts_with = "link")]
    pub compile: bool,

    /// Show link flags only
    #[arg(long)]
    pub link: bool,
}

#[derive(Args)]
pub struct DoctorArgs {}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}

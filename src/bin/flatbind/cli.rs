//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use flatbind::Language;

/// flatbind - Generate bindings for a flat C API
#[derive(Parser)]
#[command(name = "flatbind")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate bindings from a C header
    Generate(GenerateArgs),

    /// Show how the functions of a header are bound
    Inspect(InspectArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct GenerateArgs {
    /// C header, or a .json file with serialized declarations
    pub input: PathBuf,

    /// Target languages (fortran, python, julia, rust, java); all by default
    #[arg(short, long = "language", value_name = "LANG")]
    pub languages: Vec<Language>,

    /// Output directory, one subdirectory per language
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Configuration file (defaults to ./flatbind.toml when present)
    #[arg(long, value_name = "FILE", env = "FLATBIND_CONFIG")]
    pub config: Option<PathBuf>,

    /// Render everything but write nothing
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args)]
pub struct InspectArgs {
    /// C header, or a .json file with serialized declarations
    pub input: PathBuf,

    /// Configuration file (defaults to ./flatbind.toml when present)
    #[arg(long, value_name = "FILE", env = "FLATBIND_CONFIG")]
    pub config: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}

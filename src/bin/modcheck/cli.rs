//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// modcheck - keep module manifests in a multi-module repository consistent
#[derive(Parser)]
#[command(name = "modcheck")]
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
    /// Check that every manifest agrees with the core manifest
    Validate(ValidateArgs),

    /// List the internal modules found under a repository root
    Modules(ModulesArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct ValidateArgs {
    /// Path of the repository checkout to validate
    #[arg(long)]
    pub path: PathBuf,

    /// Modules which may require the core module without a local
    /// filesystem override (implies --no-dummy-modules)
    #[arg(long, value_delimiter = ',')]
    pub direct_import_modules: Vec<String>,

    /// Modules which may require internal modules at a real rather than
    /// placeholder version
    #[arg(long, value_delimiter = ',')]
    pub no_dummy_modules: Vec<String>,

    /// Output format: human, json, github
    #[arg(long, default_value = "human")]
    pub format: String,
}

#[derive(Args)]
pub struct ModulesArgs {
    /// Path of the repository checkout
    #[arg(long)]
    pub path: PathBuf,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}

use clap::{Parser, Subcommand, ValueEnum};

pub mod commands;
pub mod output;

#[derive(Parser)]
#[command(
    name = "solgraph",
    version,
    about = "Solidity import resolution and module graph construction"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format
    #[arg(long, global = true, default_value = "json")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve the imports of a single source file (JSON request on stdin)
    ResolveImports,

    /// Build the transitive module graph from a root file (JSON request on stdin)
    ModuleFactory,
}

#[derive(Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Compact,
}

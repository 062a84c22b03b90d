use std::io::Read;

use anyhow::{Context, Result};
use clap::Parser;

use solgraph::cli::commands;
use solgraph::cli::{Cli, Commands};

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {:#}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .context("failed to read request from stdin")?;

    let output = match cli.command {
        Commands::ResolveImports => {
            let request =
                serde_json::from_str(&input).context("invalid resolve-imports request")?;
            commands::run_resolve_imports(request, &cli.format)?
        }
        Commands::ModuleFactory => {
            let request = serde_json::from_str(&input).context("invalid module-factory request")?;
            commands::run_module_factory(request, &cli.format)?
        }
    };

    println!("{}", output);
    Ok(())
}

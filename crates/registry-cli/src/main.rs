//! Plugin registry CLI
//!
//! Fetches the metadata of every registered plugin, validates it and writes
//! the registry output document.

mod cli;
mod commands;
mod error;
mod logging;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("{}: logging disabled: {}", "warning".yellow().bold(), e);
    }
    tracing::debug!("Verbose mode enabled");

    match cli.command {
        Some(cmd) => execute_command(cmd),
        None => {
            println!("{} plugin registry", "plugin-registry".green().bold());
            println!();
            println!("Run {} for available commands.", "plugin-registry --help".cyan());
            Ok(())
        }
    }
}

fn execute_command(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Fetch {
            packages,
            registry,
            config,
            output,
        } => commands::run_fetch(&packages, &registry, config.as_deref(), output.as_deref()),
    }
}

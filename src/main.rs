//! Fabricar CLI - Text-to-3D Generation Tool
//!
//! Command-line interface for the Fabricar generation pipeline and artifact
//! store.

use clap::Parser;
use env_logger::Env;
use log::info;

use fabricar::cli::{commands, Cli, Commands};
use fabricar::Result;

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    info!("Fabricar v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Some(cmd) => handle_command(cmd),
        None => {
            println!("Fabricar v{}", env!("CARGO_PKG_VERSION"));
            println!("Use --help for available commands");
            Ok(())
        }
    }
}

fn handle_command(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Generate {
            prompt,
            advanced,
            storage,
        } => commands::generate(&prompt, advanced, storage),
        Commands::List { storage } => commands::list(storage),
        Commands::Bundled { dir } => commands::bundled(&dir),
        Commands::Delete { id, storage } => commands::delete(&id, storage),
    }
}

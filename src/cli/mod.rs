//! CLI Module
//!
//! Command-line interface for driving the generation pipeline and inspecting
//! the artifact store without an AR device attached.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Fabricar - text-to-3D generation and artifact cache tool
#[derive(Parser, Debug)]
#[command(name = "fabricar")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a 3D model from a text prompt
    #[command(name = "generate")]
    Generate {
        /// Text description of the desired model
        prompt: String,

        /// Use the slower two-stage generation pipeline
        #[arg(long)]
        advanced: bool,

        /// Storage root for generated artifacts
        #[arg(short, long)]
        storage: Option<PathBuf>,
    },

    /// List generated artifacts, newest first
    #[command(name = "list")]
    List {
        /// Storage root for generated artifacts
        #[arg(short, long)]
        storage: Option<PathBuf>,
    },

    /// List the bundled demo catalog
    #[command(name = "bundled")]
    Bundled {
        /// Directory holding the bundled catalog
        #[arg(short, long)]
        dir: PathBuf,
    },

    /// Delete a generated artifact and its metadata
    #[command(name = "delete")]
    Delete {
        /// Artifact id to delete
        id: String,

        /// Storage root for generated artifacts
        #[arg(short, long)]
        storage: Option<PathBuf>,
    },
}

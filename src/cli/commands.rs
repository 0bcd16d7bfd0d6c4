//! CLI Command Implementations
//!
//! Implements the actual logic for each CLI command. Commands run the
//! pipeline without a scene: placement needs a live AR device, listing and
//! generation do not.

use std::path::{Path, PathBuf};

use log::info;

use crate::config::Config;
use crate::error::Result;
use crate::pipeline::GenerationPipeline;
use crate::remote::{GenerationMode, HttpGenerationClient};
use crate::store::{ArtifactStore, LocalArtifact};

fn resolve_config(storage: Option<PathBuf>) -> Config {
    let config = Config::from_env();
    match storage {
        Some(dir) => config.with_storage_dir(dir),
        None => config,
    }
}

/// Generate a model from a prompt and persist it locally.
pub fn generate(prompt: &str, advanced: bool, storage: Option<PathBuf>) -> Result<()> {
    let config = resolve_config(storage);
    let mode = if advanced {
        GenerationMode::Advanced
    } else {
        GenerationMode::Basic
    };

    info!("Generating via {} ({} mode)", config.api_url, mode);

    let client = HttpGenerationClient::with_config(config.api_url.clone(), config.timeout_ms);
    if !client.is_reachable() {
        println!("Warning: {} is not answering its health probe", config.api_url);
    }

    let store = ArtifactStore::open(&config.storage_dir, config.bundled_dir.as_deref())?;
    let mut pipeline = GenerationPipeline::new(Box::new(client), store);
    pipeline.ar_ready();

    let artifact = pipeline.generate(prompt, mode)?;

    println!("Generated artifact: {}", artifact.artifact_id);
    println!("Stored at: {}", artifact.local_path.display());
    Ok(())
}

/// List generated artifacts, newest first.
pub fn list(storage: Option<PathBuf>) -> Result<()> {
    let config = resolve_config(storage);
    let store = ArtifactStore::open(&config.storage_dir, config.bundled_dir.as_deref())?;

    let artifacts = store.list_generated()?;
    if artifacts.is_empty() {
        println!("No generated artifacts in {}", config.storage_dir.display());
        return Ok(());
    }

    for artifact in &artifacts {
        print_artifact(artifact);
    }
    println!("{} artifact(s)", artifacts.len());
    Ok(())
}

/// List the bundled demo catalog.
pub fn bundled(dir: &Path) -> Result<()> {
    let config = Config::from_env();
    let store = ArtifactStore::open(&config.storage_dir, Some(dir))?;

    let catalog = store.list_bundled();
    if catalog.is_empty() {
        println!("No bundled assets in {}", dir.display());
        return Ok(());
    }

    for artifact in catalog {
        print_artifact(artifact);
    }
    println!("{} bundled asset(s)", catalog.len());
    Ok(())
}

/// Delete one generated artifact.
pub fn delete(id: &str, storage: Option<PathBuf>) -> Result<()> {
    let config = resolve_config(storage);
    let store = ArtifactStore::open(&config.storage_dir, config.bundled_dir.as_deref())?;

    if store.delete(id) {
        println!("Deleted artifact {}", id);
    } else {
        println!("No deletable artifact with id {}", id);
    }
    Ok(())
}

fn print_artifact(artifact: &LocalArtifact) {
    let created = artifact
        .created_at
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| "-".to_string());
    println!(
        "{}  {}  \"{}\"  {}",
        artifact.artifact_id,
        created,
        artifact.prompt,
        artifact.local_path.display()
    );
}

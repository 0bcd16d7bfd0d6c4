//! Artifact types and on-disk metadata records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where an artifact came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactOrigin {
    /// Produced by the remote generation service and cached locally.
    Generated,
    /// Shipped with the application as a read-only demo asset.
    BundledDemo,
}

/// A locally available 3D asset: binary plus metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalArtifact {
    /// Content identity. Distinct from placement identity: the same artifact
    /// may be placed in the scene many times.
    pub artifact_id: String,
    /// The prompt that produced this artifact; empty for bundled demos.
    pub prompt: String,
    /// Creation time; `None` for bundled demos, which have no record of one.
    pub created_at: Option<DateTime<Utc>>,
    /// Path to the persisted binary.
    pub local_path: PathBuf,
    pub origin: ArtifactOrigin,
}

impl LocalArtifact {
    pub fn is_bundled(&self) -> bool {
        self.origin == ArtifactOrigin::BundledDemo
    }
}

/// Metadata record stored alongside each generated binary.
///
/// Written only after the binary write is confirmed non-empty, so a reader
/// never observes metadata without its binary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactMetadata {
    pub artifact_id: String,
    pub prompt: String,
    pub created_at: DateTime<Utc>,
    pub size_bytes: u64,
    /// SHA-256 of the binary, lowercase hex.
    pub checksum: String,
}

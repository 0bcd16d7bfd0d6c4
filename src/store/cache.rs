//! On-device artifact store
//!
//! Persists generated binaries plus their metadata records under a stable
//! storage root and exposes the read-only bundled demo catalog. The write
//! order is the store's one hard invariant: binary first, confirmed
//! non-empty, metadata second — so `list_generated` can never surface an
//! artifact whose binary is missing.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use log::{debug, warn};
use sha2::{Digest, Sha256};
use walkdir::WalkDir;

use crate::error::{FabricarError, Result};
use crate::store::artifact::{ArtifactMetadata, ArtifactOrigin, LocalArtifact};

/// File extension for artifact binaries.
const BINARY_EXT: &str = "glb";
/// File extension for metadata records.
const METADATA_EXT: &str = "json";

/// Cache of generated assets plus the bundled demo catalog.
pub struct ArtifactStore {
    generated_dir: PathBuf,
    /// Discovered once at construction; never mutated afterwards.
    bundled: Vec<LocalArtifact>,
}

impl ArtifactStore {
    /// Open (creating if needed) a store rooted at `storage_root`, scanning
    /// `bundled_dir` for the demo catalog if one is provided.
    pub fn open(storage_root: &Path, bundled_dir: Option<&Path>) -> Result<Self> {
        let generated_dir = storage_root.join("generated");
        fs::create_dir_all(&generated_dir).map_err(|e| FabricarError::StorageWriteFailed {
            path: generated_dir.clone(),
            reason: e.to_string(),
        })?;

        let bundled = match bundled_dir {
            Some(dir) => Self::scan_bundled(dir),
            None => Vec::new(),
        };

        Ok(Self {
            generated_dir,
            bundled,
        })
    }

    /// Directory holding generated binaries and metadata.
    pub fn generated_dir(&self) -> &Path {
        &self.generated_dir
    }

    fn binary_path(&self, artifact_id: &str) -> PathBuf {
        self.generated_dir
            .join(format!("{}.{}", artifact_id, BINARY_EXT))
    }

    fn metadata_path(&self, artifact_id: &str) -> PathBuf {
        self.generated_dir
            .join(format!("{}.{}", artifact_id, METADATA_EXT))
    }

    /// Persist a downloaded artifact: binary first, metadata second.
    ///
    /// Fails with `StorageWriteFailed` if either write fails, leaving no
    /// partial metadata behind.
    pub fn persist(&self, artifact_id: &str, prompt: &str, bytes: &[u8]) -> Result<LocalArtifact> {
        if bytes.is_empty() {
            return Err(FabricarError::StorageWriteFailed {
                path: self.binary_path(artifact_id),
                reason: "refusing to persist an empty binary".to_string(),
            });
        }

        let binary_path = self.binary_path(artifact_id);
        fs::write(&binary_path, bytes).map_err(|e| FabricarError::StorageWriteFailed {
            path: binary_path.clone(),
            reason: e.to_string(),
        })?;

        // Re-stat to confirm the write actually landed before metadata
        // becomes visible to readers.
        let written = fs::metadata(&binary_path)
            .map(|m| m.len())
            .unwrap_or(0);
        if written == 0 {
            let _ = fs::remove_file(&binary_path);
            return Err(FabricarError::StorageWriteFailed {
                path: binary_path,
                reason: "binary write produced an empty file".to_string(),
            });
        }

        let metadata = ArtifactMetadata {
            artifact_id: artifact_id.to_string(),
            prompt: prompt.to_string(),
            created_at: Utc::now(),
            size_bytes: written,
            checksum: hex_digest(bytes),
        };

        let metadata_path = self.metadata_path(artifact_id);
        let content = serde_json::to_string_pretty(&metadata)?;
        if let Err(e) = fs::write(&metadata_path, content) {
            // Roll the binary back so no half-persisted artifact lingers.
            let _ = fs::remove_file(&binary_path);
            return Err(FabricarError::StorageWriteFailed {
                path: metadata_path,
                reason: e.to_string(),
            });
        }

        debug!("Persisted artifact {} ({} bytes)", artifact_id, written);

        Ok(LocalArtifact {
            artifact_id: metadata.artifact_id,
            prompt: metadata.prompt,
            created_at: Some(metadata.created_at),
            local_path: binary_path,
            origin: ArtifactOrigin::Generated,
        })
    }

    /// List generated artifacts, newest first; ties broken by id descending.
    ///
    /// Records that fail to parse, and records whose binary has gone missing,
    /// are skipped with a warning rather than failing the listing.
    pub fn list_generated(&self) -> Result<Vec<LocalArtifact>> {
        let mut artifacts = Vec::new();

        for entry in fs::read_dir(&self.generated_dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(METADATA_EXT) {
                continue;
            }

            let metadata: ArtifactMetadata = match fs::read_to_string(&path)
                .map_err(FabricarError::from)
                .and_then(|s| serde_json::from_str(&s).map_err(FabricarError::from))
            {
                Ok(m) => m,
                Err(e) => {
                    warn!("Skipping unreadable metadata {}: {}", path.display(), e);
                    continue;
                }
            };

            let binary_path = self.binary_path(&metadata.artifact_id);
            let binary_ok = fs::metadata(&binary_path)
                .map(|m| m.len() > 0)
                .unwrap_or(false);
            if !binary_ok {
                warn!(
                    "Skipping artifact {}: binary missing or empty at {}",
                    metadata.artifact_id,
                    binary_path.display()
                );
                continue;
            }

            artifacts.push(LocalArtifact {
                artifact_id: metadata.artifact_id,
                prompt: metadata.prompt,
                created_at: Some(metadata.created_at),
                local_path: binary_path,
                origin: ArtifactOrigin::Generated,
            });
        }

        artifacts.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.artifact_id.cmp(&a.artifact_id))
        });

        Ok(artifacts)
    }

    /// The read-only bundled demo catalog.
    pub fn list_bundled(&self) -> &[LocalArtifact] {
        &self.bundled
    }

    /// Look up an artifact by id, generated before bundled.
    pub fn artifact(&self, artifact_id: &str) -> Option<LocalArtifact> {
        if let Ok(generated) = self.list_generated() {
            if let Some(a) = generated.into_iter().find(|a| a.artifact_id == artifact_id) {
                return Some(a);
            }
        }
        self.bundled
            .iter()
            .find(|a| a.artifact_id == artifact_id)
            .cloned()
    }

    /// Delete a generated artifact and its metadata together.
    ///
    /// Returns `false` for unknown ids and for bundled demos, which are never
    /// deleted. Objects already placed from this artifact are unaffected; the
    /// rendering layer holds its own handle to the loaded binary.
    pub fn delete(&self, artifact_id: &str) -> bool {
        if self.bundled.iter().any(|a| a.artifact_id == artifact_id) {
            debug!("Refusing to delete bundled artifact {}", artifact_id);
            return false;
        }

        let metadata_path = self.metadata_path(artifact_id);
        let binary_path = self.binary_path(artifact_id);
        if !metadata_path.exists() && !binary_path.exists() {
            return false;
        }

        // Metadata goes first: a binary without metadata is invisible to
        // list_generated, the reverse is not.
        if let Err(e) = fs::remove_file(&metadata_path) {
            if metadata_path.exists() {
                warn!("Failed to remove metadata for {}: {}", artifact_id, e);
            }
        }
        if let Err(e) = fs::remove_file(&binary_path) {
            if binary_path.exists() {
                warn!("Failed to remove binary for {}: {}", artifact_id, e);
            }
        }

        debug!("Deleted artifact {}", artifact_id);
        true
    }

    fn scan_bundled(dir: &Path) -> Vec<LocalArtifact> {
        let mut catalog = Vec::new();

        for entry in WalkDir::new(dir).into_iter().filter_map(|e| e.ok()) {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
            if !matches!(ext, "glb" | "gltf") {
                continue;
            }
            let stem = match path.file_stem().and_then(|s| s.to_str()) {
                Some(s) => s,
                None => continue,
            };
            catalog.push(LocalArtifact {
                artifact_id: format!("bundled-{}", stem),
                prompt: String::new(),
                created_at: None,
                local_path: path.to_path_buf(),
                origin: ArtifactOrigin::BundledDemo,
            });
        }

        catalog.sort_by(|a, b| a.artifact_id.cmp(&b.artifact_id));
        debug!("Discovered {} bundled demo assets", catalog.len());
        catalog
    }
}

fn hex_digest(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn open_store(root: &TempDir) -> ArtifactStore {
        ArtifactStore::open(root.path(), None).unwrap()
    }

    #[test]
    fn test_persist_and_list_round_trip() {
        let root = TempDir::new().unwrap();
        let store = open_store(&root);

        let artifact = store.persist("a1", "wooden chair", &[0x42; 40_000]).unwrap();
        assert_eq!(artifact.artifact_id, "a1");
        assert_eq!(artifact.origin, ArtifactOrigin::Generated);

        let listed = store.list_generated().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].artifact_id, "a1");
        assert_eq!(listed[0].prompt, "wooden chair");

        // Round-trip property: every listed binary opens and is non-empty.
        let bytes = fs::read(&listed[0].local_path).unwrap();
        assert_eq!(bytes.len(), 40_000);
    }

    #[test]
    fn test_persist_rejects_empty_payload() {
        let root = TempDir::new().unwrap();
        let store = open_store(&root);

        let err = store.persist("a1", "chair", &[]).unwrap_err();
        assert_eq!(err.error_code(), "STORAGE_WRITE_FAILED");
        assert!(store.list_generated().unwrap().is_empty());
        assert!(!store.metadata_path("a1").exists());
    }

    #[test]
    fn test_list_ordering_newest_first_ties_by_id_desc() {
        let root = TempDir::new().unwrap();
        let store = open_store(&root);

        store.persist("a1", "first", b"one").unwrap();
        store.persist("a2", "second", b"two").unwrap();

        // Force identical timestamps to exercise the tie-break.
        let mut m1: ArtifactMetadata =
            serde_json::from_str(&fs::read_to_string(store.metadata_path("a1")).unwrap()).unwrap();
        let m2: ArtifactMetadata =
            serde_json::from_str(&fs::read_to_string(store.metadata_path("a2")).unwrap()).unwrap();
        m1.created_at = m2.created_at;
        fs::write(
            store.metadata_path("a1"),
            serde_json::to_string_pretty(&m1).unwrap(),
        )
        .unwrap();

        let listed = store.list_generated().unwrap();
        let ids: Vec<_> = listed.iter().map(|a| a.artifact_id.as_str()).collect();
        assert_eq!(ids, vec!["a2", "a1"]);
    }

    #[test]
    fn test_list_skips_unparseable_metadata() {
        let root = TempDir::new().unwrap();
        let store = open_store(&root);

        store.persist("good", "chair", b"bytes").unwrap();
        fs::write(store.metadata_path("bad"), "{ not json").unwrap();
        fs::write(store.binary_path("bad"), b"bytes").unwrap();

        let listed = store.list_generated().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].artifact_id, "good");
    }

    #[test]
    fn test_list_skips_artifact_with_missing_binary() {
        let root = TempDir::new().unwrap();
        let store = open_store(&root);

        store.persist("a1", "chair", b"bytes").unwrap();
        fs::remove_file(store.binary_path("a1")).unwrap();

        assert!(store.list_generated().unwrap().is_empty());
    }

    #[test]
    fn test_delete_semantics() {
        let root = TempDir::new().unwrap();
        let store = open_store(&root);

        store.persist("a1", "chair", b"bytes").unwrap();
        assert!(store.delete("a1"));
        assert!(!store.binary_path("a1").exists());
        assert!(!store.metadata_path("a1").exists());

        // Unknown id is not an error.
        assert!(!store.delete("a1"));
        assert!(!store.delete("never-existed"));
    }

    #[test]
    fn test_bundled_catalog_is_discovered_and_undeletable() {
        let root = TempDir::new().unwrap();
        let bundled = TempDir::new().unwrap();
        fs::write(bundled.path().join("robot.glb"), b"demo bytes").unwrap();
        fs::write(bundled.path().join("notes.txt"), b"ignored").unwrap();

        let store = ArtifactStore::open(root.path(), Some(bundled.path())).unwrap();

        let catalog = store.list_bundled();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog[0].artifact_id, "bundled-robot");
        assert_eq!(catalog[0].origin, ArtifactOrigin::BundledDemo);
        assert!(catalog[0].created_at.is_none());

        assert!(!store.delete("bundled-robot"));
        assert!(bundled.path().join("robot.glb").exists());
    }

    #[test]
    fn test_artifact_lookup() {
        let root = TempDir::new().unwrap();
        let store = open_store(&root);

        store.persist("a1", "chair", b"bytes").unwrap();
        assert!(store.artifact("a1").is_some());
        assert!(store.artifact("missing").is_none());
    }

    #[test]
    fn test_checksum_recorded() {
        let root = TempDir::new().unwrap();
        let store = open_store(&root);

        store.persist("a1", "chair", b"bytes").unwrap();
        let meta: ArtifactMetadata =
            serde_json::from_str(&fs::read_to_string(store.metadata_path("a1")).unwrap()).unwrap();
        assert_eq!(meta.checksum.len(), 64);
        assert_eq!(meta.size_bytes, 5);
    }
}

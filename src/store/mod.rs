//! Local artifact storage
//!
//! Cache of generated 3D assets plus the read-only bundled demo catalog.

mod artifact;
mod cache;

pub use artifact::{ArtifactMetadata, ArtifactOrigin, LocalArtifact};
pub use cache::ArtifactStore;

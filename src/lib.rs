//! Fabricar - Text-to-3D AR Placement Core
//!
//! Fabricar turns a short text description into a downloadable 3D asset via a
//! remote generation service and places instances of it into a live AR scene.
//!
//! # Architecture
//!
//! Four components, leaves first:
//! - `remote`: typed client for the generation service's generate/download API
//! - `store`: on-device artifact cache plus the bundled demo catalog
//! - `scene`: placement manager tracking placed objects, anchors, transforms
//! - `pipeline`: the orchestrator and its state machine, observable by the UI
//!
//! The AR platform itself (tracking, hit-testing, rendering) sits behind the
//! `scene::AnchorProvider` seam; the UI sits above `pipeline::ArSession`.

pub mod config;
pub mod error;
pub mod pipeline;
pub mod remote;
pub mod scene;
pub mod store;

pub mod cli;

pub use config::Config;
pub use error::{FabricarError, Result};
pub use pipeline::{ArSession, GenerationPipeline, PipelineState};
pub use remote::{GenerationClient, GenerationMode, HttpGenerationClient, RemoteArtifactHandle};
pub use scene::{PlacedObject, PlacementId, ScenePlacementManager, SpatialEvent};
pub use store::{ArtifactOrigin, ArtifactStore, LocalArtifact};

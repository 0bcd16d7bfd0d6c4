//! AR scene placement
//!
//! This module provides:
//! - `ScenePlacementManager` owning all placed objects and their anchors
//! - `Transform`/`TransformDelta` for live gesture-driven mutation
//! - `SpatialEvent` inbound gesture events
//! - `AnchorProvider` seam to the external AR capability, with a mock

pub mod anchor;
mod events;
mod manager;
pub mod mock;
mod transform;

pub use anchor::{AnchorId, AnchorProvider};
pub use events::SpatialEvent;
pub use manager::{
    PlacedObject, PlacementId, ScenePlacementManager, BUNDLED_INITIAL_SCALE,
    GENERATED_INITIAL_SCALE, MAX_SCALE_MULTIPLIER, MIN_SCALE_MULTIPLIER,
};
pub use transform::{Transform, TransformDelta};

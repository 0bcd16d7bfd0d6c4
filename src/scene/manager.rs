//! Scene placement manager
//!
//! Tracks every object placed into the live AR scene: which artifact it was
//! instantiated from, which anchor it is bound to, and its current transform.
//! Placement identity is distinct from content identity — the same artifact
//! may be placed any number of times, each with its own `PlacementId`.

use std::collections::HashMap;

use glam::Vec3;
use log::{debug, info, warn};
use uuid::Uuid;

use crate::error::{FabricarError, Result};
use crate::scene::anchor::{AnchorId, AnchorProvider};
use crate::scene::transform::{Transform, TransformDelta};
use crate::store::{ArtifactOrigin, LocalArtifact};

/// Unique id of one placed instance. Never reused.
pub type PlacementId = Uuid;

/// Initial uniform scale for generated artifacts. Generated meshes come out
/// of the service normalized to a unit cube and need shrinking to read as
/// tabletop-sized objects.
pub const GENERATED_INITIAL_SCALE: f32 = 0.5;

/// Initial uniform scale for bundled demo assets, which are modeled at
/// real-world metric scale already.
pub const BUNDLED_INITIAL_SCALE: f32 = 1.0;

/// Bounds for the rescale multiplier. Out-of-range input is clamped.
pub const MIN_SCALE_MULTIPLIER: f32 = 0.1;
pub const MAX_SCALE_MULTIPLIER: f32 = 3.0;

/// One instance of an artifact rendered at a specific anchor.
#[derive(Debug, Clone)]
pub struct PlacedObject {
    pub placement_id: PlacementId,
    /// Content identity of the artifact this instance was created from.
    pub artifact_id: String,
    pub anchor_id: AnchorId,
    pub transform: Transform,
    /// Fixed at placement time from the artifact origin; rescale multipliers
    /// always apply to this, never to the current scale.
    pub initial_scale: f32,
}

/// Owns all placed objects and their anchor bookkeeping.
///
/// Anchors are owned jointly with the AR platform: the manager must release
/// each one when its placement is destroyed, and local bookkeeping stays
/// consistent even when an individual release fails on the platform side.
pub struct ScenePlacementManager {
    anchors: Box<dyn AnchorProvider>,
    registry: HashMap<PlacementId, PlacedObject>,
}

impl ScenePlacementManager {
    pub fn new(anchors: Box<dyn AnchorProvider>) -> Self {
        Self {
            anchors,
            registry: HashMap::new(),
        }
    }

    /// Place an instance of `artifact` at a resolved hit location.
    ///
    /// Anchor creation happens first; if the platform refuses, no placement
    /// record is created and no anchor is leaked.
    pub fn place(&mut self, artifact: &LocalArtifact, hit_location: Vec3) -> Result<PlacementId> {
        let anchor_id = self.anchors.create_anchor(hit_location)?;

        let initial_scale = match artifact.origin {
            ArtifactOrigin::Generated => GENERATED_INITIAL_SCALE,
            ArtifactOrigin::BundledDemo => BUNDLED_INITIAL_SCALE,
        };

        let placement_id = Uuid::new_v4();
        let object = PlacedObject {
            placement_id,
            artifact_id: artifact.artifact_id.clone(),
            anchor_id,
            transform: Transform::at_origin(initial_scale),
            initial_scale,
        };

        info!(
            "Placed artifact {} as {} on anchor {}",
            artifact.artifact_id, placement_id, anchor_id
        );
        self.registry.insert(placement_id, object);
        Ok(placement_id)
    }

    fn object_mut(&mut self, placement_id: PlacementId) -> Result<&mut PlacedObject> {
        self.registry
            .get_mut(&placement_id)
            .ok_or(FabricarError::UnknownPlacement { placement_id })
    }

    /// Apply a drag/rotate delta to a placed object.
    ///
    /// Unknown ids are ignored: the gesture source legitimately races a
    /// concurrent clear, and a stale gesture tail is not an error.
    pub fn update_transform(&mut self, placement_id: PlacementId, delta: &TransformDelta) {
        match self.object_mut(placement_id) {
            Ok(object) => object.transform.apply(delta),
            Err(_) => debug!("Ignoring transform update for stale placement {}", placement_id),
        }
    }

    /// Set the object's scale to `initial_scale * multiplier`, clamping the
    /// multiplier to its bounds. Repeated calls never compound.
    pub fn rescale(&mut self, placement_id: PlacementId, multiplier: f32) {
        let clamped = multiplier.clamp(MIN_SCALE_MULTIPLIER, MAX_SCALE_MULTIPLIER);
        match self.object_mut(placement_id) {
            Ok(object) => object.transform.scale = object.initial_scale * clamped,
            Err(_) => debug!("Ignoring rescale for stale placement {}", placement_id),
        }
    }

    /// Remove one placement, releasing its anchor. Returns `false` for
    /// unknown ids.
    pub fn remove_one(&mut self, placement_id: PlacementId) -> bool {
        match self.registry.remove(&placement_id) {
            Some(object) => {
                if let Err(e) = self.anchors.release_anchor(object.anchor_id) {
                    warn!("Anchor {} release failed: {}", object.anchor_id, e);
                }
                debug!("Removed placement {}", placement_id);
                true
            }
            None => false,
        }
    }

    /// Remove every placement. Anchor release is best-effort per object; the
    /// registry always ends empty regardless of individual release outcomes.
    pub fn remove_all(&mut self) {
        let count = self.registry.len();
        for (_, object) in self.registry.drain() {
            if let Err(e) = self.anchors.release_anchor(object.anchor_id) {
                warn!("Anchor {} release failed: {}", object.anchor_id, e);
            }
        }
        if count > 0 {
            info!("Cleared {} placed objects", count);
        }
    }

    pub fn get(&self, placement_id: PlacementId) -> Option<&PlacedObject> {
        self.registry.get(&placement_id)
    }

    /// Placement ids currently in the scene. Order is unspecified.
    pub fn placement_ids(&self) -> Vec<PlacementId> {
        self.registry.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }
}

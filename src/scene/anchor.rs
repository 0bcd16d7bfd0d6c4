//! Seam to the external AR capability
//!
//! The platform owns tracking, hit-testing and rendering; the core only asks
//! it to create and release spatial anchors. Each placed object is bound to
//! exactly one anchor, released when the placement is destroyed.

use crate::error::Result;
use glam::Vec3;

/// Identifier of a spatial anchor handed out by the AR platform.
pub type AnchorId = u64;

/// Anchor lifecycle operations provided by the AR platform.
pub trait AnchorProvider {
    /// Create an anchor at a resolved hit location.
    ///
    /// Fails when the platform refuses (tracking lost, no detected surface
    /// at the hit point); the caller must not mutate any state in that case.
    fn create_anchor(&mut self, hit_location: Vec3) -> Result<AnchorId>;

    /// Release an anchor. Best-effort: callers clearing many placements keep
    /// going when an individual release fails.
    fn release_anchor(&mut self, anchor_id: AnchorId) -> Result<()>;
}

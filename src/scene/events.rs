//! Inbound spatial input events
//!
//! Gesture callbacks from the AR platform are surfaced as one explicit event
//! type per gesture and consumed through a single dispatch path, so nothing
//! re-enters the state machine from an arbitrary callback context.

use crate::scene::manager::PlacementId;
use glam::{Quat, Vec3};

/// A spatial input event resolved by the AR platform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpatialEvent {
    /// User tapped the screen; the platform resolved the tap against the
    /// detected environment to a world-space hit location.
    Tap { hit_location: Vec3 },
    /// A drag gesture on a placed object ended with this translation.
    DragEnd {
        placement_id: PlacementId,
        translation: Vec3,
    },
    /// A rotate gesture on a placed object ended with this rotation.
    RotateEnd {
        placement_id: PlacementId,
        rotation: Quat,
    },
}

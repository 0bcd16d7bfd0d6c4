//! Placed-object transforms

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Live transform of a placed object, relative to its anchor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub orientation: Quat,
    /// Uniform scale. Always derived from the placement's `initial_scale`
    /// and the last rescale multiplier, never compounded.
    pub scale: f32,
}

impl Transform {
    /// Anchor-relative default: origin, identity orientation, given scale.
    pub fn at_origin(scale: f32) -> Self {
        Self {
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            scale,
        }
    }

    /// Apply a gesture delta in place. Last write wins; there is no queue.
    pub fn apply(&mut self, delta: &TransformDelta) {
        self.position += delta.translation;
        self.orientation = (delta.rotation * self.orientation).normalize();
    }
}

/// Position/orientation delta produced by the end of a drag or rotate gesture.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TransformDelta {
    pub translation: Vec3,
    pub rotation: Quat,
}

impl TransformDelta {
    pub fn translation(translation: Vec3) -> Self {
        Self {
            translation,
            rotation: Quat::IDENTITY,
        }
    }

    pub fn rotation(rotation: Quat) -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation,
        }
    }
}

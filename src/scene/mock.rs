//! Mock AR capability for testing
//!
//! Hands out sequential anchor ids and records releases so tests can assert
//! anchor bookkeeping without a real AR platform.

use super::anchor::{AnchorId, AnchorProvider};
use crate::error::{FabricarError, Result};
use glam::Vec3;

/// Scripted stand-in for the platform anchor API.
#[derive(Debug, Default)]
pub struct MockAnchorProvider {
    next_id: AnchorId,
    /// When true, the next `create_anchor` call refuses.
    pub fail_next_create: bool,
    /// Anchor ids whose release should report failure (release is still
    /// recorded, mirroring a platform that errors after the fact).
    pub failing_releases: Vec<AnchorId>,
    created: Vec<(AnchorId, Vec3)>,
    released: Vec<AnchorId>,
}

impl MockAnchorProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Anchors created so far, with their hit locations.
    pub fn created(&self) -> &[(AnchorId, Vec3)] {
        &self.created
    }

    /// Anchor ids released so far, in release order.
    pub fn released(&self) -> &[AnchorId] {
        &self.released
    }

    /// Anchors currently outstanding (created and not yet released).
    pub fn outstanding(&self) -> usize {
        self.created.len() - self.released.len()
    }
}

/// Shared handle so tests can keep inspecting the mock after handing it to a
/// `ScenePlacementManager`.
impl AnchorProvider for std::rc::Rc<std::cell::RefCell<MockAnchorProvider>> {
    fn create_anchor(&mut self, hit_location: Vec3) -> Result<AnchorId> {
        self.borrow_mut().create_anchor(hit_location)
    }

    fn release_anchor(&mut self, anchor_id: AnchorId) -> Result<()> {
        self.borrow_mut().release_anchor(anchor_id)
    }
}

impl AnchorProvider for MockAnchorProvider {
    fn create_anchor(&mut self, hit_location: Vec3) -> Result<AnchorId> {
        if self.fail_next_create {
            self.fail_next_create = false;
            return Err(FabricarError::PlacementFailed {
                reason: "mock: no trackable surface at hit location".to_string(),
            });
        }
        self.next_id += 1;
        self.created.push((self.next_id, hit_location));
        Ok(self.next_id)
    }

    fn release_anchor(&mut self, anchor_id: AnchorId) -> Result<()> {
        self.released.push(anchor_id);
        if self.failing_releases.contains(&anchor_id) {
            return Err(FabricarError::PlacementFailed {
                reason: format!("mock: release of anchor {} failed", anchor_id),
            });
        }
        Ok(())
    }
}

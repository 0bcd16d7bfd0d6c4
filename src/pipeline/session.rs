//! Generation pipeline orchestrator and AR session
//!
//! `GenerationPipeline` drives one `(prompt, mode)` request through the
//! remote client and the artifact store, publishing every state transition.
//! `ArSession` couples a pipeline with a `ScenePlacementManager` and feeds it
//! spatial input events, so a tap lands the ready artifact in the scene.
//!
//! The pipeline is single-writer by construction: all mutation goes through
//! `&mut self`, so two generate calls can never interleave. The state guard
//! enforces the same invariant explicitly for callers that retry too early.

use log::{info, warn};

use crate::config::{MAX_PROMPT_LEN, MIN_PROMPT_LEN};
use crate::error::{FabricarError, Result};
use crate::pipeline::state::PipelineState;
use crate::remote::{GenerationClient, GenerationMode};
use crate::scene::{PlacementId, ScenePlacementManager, SpatialEvent};
use crate::store::{ArtifactStore, LocalArtifact};

/// Callback invoked on every state transition, with the new state.
pub type StateObserver = Box<dyn FnMut(PipelineState)>;

/// Last failure, retained for display while the pipeline sits in `Error`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetainedError {
    pub code: &'static str,
    pub message: String,
}

impl From<&FabricarError> for RetainedError {
    fn from(e: &FabricarError) -> Self {
        Self {
            code: e.error_code(),
            message: e.to_string(),
        }
    }
}

/// Validate a prompt before any state transition.
///
/// Bounds the length and restricts characters to an allow-list; validation is
/// a precondition of `generate`, not a pipeline state.
pub fn validate_prompt(prompt: &str) -> Result<String> {
    let trimmed = prompt.trim();
    let len = trimmed.chars().count();

    if len < MIN_PROMPT_LEN {
        return Err(FabricarError::InvalidPrompt {
            reason: format!("prompt must be at least {} characters", MIN_PROMPT_LEN),
        });
    }
    if len > MAX_PROMPT_LEN {
        return Err(FabricarError::InvalidPrompt {
            reason: format!("prompt must be at most {} characters", MAX_PROMPT_LEN),
        });
    }
    if let Some(c) = trimmed
        .chars()
        .find(|c| !c.is_ascii_alphanumeric() && !matches!(c, ' ' | ',' | '.' | '\'' | '-'))
    {
        return Err(FabricarError::InvalidPrompt {
            reason: format!("disallowed character {:?}", c),
        });
    }

    Ok(trimmed.to_string())
}

/// Drives prompt → remote generation → download → persisted artifact.
pub struct GenerationPipeline {
    client: Box<dyn GenerationClient>,
    store: ArtifactStore,
    state: PipelineState,
    last_error: Option<RetainedError>,
    ready_artifact: Option<LocalArtifact>,
    observer: Option<StateObserver>,
}

impl GenerationPipeline {
    pub fn new(client: Box<dyn GenerationClient>, store: ArtifactStore) -> Self {
        Self {
            client,
            store,
            state: PipelineState::Initial,
            last_error: None,
            ready_artifact: None,
            observer: None,
        }
    }

    /// Register the observer notified on every state transition.
    pub fn set_observer(&mut self, observer: StateObserver) {
        self.observer = Some(observer);
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// The retained error, present only while the state is `Error`.
    pub fn last_error(&self) -> Option<&RetainedError> {
        self.last_error.as_ref()
    }

    /// The artifact waiting for placement, if generation has completed.
    ///
    /// Stays available across repeat placements until the next generate or
    /// session disposal.
    pub fn ready_artifact(&self) -> Option<&LocalArtifact> {
        self.ready_artifact.as_ref()
    }

    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    /// Signal that the AR capability has finished initializing.
    pub fn ar_ready(&mut self) {
        if self.state == PipelineState::Initial {
            self.transition(PipelineState::Idle);
        }
    }

    /// Run one generation request to completion.
    ///
    /// Precondition failures (invalid prompt, busy pipeline, session not
    /// ready) are returned synchronously without any state transition. Remote
    /// and storage failures land the pipeline in `Error` with the reason
    /// retained, and are returned as well.
    pub fn generate(&mut self, prompt: &str, mode: GenerationMode) -> Result<LocalArtifact> {
        match self.state {
            PipelineState::Disposed => return Err(FabricarError::SessionDisposed),
            PipelineState::Initial => return Err(FabricarError::SessionNotReady),
            s if s.is_busy() => {
                return Err(FabricarError::PipelineBusy {
                    state: s.to_string(),
                })
            }
            _ => {}
        }

        let prompt = validate_prompt(prompt)?;

        self.last_error = None;
        self.ready_artifact = None;
        self.transition(PipelineState::Generating);

        let handle = match self.client.request_generation(&prompt, mode) {
            Ok(handle) => handle,
            Err(e) => return self.fail(e),
        };

        self.transition(PipelineState::Downloading);

        let bytes = match self.client.download(&handle) {
            Ok(bytes) => bytes,
            Err(e) => return self.fail(e),
        };

        let artifact = match self.store.persist(&handle.artifact_id, &prompt, &bytes) {
            Ok(artifact) => artifact,
            Err(e) => return self.fail(e),
        };

        self.ready_artifact = Some(artifact.clone());
        self.transition(PipelineState::Ready);
        Ok(artifact)
    }

    /// Acknowledge the retained error and return to `Idle`.
    /// Ignored outside the `Error` state.
    pub fn dismiss_error(&mut self) {
        if self.state == PipelineState::Error {
            self.last_error = None;
            self.transition(PipelineState::Idle);
        }
    }

    /// Tear the pipeline down. Terminal; every later command is refused.
    pub fn dispose(&mut self) {
        if self.state != PipelineState::Disposed {
            self.ready_artifact = None;
            self.last_error = None;
            self.transition(PipelineState::Disposed);
        }
    }

    /// Called after a successful placement from `Ready`; the artifact stays
    /// available for repeat placement.
    pub(crate) fn artifact_placed(&mut self) {
        if self.state == PipelineState::Ready {
            self.transition(PipelineState::Idle);
        }
    }

    fn fail<T>(&mut self, error: FabricarError) -> Result<T> {
        warn!("Generation failed: {}", error);
        self.last_error = Some(RetainedError::from(&error));
        self.transition(PipelineState::Error);
        Err(error)
    }

    fn transition(&mut self, next: PipelineState) {
        info!("Pipeline: {} -> {}", self.state, next);
        self.state = next;
        if let Some(observer) = self.observer.as_mut() {
            observer(next);
        }
    }

    #[cfg(test)]
    fn force_state(&mut self, state: PipelineState) {
        self.state = state;
    }
}

/// One live AR session: pipeline plus scene, torn down together.
pub struct ArSession {
    pipeline: GenerationPipeline,
    scene: ScenePlacementManager,
}

impl ArSession {
    pub fn new(pipeline: GenerationPipeline, scene: ScenePlacementManager) -> Self {
        Self { pipeline, scene }
    }

    pub fn ar_ready(&mut self) {
        self.pipeline.ar_ready();
    }

    pub fn generate(&mut self, prompt: &str, mode: GenerationMode) -> Result<LocalArtifact> {
        self.pipeline.generate(prompt, mode)
    }

    pub fn state(&self) -> PipelineState {
        self.pipeline.state()
    }

    pub fn last_error(&self) -> Option<&RetainedError> {
        self.pipeline.last_error()
    }

    pub fn dismiss_error(&mut self) {
        self.pipeline.dismiss_error();
    }

    pub fn pipeline(&self) -> &GenerationPipeline {
        &self.pipeline
    }

    pub fn scene(&self) -> &ScenePlacementManager {
        &self.scene
    }

    /// Dispatch one spatial input event.
    ///
    /// A tap places the retained ready artifact, returning its new placement
    /// id; taps with nothing to place resolve to `Ok(None)`. A placement
    /// failure is returned directly and leaves the pipeline state untouched —
    /// the user may simply tap again. Gesture-end events mutate the target
    /// object's transform and resolve to `Ok(None)`.
    pub fn handle_event(&mut self, event: SpatialEvent) -> Result<Option<PlacementId>> {
        match event {
            SpatialEvent::Tap { hit_location } => {
                if self.pipeline.state().is_terminal() {
                    return Ok(None);
                }
                let artifact = match self.pipeline.ready_artifact() {
                    Some(a) => a.clone(),
                    None => return Ok(None),
                };
                let placement_id = self.scene.place(&artifact, hit_location)?;
                self.pipeline.artifact_placed();
                Ok(Some(placement_id))
            }
            SpatialEvent::DragEnd {
                placement_id,
                translation,
            } => {
                self.scene.update_transform(
                    placement_id,
                    &crate::scene::TransformDelta::translation(translation),
                );
                Ok(None)
            }
            SpatialEvent::RotateEnd {
                placement_id,
                rotation,
            } => {
                self.scene.update_transform(
                    placement_id,
                    &crate::scene::TransformDelta::rotation(rotation),
                );
                Ok(None)
            }
        }
    }

    pub fn rescale(&mut self, placement_id: PlacementId, multiplier: f32) {
        self.scene.rescale(placement_id, multiplier);
    }

    pub fn remove_one(&mut self, placement_id: PlacementId) -> bool {
        self.scene.remove_one(placement_id)
    }

    /// Clear every placed object. The pipeline's ready artifact is kept and
    /// stays placeable; only a new generation or disposal revokes it.
    pub fn remove_all(&mut self) {
        self.scene.remove_all();
    }

    /// Dispose the whole session: clear the scene (releasing every anchor)
    /// and terminate the pipeline.
    pub fn dispose(&mut self) {
        self.scene.remove_all();
        self.pipeline.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::mock::{MockFailure, MockGenerationClient, MockOutcome};
    use crate::scene::mock::MockAnchorProvider;
    use glam::Vec3;
    use std::cell::RefCell;
    use std::rc::Rc;
    use tempfile::TempDir;

    fn pipeline_with(client: MockGenerationClient, root: &TempDir) -> GenerationPipeline {
        let store = ArtifactStore::open(root.path(), None).unwrap();
        GenerationPipeline::new(Box::new(client), store)
    }

    fn ready_pipeline(client: MockGenerationClient, root: &TempDir) -> GenerationPipeline {
        let mut pipeline = pipeline_with(client, root);
        pipeline.ar_ready();
        pipeline
    }

    #[test]
    fn test_validate_prompt() {
        assert!(validate_prompt("a wooden chair").is_ok());
        assert_eq!(validate_prompt("  padded  ").unwrap(), "padded");
        assert!(validate_prompt("ab").is_err());
        assert!(validate_prompt(&"x".repeat(201)).is_err());
        assert!(validate_prompt("chair <script>").is_err());
        assert!(validate_prompt("mid-century chair, dark oak").is_ok());
    }

    #[test]
    fn test_successful_generate_visits_states_in_order() {
        let root = TempDir::new().unwrap();
        let client = MockGenerationClient::new();
        client.push_success("a1", 40_000);

        let mut pipeline = ready_pipeline(client, &root);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        pipeline.set_observer(Box::new(move |s| sink.borrow_mut().push(s)));

        let artifact = pipeline
            .generate("wooden chair", GenerationMode::Basic)
            .unwrap();
        assert_eq!(artifact.artifact_id, "a1");
        assert_eq!(
            *seen.borrow(),
            vec![
                PipelineState::Generating,
                PipelineState::Downloading,
                PipelineState::Ready
            ]
        );

        let listed = pipeline.store().list_generated().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].artifact_id, "a1");
        assert_eq!(listed[0].prompt, "wooden chair");
        assert_eq!(pipeline.state(), PipelineState::Ready);
    }

    #[test]
    fn test_invalid_prompt_rejected_without_transition() {
        let root = TempDir::new().unwrap();
        let mut pipeline = ready_pipeline(MockGenerationClient::new(), &root);

        let err = pipeline.generate("x", GenerationMode::Basic).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_PROMPT");
        assert_eq!(pipeline.state(), PipelineState::Idle);
        assert!(pipeline.last_error().is_none());
    }

    #[test]
    fn test_generate_refused_before_ar_ready() {
        let root = TempDir::new().unwrap();
        let mut pipeline = pipeline_with(MockGenerationClient::new(), &root);

        let err = pipeline
            .generate("wooden chair", GenerationMode::Basic)
            .unwrap_err();
        assert_eq!(err.error_code(), "SESSION_NOT_READY");
        assert_eq!(pipeline.state(), PipelineState::Initial);
    }

    #[test]
    fn test_generate_refused_while_busy() {
        let root = TempDir::new().unwrap();
        let mut pipeline = ready_pipeline(MockGenerationClient::new(), &root);
        pipeline.force_state(PipelineState::Downloading);

        let err = pipeline
            .generate("wooden chair", GenerationMode::Basic)
            .unwrap_err();
        assert_eq!(err.error_code(), "PIPELINE_BUSY");
    }

    #[test]
    fn test_download_timeout_lands_in_error_with_reason() {
        let root = TempDir::new().unwrap();
        let client = MockGenerationClient::new();
        client.push_outcome(MockOutcome::FailDownload(MockFailure::Timeout));

        let mut pipeline = ready_pipeline(client, &root);
        let err = pipeline
            .generate("wooden chair", GenerationMode::Basic)
            .unwrap_err();

        assert_eq!(err.error_code(), "REMOTE_TIMEOUT");
        assert_eq!(pipeline.state(), PipelineState::Error);
        assert_eq!(pipeline.last_error().unwrap().code, "REMOTE_TIMEOUT");
        // Nothing was persisted.
        assert!(pipeline.store().list_generated().unwrap().is_empty());

        pipeline.dismiss_error();
        assert_eq!(pipeline.state(), PipelineState::Idle);
        assert!(pipeline.last_error().is_none());
    }

    #[test]
    fn test_generation_failure_lands_in_error() {
        let root = TempDir::new().unwrap();
        let client = MockGenerationClient::new();
        client.push_outcome(MockOutcome::FailGeneration(MockFailure::Rejected));

        let mut pipeline = ready_pipeline(client, &root);
        let err = pipeline
            .generate("wooden chair", GenerationMode::Basic)
            .unwrap_err();
        assert_eq!(err.error_code(), "REMOTE_REJECTED");
        assert_eq!(pipeline.state(), PipelineState::Error);
    }

    #[test]
    fn test_generate_can_be_reinvoked_from_error() {
        let root = TempDir::new().unwrap();
        let client = MockGenerationClient::new();
        client.push_outcome(MockOutcome::FailGeneration(MockFailure::Unavailable));
        client.push_success("a2", 128);

        let mut pipeline = ready_pipeline(client, &root);
        assert!(pipeline.generate("wooden chair", GenerationMode::Basic).is_err());

        let artifact = pipeline
            .generate("wooden chair", GenerationMode::Advanced)
            .unwrap();
        assert_eq!(artifact.artifact_id, "a2");
        assert_eq!(pipeline.state(), PipelineState::Ready);
        assert!(pipeline.last_error().is_none());
    }

    #[test]
    fn test_dispose_is_terminal() {
        let root = TempDir::new().unwrap();
        let mut pipeline = ready_pipeline(MockGenerationClient::new(), &root);
        pipeline.dispose();

        assert_eq!(pipeline.state(), PipelineState::Disposed);
        let err = pipeline
            .generate("wooden chair", GenerationMode::Basic)
            .unwrap_err();
        assert_eq!(err.error_code(), "SESSION_DISPOSED");
    }

    fn session_with(client: MockGenerationClient) -> (ArSession, TempDir) {
        let root = TempDir::new().unwrap();
        let pipeline = ready_pipeline(client, &root);
        let scene = ScenePlacementManager::new(Box::new(MockAnchorProvider::new()));
        (ArSession::new(pipeline, scene), root)
    }

    #[test]
    fn test_tap_places_ready_artifact_and_drains_to_idle() {
        let client = MockGenerationClient::new();
        client.push_success("a1", 40_000);
        let (mut session, _root) = session_with(client);

        session.generate("wooden chair", GenerationMode::Basic).unwrap();
        assert_eq!(session.state(), PipelineState::Ready);

        let placed = session
            .handle_event(SpatialEvent::Tap {
                hit_location: Vec3::new(0.0, 0.0, -1.0),
            })
            .unwrap();
        assert!(placed.is_some());
        assert_eq!(session.scene().len(), 1);
        assert_eq!(session.state(), PipelineState::Idle);
    }

    #[test]
    fn test_repeat_placement_of_same_artifact() {
        let client = MockGenerationClient::new();
        client.push_success("a1", 40_000);
        let (mut session, _root) = session_with(client);

        session.generate("wooden chair", GenerationMode::Basic).unwrap();
        session
            .handle_event(SpatialEvent::Tap {
                hit_location: Vec3::ZERO,
            })
            .unwrap();
        session
            .handle_event(SpatialEvent::Tap {
                hit_location: Vec3::new(1.0, 0.0, 0.0),
            })
            .unwrap();

        assert_eq!(session.scene().len(), 2);
        let ids = session.scene().placement_ids();
        assert_ne!(ids[0], ids[1]);
        for id in ids {
            assert_eq!(session.scene().get(id).unwrap().artifact_id, "a1");
        }
    }

    #[test]
    fn test_tap_with_nothing_ready_is_ignored() {
        let (mut session, _root) = session_with(MockGenerationClient::new());

        let placed = session
            .handle_event(SpatialEvent::Tap {
                hit_location: Vec3::ZERO,
            })
            .unwrap();
        assert!(placed.is_none());
        assert!(session.scene().is_empty());
    }

    #[test]
    fn test_remove_all_keeps_ready_artifact_placeable() {
        let client = MockGenerationClient::new();
        client.push_success("a1", 40_000);
        let (mut session, _root) = session_with(client);

        session.generate("wooden chair", GenerationMode::Basic).unwrap();
        session
            .handle_event(SpatialEvent::Tap {
                hit_location: Vec3::ZERO,
            })
            .unwrap();
        session.remove_all();
        assert!(session.scene().is_empty());

        // Policy: clearing the scene does not revoke the retained artifact.
        let placed = session
            .handle_event(SpatialEvent::Tap {
                hit_location: Vec3::ZERO,
            })
            .unwrap();
        assert!(placed.is_some());
        assert_eq!(session.scene().len(), 1);
    }

    #[test]
    fn test_deleting_artifact_does_not_disturb_placements() {
        let client = MockGenerationClient::new();
        client.push_success("a1", 40_000);
        let (mut session, _root) = session_with(client);

        session.generate("wooden chair", GenerationMode::Basic).unwrap();
        let placed = session
            .handle_event(SpatialEvent::Tap {
                hit_location: Vec3::ZERO,
            })
            .unwrap()
            .unwrap();
        session
            .handle_event(SpatialEvent::DragEnd {
                placement_id: placed,
                translation: Vec3::new(0.25, 0.0, 0.0),
            })
            .unwrap();

        assert!(session.pipeline().store().delete("a1"));

        let object = session.scene().get(placed).unwrap();
        assert_eq!(object.artifact_id, "a1");
        assert_eq!(object.transform.position, Vec3::new(0.25, 0.0, 0.0));
    }

    #[test]
    fn test_dispose_clears_scene_and_terminates_pipeline() {
        let client = MockGenerationClient::new();
        client.push_success("a1", 40_000);
        let (mut session, _root) = session_with(client);

        session.generate("wooden chair", GenerationMode::Basic).unwrap();
        session
            .handle_event(SpatialEvent::Tap {
                hit_location: Vec3::ZERO,
            })
            .unwrap();

        session.dispose();
        assert!(session.scene().is_empty());
        assert_eq!(session.state(), PipelineState::Disposed);

        // Taps after disposal do nothing.
        let placed = session
            .handle_event(SpatialEvent::Tap {
                hit_location: Vec3::ZERO,
            })
            .unwrap();
        assert!(placed.is_none());
    }
}

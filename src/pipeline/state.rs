//! Pipeline state machine
//!
//! ```text
//! Initial --(AR capability ready)--> Idle
//! Idle --(generate)--> Generating
//! Generating --(remote handle received)--> Downloading
//! Generating --(remote failure)--> Error
//! Downloading --(artifact persisted)--> Ready
//! Downloading --(download/storage failure)--> Error
//! Ready --(spatial tap places the artifact)--> Idle
//! Error --(dismiss)--> Idle
//! any --(dispose)--> Disposed (terminal)
//! ```
//!
//! `Generating` and `Downloading` are split so the UI can show distinct
//! progress messaging and a failure can be attributed to the right stage.
//! `Ready` drains back to `Idle` on placement rather than into a terminal
//! "placed" state, because one generated artifact is expected to be placed
//! many times without another remote round-trip.

use std::fmt;

/// Current stage of the generation pipeline. Exactly one per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PipelineState {
    /// AR capability not ready yet; generation is refused.
    #[default]
    Initial,
    /// Ready for a new generation request.
    Idle,
    /// Remote generation job in flight.
    Generating,
    /// Remote job finished; artifact download/persist in flight.
    Downloading,
    /// An artifact is downloaded, persisted, and waiting for a spatial tap.
    Ready,
    /// The last generation failed; the error is retained for display.
    Error,
    /// Session disposed. Terminal.
    Disposed,
}

impl PipelineState {
    /// Whether a `generate` call is accepted in this state.
    ///
    /// `Error` is included: the caller may re-invoke generation immediately
    /// without an explicit dismiss.
    pub fn accepts_generate(&self) -> bool {
        matches!(self, Self::Idle | Self::Ready | Self::Error)
    }

    /// Whether a remote operation is currently in flight.
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Generating | Self::Downloading)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Disposed)
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineState::Initial => "Initial",
            PipelineState::Idle => "Idle",
            PipelineState::Generating => "Generating",
            PipelineState::Downloading => "Downloading",
            PipelineState::Ready => "Ready",
            PipelineState::Error => "Error",
            PipelineState::Disposed => "Disposed",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_initial() {
        assert_eq!(PipelineState::default(), PipelineState::Initial);
    }

    #[test]
    fn test_accepts_generate() {
        assert!(PipelineState::Idle.accepts_generate());
        assert!(PipelineState::Ready.accepts_generate());
        assert!(PipelineState::Error.accepts_generate());
        assert!(!PipelineState::Initial.accepts_generate());
        assert!(!PipelineState::Generating.accepts_generate());
        assert!(!PipelineState::Downloading.accepts_generate());
        assert!(!PipelineState::Disposed.accepts_generate());
    }

    #[test]
    fn test_busy_states() {
        assert!(PipelineState::Generating.is_busy());
        assert!(PipelineState::Downloading.is_busy());
        assert!(!PipelineState::Ready.is_busy());
    }

    #[test]
    fn test_display() {
        assert_eq!(PipelineState::Downloading.to_string(), "Downloading");
        assert_eq!(PipelineState::Disposed.to_string(), "Disposed");
    }
}

//! Error handling for Fabricar
//!
//! Every failure the core can produce is a variant here; nothing is fatal to
//! the process. Remote and storage failures during generation land the
//! pipeline in the `Error` state with the variant retained for display;
//! placement failures are returned directly to the caller.

use std::path::PathBuf;
use thiserror::Error;
use uuid::Uuid;

/// Result type alias for Fabricar operations
pub type Result<T> = std::result::Result<T, FabricarError>;

/// Main error type for Fabricar operations
#[derive(Error, Debug)]
pub enum FabricarError {
    // Input Errors
    #[error("Invalid prompt: {reason}")]
    InvalidPrompt { reason: String },

    // Pipeline Errors
    #[error("Pipeline is busy ({state}); wait for the current generation to finish")]
    PipelineBusy { state: String },

    #[error("AR session is not ready yet")]
    SessionNotReady,

    #[error("AR session has been disposed")]
    SessionDisposed,

    // Remote Errors
    #[error("Generation service unreachable: {reason}")]
    RemoteUnavailable { reason: String },

    #[error("Generation service rejected the request: {message}")]
    RemoteRejected { message: String },

    #[error("Generation service timed out after {timeout_ms} ms")]
    RemoteTimeout { timeout_ms: u64 },

    #[error("Generation service returned an empty payload for artifact {artifact_id}")]
    RemoteEmptyPayload { artifact_id: String },

    // Storage Errors
    #[error("Failed to write artifact to storage: {path}: {reason}")]
    StorageWriteFailed { path: PathBuf, reason: String },

    // Placement Errors
    #[error("Placement failed: {reason}")]
    PlacementFailed { reason: String },

    #[error("Unknown placement: {placement_id}")]
    UnknownPlacement { placement_id: Uuid },

    // I/O Errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl FabricarError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            FabricarError::InvalidPrompt { .. } => "INVALID_PROMPT",
            FabricarError::PipelineBusy { .. } => "PIPELINE_BUSY",
            FabricarError::SessionNotReady => "SESSION_NOT_READY",
            FabricarError::SessionDisposed => "SESSION_DISPOSED",
            FabricarError::RemoteUnavailable { .. } => "REMOTE_UNAVAILABLE",
            FabricarError::RemoteRejected { .. } => "REMOTE_REJECTED",
            FabricarError::RemoteTimeout { .. } => "REMOTE_TIMEOUT",
            FabricarError::RemoteEmptyPayload { .. } => "REMOTE_EMPTY_PAYLOAD",
            FabricarError::StorageWriteFailed { .. } => "STORAGE_WRITE_FAILED",
            FabricarError::PlacementFailed { .. } => "PLACEMENT_FAILED",
            FabricarError::UnknownPlacement { .. } => "UNKNOWN_PLACEMENT",
            FabricarError::Io(_) => "IO_ERROR",
            FabricarError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Check if this error is recoverable by re-invoking the failed operation
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            FabricarError::SessionDisposed | FabricarError::StorageWriteFailed { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = FabricarError::InvalidPrompt {
            reason: "too short".to_string(),
        };
        assert_eq!(err.error_code(), "INVALID_PROMPT");

        let err = FabricarError::RemoteTimeout { timeout_ms: 1000 };
        assert_eq!(err.error_code(), "REMOTE_TIMEOUT");

        let err = FabricarError::PlacementFailed {
            reason: "no plane".to_string(),
        };
        assert_eq!(err.error_code(), "PLACEMENT_FAILED");
    }

    #[test]
    fn test_recoverability() {
        assert!(FabricarError::RemoteTimeout { timeout_ms: 1000 }.is_recoverable());
        assert!(FabricarError::PlacementFailed {
            reason: "tracking lost".to_string()
        }
        .is_recoverable());
        assert!(!FabricarError::SessionDisposed.is_recoverable());
        assert!(!FabricarError::StorageWriteFailed {
            path: PathBuf::from("/tmp/x.glb"),
            reason: "disk full".to_string()
        }
        .is_recoverable());
    }

    #[test]
    fn test_display_includes_context() {
        let err = FabricarError::RemoteTimeout { timeout_ms: 300_000 };
        assert!(err.to_string().contains("300000"));

        let err = FabricarError::RemoteRejected {
            message: "quota exceeded".to_string(),
        };
        assert!(err.to_string().contains("quota exceeded"));
    }
}

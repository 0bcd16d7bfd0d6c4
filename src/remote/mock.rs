//! Mock generation client for testing
//!
//! Simulates the remote service without network access: serves scripted
//! artifacts and failures so the pipeline can be exercised deterministically.

use super::client::{GenerationClient, GenerationMode, RemoteArtifactHandle};
use crate::error::{FabricarError, Result};

use std::cell::RefCell;
use std::collections::VecDeque;

/// What the mock should do on the next call.
#[derive(Debug, Clone)]
pub enum MockOutcome {
    /// Succeed, producing the given artifact id and payload.
    Succeed { artifact_id: String, bytes: Vec<u8> },
    /// Fail the generation request itself.
    FailGeneration(MockFailure),
    /// Hand out a handle, then fail the download.
    FailDownload(MockFailure),
}

/// Failure kinds the mock can inject, mirroring the remote error taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockFailure {
    Unavailable,
    Rejected,
    Timeout,
    EmptyPayload,
}

impl MockFailure {
    fn into_error(self, artifact_id: &str) -> FabricarError {
        match self {
            Self::Unavailable => FabricarError::RemoteUnavailable {
                reason: "mock: connection refused".to_string(),
            },
            Self::Rejected => FabricarError::RemoteRejected {
                message: "mock: generation rejected".to_string(),
            },
            Self::Timeout => FabricarError::RemoteTimeout { timeout_ms: 300_000 },
            Self::EmptyPayload => FabricarError::RemoteEmptyPayload {
                artifact_id: artifact_id.to_string(),
            },
        }
    }
}

/// Scripted stand-in for [`HttpGenerationClient`].
///
/// Outcomes are consumed in FIFO order, one per `request_generation` call.
/// An exhausted script succeeds with a small synthetic payload.
pub struct MockGenerationClient {
    script: RefCell<VecDeque<MockOutcome>>,
    pending_download_failure: RefCell<Option<MockFailure>>,
    pending_payload: RefCell<Option<Vec<u8>>>,
    requests: RefCell<Vec<(String, GenerationMode)>>,
    fallback_counter: RefCell<u32>,
}

impl MockGenerationClient {
    pub fn new() -> Self {
        Self {
            script: RefCell::new(VecDeque::new()),
            pending_download_failure: RefCell::new(None),
            pending_payload: RefCell::new(None),
            requests: RefCell::new(Vec::new()),
            fallback_counter: RefCell::new(0),
        }
    }

    /// Queue an outcome for the next generation call.
    pub fn push_outcome(&self, outcome: MockOutcome) {
        self.script.borrow_mut().push_back(outcome);
    }

    /// Convenience: queue a success with the given id and payload size.
    pub fn push_success(&self, artifact_id: &str, payload_len: usize) {
        self.push_outcome(MockOutcome::Succeed {
            artifact_id: artifact_id.to_string(),
            bytes: vec![0x42; payload_len],
        });
    }

    /// Prompts and modes seen so far, in call order.
    pub fn requests(&self) -> Vec<(String, GenerationMode)> {
        self.requests.borrow().clone()
    }
}

impl Default for MockGenerationClient {
    fn default() -> Self {
        Self::new()
    }
}

impl GenerationClient for MockGenerationClient {
    fn request_generation(
        &self,
        prompt: &str,
        mode: GenerationMode,
    ) -> Result<RemoteArtifactHandle> {
        self.requests
            .borrow_mut()
            .push((prompt.to_string(), mode));

        let outcome = self.script.borrow_mut().pop_front().unwrap_or_else(|| {
            let mut n = self.fallback_counter.borrow_mut();
            *n += 1;
            MockOutcome::Succeed {
                artifact_id: format!("mock-{}", n),
                bytes: b"glTF mock payload".to_vec(),
            }
        });

        match outcome {
            MockOutcome::Succeed { artifact_id, bytes } => {
                let handle = RemoteArtifactHandle {
                    artifact_id: artifact_id.clone(),
                    download_locator: format!("/api/models/download/{}", artifact_id),
                };
                // Stash the payload for the matching download call.
                *self.pending_download_failure.borrow_mut() = None;
                *self.pending_payload.borrow_mut() = Some(bytes);
                Ok(handle)
            }
            MockOutcome::FailGeneration(failure) => Err(failure.into_error("")),
            MockOutcome::FailDownload(failure) => {
                let handle = RemoteArtifactHandle {
                    artifact_id: "mock-doomed".to_string(),
                    download_locator: "/api/models/download/mock-doomed".to_string(),
                };
                *self.pending_download_failure.borrow_mut() = Some(failure);
                *self.pending_payload.borrow_mut() = None;
                Ok(handle)
            }
        }
    }

    fn download(&self, handle: &RemoteArtifactHandle) -> Result<Vec<u8>> {
        if let Some(failure) = self.pending_download_failure.borrow_mut().take() {
            return Err(failure.into_error(&handle.artifact_id));
        }

        let bytes = self
            .pending_payload
            .borrow_mut()
            .take()
            .unwrap_or_else(|| b"glTF mock payload".to_vec());

        if bytes.is_empty() {
            return Err(FabricarError::RemoteEmptyPayload {
                artifact_id: handle.artifact_id.clone(),
            });
        }
        Ok(bytes)
    }
}

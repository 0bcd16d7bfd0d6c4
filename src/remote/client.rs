//! HTTP client for the remote text-to-3D generation service
//!
//! The service exposes two operations: submit a prompt for generation and
//! download the resulting binary. Retrying `download` is safe; retrying
//! `request_generation` is not, because every call starts a new remote job
//! with a fresh artifact id. Retry policy therefore lives above this layer.

use crate::config::{DEFAULT_API_URL, DEFAULT_TIMEOUT_MS};
use crate::error::{FabricarError, Result};

use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Remote generation algorithm selection.
///
/// `Basic` is the direct text-to-3D path (a few seconds); `Advanced` runs a
/// two-stage text-to-image-to-3D pipeline with better geometry at the cost of
/// a much longer wait. The client treats both identically apart from latency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMode {
    Basic,
    Advanced,
}

impl Default for GenerationMode {
    fn default() -> Self {
        Self::Basic
    }
}

impl GenerationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Advanced => "advanced",
        }
    }
}

impl std::fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Handle to a remotely generated artifact that has not been downloaded yet.
///
/// Immutable; its lifetime ends once the artifact is downloaded or the
/// pipeline resets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteArtifactHandle {
    /// Opaque unique id assigned by the service.
    pub artifact_id: String,
    /// Server-relative download path, e.g. `/api/models/download/<id>`.
    pub download_locator: String,
}

/// Interface to the remote generation service.
///
/// Implemented by [`HttpGenerationClient`] for the real service and by
/// `remote::mock::MockGenerationClient` for tests.
pub trait GenerationClient {
    /// Submit a prompt and return a handle to the remote artifact.
    fn request_generation(&self, prompt: &str, mode: GenerationMode)
        -> Result<RemoteArtifactHandle>;

    /// Download the artifact binary. Rejects a zero-length payload.
    fn download(&self, handle: &RemoteArtifactHandle) -> Result<Vec<u8>>;
}

/// Request body for the generate endpoint
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    prompt: &'a str,
    mode: GenerationMode,
}

/// Response body from the generate endpoint
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    status: String,
    #[serde(default)]
    message: String,
    model_id: String,
    download_url: String,
}

/// Real service client backed by `reqwest::blocking`.
pub struct HttpGenerationClient {
    base_url: String,
    timeout_ms: u64,
}

impl HttpGenerationClient {
    /// Create a client against the default service URL and timeout.
    pub fn new() -> Self {
        Self::with_config(DEFAULT_API_URL.to_string(), DEFAULT_TIMEOUT_MS)
    }

    /// Create a client with explicit base URL and request timeout.
    pub fn with_config(base_url: String, timeout_ms: u64) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout_ms,
        }
    }

    /// Check whether the service answers its health probe.
    ///
    /// Advisory only; uses a short fixed timeout so the caller is never
    /// blocked behind the full generation timeout just to find out the
    /// service is down.
    pub fn is_reachable(&self) -> bool {
        let client = match reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
        {
            Ok(c) => c,
            Err(_) => return false,
        };

        let url = format!("{}/health", self.base_url);
        match client.get(&url).send() {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    fn build_client(&self) -> Result<reqwest::blocking::Client> {
        reqwest::blocking::Client::builder()
            .timeout(Duration::from_millis(self.timeout_ms))
            .build()
            .map_err(|e| FabricarError::RemoteUnavailable {
                reason: e.to_string(),
            })
    }

    fn map_send_error(&self, e: reqwest::Error) -> FabricarError {
        if e.is_timeout() {
            FabricarError::RemoteTimeout {
                timeout_ms: self.timeout_ms,
            }
        } else if e.is_connect() {
            FabricarError::RemoteUnavailable {
                reason: format!("cannot connect to {}: {}", self.base_url, e),
            }
        } else {
            FabricarError::RemoteUnavailable {
                reason: e.to_string(),
            }
        }
    }
}

impl Default for HttpGenerationClient {
    fn default() -> Self {
        Self::new()
    }
}

impl GenerationClient for HttpGenerationClient {
    fn request_generation(
        &self,
        prompt: &str,
        mode: GenerationMode,
    ) -> Result<RemoteArtifactHandle> {
        let client = self.build_client()?;
        let url = format!("{}/api/models/generate", self.base_url);

        info!("Requesting {} generation: \"{}\"", mode, prompt);

        let response = client
            .post(&url)
            .json(&GenerateRequest { prompt, mode })
            .send()
            .map_err(|e| self.map_send_error(e))?;

        if !response.status().is_success() {
            return Err(FabricarError::RemoteRejected {
                message: format!("service returned {}", response.status()),
            });
        }

        let body: GenerateResponse =
            response
                .json()
                .map_err(|e| FabricarError::RemoteRejected {
                    message: format!("invalid response body: {}", e),
                })?;

        if body.status != "success" {
            return Err(FabricarError::RemoteRejected {
                message: body.message,
            });
        }

        debug!("Remote artifact created: {}", body.model_id);

        Ok(RemoteArtifactHandle {
            artifact_id: body.model_id,
            download_locator: body.download_url,
        })
    }

    fn download(&self, handle: &RemoteArtifactHandle) -> Result<Vec<u8>> {
        let client = self.build_client()?;
        let url = format!("{}{}", self.base_url, handle.download_locator);

        debug!("Downloading artifact {} from {}", handle.artifact_id, url);

        let response = client.get(&url).send().map_err(|e| self.map_send_error(e))?;

        if !response.status().is_success() {
            return Err(FabricarError::RemoteRejected {
                message: format!("download returned {}", response.status()),
            });
        }

        let bytes = response
            .bytes()
            .map_err(|e| self.map_send_error(e))?
            .to_vec();

        if bytes.is_empty() {
            return Err(FabricarError::RemoteEmptyPayload {
                artifact_id: handle.artifact_id.clone(),
            });
        }

        info!(
            "Downloaded artifact {} ({} bytes)",
            handle.artifact_id,
            bytes.len()
        );
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_as_str() {
        assert_eq!(GenerationMode::Basic.as_str(), "basic");
        assert_eq!(GenerationMode::Advanced.as_str(), "advanced");
        assert_eq!(GenerationMode::default(), GenerationMode::Basic);
    }

    #[test]
    fn test_mode_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&GenerationMode::Advanced).unwrap(),
            "\"advanced\""
        );
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = HttpGenerationClient::with_config("http://host:8000/".to_string(), 1000);
        assert_eq!(client.base_url, "http://host:8000");
    }

    #[test]
    fn test_generate_response_parses_backend_shape() {
        let body = r#"{
            "status": "success",
            "message": "3D model generated successfully",
            "model_id": "abc123-456def-789ghi",
            "download_url": "/api/models/download/abc123-456def-789ghi"
        }"#;
        let parsed: GenerateResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.status, "success");
        assert_eq!(parsed.model_id, "abc123-456def-789ghi");
        assert_eq!(
            parsed.download_url,
            "/api/models/download/abc123-456def-789ghi"
        );
    }
}

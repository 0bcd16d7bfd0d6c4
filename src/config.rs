//! Runtime configuration
//!
//! All knobs are read from `FABRICAR_*` environment variables with sensible
//! defaults; environment variables take precedence.

use std::env;
use std::path::PathBuf;

/// Default base URL of the generation service.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Default remote request timeout. Advanced-mode generation runs a two-stage
/// remote pipeline, so the bound has to cover minutes, not seconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 300_000;

/// Prompt length bounds (characters, after trimming).
pub const MIN_PROMPT_LEN: usize = 3;
pub const MAX_PROMPT_LEN: usize = 200;

/// Configuration for the generation pipeline and artifact storage.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the remote generation service.
    pub api_url: String,
    /// Timeout for remote generate/download calls, in milliseconds.
    pub timeout_ms: u64,
    /// Root directory for generated artifacts and their metadata.
    pub storage_dir: PathBuf,
    /// Directory holding the read-only bundled demo catalog, if any.
    pub bundled_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            storage_dir: PathBuf::from("fabricar-models"),
            bundled_dir: None,
        }
    }
}

impl Config {
    /// Build a configuration from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        let api_url =
            env::var("FABRICAR_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let timeout_ms = env::var("FABRICAR_TIMEOUT_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_MS);
        let storage_dir = env::var("FABRICAR_STORAGE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("fabricar-models"));
        let bundled_dir = env::var("FABRICAR_BUNDLED_DIR").ok().map(PathBuf::from);

        Self {
            api_url,
            timeout_ms,
            storage_dir,
            bundled_dir,
        }
    }

    /// Override the storage root, keeping everything else.
    pub fn with_storage_dir(mut self, dir: PathBuf) -> Self {
        self.storage_dir = dir;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.timeout_ms, DEFAULT_TIMEOUT_MS);
        assert!(config.bundled_dir.is_none());
    }

    #[test]
    fn test_with_storage_dir() {
        let config = Config::default().with_storage_dir(PathBuf::from("/tmp/models"));
        assert_eq!(config.storage_dir, PathBuf::from("/tmp/models"));
        assert_eq!(config.api_url, DEFAULT_API_URL);
    }
}

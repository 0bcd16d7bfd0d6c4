//! Remote generation service interface
//!
//! This module provides:
//! - `GenerationClient` trait over the text-to-3D service
//! - `HttpGenerationClient` against the real REST API
//! - Mock implementation for testing without network access

mod client;
pub mod mock;

pub use client::{GenerationClient, GenerationMode, HttpGenerationClient, RemoteArtifactHandle};

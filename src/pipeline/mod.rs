//! Generation pipeline and session orchestration
//!
//! This module provides:
//! - `PipelineState` state machine visible to the UI
//! - `GenerationPipeline` driving prompt → remote generation → download →
//!   persisted artifact
//! - `ArSession` coupling the pipeline with the scene placement manager

mod session;
mod state;

pub use session::{validate_prompt, ArSession, GenerationPipeline, RetainedError, StateObserver};
pub use state::PipelineState;

//! Render pipeline construction and execution.
//!
//! This module provides:
//! - The pipeline builder and its settings
//! - The render pipeline itself
//! - The result envelope every render produces
//! - Injectable renderer, state serializer, and error hook strategies

mod config;
mod engine;
mod envelope;
mod hooks;

#[cfg(test)]
mod integration_tests;

pub use config::{PipelineBuilder, PipelineConfig, PipelineSettings, RenderOptions};
pub use engine::RenderPipeline;
pub use envelope::{ResultEnvelope, STATUS_NOT_FOUND, STATUS_OK, STATUS_REDIRECT};
pub use hooks::{
    ErrorHook, FnErrorHook, FnStateSerializer, NoOpErrorHook, PreloadedStateScript,
    RenderInput, Renderer, StateSerializer, TracingErrorHook, DEFAULT_STATE_GLOBAL,
};

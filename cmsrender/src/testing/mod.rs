//! Testing utilities for render pipelines.
//!
//! This module provides:
//! - A scripted route resolver and a recording error hook
//! - Fixture components and view trees

pub mod fixtures;
mod mocks;

pub use mocks::{RecordedError, RecordingErrorHook, StubRouteResolver};

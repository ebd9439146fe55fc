//! Mock collaborators for testing.

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::errors::{ErrorKind, RenderError, ResolutionError};
use crate::pipeline::ErrorHook;
use crate::request::RenderRequest;
use crate::routing::{RouteMatch, RouteResolver};
use crate::tree::NodeDescription;

/// A resolver answering every location with the same outcome.
///
/// Records the locations it was asked for.
#[derive(Debug)]
pub struct StubRouteResolver {
    outcome: Mutex<Result<RouteMatch, ResolutionError>>,
    calls: Mutex<Vec<String>>,
}

impl StubRouteResolver {
    /// Creates a resolver returning `outcome`.
    #[must_use]
    pub fn new(outcome: Result<RouteMatch, ResolutionError>) -> Self {
        Self {
            outcome: Mutex::new(outcome),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Creates a resolver that matches without a view tree.
    #[must_use]
    pub fn not_found() -> Self {
        Self::new(Ok(RouteMatch::not_found()))
    }

    /// Creates a resolver redirecting to `path` and `query`.
    #[must_use]
    pub fn redirect(path: impl Into<String>, query: impl Into<String>) -> Self {
        Self::new(Ok(RouteMatch::redirect(path, query)))
    }

    /// Creates a resolver returning `view_tree`.
    #[must_use]
    pub fn tree(view_tree: NodeDescription) -> Self {
        Self::new(Ok(RouteMatch::resolved(view_tree)))
    }

    /// Creates a resolver that always fails with `error`.
    #[must_use]
    pub fn failing(error: ResolutionError) -> Self {
        Self::new(Err(error))
    }

    /// Replaces the outcome.
    pub fn set_outcome(&self, outcome: Result<RouteMatch, ResolutionError>) {
        *self.outcome.lock() = outcome;
    }

    /// Returns the locations resolved so far.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    /// Returns the number of resolutions.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl RouteResolver for StubRouteResolver {
    async fn resolve(&self, location: &str) -> Result<RouteMatch, ResolutionError> {
        self.calls.lock().push(location.to_string());
        self.outcome.lock().clone()
    }
}

/// One error observed by a [`RecordingErrorHook`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedError {
    /// Location of the failed request.
    pub location: Option<String>,
    /// Error classification.
    pub kind: ErrorKind,
    /// Status the error maps to.
    pub status: u16,
    /// Error message.
    pub message: String,
}

/// An error hook that records every call.
#[derive(Debug, Default)]
pub struct RecordingErrorHook {
    errors: Mutex<Vec<RecordedError>>,
}

impl RecordingErrorHook {
    /// Creates an empty hook.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded errors.
    #[must_use]
    pub fn errors(&self) -> Vec<RecordedError> {
        self.errors.lock().clone()
    }

    /// Returns the number of calls.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.errors.lock().len()
    }

    /// Clears the recorded errors.
    pub fn reset(&self) {
        self.errors.lock().clear();
    }
}

impl ErrorHook for RecordingErrorHook {
    fn on_error(&self, request: &RenderRequest, error: &RenderError) {
        self.errors.lock().push(RecordedError {
            location: request.location().map(str::to_string),
            kind: error.kind(),
            status: error.status(),
            message: error.to_string(),
        });
    }
}

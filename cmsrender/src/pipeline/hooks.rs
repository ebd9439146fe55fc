//! Strategies injected into the pipeline at construction.
//!
//! - [`Renderer`]: produces markup from a built tree
//! - [`StateSerializer`]: turns the final state into a bootstrap script
//! - [`ErrorHook`]: observes every failure before it becomes an envelope

use async_trait::async_trait;
use tracing::{debug, error, Level};

use crate::errors::{NodeError, RenderError};
use crate::request::RenderRequest;
use crate::routing::ResolvedRoute;
use crate::store::StateContainer;
use crate::tree::ViewNode;

/// Everything a renderer receives for one render pass.
#[derive(Clone, Copy)]
pub struct RenderInput<'a> {
    /// The request being rendered.
    pub request: &'a RenderRequest,
    /// State container of this request.
    pub store: &'a dyn StateContainer,
    /// The matched route.
    pub route: &'a ResolvedRoute,
    /// The built view tree.
    pub tree: &'a ViewNode,
    /// Whether to mark elements with node ids.
    pub emit_ids: bool,
}

/// Rendering engine capability.
///
/// A renderer may return a [`NodeError`] instead of markup to signal a
/// redirect (`status: 302` with a `path`) or not-found (`status: 404`).
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Renders the input to markup.
    async fn render(&self, input: RenderInput<'_>) -> Result<String, NodeError>;
}

/// Serializes the final state for the client.
pub trait StateSerializer: Send + Sync {
    /// Returns the prefetch script for `state`.
    fn serialize(&self, state: &serde_json::Value) -> String;
}

/// Assigns the state to a global: `window.<global> = <json>;`.
///
/// `<` is emitted as `\u003c` so the script cannot terminate its own tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreloadedStateScript {
    global: String,
}

/// Default global the state is assigned to.
pub const DEFAULT_STATE_GLOBAL: &str = "__PRELOADED_STATE__";

impl Default for PreloadedStateScript {
    fn default() -> Self {
        Self::new(DEFAULT_STATE_GLOBAL)
    }
}

impl PreloadedStateScript {
    /// Creates a serializer assigning to `window.<global>`.
    #[must_use]
    pub fn new(global: impl Into<String>) -> Self {
        Self {
            global: global.into(),
        }
    }

    /// Returns the global name.
    #[must_use]
    pub fn global(&self) -> &str {
        &self.global
    }
}

impl StateSerializer for PreloadedStateScript {
    fn serialize(&self, state: &serde_json::Value) -> String {
        let json = state.to_string().replace('<', "\\u003c");
        format!("window.{} = {};", self.global, json)
    }
}

/// A closure-based state serializer.
pub struct FnStateSerializer<F>
where
    F: Fn(&serde_json::Value) -> String + Send + Sync,
{
    func: F,
}

impl<F> FnStateSerializer<F>
where
    F: Fn(&serde_json::Value) -> String + Send + Sync,
{
    /// Creates a new closure-based serializer.
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F> StateSerializer for FnStateSerializer<F>
where
    F: Fn(&serde_json::Value) -> String + Send + Sync,
{
    fn serialize(&self, state: &serde_json::Value) -> String {
        (self.func)(state)
    }
}

/// Observes pipeline failures.
///
/// Called exactly once per failed render, before the envelope is produced.
/// Routing signals raised by nodes are failures too; use
/// [`RenderError::is_routing_signal`] to tell them apart.
pub trait ErrorHook: Send + Sync {
    /// Called with the request and the error it failed with.
    fn on_error(&self, request: &RenderRequest, error: &RenderError);
}

/// An error hook that discards all errors.
///
/// Used as the default when no hook is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpErrorHook;

impl ErrorHook for NoOpErrorHook {
    fn on_error(&self, _request: &RenderRequest, _error: &RenderError) {}
}

/// An error hook that logs through `tracing`.
///
/// Genuine failures are logged at the configured level; routing signals only
/// at debug level.
#[derive(Debug, Clone)]
pub struct TracingErrorHook {
    level: Level,
}

impl Default for TracingErrorHook {
    fn default() -> Self {
        Self { level: Level::ERROR }
    }
}

impl TracingErrorHook {
    /// Creates a hook logging failures at `level`.
    #[must_use]
    pub fn new(level: Level) -> Self {
        Self { level }
    }

    /// Creates a hook logging failures at debug level.
    #[must_use]
    pub fn debug() -> Self {
        Self::new(Level::DEBUG)
    }
}

impl ErrorHook for TracingErrorHook {
    fn on_error(&self, request: &RenderRequest, err: &RenderError) {
        let location = request.location().unwrap_or_default();
        let status = err.status();
        let kind = err.kind();

        if err.is_routing_signal() {
            debug!(location, status, %kind, error = %err, "Render ended with routing signal");
            return;
        }

        match self.level {
            Level::DEBUG | Level::TRACE => {
                debug!(location, status, %kind, error = %err, "Render failed");
            }
            Level::ERROR => error!(location, status, %kind, error = %err, "Render failed"),
            Level::WARN => tracing::warn!(location, status, %kind, error = %err, "Render failed"),
            _ => tracing::info!(location, status, %kind, error = %err, "Render failed"),
        }
    }
}

/// A closure-based error hook.
pub struct FnErrorHook<F>
where
    F: Fn(&RenderRequest, &RenderError) + Send + Sync,
{
    func: F,
}

impl<F> FnErrorHook<F>
where
    F: Fn(&RenderRequest, &RenderError) + Send + Sync,
{
    /// Creates a new closure-based hook.
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F> ErrorHook for FnErrorHook<F>
where
    F: Fn(&RenderRequest, &RenderError) + Send + Sync,
{
    fn on_error(&self, request: &RenderRequest, error: &RenderError) {
        (self.func)(request, error);
    }
}

//! Error types for the render pipeline.
//!
//! [`RenderError`] is the single taxonomy every pipeline step fails with. It is
//! also the one place where `status` / `path` fields are interpreted, so the
//! pipeline can turn any failure into a result envelope without inspecting
//! error types ad hoc.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Status used when a failure carries no status of its own.
pub const DEFAULT_ERROR_STATUS: u16 = 500;

/// Status produced for a request without a resolvable path.
pub const MISSING_LOCATION_STATUS: u16 = 400;

/// The main error type for a render pass.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The request exposes neither `path` nor `url.path`.
    #[error("Request has no resolvable path")]
    MissingLocation,

    /// The route registry failed to resolve the location.
    #[error("{0}")]
    ResolutionFailed(#[from] ResolutionError),

    /// The view tree references a component that is not registered.
    #[error("Unknown component: {name}")]
    UnknownComponent {
        /// The unregistered component name.
        name: String,
    },

    /// A node deliberately raised a redirect or not-found while rendering.
    #[error("{0}")]
    RoutingSignal(NodeError),

    /// Any other error raised while rendering.
    #[error("{0}")]
    RenderFailure(NodeError),

    /// The state container could not be created.
    #[error("Store construction failed: {0}")]
    StoreConstructionFailed(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl RenderError {
    /// Classifies an error raised by a node during rendering.
    ///
    /// A 302 carrying a path and a 404 are routing signals; everything else is
    /// a render failure.
    #[must_use]
    pub fn from_node_error(err: NodeError) -> Self {
        match (err.status, err.path.as_deref()) {
            (Some(302), Some(_)) | (Some(404), _) => Self::RoutingSignal(err),
            _ => Self::RenderFailure(err),
        }
    }

    /// Returns the HTTP-like status this error maps to.
    #[must_use]
    pub fn status(&self) -> u16 {
        match self {
            Self::MissingLocation => MISSING_LOCATION_STATUS,
            Self::ResolutionFailed(err) => err.status.unwrap_or(DEFAULT_ERROR_STATUS),
            Self::RoutingSignal(err) | Self::RenderFailure(err) => {
                err.status.unwrap_or(DEFAULT_ERROR_STATUS)
            }
            Self::UnknownComponent { .. } | Self::StoreConstructionFailed(_) => {
                DEFAULT_ERROR_STATUS
            }
        }
    }

    /// Returns the path carried by the error, if any.
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::ResolutionFailed(err) => err.path.as_deref(),
            Self::RoutingSignal(err) | Self::RenderFailure(err) => err.path.as_deref(),
            Self::MissingLocation
            | Self::UnknownComponent { .. }
            | Self::StoreConstructionFailed(_) => None,
        }
    }

    /// Returns the kind of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingLocation => ErrorKind::MissingLocation,
            Self::ResolutionFailed(_) => ErrorKind::ResolutionFailed,
            Self::UnknownComponent { .. } => ErrorKind::UnknownComponent,
            Self::RoutingSignal(_) => ErrorKind::RoutingSignal,
            Self::RenderFailure(_) => ErrorKind::RenderFailure,
            Self::StoreConstructionFailed(_) => ErrorKind::StoreConstructionFailed,
        }
    }

    /// Returns true if the error is a redirect or not-found requested by a node.
    #[must_use]
    pub fn is_routing_signal(&self) -> bool {
        matches!(self, Self::RoutingSignal(_))
    }
}

impl From<BuildError> for RenderError {
    fn from(err: BuildError) -> Self {
        match err {
            BuildError::UnknownComponent { name } => Self::UnknownComponent { name },
        }
    }
}

/// Discriminant of [`RenderError`], used for logging and assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// See [`RenderError::MissingLocation`].
    MissingLocation,
    /// See [`RenderError::ResolutionFailed`].
    ResolutionFailed,
    /// See [`RenderError::UnknownComponent`].
    UnknownComponent,
    /// See [`RenderError::RoutingSignal`].
    RoutingSignal,
    /// See [`RenderError::RenderFailure`].
    RenderFailure,
    /// See [`RenderError::StoreConstructionFailed`].
    StoreConstructionFailed,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingLocation => write!(f, "missing_location"),
            Self::ResolutionFailed => write!(f, "resolution_failed"),
            Self::UnknownComponent => write!(f, "unknown_component"),
            Self::RoutingSignal => write!(f, "routing_signal"),
            Self::RenderFailure => write!(f, "render_failure"),
            Self::StoreConstructionFailed => write!(f, "store_construction_failed"),
        }
    }
}

/// Error raised by a node while it renders.
///
/// Carrying `status: 404`, or `status: 302` with a `path`, requests a
/// not-found or redirect outcome instead of a crash.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct NodeError {
    /// HTTP-like status requested by the node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// Redirect target, for 302 signals.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Human readable message.
    pub message: String,
}

impl NodeError {
    /// Creates a node error without a status.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: None,
            path: None,
            message: message.into(),
        }
    }

    /// Creates a not-found signal.
    #[must_use]
    pub fn not_found() -> Self {
        Self::new("Not found").with_status(404)
    }

    /// Creates a redirect signal to `path`.
    #[must_use]
    pub fn redirect(path: impl Into<String>) -> Self {
        let path = path.into();
        Self::new(format!("Redirect to {path}"))
            .with_status(302)
            .with_path(path)
    }

    /// Sets the status.
    #[must_use]
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the path.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

/// Error raised by a route resolver.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ResolutionError {
    /// Upstream status, if the registry answered.
    pub status: Option<u16>,
    /// Human readable message.
    pub message: String,
    /// Path associated with the failure.
    pub path: Option<String>,
}

impl ResolutionError {
    /// Creates a resolution error without a status.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
            path: None,
        }
    }

    /// Sets the upstream status.
    #[must_use]
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the path.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

#[cfg(feature = "http")]
impl From<reqwest::Error> for ResolutionError {
    fn from(err: reqwest::Error) -> Self {
        let resolution = Self::new(format!("Route registry request failed: {err}"));
        match err.status() {
            Some(status) => resolution.with_status(status.as_u16()),
            None => resolution,
        }
    }
}

/// Error raised while building a view tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// A component node names an unregistered component.
    #[error("Unknown component: {name}")]
    UnknownComponent {
        /// The unregistered component name.
        name: String,
    },
}

/// Errors raised while assembling a pipeline or its settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required collaborator was not supplied to the builder.
    #[error("Missing required collaborator: {0}")]
    MissingCollaborator(&'static str),

    /// The route registry configuration is unusable.
    #[error("Invalid registry configuration: {0}")]
    InvalidRegistry(String),

    /// A settings document could not be decoded.
    #[error("Invalid settings: {0}")]
    InvalidSettings(#[from] serde_json::Error),

    /// A settings file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The tracing subscriber could not be installed.
    #[error("Tracing initialisation failed: {0}")]
    Tracing(String),
}

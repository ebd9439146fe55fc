//! The uniform result of a render.

use serde::Serialize;
use std::sync::Arc;

use crate::errors::RenderError;

/// Status of a successful render.
pub const STATUS_OK: u16 = 200;
/// Status of a redirect outcome.
pub const STATUS_REDIRECT: u16 = 302;
/// Status of a not-found outcome.
pub const STATUS_NOT_FOUND: u16 = 404;

/// Outcome of one render, whatever happened.
///
/// Successes carry `html` and `prefetch_script`; redirects carry
/// `redirect_path`; failures carry `message`, `cause`, and the error's path
/// if it had one.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultEnvelope {
    /// HTTP-like status.
    pub status: u16,
    /// Rendered markup.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    /// Script bootstrapping the client state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefetch_script: Option<String>,
    /// Where to redirect.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_path: Option<String>,
    /// Failure description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// The error a failure was produced from.
    #[serde(skip)]
    pub cause: Option<Arc<RenderError>>,
}

impl ResultEnvelope {
    /// Creates a success envelope.
    #[must_use]
    pub fn rendered(html: impl Into<String>, prefetch_script: impl Into<String>) -> Self {
        Self {
            status: STATUS_OK,
            html: Some(html.into()),
            prefetch_script: Some(prefetch_script.into()),
            ..Default::default()
        }
    }

    /// Creates a redirect envelope.
    #[must_use]
    pub fn redirect(path: impl Into<String>) -> Self {
        Self {
            status: STATUS_REDIRECT,
            redirect_path: Some(path.into()),
            ..Default::default()
        }
    }

    /// Creates a not-found envelope.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: STATUS_NOT_FOUND,
            message: Some(message.into()),
            ..Default::default()
        }
    }

    /// Creates an envelope from a pipeline failure.
    #[must_use]
    pub fn failure(error: RenderError) -> Self {
        Self {
            status: error.status(),
            message: Some(error.to_string()),
            redirect_path: error.path().map(str::to_string),
            cause: Some(Arc::new(error)),
            ..Default::default()
        }
    }

    /// Returns true for a 2xx status.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Returns true for a redirect status.
    #[must_use]
    pub fn is_redirect(&self) -> bool {
        (300..400).contains(&self.status)
    }

    /// Returns the error a failure was produced from.
    #[must_use]
    pub fn error(&self) -> Option<&RenderError> {
        self.cause.as_deref()
    }
}

// Causes compare by kind and message; errors are not comparable themselves.
impl PartialEq for ResultEnvelope {
    fn eq(&self, other: &Self) -> bool {
        let cause_key = |e: &Self| e.cause.as_ref().map(|c| (c.kind(), c.to_string()));
        self.status == other.status
            && self.html == other.html
            && self.prefetch_script == other.prefetch_script
            && self.redirect_path == other.redirect_path
            && self.message == other.message
            && cause_key(self) == cause_key(other)
    }
}

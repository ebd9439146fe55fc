//! Incoming render requests.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// URL portion of a request, for servers that only expose a parsed URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestUrl {
    /// Path of the URL.
    #[serde(default)]
    pub path: Option<String>,
}

/// A request to render.
///
/// The location is taken from `path`, falling back to `url.path`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderRequest {
    /// Request path.
    #[serde(default)]
    pub path: Option<String>,
    /// Parsed request URL.
    #[serde(default)]
    pub url: Option<RequestUrl>,
    /// Request method.
    #[serde(default = "default_method")]
    pub method: String,
    /// Request headers.
    #[serde(default)]
    pub headers: HashMap<String, String>,
    /// Skip markup rendering and answer with empty html.
    #[serde(default, rename = "disableSSR")]
    pub disable_ssr: bool,
}

fn default_method() -> String {
    "get".to_string()
}

impl RenderRequest {
    /// Creates a GET request for `path`.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            method: default_method(),
            ..Default::default()
        }
    }

    /// Creates a GET request whose location is only available via `url.path`.
    #[must_use]
    pub fn from_url_path(path: impl Into<String>) -> Self {
        Self {
            url: Some(RequestUrl {
                path: Some(path.into()),
            }),
            method: default_method(),
            ..Default::default()
        }
    }

    /// Sets the method.
    #[must_use]
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    /// Adds a header.
    #[must_use]
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Disables markup rendering for this request.
    #[must_use]
    pub fn without_ssr(mut self) -> Self {
        self.disable_ssr = true;
        self
    }

    /// Returns the location to resolve.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.path
            .as_deref()
            .filter(|p| !p.is_empty())
            .or_else(|| self.url.as_ref().and_then(|u| u.path.as_deref()))
            .filter(|p| !p.is_empty())
    }
}

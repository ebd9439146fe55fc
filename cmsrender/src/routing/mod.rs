//! Route resolution against an external route registry.
//!
//! This module provides:
//! - The [`RouteResolver`] capability consumed by the pipeline
//! - The [`RouteMatch`] produced by a resolver
//! - The registry wire format
//! - An HTTP resolver (feature `http`)

mod config;
#[cfg(feature = "http")]
mod http;
mod wire;

pub use config::RegistryConfig;
#[cfg(feature = "http")]
pub use http::HttpRouteResolver;
pub use wire::RegistryResponse;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::ResolutionError;
use crate::tree::NodeDescription;

/// Resolves a location string against the route registry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RouteResolver: Send + Sync {
    /// Resolves `location` to a redirect or a view tree.
    async fn resolve(&self, location: &str) -> Result<RouteMatch, ResolutionError>;
}

/// The outcome of a successful resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteMatch {
    /// The location moved.
    Redirect(LocationTarget),
    /// The location matched; an absent view tree means "not found".
    Resolved(ResolvedRoute),
}

impl RouteMatch {
    /// Creates a redirect match.
    #[must_use]
    pub fn redirect(path: impl Into<String>, query: impl Into<String>) -> Self {
        Self::Redirect(LocationTarget::new(path, query))
    }

    /// Creates a match rendering `view_tree`.
    #[must_use]
    pub fn resolved(view_tree: NodeDescription) -> Self {
        Self::Resolved(ResolvedRoute::new(view_tree))
    }

    /// Creates a match without a view tree.
    #[must_use]
    pub fn not_found() -> Self {
        Self::Resolved(ResolvedRoute::default())
    }
}

/// Redirect target returned by the registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationTarget {
    /// Target path.
    #[serde(alias = "pathname")]
    pub path: String,
    /// Target query string, including its leading `?` when non-empty.
    #[serde(default, alias = "search")]
    pub query: String,
}

impl LocationTarget {
    /// Creates a redirect target.
    #[must_use]
    pub fn new(path: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: query.into(),
        }
    }

    /// Splits a `Location` header value at the first `?`.
    #[must_use]
    pub fn parse(location: &str) -> Self {
        match location.split_once('?') {
            Some((path, query)) => Self::new(path, format!("?{query}")),
            None => Self::new(location, ""),
        }
    }

    /// Returns the path joined with its query string.
    #[must_use]
    pub fn to_path(&self) -> String {
        if self.query.is_empty() || self.query.starts_with('?') {
            format!("{}{}", self.path, self.query)
        } else {
            format!("{}?{}", self.path, self.query)
        }
    }
}

/// A matched route.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedRoute {
    /// Opaque render context returned by the registry.
    pub context: serde_json::Value,
    /// The view tree to render, if any.
    pub view_tree: Option<NodeDescription>,
}

impl ResolvedRoute {
    /// Creates a route rendering `view_tree` with an empty context.
    #[must_use]
    pub fn new(view_tree: NodeDescription) -> Self {
        Self {
            context: serde_json::Value::Null,
            view_tree: Some(view_tree),
        }
    }

    /// Sets the render context.
    #[must_use]
    pub fn with_context(mut self, context: serde_json::Value) -> Self {
        self.context = context;
        self
    }
}

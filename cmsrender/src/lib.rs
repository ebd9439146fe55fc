//! # cmsrender
//!
//! Server-side rendering of registry-described view trees.
//!
//! A [`RenderPipeline`](pipeline::RenderPipeline) turns a request path into a
//! uniform [`ResultEnvelope`](pipeline::ResultEnvelope) by:
//!
//! - **Resolving** the path against an external route registry
//! - **Building** the JSON view tree the registry returns into renderable nodes
//! - **Rendering** the tree to markup with a state container attached
//! - **Classifying** every outcome (success, redirect, not-found, failure) into
//!   an HTTP-like status
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use cmsrender::prelude::*;
//!
//! let pipeline = RenderPipeline::builder()
//!     .resolver(Arc::new(HttpRouteResolver::new(registry_config)?))
//!     .components(ComponentLookup::new().with("Home", Arc::new(Home)))
//!     .store_factory(Arc::new(StaticStoreFactory::new(json!({}))))
//!     .build()?;
//!
//! let envelope = pipeline.render(&RenderRequest::new("/home"), None).await;
//! assert_eq!(envelope.status, 200);
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod errors;
pub mod markup;
pub mod observability;
pub mod pipeline;
pub mod request;
pub mod routing;
pub mod store;
pub mod testing;
pub mod tree;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::errors::{
        BuildError, ConfigError, ErrorKind, NodeError, RenderError, ResolutionError,
    };
    pub use crate::markup::MarkupRenderer;
    pub use crate::observability::{init_tracing, LoggingConfig};
    pub use crate::pipeline::{
        ErrorHook, NoOpErrorHook, PipelineBuilder, PipelineConfig, PipelineSettings,
        PreloadedStateScript, RenderInput, RenderOptions, RenderPipeline, Renderer,
        ResultEnvelope, StateSerializer, TracingErrorHook,
    };
    pub use crate::request::{RenderRequest, RequestUrl};
    #[cfg(feature = "http")]
    pub use crate::routing::HttpRouteResolver;
    pub use crate::routing::{
        LocationTarget, RegistryConfig, ResolvedRoute, RouteMatch, RouteResolver,
    };
    pub use crate::store::{
        FnStoreFactory, StateContainer, StaticStore, StaticStoreFactory, StoreFactory,
    };
    pub use crate::tree::{
        build, Component, ComponentContext, ComponentLookup, Element, ElementType,
        FnComponent, NodeDescription, NodeKind, Props, ViewNode,
    };
}

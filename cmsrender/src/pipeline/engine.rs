//! The render pipeline.

use std::sync::Arc;
use tracing::{debug, Instrument};
use uuid::Uuid;

use super::config::{PipelineBuilder, PipelineConfig, RenderOptions};
use super::envelope::ResultEnvelope;
use super::hooks::{RenderInput, StateSerializer};
use crate::errors::RenderError;
use crate::observability::SpanTimer;
use crate::request::RenderRequest;
use crate::routing::RouteMatch;
use crate::tree::build;

/// Renders requests into [`ResultEnvelope`]s.
///
/// Each call to [`render`](Self::render) is an independent pass over
/// resolve, build, prepare state, render. Any failure goes through the
/// configured error hook exactly once and becomes an envelope; `render` never
/// fails itself. The configuration is shared read-only, so one pipeline can
/// serve any number of concurrent calls.
#[derive(Debug, Clone)]
pub struct RenderPipeline {
    config: Arc<PipelineConfig>,
}

impl RenderPipeline {
    /// Creates a pipeline from a configuration.
    #[must_use]
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Creates a pipeline builder.
    #[must_use]
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    /// Gets the configuration.
    #[must_use]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Renders `request`.
    ///
    /// `options` overrides `emit_ids` and the state serializer for this call
    /// only.
    pub async fn render(
        &self,
        request: &RenderRequest,
        options: Option<&RenderOptions>,
    ) -> ResultEnvelope {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!(
            "render",
            %run_id,
            location = request.location().unwrap_or_default(),
        );

        async move {
            let timer = SpanTimer::start("render");
            let envelope = match self.run(request, options).await {
                Ok(envelope) => envelope,
                Err(err) => self.fail(request, err),
            };
            debug!(
                status = envelope.status,
                duration_ms = timer.finish(),
                "Render finished"
            );
            envelope
        }
        .instrument(span)
        .await
    }

    async fn run(
        &self,
        request: &RenderRequest,
        options: Option<&RenderOptions>,
    ) -> Result<ResultEnvelope, RenderError> {
        let location = request.location().ok_or(RenderError::MissingLocation)?;

        let timer = SpanTimer::start("resolve");
        let route_match = self.config.resolver.resolve(location).await?;
        debug!(duration_ms = timer.finish(), "Route resolved");

        let route = match route_match {
            RouteMatch::Redirect(target) => {
                let path = target.to_path();
                debug!(redirect = %path, "Registry redirected");
                return Ok(ResultEnvelope::redirect(path));
            }
            RouteMatch::Resolved(route) => route,
        };

        let Some(view_tree) = route.view_tree.as_ref() else {
            debug!("Registry has no view tree");
            return Ok(ResultEnvelope::not_found(format!("{location} not found")));
        };

        // Without server rendering the tree is never touched.
        let tree = if request.disable_ssr {
            None
        } else {
            Some(build(&self.config.components, view_tree)?)
        };

        let store = self
            .config
            .store_factory
            .create(request, &route)
            .await
            .map_err(|e| RenderError::StoreConstructionFailed(e.into()))?;

        let emit_ids = options
            .and_then(|o| o.emit_ids)
            .unwrap_or(self.config.emit_ids);

        let html = if let Some(tree) = &tree {
            let timer = SpanTimer::start("markup");
            let input = RenderInput {
                request,
                store: store.as_ref(),
                route: &route,
                tree,
                emit_ids,
            };
            let html = self
                .config
                .renderer()
                .render(input)
                .await
                .map_err(RenderError::from_node_error)?;
            debug!(duration_ms = timer.finish(), bytes = html.len(), "Markup rendered");
            html
        } else {
            debug!("Server rendering disabled for request");
            String::new()
        };

        let serializer: &dyn StateSerializer = options
            .and_then(|o| o.state_serializer.as_deref())
            .unwrap_or_else(|| self.config.state_serializer.as_ref());

        Ok(ResultEnvelope::rendered(html, serializer.serialize(&store.state())))
    }

    fn fail(&self, request: &RenderRequest, err: RenderError) -> ResultEnvelope {
        debug!(kind = %err.kind(), status = err.status(), "Render failed");
        self.config.error_hook.on_error(request, &err);
        ResultEnvelope::failure(err)
    }
}

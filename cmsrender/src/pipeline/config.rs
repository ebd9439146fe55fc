//! Pipeline configuration, settings, and per-call options.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

use super::engine::RenderPipeline;
use super::hooks::{
    ErrorHook, NoOpErrorHook, PreloadedStateScript, Renderer, StateSerializer,
    DEFAULT_STATE_GLOBAL,
};
use crate::errors::ConfigError;
use crate::markup::MarkupRenderer;
use crate::observability::LoggingConfig;
use crate::routing::{RegistryConfig, RouteResolver};
use crate::store::StoreFactory;
use crate::tree::ComponentLookup;

/// Immutable configuration shared by every render of a pipeline.
#[derive(Clone)]
pub struct PipelineConfig {
    /// Resolves locations against the route registry.
    pub resolver: Arc<dyn RouteResolver>,
    /// Components available to view trees.
    pub components: ComponentLookup,
    /// Creates the per-request state container.
    pub store_factory: Arc<dyn StoreFactory>,
    /// Whether rendered elements carry node ids by default.
    pub emit_ids: bool,
    /// Serializes the final state into the prefetch script.
    pub state_serializer: Arc<dyn StateSerializer>,
    /// Observes failures.
    pub error_hook: Arc<dyn ErrorHook>,
    /// Replaces the default markup engine when set.
    pub render_override: Option<Arc<dyn Renderer>>,
    /// The default markup engine.
    pub markup: MarkupRenderer,
}

impl std::fmt::Debug for PipelineConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineConfig")
            .field("components", &self.components)
            .field("emit_ids", &self.emit_ids)
            .field("render_override", &self.render_override.is_some())
            .finish_non_exhaustive()
    }
}

impl PipelineConfig {
    /// Returns the renderer used for markup.
    #[must_use]
    pub fn renderer(&self) -> &dyn Renderer {
        match &self.render_override {
            Some(renderer) => renderer.as_ref(),
            None => &self.markup,
        }
    }
}

/// Per-call overrides of the pipeline configuration.
///
/// Only `emit_ids` and the state serializer can be overridden; all other
/// configuration is fixed when the pipeline is built.
#[derive(Clone, Default)]
pub struct RenderOptions {
    /// Overrides [`PipelineConfig::emit_ids`] for this call.
    pub emit_ids: Option<bool>,
    /// Overrides [`PipelineConfig::state_serializer`] for this call.
    pub state_serializer: Option<Arc<dyn StateSerializer>>,
}

impl RenderOptions {
    /// Creates empty options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the node id override.
    #[must_use]
    pub fn with_emit_ids(mut self, emit_ids: bool) -> Self {
        self.emit_ids = Some(emit_ids);
        self
    }

    /// Sets the state serializer override.
    #[must_use]
    pub fn with_state_serializer(mut self, serializer: Arc<dyn StateSerializer>) -> Self {
        self.state_serializer = Some(serializer);
        self
    }
}

impl std::fmt::Debug for RenderOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderOptions")
            .field("emit_ids", &self.emit_ids)
            .field("state_serializer", &self.state_serializer.is_some())
            .finish()
    }
}

/// Deserializable pipeline settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineSettings {
    /// Default for node id emission.
    #[serde(default)]
    pub emit_ids: bool,
    /// Global the default state serializer assigns to.
    #[serde(default = "default_state_global")]
    pub state_global: String,
    /// Route registry to query, if an HTTP resolver is wanted.
    #[serde(default)]
    pub registry: Option<RegistryConfig>,
    /// Logging setup.
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_state_global() -> String {
    DEFAULT_STATE_GLOBAL.to_string()
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            emit_ids: false,
            state_global: default_state_global(),
            registry: None,
            logging: LoggingConfig::default(),
        }
    }
}

impl PipelineSettings {
    /// Parses settings from a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reads settings from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Validates the settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(registry) = &self.registry {
            registry.validate()?;
        }
        Ok(())
    }
}

/// Builder for [`RenderPipeline`].
///
/// A resolver and a store factory are required; everything else has a
/// default.
#[derive(Default)]
pub struct PipelineBuilder {
    resolver: Option<Arc<dyn RouteResolver>>,
    components: ComponentLookup,
    store_factory: Option<Arc<dyn StoreFactory>>,
    emit_ids: bool,
    state_serializer: Option<Arc<dyn StateSerializer>>,
    error_hook: Option<Arc<dyn ErrorHook>>,
    render_override: Option<Arc<dyn Renderer>>,
    markup: MarkupRenderer,
}

impl PipelineBuilder {
    /// Creates a new pipeline builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the route resolver.
    #[must_use]
    pub fn resolver(mut self, resolver: Arc<dyn RouteResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Sets the component lookup.
    #[must_use]
    pub fn components(mut self, components: ComponentLookup) -> Self {
        self.components = components;
        self
    }

    /// Sets the store factory.
    #[must_use]
    pub fn store_factory(mut self, factory: Arc<dyn StoreFactory>) -> Self {
        self.store_factory = Some(factory);
        self
    }

    /// Sets the default for node id emission.
    #[must_use]
    pub fn emit_ids(mut self, emit_ids: bool) -> Self {
        self.emit_ids = emit_ids;
        self
    }

    /// Sets the state serializer.
    #[must_use]
    pub fn state_serializer(mut self, serializer: Arc<dyn StateSerializer>) -> Self {
        self.state_serializer = Some(serializer);
        self
    }

    /// Sets the error hook.
    #[must_use]
    pub fn error_hook(mut self, hook: Arc<dyn ErrorHook>) -> Self {
        self.error_hook = Some(hook);
        self
    }

    /// Replaces the default markup engine.
    #[must_use]
    pub fn render_override(mut self, renderer: Arc<dyn Renderer>) -> Self {
        self.render_override = Some(renderer);
        self
    }

    /// Configures the default markup engine.
    #[must_use]
    pub fn markup(mut self, markup: MarkupRenderer) -> Self {
        self.markup = markup;
        self
    }

    /// Applies `emit_ids` and `state_global` from settings.
    #[must_use]
    pub fn settings(mut self, settings: &PipelineSettings) -> Self {
        self.emit_ids = settings.emit_ids;
        self.state_serializer = Some(Arc::new(PreloadedStateScript::new(
            settings.state_global.clone(),
        )));
        self
    }

    /// Builds the pipeline.
    pub fn build(self) -> Result<RenderPipeline, ConfigError> {
        let resolver = self
            .resolver
            .ok_or(ConfigError::MissingCollaborator("route resolver"))?;
        let store_factory = self
            .store_factory
            .ok_or(ConfigError::MissingCollaborator("store factory"))?;

        let config = PipelineConfig {
            resolver,
            components: self.components,
            store_factory,
            emit_ids: self.emit_ids,
            state_serializer: self
                .state_serializer
                .unwrap_or_else(|| Arc::new(PreloadedStateScript::default())),
            error_hook: self.error_hook.unwrap_or_else(|| Arc::new(NoOpErrorHook)),
            render_override: self.render_override,
            markup: self.markup,
        };

        Ok(RenderPipeline::new(config))
    }
}

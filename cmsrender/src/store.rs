//! State containers and the factories that create them per request.

use async_trait::async_trait;
use futures::future::BoxFuture;
use std::fmt::Debug;
use std::sync::Arc;

use crate::request::RenderRequest;
use crate::routing::ResolvedRoute;

/// Per-request state handed to components and serialized for the client.
pub trait StateContainer: Send + Sync {
    /// Returns a serializable snapshot of the current state.
    fn state(&self) -> serde_json::Value;
}

/// Creates a state container for one render pass.
#[async_trait]
pub trait StoreFactory: Send + Sync {
    /// Creates the state container for `request` and its resolved route.
    async fn create(
        &self,
        request: &RenderRequest,
        route: &ResolvedRoute,
    ) -> anyhow::Result<Arc<dyn StateContainer>>;
}

/// A state container holding a fixed value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaticStore {
    state: serde_json::Value,
}

impl StaticStore {
    /// Creates a store holding `state`.
    #[must_use]
    pub fn new(state: serde_json::Value) -> Self {
        Self { state }
    }
}

impl StateContainer for StaticStore {
    fn state(&self) -> serde_json::Value {
        self.state.clone()
    }
}

/// A factory producing a [`StaticStore`] with the same initial state on every
/// request.
#[derive(Debug, Clone, Default)]
pub struct StaticStoreFactory {
    initial: serde_json::Value,
}

impl StaticStoreFactory {
    /// Creates a factory seeding every store with `initial`.
    #[must_use]
    pub fn new(initial: serde_json::Value) -> Self {
        Self { initial }
    }
}

#[async_trait]
impl StoreFactory for StaticStoreFactory {
    async fn create(
        &self,
        _request: &RenderRequest,
        _route: &ResolvedRoute,
    ) -> anyhow::Result<Arc<dyn StateContainer>> {
        Ok(Arc::new(StaticStore::new(self.initial.clone())))
    }
}

/// A closure-based store factory.
///
/// The closure receives owned copies of the request and route so the
/// returned future can be `'static`.
pub struct FnStoreFactory<F>
where
    F: Fn(RenderRequest, ResolvedRoute) -> BoxFuture<'static, anyhow::Result<Arc<dyn StateContainer>>>
        + Send
        + Sync,
{
    func: F,
}

impl<F> FnStoreFactory<F>
where
    F: Fn(RenderRequest, ResolvedRoute) -> BoxFuture<'static, anyhow::Result<Arc<dyn StateContainer>>>
        + Send
        + Sync,
{
    /// Creates a new closure-based factory.
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F> Debug for FnStoreFactory<F>
where
    F: Fn(RenderRequest, ResolvedRoute) -> BoxFuture<'static, anyhow::Result<Arc<dyn StateContainer>>>
        + Send
        + Sync,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnStoreFactory").finish_non_exhaustive()
    }
}

#[async_trait]
impl<F> StoreFactory for FnStoreFactory<F>
where
    F: Fn(RenderRequest, ResolvedRoute) -> BoxFuture<'static, anyhow::Result<Arc<dyn StateContainer>>>
        + Send
        + Sync,
{
    async fn create(
        &self,
        request: &RenderRequest,
        route: &ResolvedRoute,
    ) -> anyhow::Result<Arc<dyn StateContainer>> {
        (self.func)(request.clone(), route.clone()).await
    }
}

//! Components and the lookup table that names them.

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

use super::{Props, ViewNode};
use crate::errors::NodeError;
use crate::store::StateContainer;

/// What a component sees while it renders.
pub struct ComponentContext<'a> {
    /// Props the node was built with.
    pub props: &'a Props,
    /// Built children, `None` when the node had none.
    pub children: Option<&'a [ViewNode]>,
    /// State container of the current request.
    pub state: &'a dyn StateContainer,
}

impl ComponentContext<'_> {
    /// Returns a prop by name.
    #[must_use]
    pub fn prop(&self, key: &str) -> Option<&serde_json::Value> {
        self.props.get(key)
    }

    /// Returns the children as a fragment, or an empty node.
    #[must_use]
    pub fn children_node(&self) -> ViewNode {
        self.children
            .map_or_else(ViewNode::empty, |children| ViewNode::fragment(children.to_vec()))
    }
}

/// A named, reusable piece of view.
///
/// Returning a [`NodeError`] carrying `status: 404`, or `status: 302` with a
/// `path`, asks the pipeline for a not-found or redirect outcome.
pub trait Component: Send + Sync {
    /// Renders the component into a subtree.
    fn render(&self, ctx: &ComponentContext<'_>) -> Result<ViewNode, NodeError>;
}

/// A simple function-based component.
pub struct FnComponent<F>
where
    F: Fn(&ComponentContext<'_>) -> Result<ViewNode, NodeError> + Send + Sync,
{
    func: F,
}

impl<F> FnComponent<F>
where
    F: Fn(&ComponentContext<'_>) -> Result<ViewNode, NodeError> + Send + Sync,
{
    /// Creates a new function-based component.
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F> Debug for FnComponent<F>
where
    F: Fn(&ComponentContext<'_>) -> Result<ViewNode, NodeError> + Send + Sync,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnComponent").finish_non_exhaustive()
    }
}

impl<F> Component for FnComponent<F>
where
    F: Fn(&ComponentContext<'_>) -> Result<ViewNode, NodeError> + Send + Sync,
{
    fn render(&self, ctx: &ComponentContext<'_>) -> Result<ViewNode, NodeError> {
        (self.func)(ctx)
    }
}

/// Maps component names to components.
#[derive(Clone, Default)]
pub struct ComponentLookup {
    components: HashMap<String, Arc<dyn Component>>,
}

impl ComponentLookup {
    /// Creates an empty lookup.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a component, builder style.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, component: Arc<dyn Component>) -> Self {
        self.insert(name, component);
        self
    }

    /// Registers a component, replacing any previous one with the same name.
    pub fn insert(&mut self, name: impl Into<String>, component: Arc<dyn Component>) {
        self.components.insert(name.into(), component);
    }

    /// Returns the component registered under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<dyn Component>> {
        self.components.get(name).cloned()
    }

    /// Returns true if `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.components.contains_key(name)
    }

    /// Returns the number of registered components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Returns true if no component is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Returns the registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.components.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Debug for ComponentLookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentLookup")
            .field("components", &self.names())
            .finish()
    }
}

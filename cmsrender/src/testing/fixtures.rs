//! Fixture components and view trees.

use futures::FutureExt;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::errors::NodeError;
use crate::store::{FnStoreFactory, StateContainer, StaticStore, StoreFactory};
use crate::tree::{Component, ComponentContext, ComponentLookup, Props, ViewNode};

/// Renders `<div><h1>Home</h1>{children}</div>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Home;

impl Component for Home {
    fn render(&self, ctx: &ComponentContext<'_>) -> Result<ViewNode, NodeError> {
        let heading = ViewNode::tag("h1", Props::new(), vec![ViewNode::text("Home")]);
        Ok(ViewNode::tag(
            "div",
            Props::new(),
            vec![heading, ctx.children_node()],
        ))
    }
}

/// Renders `<div>Page</div>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Page;

impl Component for Page {
    fn render(&self, _ctx: &ComponentContext<'_>) -> Result<ViewNode, NodeError> {
        Ok(ViewNode::tag("div", Props::new(), vec![ViewNode::text("Page")]))
    }
}

/// Signals not-found.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThrowNotFound;

impl Component for ThrowNotFound {
    fn render(&self, _ctx: &ComponentContext<'_>) -> Result<ViewNode, NodeError> {
        Err(NodeError::not_found())
    }
}

/// Signals a redirect to `/new/location`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThrowRedirect;

impl Component for ThrowRedirect {
    fn render(&self, _ctx: &ComponentContext<'_>) -> Result<ViewNode, NodeError> {
        Err(NodeError::redirect("/new/location"))
    }
}

/// Fails with status 500.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThrowServerError;

impl Component for ThrowServerError {
    fn render(&self, _ctx: &ComponentContext<'_>) -> Result<ViewNode, NodeError> {
        Err(NodeError::new("Internal server error").with_status(500))
    }
}

/// Returns a lookup with every fixture component.
///
/// Names: `Home`, `Page`, `Error` (not-found), `RedirectError`, `ServerError`.
#[must_use]
pub fn component_lookup() -> ComponentLookup {
    ComponentLookup::new()
        .with("Home", Arc::new(Home))
        .with("Page", Arc::new(Page))
        .with("Error", Arc::new(ThrowNotFound))
        .with("RedirectError", Arc::new(ThrowRedirect))
        .with("ServerError", Arc::new(ThrowServerError))
}

/// A nested tree mixing components, markup, keys, and text, in registry wire
/// form.
///
/// Renders to:
///
/// ```text
/// <div class="foo" data-test="my-test"><div><h1>Home</h1><a class="foo"><div><h1>Home</h1></div></a></div><a class="foo"><img class="foo"/></a><p>I am set</p></div>
/// ```
#[must_use]
pub fn complex_tree() -> Value {
    json!({
        "name": "div",
        "type": "html",
        "props": {"className": "foo", "data-test": "my-test"},
        "children": [
            {
                "name": "Home",
                "type": "component",
                "props": {"key": "a", "checked": false},
                "children": [
                    {
                        "name": "a",
                        "type": "html",
                        "props": {"key": "b", "className": "foo"},
                        "children": [
                            {"name": "Home", "type": "component", "props": {"key": "bb"}}
                        ]
                    }
                ]
            },
            {
                "name": "a",
                "type": "html",
                "props": {"className": "foo", "key": "c"},
                "children": [
                    {"name": "img", "type": "html", "props": {"key": "d", "className": "foo"}, "children": []}
                ]
            },
            {
                "name": "p",
                "type": "html",
                "props": {"key": "e"},
                "children": ["I am set"]
            }
        ]
    })
}

/// A factory whose stores hold `["Use Redux"]`, created asynchronously.
#[must_use]
pub fn use_redux_store_factory() -> Arc<dyn StoreFactory> {
    Arc::new(FnStoreFactory::new(|_request, _route| {
        async {
            let store: Arc<dyn StateContainer> = Arc::new(StaticStore::new(json!(["Use Redux"])));
            anyhow::Ok(store)
        }
        .boxed()
    }))
}

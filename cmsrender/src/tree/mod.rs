//! View trees.
//!
//! This module provides:
//! - [`NodeDescription`], the JSON view tree exchanged with the registry
//! - [`ViewNode`], the renderable tree built from it
//! - The [`Component`] capability and the [`ComponentLookup`] table
//! - [`build`], turning the former into the latter

mod builder;
mod component;
mod view;

pub use builder::build;
pub use component::{Component, ComponentContext, ComponentLookup, FnComponent};
pub use view::{Element, ElementType, Props, ViewNode};

use serde::{Deserialize, Serialize};

/// How an element node's `name` is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// `name` is looked up in the component table.
    Component,
    /// `name` is a native tag.
    #[serde(alias = "html")]
    Markup,
}

/// A node of the JSON view tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeDescription {
    /// Literal text.
    Text(String),
    /// A component or native element.
    Element {
        /// How `name` is interpreted.
        #[serde(alias = "type")]
        kind: NodeKind,
        /// Component name or tag name.
        name: String,
        /// Element properties.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        props: Option<Props>,
        /// Ordered children.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        children: Option<Vec<NodeDescription>>,
    },
}

impl NodeDescription {
    /// Creates a text node.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Creates a component node without props or children.
    #[must_use]
    pub fn component(name: impl Into<String>) -> Self {
        Self::Element {
            kind: NodeKind::Component,
            name: name.into(),
            props: None,
            children: None,
        }
    }

    /// Creates a native element node without props or children.
    #[must_use]
    pub fn markup(name: impl Into<String>) -> Self {
        Self::Element {
            kind: NodeKind::Markup,
            name: name.into(),
            props: None,
            children: None,
        }
    }

    /// Sets a prop. No effect on text nodes.
    #[must_use]
    pub fn with_prop(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        if let Self::Element { props, .. } = &mut self {
            props
                .get_or_insert_with(Props::new)
                .insert(key.into(), value.into());
        }
        self
    }

    /// Appends a child. No effect on text nodes.
    #[must_use]
    pub fn with_child(mut self, child: Self) -> Self {
        if let Self::Element { children, .. } = &mut self {
            children.get_or_insert_with(Vec::new).push(child);
        }
        self
    }

    /// Counts the nodes of this tree, itself included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        match self {
            Self::Text(_) => 1,
            Self::Element { children, .. } => {
                1 + children
                    .iter()
                    .flatten()
                    .map(Self::node_count)
                    .sum::<usize>()
            }
        }
    }
}

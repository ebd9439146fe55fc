//! Static markup rendering.
//!
//! [`MarkupRenderer`] is the default rendering engine of the pipeline. It walks
//! a built [`ViewNode`] tree, invokes components with the request's state
//! container, and writes HTML.

mod attributes;
mod escape;

pub use attributes::write_attributes;
pub use escape::{escape_html, push_escaped};

use async_trait::async_trait;
use regex::Regex;
use std::sync::LazyLock;

use crate::errors::NodeError;
use crate::pipeline::{RenderInput, Renderer};
use crate::store::StateContainer;
use crate::tree::{ComponentContext, Element, ElementType, ViewNode};

static TAG_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9\-]*$").expect("valid regex"));

/// Elements that never have content and render self-closed.
const VOID_ELEMENTS: [&str; 13] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// Default bound on component nesting.
const DEFAULT_MAX_DEPTH: usize = 256;

/// Renders view trees to HTML.
///
/// With `emit_ids` the root element is marked `data-root=""` and every element
/// carries `data-nodeid="<n>"`, numbered in document order.
#[derive(Debug, Clone)]
pub struct MarkupRenderer {
    max_depth: usize,
}

impl Default for MarkupRenderer {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl MarkupRenderer {
    /// Creates a renderer with the default depth bound.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum nesting depth before rendering fails.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Renders `tree` to a string.
    ///
    /// # Errors
    ///
    /// Returns the [`NodeError`] raised by a component, or a render failure for
    /// invalid tag names, void elements with children, and runaway nesting.
    pub fn render_tree(
        &self,
        tree: &ViewNode,
        state: &dyn StateContainer,
        emit_ids: bool,
    ) -> Result<String, NodeError> {
        let mut writer = MarkupWriter {
            out: String::new(),
            state,
            emit_ids,
            next_id: 0,
            max_depth: self.max_depth,
        };
        writer.write_node(tree, 0)?;
        Ok(writer.out)
    }
}

#[async_trait]
impl Renderer for MarkupRenderer {
    async fn render(&self, input: RenderInput<'_>) -> Result<String, NodeError> {
        self.render_tree(input.tree, input.store, input.emit_ids)
    }
}

struct MarkupWriter<'a> {
    out: String,
    state: &'a dyn StateContainer,
    emit_ids: bool,
    next_id: usize,
    max_depth: usize,
}

impl MarkupWriter<'_> {
    fn write_node(&mut self, node: &ViewNode, depth: usize) -> Result<(), NodeError> {
        if depth > self.max_depth {
            return Err(NodeError::new(format!(
                "Maximum render depth of {} exceeded",
                self.max_depth
            )));
        }

        match node {
            ViewNode::Text(text) => {
                push_escaped(&mut self.out, text);
                Ok(())
            }
            ViewNode::Fragment(nodes) => nodes
                .iter()
                .try_for_each(|child| self.write_node(child, depth + 1)),
            ViewNode::Element(element) => match &element.ty {
                ElementType::Component { component, .. } => {
                    let ctx = ComponentContext {
                        props: &element.props,
                        children: element.children.as_deref(),
                        state: self.state,
                    };
                    let rendered = component.render(&ctx)?;
                    self.write_node(&rendered, depth + 1)
                }
                ElementType::Tag(tag) => self.write_tag(tag, element, depth),
            },
        }
    }

    fn write_tag(&mut self, tag: &str, element: &Element, depth: usize) -> Result<(), NodeError> {
        if !TAG_NAME.is_match(tag) {
            return Err(NodeError::new(format!("Invalid tag name '{tag}'")));
        }

        let is_void = VOID_ELEMENTS.contains(&tag.to_ascii_lowercase().as_str());
        let children = element.children.as_deref().unwrap_or_default();
        if is_void && !children.is_empty() {
            return Err(NodeError::new(format!(
                "<{tag}> is a void element and cannot have children"
            )));
        }

        self.out.push('<');
        self.out.push_str(tag);
        if self.emit_ids {
            if self.next_id == 0 {
                self.out.push_str(" data-root=\"\"");
            }
            self.out.push_str(&format!(" data-nodeid=\"{}\"", self.next_id));
            self.next_id += 1;
        }
        write_attributes(&mut self.out, &element.props);

        if is_void {
            self.out.push_str("/>");
            return Ok(());
        }

        self.out.push('>');
        for child in children {
            self.write_node(child, depth + 1)?;
        }
        self.out.push_str("</");
        self.out.push_str(tag);
        self.out.push('>');
        Ok(())
    }
}

//! The renderable tree.

use std::fmt::Debug;
use std::sync::Arc;

use super::Component;

/// Element properties. Order is irrelevant.
pub type Props = serde_json::Map<String, serde_json::Value>;

/// What an element renders as.
#[derive(Clone)]
pub enum ElementType {
    /// A registered component.
    Component {
        /// Name the component was registered under.
        name: String,
        /// The component.
        component: Arc<dyn Component>,
    },
    /// A native tag, passed through to the markup engine.
    Tag(String),
}

impl ElementType {
    /// Creates a native tag type.
    #[must_use]
    pub fn tag(name: impl Into<String>) -> Self {
        Self::Tag(name.into())
    }

    /// Returns the component or tag name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Component { name, .. } | Self::Tag(name) => name,
        }
    }
}

impl Debug for ElementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Component { name, .. } => f.debug_tuple("Component").field(name).finish(),
            Self::Tag(name) => f.debug_tuple("Tag").field(name).finish(),
        }
    }
}

// Components compare by registered name.
impl PartialEq for ElementType {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Component { name: a, .. }, Self::Component { name: b, .. })
            | (Self::Tag(a), Self::Tag(b)) => a == b,
            _ => false,
        }
    }
}

/// A built element.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Component or tag.
    pub ty: ElementType,
    /// Properties.
    pub props: Props,
    /// Children; `None` means "no children", which is not the same as an
    /// empty list.
    pub children: Option<Vec<ViewNode>>,
}

/// A node of the renderable tree.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewNode {
    /// Literal text.
    Text(String),
    /// A component or native element.
    Element(Element),
    /// A sequence of nodes without a wrapper, as returned by components.
    Fragment(Vec<ViewNode>),
}

impl ViewNode {
    /// Creates a text node.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Creates an element. Zero children yields an element without children.
    #[must_use]
    pub fn element(ty: ElementType, props: Props, children: Vec<Self>) -> Self {
        Self::Element(Element {
            ty,
            props,
            children: if children.is_empty() {
                None
            } else {
                Some(children)
            },
        })
    }

    /// Creates a native element.
    #[must_use]
    pub fn tag(name: impl Into<String>, props: Props, children: Vec<Self>) -> Self {
        Self::element(ElementType::tag(name), props, children)
    }

    /// Creates a fragment.
    #[must_use]
    pub fn fragment(nodes: Vec<Self>) -> Self {
        Self::Fragment(nodes)
    }

    /// Creates a node that renders nothing.
    #[must_use]
    pub fn empty() -> Self {
        Self::Fragment(Vec::new())
    }

    /// Returns the element, if this node is one.
    #[must_use]
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(element) => Some(element),
            Self::Text(_) | Self::Fragment(_) => None,
        }
    }
}

impl From<&str> for ViewNode {
    fn from(text: &str) -> Self {
        Self::text(text)
    }
}

impl From<String> for ViewNode {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_without_children() {
        let node = ViewNode::tag("img", Props::new(), Vec::new());
        assert_eq!(node.as_element().unwrap().children, None);
    }

    #[test]
    fn test_element_with_children() {
        let node = ViewNode::tag("p", Props::new(), vec!["a".into(), "b".into()]);
        assert_eq!(
            node.as_element().unwrap().children,
            Some(vec![ViewNode::text("a"), ViewNode::text("b")])
        );
    }

    #[test]
    fn test_element_type_name() {
        assert_eq!(ElementType::tag("div").name(), "div");
        assert_eq!(format!("{:?}", ElementType::tag("div")), "Tag(\"div\")");
    }
}

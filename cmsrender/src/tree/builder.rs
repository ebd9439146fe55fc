//! Builds renderable trees from JSON view trees.

use super::{ComponentLookup, ElementType, NodeDescription, NodeKind, ViewNode};
use crate::errors::BuildError;

/// Builds `node` into a renderable tree.
///
/// Text is returned unchanged. Children are built first, in order; then the
/// element type is resolved: component names through `lookup`, markup names
/// as native tags. An element whose children list is absent or empty is built
/// without children. Absent props are an empty set.
///
/// # Errors
///
/// Returns [`BuildError::UnknownComponent`] when a component node names a
/// component that is not in `lookup`.
pub fn build(lookup: &ComponentLookup, node: &NodeDescription) -> Result<ViewNode, BuildError> {
    match node {
        NodeDescription::Text(text) => Ok(ViewNode::Text(text.clone())),
        NodeDescription::Element {
            kind,
            name,
            props,
            children,
        } => {
            let children = children
                .iter()
                .flatten()
                .map(|child| build(lookup, child))
                .collect::<Result<Vec<_>, _>>()?;

            let ty = match kind {
                NodeKind::Component => {
                    let component = lookup
                        .get(name)
                        .ok_or_else(|| BuildError::UnknownComponent { name: name.clone() })?;
                    ElementType::Component {
                        name: name.clone(),
                        component,
                    }
                }
                NodeKind::Markup => ElementType::Tag(name.clone()),
            };

            Ok(ViewNode::element(
                ty,
                props.clone().unwrap_or_default(),
                children,
            ))
        }
    }
}

impl ComponentLookup {
    /// Builds `node` against this lookup. See [`build`].
    pub fn build_tree(&self, node: &NodeDescription) -> Result<ViewNode, BuildError> {
        build(self, node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;
    use crate::tree::Props;
    use serde_json::json;

    #[test]
    fn test_text_is_unchanged() {
        let lookup = ComponentLookup::new();
        assert_eq!(
            build(&lookup, &NodeDescription::text("I am set")).unwrap(),
            ViewNode::text("I am set")
        );
    }

    #[test]
    fn test_markup_uses_name_as_tag() {
        let lookup = ComponentLookup::new();
        let node = NodeDescription::markup("div").with_prop("className", "foo");
        let built = build(&lookup, &node).unwrap();

        let element = built.as_element().unwrap();
        assert_eq!(element.ty, ElementType::tag("div"));
        assert_eq!(element.props.get("className"), Some(&json!("foo")));
        assert_eq!(element.children, None);
    }

    #[test]
    fn test_component_resolved_through_lookup() {
        let lookup = fixtures::component_lookup();
        let built = build(&lookup, &NodeDescription::component("Home")).unwrap();

        let element = built.as_element().unwrap();
        assert!(matches!(&element.ty, ElementType::Component { name, .. } if name == "Home"));
        assert_eq!(element.props, Props::new());
    }

    #[test]
    fn test_unknown_component_fails() {
        let lookup = ComponentLookup::new();
        let err = build(&lookup, &NodeDescription::component("Missing")).unwrap_err();
        assert_eq!(
            err,
            BuildError::UnknownComponent {
                name: "Missing".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_component_in_nested_child_fails() {
        let lookup = fixtures::component_lookup();
        let node = NodeDescription::markup("div").with_child(
            NodeDescription::markup("section").with_child(NodeDescription::component("Nope")),
        );
        assert!(matches!(
            build(&lookup, &node),
            Err(BuildError::UnknownComponent { name }) if name == "Nope"
        ));
    }

    #[test]
    fn test_children_order_preserved() {
        let lookup = fixtures::component_lookup();
        let node = NodeDescription::markup("ul")
            .with_child(NodeDescription::text("first"))
            .with_child(NodeDescription::component("Page"))
            .with_child(NodeDescription::markup("li"))
            .with_child(NodeDescription::text("last"));

        let built = build(&lookup, &node).unwrap();
        let children = built.as_element().unwrap().children.as_ref().unwrap();

        assert_eq!(children.len(), 4);
        assert_eq!(children[0], ViewNode::text("first"));
        assert_eq!(children[1].as_element().unwrap().ty.name(), "Page");
        assert_eq!(children[2].as_element().unwrap().ty, ElementType::tag("li"));
        assert_eq!(children[3], ViewNode::text("last"));
    }

    #[test]
    fn test_empty_children_built_without_children() {
        let lookup = ComponentLookup::new();
        let node: NodeDescription = serde_json::from_value(json!({
            "name": "img", "type": "html", "props": {"className": "foo"}, "children": []
        }))
        .unwrap();

        let built = build(&lookup, &node).unwrap();
        assert_eq!(built.as_element().unwrap().children, None);
    }

    #[test]
    fn test_build_tree_delegates() {
        let lookup = fixtures::component_lookup();
        let node = NodeDescription::component("Page");
        assert_eq!(lookup.build_tree(&node).unwrap(), build(&lookup, &node).unwrap());
    }
}

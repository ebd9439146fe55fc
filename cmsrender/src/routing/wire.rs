//! JSON body returned by the route registry.

use serde::{Deserialize, Serialize};

use super::{LocationTarget, ResolvedRoute, RouteMatch};
use crate::errors::ResolutionError;
use crate::tree::NodeDescription;

/// Body of a 2xx registry response.
///
/// Either `redirectLocation` or `renderProps` is set. The whole `renderProps`
/// object is kept as the render context and its `componentTree` is the view
/// tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryResponse {
    /// Redirect target.
    #[serde(default, alias = "redirect", skip_serializing_if = "Option::is_none")]
    pub redirect_location: Option<LocationTarget>,
    /// Render properties, including the view tree.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub render_props: Option<serde_json::Value>,
}

const TREE_KEYS: [&str; 2] = ["componentTree", "viewTree"];

impl RegistryResponse {
    /// Parses a response body.
    pub fn from_slice(body: &[u8]) -> Result<Self, ResolutionError> {
        serde_json::from_slice(body).map_err(|e| {
            ResolutionError::new(format!("Invalid route registry response: {e}"))
        })
    }

    /// Converts the response into a [`RouteMatch`].
    ///
    /// A response without render props, or whose render props lack a view
    /// tree, resolves with no view tree.
    pub fn into_route_match(self) -> Result<RouteMatch, ResolutionError> {
        if let Some(target) = self.redirect_location {
            return Ok(RouteMatch::Redirect(target));
        }

        let Some(context) = self.render_props else {
            return Ok(RouteMatch::not_found());
        };

        let tree = TREE_KEYS
            .iter()
            .find_map(|key| context.get(*key))
            .filter(|tree| !tree.is_null())
            .cloned();

        let view_tree = match tree {
            Some(tree) => Some(serde_json::from_value::<NodeDescription>(tree).map_err(|e| {
                ResolutionError::new(format!("Invalid view tree in registry response: {e}"))
            })?),
            None => None,
        };

        Ok(RouteMatch::Resolved(ResolvedRoute { context, view_tree }))
    }
}

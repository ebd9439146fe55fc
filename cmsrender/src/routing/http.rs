//! Route resolver backed by the registry's HTTP lookup endpoint.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, LOCATION};
use reqwest::{Client, StatusCode, Url};

use super::{LocationTarget, RegistryConfig, RegistryResponse, RouteMatch, RouteResolver};
use crate::errors::{ConfigError, ResolutionError};

/// Statuses treated as "the location moved".
const REDIRECT_STATUSES: [u16; 5] = [301, 302, 303, 307, 308];

/// Queries `GET {host}{routes_path}?location=<location>`.
///
/// Redirects are not followed: a redirect-class answer becomes
/// [`RouteMatch::Redirect`].
#[derive(Debug, Clone)]
pub struct HttpRouteResolver {
    client: Client,
    routes_url: Url,
    config: RegistryConfig,
}

impl HttpRouteResolver {
    /// Creates a resolver for the given registry.
    pub fn new(config: RegistryConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let routes_url = Url::parse(&config.routes_url())
            .map_err(|e| ConfigError::InvalidRegistry(format!("invalid routes URL: {e}")))?;

        let mut headers = HeaderMap::new();
        for (key, value) in &config.headers {
            let name = HeaderName::from_bytes(key.as_bytes())
                .map_err(|e| ConfigError::InvalidRegistry(format!("header '{key}': {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| ConfigError::InvalidRegistry(format!("header '{key}': {e}")))?;
            headers.insert(name, value);
        }

        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| ConfigError::InvalidRegistry(format!("HTTP client: {e}")))?;

        Ok(Self {
            client,
            routes_url,
            config,
        })
    }

    /// Gets the configuration.
    #[must_use]
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Returns the lookup URL for `location`.
    #[must_use]
    pub fn lookup_url(&self, location: &str) -> Url {
        let mut url = self.routes_url.clone();
        url.query_pairs_mut().append_pair("location", location);
        url
    }
}

/// Interprets a redirect-class status, if `status` is one.
fn redirect_match(
    status: StatusCode,
    location_header: Option<&str>,
    location: &str,
) -> Option<Result<RouteMatch, ResolutionError>> {
    if !REDIRECT_STATUSES.contains(&status.as_u16()) {
        return None;
    }
    Some(match location_header {
        Some(target) if !target.is_empty() => {
            Ok(RouteMatch::Redirect(LocationTarget::parse(target)))
        }
        _ => Err(ResolutionError::new(format!(
            "Route registry answered {status} for {location} without a Location header"
        ))
        .with_status(status.as_u16())),
    })
}

#[async_trait]
impl RouteResolver for HttpRouteResolver {
    async fn resolve(&self, location: &str) -> Result<RouteMatch, ResolutionError> {
        let url = self.lookup_url(location);
        tracing::debug!(%url, location, "Querying route registry");

        let response = self.client.get(url).send().await?;
        let status = response.status();

        let location_header = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        if let Some(result) = redirect_match(status, location_header.as_deref(), location) {
            return result;
        }

        if !status.is_success() {
            return Err(ResolutionError::new(format!(
                "Route registry answered {status} for {location}"
            ))
            .with_status(status.as_u16()));
        }

        let body = response.bytes().await?;
        RegistryResponse::from_slice(&body)?.into_route_match()
    }
}

//! HTTP client for the upstream real-estate API.
//!
//! # Responsibilities
//! - Issue exactly one GET per operation
//! - Extract the relevant substructure from each response shape
//! - Normalize "nothing there" into empty values or `Lookup::NotFound`
//!
//! # Design Decisions
//! - No retries; transport failures, non-JSON bodies and unexpected shapes
//!   are returned as `UpstreamError`
//! - Upstream HTTP status is not interpreted, only the JSON body
//! - The client never decides HTTP status codes for the proxy

use std::time::{Duration, Instant};

use serde_json::Value;
use url::Url;

use crate::config::{EndpointConfig, TimeoutConfig, UpstreamConfig};
use crate::observability::metrics;
use crate::upstream::template::{self, ADDRESS_PLACEHOLDER, ID_PLACEHOLDER};
use crate::upstream::types::{Lookup, UpstreamError, UpstreamResult};

/// The upstream endpoints the proxy calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Search,
    PropertyId,
    Overview,
    Details,
    Timeline,
    EstimateHistory,
}

impl Endpoint {
    pub fn as_str(self) -> &'static str {
        match self {
            Endpoint::Search => "search",
            Endpoint::PropertyId => "property_id",
            Endpoint::Overview => "overview",
            Endpoint::Details => "details",
            Endpoint::Timeline => "timeline",
            Endpoint::EstimateHistory => "estimate_history",
        }
    }

    fn placeholder(self) -> &'static str {
        match self {
            Endpoint::Search | Endpoint::PropertyId => ADDRESS_PLACEHOLDER,
            _ => ID_PLACEHOLDER,
        }
    }

    fn template(self, endpoints: &EndpointConfig) -> &str {
        match self {
            Endpoint::Search => &endpoints.search,
            Endpoint::PropertyId => &endpoints.property_id,
            Endpoint::Overview => &endpoints.overview,
            Endpoint::Details => &endpoints.details,
            Endpoint::Timeline => &endpoints.timeline,
            Endpoint::EstimateHistory => &endpoints.estimate_history,
        }
    }
}

/// Client for the upstream API.
///
/// Cheap to clone; the inner `reqwest::Client` pools connections.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    base_url: String,
    endpoints: EndpointConfig,
}

impl UpstreamClient {
    /// Build a client with timeouts taken from configuration.
    pub fn new(config: &UpstreamConfig, timeouts: &TimeoutConfig) -> UpstreamResult<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .timeout(Duration::from_secs(timeouts.upstream_secs))
            .user_agent(concat!("homes-proxy/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Self::with_http_client(http, config)
    }

    /// Build a client around an existing `reqwest::Client`.
    pub fn with_http_client(http: reqwest::Client, config: &UpstreamConfig) -> UpstreamResult<Self> {
        Url::parse(&config.base_url).map_err(|source| UpstreamError::InvalidUrl {
            url: config.base_url.clone(),
            source,
        })?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            endpoints: config.endpoints.clone(),
        })
    }

    /// Properties whose title matches `address`. Empty when nothing matches.
    pub async fn search_address(&self, address: &str) -> UpstreamResult<Vec<Value>> {
        let json = self.fetch(Endpoint::Search, address).await?;
        extract_search_results(json)
    }

    /// Resolve an address (ideally a search result `Title`) to a property id.
    ///
    /// Returns an empty string when the upstream has no id for the address.
    pub async fn property_id(&self, address: &str) -> UpstreamResult<String> {
        let json = self.fetch(Endpoint::PropertyId, address).await?;
        Ok(extract_property_id(&json))
    }

    /// Basic property data: the first card of the property response.
    pub async fn property_overview(&self, property_id: &str) -> UpstreamResult<Lookup<Value>> {
        let json = self.fetch(Endpoint::Overview, property_id).await?;
        let lookup = extract_overview(json)?;
        log_lookup(Endpoint::Overview, property_id, &lookup);
        Ok(lookup)
    }

    /// In-depth property details.
    pub async fn property_details(&self, property_id: &str) -> UpstreamResult<Lookup<Value>> {
        let json = self.fetch(Endpoint::Details, property_id).await?;
        let lookup = extract_details(json);
        log_lookup(Endpoint::Details, property_id, &lookup);
        Ok(lookup)
    }

    /// Timeline of property events (valuations, sales, ...).
    ///
    /// `Found(None)` means the upstream sent `"events": null`.
    pub async fn property_timeline(
        &self,
        property_id: &str,
    ) -> UpstreamResult<Lookup<Option<Vec<Value>>>> {
        let json = self.fetch(Endpoint::Timeline, property_id).await?;
        let lookup = extract_timeline(json)?;
        log_lookup(Endpoint::Timeline, property_id, &lookup);
        Ok(lookup)
    }

    /// Estimate history for a property, returned as the upstream sent it.
    pub async fn estimate_history(&self, property_id: &str) -> UpstreamResult<Lookup<Value>> {
        let json = self.fetch(Endpoint::EstimateHistory, property_id).await?;
        let lookup = extract_estimate_history(json);
        log_lookup(Endpoint::EstimateHistory, property_id, &lookup);
        Ok(lookup)
    }

    /// Build the URL for `endpoint` with `value` substituted.
    pub fn url_for(&self, endpoint: Endpoint, value: &str) -> UpstreamResult<Url> {
        let path = template::expand(
            endpoint.template(&self.endpoints),
            endpoint.placeholder(),
            value,
        )?;
        let raw = template::join(&self.base_url, &path);
        Url::parse(&raw).map_err(|source| UpstreamError::InvalidUrl { url: raw, source })
    }

    async fn fetch(&self, endpoint: Endpoint, value: &str) -> UpstreamResult<Value> {
        let url = self.url_for(endpoint, value)?;
        let start = Instant::now();

        tracing::debug!(endpoint = endpoint.as_str(), url = %url, "Calling upstream");

        let result = self.send(url).await;
        metrics::record_upstream(
            endpoint.as_str(),
            if result.is_ok() { "ok" } else { "error" },
            start,
        );
        result
    }

    async fn send(&self, url: Url) -> UpstreamResult<Value> {
        let response = self.http.get(url).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        tracing::debug!(status = %status, bytes = body.len(), "Upstream responded");

        serde_json::from_slice(&body).map_err(|source| UpstreamError::Decode {
            status: status.as_u16(),
            source,
        })
    }
}

fn log_lookup<T>(endpoint: Endpoint, property_id: &str, lookup: &Lookup<T>) {
    match lookup {
        Lookup::Found(_) => {}
        Lookup::NotFound => tracing::info!(
            endpoint = endpoint.as_str(),
            property_id = %property_id,
            outcome = lookup.outcome(),
            "Property view unavailable"
        ),
        Lookup::UpstreamError(raw) => tracing::info!(
            endpoint = endpoint.as_str(),
            property_id = %property_id,
            outcome = lookup.outcome(),
            body = %raw,
            "Upstream reported an error"
        ),
    }
}

fn has_error(json: &Value) -> bool {
    json.get("error").is_some()
}

fn extract_search_results(mut json: Value) -> UpstreamResult<Vec<Value>> {
    match json.get_mut("Results").map(Value::take) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(results)) => Ok(results),
        Some(other) => Err(UpstreamError::UnexpectedShape(format!(
            "'Results' is not an array: {other}"
        ))),
    }
}

fn extract_property_id(json: &Value) -> String {
    match json.get("property_id") {
        Some(Value::String(id)) => id.clone(),
        Some(Value::Number(id)) => id.to_string(),
        _ => String::new(),
    }
}

fn extract_overview(mut json: Value) -> UpstreamResult<Lookup<Value>> {
    match json.get_mut("cards").map(Value::take) {
        Some(Value::Array(cards)) => Ok(cards
            .into_iter()
            .next()
            .map_or(Lookup::NotFound, Lookup::Found)),
        Some(other) => Err(UpstreamError::UnexpectedShape(format!(
            "'cards' is not an array: {other}"
        ))),
        None if has_error(&json) => Ok(Lookup::UpstreamError(json)),
        None => Err(UpstreamError::UnexpectedShape(
            "response has no 'cards' field".to_string(),
        )),
    }
}

fn extract_details(mut json: Value) -> Lookup<Value> {
    if has_error(&json) {
        return Lookup::UpstreamError(json);
    }
    match json.get_mut("property").map(Value::take) {
        None | Some(Value::Null) => Lookup::NotFound,
        Some(property) => Lookup::Found(property),
    }
}

fn extract_timeline(mut json: Value) -> UpstreamResult<Lookup<Option<Vec<Value>>>> {
    match json.get_mut("events").map(Value::take) {
        Some(Value::Array(events)) => Ok(Lookup::Found(Some(events))),
        Some(Value::Null) => Ok(Lookup::Found(None)),
        Some(other) => Err(UpstreamError::UnexpectedShape(format!(
            "'events' is not an array: {other}"
        ))),
        None if has_error(&json) => Ok(Lookup::UpstreamError(json)),
        None => Ok(Lookup::NotFound),
    }
}

fn extract_estimate_history(json: Value) -> Lookup<Value> {
    if has_error(&json) {
        Lookup::UpstreamError(json)
    } else {
        Lookup::Found(json)
    }
}

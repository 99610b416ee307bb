//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Placeholder substituted with a property id in id endpoint templates.
pub const ID_PLACEHOLDER: &str = "{id}";

/// Placeholder substituted with a free-text address in lookup templates.
pub const ADDRESS_PLACEHOLDER: &str = "{address}";

/// Root configuration for the proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Upstream real-estate API location and endpoint templates.
    pub upstream: UpstreamConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Cross-origin settings for browser clients.
    pub cors: CorsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:5000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:5000".to_string(),
        }
    }
}

/// Upstream service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Scheme and host of the upstream API, without a trailing path.
    pub base_url: String,

    /// Per-operation path templates, appended to `base_url`.
    pub endpoints: EndpointConfig,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "https://gateway.homes.co.nz".to_string(),
            endpoints: EndpointConfig::default(),
        }
    }
}

/// Endpoint path templates.
///
/// `search` and `property_id` must contain `{address}`; the remaining
/// templates must contain `{id}`. Each placeholder appears exactly once.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EndpointConfig {
    pub search: String,
    pub property_id: String,
    pub overview: String,
    pub details: String,
    pub timeline: String,
    pub estimate_history: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            search: "/address/search?Address={address}".to_string(),
            property_id: "/property/resolve?address={address}".to_string(),
            overview: "/properties?property_ids={id}".to_string(),
            details: "/property/{id}/detail".to_string(),
            timeline: "/property/{id}/timeline".to_string(),
            estimate_history: "/estimates/history?property_id={id}".to_string(),
        }
    }
}

impl EndpointConfig {
    /// Every template paired with its name and required placeholder.
    pub fn templates(&self) -> [(&'static str, &str, &'static str); 6] {
        [
            ("search", self.search.as_str(), ADDRESS_PLACEHOLDER),
            ("property_id", self.property_id.as_str(), ADDRESS_PLACEHOLDER),
            ("overview", self.overview.as_str(), ID_PLACEHOLDER),
            ("details", self.details.as_str(), ID_PLACEHOLDER),
            ("timeline", self.timeline.as_str(), ID_PLACEHOLDER),
            ("estimate_history", self.estimate_history.as_str(), ID_PLACEHOLDER),
        ]
    }
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Upstream connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Total time allowed for one upstream call, in seconds.
    /// Must be shorter than `request_secs`.
    pub upstream_secs: u64,

    /// Inbound request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            upstream_secs: 10,
            request_secs: 30,
        }
    }
}

/// CORS configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Allowed origins. `"*"` allows any origin.
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["*".to_string()],
        }
    }
}

impl CorsConfig {
    /// True when any origin may call the proxy.
    pub fn allows_any(&self) -> bool {
        self.allowed_origins.iter().any(|o| o == "*")
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: ProxyConfig = toml::from_str(
            r#"
            [upstream]
            base_url = "http://127.0.0.1:9000"

            [upstream.endpoints]
            details = "/v2/details/{id}"
            "#,
        )
        .unwrap();

        assert_eq!(config.upstream.base_url, "http://127.0.0.1:9000");
        assert_eq!(config.upstream.endpoints.details, "/v2/details/{id}");
        assert_eq!(
            config.upstream.endpoints.timeline,
            EndpointConfig::default().timeline
        );
        assert_eq!(config.listener.bind_address, "0.0.0.0:5000");
        assert!(config.cors.allows_any());
        assert_eq!(config.timeouts.upstream_secs, 10);
        assert_eq!(config.timeouts.request_secs, 30);
    }

    #[test]
    fn test_default_templates_carry_placeholders() {
        let endpoints = EndpointConfig::default();
        for (name, template, placeholder) in endpoints.templates() {
            assert_eq!(
                template.matches(placeholder).count(),
                1,
                "{name} should contain {placeholder} once"
            );
        }
    }
}

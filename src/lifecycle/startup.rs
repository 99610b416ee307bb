//! Startup orchestration.
//!
//! # Responsibilities
//! - Load configuration and apply command line overrides
//! - Validate the result before anything starts
//! - Start metrics, bind the listener and run the server
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listener binds last (traffic only when ready)

use std::net::SocketAddr;
use std::path::Path;

use tokio::net::TcpListener;

use crate::config::{read_config, validate_config, ConfigError, ProxyConfig};
use crate::http::HttpServer;
use crate::lifecycle::ShutdownSignal;
use crate::observability::metrics;

/// Values supplied on the command line that replace file settings.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub bind_address: Option<String>,
    pub upstream_base_url: Option<String>,
}

/// Resolve the effective configuration.
///
/// Without a path the built-in defaults are used. Overrides are applied
/// before validation so they can repair an otherwise invalid file.
pub fn prepare_config(
    path: Option<&Path>,
    overrides: Overrides,
) -> Result<ProxyConfig, ConfigError> {
    let mut config = match path {
        Some(path) => read_config(path)?,
        None => ProxyConfig::default(),
    };

    if let Some(bind_address) = overrides.bind_address {
        config.listener.bind_address = bind_address;
    }
    if let Some(base_url) = overrides.upstream_base_url {
        config.upstream.base_url = base_url;
    }

    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Start every subsystem and serve until shutdown.
pub async fn run(
    config: ProxyConfig,
    shutdown: ShutdownSignal,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.base_url,
        upstream_timeout_secs = config.timeouts.upstream_secs,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr);
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let server = HttpServer::new(config)?;
    server.run(listener, shutdown).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_path() {
        let config = prepare_config(None, Overrides::default()).unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:5000");
    }

    #[test]
    fn test_overrides_applied_before_validation() {
        let config = prepare_config(
            None,
            Overrides {
                bind_address: Some("127.0.0.1:6000".into()),
                upstream_base_url: Some("http://127.0.0.1:7000".into()),
            },
        )
        .unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:6000");
        assert_eq!(config.upstream.base_url, "http://127.0.0.1:7000");
    }

    #[test]
    fn test_invalid_override_rejected() {
        let err = prepare_config(
            None,
            Overrides {
                upstream_base_url: Some("not a url".into()),
                ..Overrides::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }
}

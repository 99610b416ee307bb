//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, CORS, JSON timeout, metrics)
//! - Bind server to listener and shut down gracefully

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{MatchedPath, Request, State},
    http::{HeaderValue, Method},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::Span;

use crate::config::{CorsConfig, ProxyConfig};
use crate::http::error::ApiError;
use crate::http::handlers;
use crate::http::request::{self, RequestIdExt, X_REQUEST_ID};
use crate::lifecycle::ShutdownSignal;
use crate::observability::metrics;
use crate::upstream::{UpstreamClient, UpstreamResult};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub upstream: Arc<UpstreamClient>,
}

/// HTTP server for the proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ProxyConfig) -> UpstreamResult<Self> {
        let upstream = UpstreamClient::new(&config.upstream, &config.timeouts)?;
        Ok(Self::with_upstream(config, upstream))
    }

    /// Create a server around an already-built upstream client.
    pub fn with_upstream(config: ProxyConfig, upstream: UpstreamClient) -> Self {
        let state = AppState {
            upstream: Arc::new(upstream),
        };
        let router = build_router(&config, state);
        Self { router, config }
    }

    /// The fully layered router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: ShutdownSignal,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.base_url,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown.or_ctrl_c())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }
}

/// Build the Axum router with all middleware layers.
pub fn build_router(config: &ProxyConfig, state: AppState) -> Router {
    Router::new()
        .route("/search", get(handlers::search_address))
        .route("/property-id", get(handlers::property_id))
        .route("/overview", get(handlers::missing_id))
        .route("/overview/", get(handlers::missing_id))
        .route("/overview/{id}", get(handlers::overview))
        .route("/timeline", get(handlers::missing_id))
        .route("/timeline/", get(handlers::missing_id))
        .route("/timeline/{id}", get(handlers::timeline))
        .route("/estimate-history", get(handlers::missing_id))
        .route("/estimate-history/", get(handlers::missing_id))
        .route("/estimate-history/{id}", get(handlers::estimate_history))
        .route("/details", get(handlers::missing_id))
        .route("/details/", get(handlers::missing_id))
        .route("/details/{id}", get(handlers::details))
        .route("/health", get(handlers::health))
        .route_layer(middleware::from_fn(track_metrics))
        .fallback(handlers::route_not_found)
        .with_state(state)
        .layer(middleware::from_fn_with_state(
            Duration::from_secs(config.timeouts.request_secs),
            enforce_timeout,
        ))
        .layer(build_cors_layer(&config.cors))
        .layer(TraceLayer::new_for_http().make_span_with(make_span))
        .layer(request::propagate_request_id_layer())
        .layer(request::set_request_id_layer())
}

/// Build CORS layer from configuration.
fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(Any)
        .expose_headers([X_REQUEST_ID]);

    if config.allows_any() {
        layer.allow_origin(Any)
    } else {
        let allowed: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        layer.allow_origin(allowed)
    }
}

fn make_span(request: &Request<Body>) -> Span {
    tracing::info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %request.request_id(),
    )
}

async fn track_metrics(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| "unmatched".to_string(), |p| p.as_str().to_string());

    let response = next.run(request).await;
    metrics::record_request(route, response.status().as_u16(), start);
    response
}

/// Answers 408 with the JSON error body once `limit` has elapsed.
async fn enforce_timeout(State(limit): State<Duration>, request: Request, next: Next) -> Response {
    match tokio::time::timeout(limit, next.run(request)).await {
        Ok(response) => response,
        Err(_) => {
            tracing::warn!(limit_secs = limit.as_secs(), "Request timed out");
            ApiError::Timeout.into_response()
        }
    }
}

//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, HeaderMap, Request, StatusCode, Uri};
use axum::Router;
use http_body_util::BodyExt;
use homes_proxy::{HttpServer, ProxyConfig};
use serde_json::Value;
use tokio::net::TcpListener;
use tower::ServiceExt;

/// A programmable stand-in for the upstream API.
///
/// Answers every path with the same status and body, optionally after a
/// delay, and remembers what it was asked for.
#[derive(Clone)]
pub struct MockUpstream {
    pub addr: SocketAddr,
    hits: Arc<AtomicUsize>,
    last_uri: Arc<Mutex<Option<String>>>,
}

#[derive(Clone)]
struct MockState {
    status: StatusCode,
    body: Arc<String>,
    delay: Duration,
    hits: Arc<AtomicUsize>,
    last_uri: Arc<Mutex<Option<String>>>,
}

async fn respond(State(state): State<MockState>, uri: Uri) -> (StatusCode, HeaderMap, String) {
    state.hits.fetch_add(1, Ordering::SeqCst);
    *state.last_uri.lock().unwrap() = Some(uri.to_string());
    if !state.delay.is_zero() {
        tokio::time::sleep(state.delay).await;
    }

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, "application/json".parse().unwrap());
    (state.status, headers, state.body.as_ref().clone())
}

impl MockUpstream {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    /// Path and query of the most recent upstream request.
    pub fn last_uri(&self) -> Option<String> {
        self.last_uri.lock().unwrap().clone()
    }
}

/// Start a mock upstream returning `status` with a raw `body`.
pub async fn start_upstream(status: StatusCode, body: impl Into<String>) -> MockUpstream {
    spawn_upstream(status, body.into(), Duration::ZERO).await
}

/// Start a mock upstream that waits `delay` before answering 200 with `body`.
pub async fn start_slow_upstream(delay: Duration, body: Value) -> MockUpstream {
    spawn_upstream(StatusCode::OK, body.to_string(), delay).await
}

async fn spawn_upstream(status: StatusCode, body: String, delay: Duration) -> MockUpstream {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let state = MockState {
        status,
        body: Arc::new(body),
        delay,
        hits: Arc::new(AtomicUsize::new(0)),
        last_uri: Arc::new(Mutex::new(None)),
    };
    let mock = MockUpstream {
        addr,
        hits: state.hits.clone(),
        last_uri: state.last_uri.clone(),
    };

    let app = Router::new().fallback(respond).with_state(state);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    mock
}

/// Start a mock upstream answering 200 with `body`.
pub async fn start_json_upstream(body: Value) -> MockUpstream {
    start_upstream(StatusCode::OK, body.to_string()).await
}

/// Proxy configuration pointing at `base_url`.
pub fn proxy_config(base_url: &str) -> ProxyConfig {
    let mut config = ProxyConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.upstream.base_url = base_url.to_string();
    config.timeouts.upstream_secs = 3;
    config.timeouts.request_secs = 5;
    config
}

/// In-process proxy router talking to `upstream`.
pub fn proxy_router(upstream: &MockUpstream) -> Router {
    router_for(proxy_config(&upstream.base_url()))
}

/// In-process proxy router built from an explicit configuration.
pub fn router_for(config: ProxyConfig) -> Router {
    HttpServer::new(config).unwrap().router()
}

/// Response as seen by a test.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

/// Send one GET through `router`.
pub async fn get(router: Router, uri: &str) -> TestResponse {
    let response = router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| panic!("non-JSON body for {uri}: {bytes:?}"));

    TestResponse {
        status,
        headers,
        body,
    }
}

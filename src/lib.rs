//! Property data proxy library.
//!
//! Exposes a handful of read-only JSON endpoints backed by an upstream
//! real-estate API, reshaping each upstream response into a simpler body.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod upstream;

pub use config::schema::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use upstream::UpstreamClient;

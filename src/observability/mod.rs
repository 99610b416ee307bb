//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! handlers + upstream client produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout
//!     → Metrics endpoint (Prometheus scrape, opt-in)
//! ```
//!
//! Request IDs are attached in `http::request` and recorded on the trace span.

pub mod logging;
pub mod metrics;

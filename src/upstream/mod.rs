//! Upstream API subsystem.
//!
//! # Data Flow
//! ```text
//! handler (property id / address)
//!     → template.rs (substitute placeholder, percent-encode)
//!     → client.rs (single GET, parse JSON, extract view)
//!     → Lookup<T> | Vec<T> | String, or UpstreamError
//! ```

pub mod client;
pub mod template;
pub mod types;

pub use client::{Endpoint, UpstreamClient};
pub use types::{Lookup, UpstreamError, UpstreamResult};

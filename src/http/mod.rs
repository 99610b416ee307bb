//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (assign request ID)
//!     → extract.rs (address / id parameters, JSON 400 on rejection)
//!     → handlers.rs (validate parameters, call upstream, shape body)
//!     → error.rs (map absence / faults to status + JSON)
//!     → Send to client
//! ```

pub mod error;
pub mod extract;
pub mod handlers;
pub mod request;
pub mod server;

pub use error::{ApiError, ErrorBody};
pub use extract::{AddressParam, IdParam};
pub use request::{RequestIdExt, X_REQUEST_ID};
pub use server::{build_router, AppState, HttpServer};

//! Mapping of domain outcomes to HTTP responses.
//!
//! Handlers return `Result<_, ApiError>`; this is the only place that picks
//! an error status code.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::upstream::UpstreamError;

pub const PROPERTY_NOT_FOUND: &str = "Property not found";
pub const PROPERTY_ID_NOT_FOUND: &str = "Property id not found";

/// JSON body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Errors surfaced to proxy clients.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A required query or path parameter was absent.
    #[error("Missing {0} parameter")]
    MissingParameter(&'static str),

    /// A parameter was present but could not be decoded.
    #[error("{0}")]
    InvalidParameter(String),

    /// The parameter was present but the upstream had nothing for it.
    #[error("{0}")]
    NotFound(&'static str),

    /// Transport failure, non-JSON body or unexpected shape upstream.
    #[error("Upstream request failed")]
    Upstream(#[from] UpstreamError),

    /// The inbound request exceeded `timeouts.request_secs`.
    #[error("Request timed out")]
    Timeout,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingParameter(_) | ApiError::InvalidParameter(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Timeout => StatusCode::REQUEST_TIMEOUT,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Upstream(e) = &self {
            tracing::error!(error = %e, "Upstream fault");
        }

        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

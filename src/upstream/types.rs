//! Upstream result and error types.

use serde_json::Value;
use thiserror::Error;

use crate::upstream::template::TemplateError;

/// Outcome of an id-keyed upstream lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    /// The requested view exists.
    Found(T),
    /// The upstream response carried no value for the view.
    NotFound,
    /// The upstream response flagged an error; the raw body is kept.
    UpstreamError(Value),
}

impl<T> Lookup<T> {
    /// The found value, discarding the reason for absence.
    pub fn found(self) -> Option<T> {
        match self {
            Lookup::Found(value) => Some(value),
            Lookup::NotFound | Lookup::UpstreamError(_) => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }

    /// Short label used in logs and metrics.
    pub fn outcome(&self) -> &'static str {
        match self {
            Lookup::Found(_) => "found",
            Lookup::NotFound => "not_found",
            Lookup::UpstreamError(_) => "upstream_error",
        }
    }
}

/// Faults raised while talking to the upstream service.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("invalid upstream URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("upstream returned non-JSON body (status {status}): {source}")]
    Decode {
        status: u16,
        #[source]
        source: serde_json::Error,
    },

    #[error("unexpected upstream response shape: {0}")]
    UnexpectedShape(String),
}

/// Result type for upstream operations.
pub type UpstreamResult<T> = Result<T, UpstreamError>;

//! Request parameter extractors.
//!
//! Both reject with `ApiError`, so a bad or missing parameter always gets
//! the JSON error body instead of axum's plain-text rejection.

use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use url::form_urlencoded;

use crate::http::error::ApiError;

/// The `address` query parameter.
///
/// When repeated, the first occurrence wins and the rest are ignored. An
/// empty value counts as present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressParam(pub String);

impl<S: Send + Sync> FromRequestParts<S> for AddressParam {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        first_query_value(parts.uri.query(), "address")
            .map(AddressParam)
            .ok_or(ApiError::MissingParameter("address"))
    }
}

/// The `{id}` path segment. A blank id counts as missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdParam(pub String);

impl<S: Send + Sync> FromRequestParts<S> for IdParam {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::InvalidParameter(rejection.body_text()))?;

        if id.trim().is_empty() {
            return Err(ApiError::MissingParameter("id"));
        }
        Ok(IdParam(id))
    }
}

fn first_query_value(query: Option<&str>, name: &str) -> Option<String> {
    form_urlencoded::parse(query?.as_bytes())
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_value_wins() {
        assert_eq!(
            first_query_value(Some("address=a&address=b"), "address").as_deref(),
            Some("a")
        );
    }

    #[test]
    fn test_query_value_is_decoded() {
        assert_eq!(
            first_query_value(Some("x=1&address=123%20Main+St"), "address").as_deref(),
            Some("123 Main St")
        );
    }

    #[test]
    fn test_empty_value_is_present() {
        assert_eq!(
            first_query_value(Some("address="), "address").as_deref(),
            Some("")
        );
        assert_eq!(first_query_value(Some("address"), "address").as_deref(), Some(""));
    }

    #[test]
    fn test_absent_value() {
        assert_eq!(first_query_value(None, "address"), None);
        assert_eq!(first_query_value(Some("other=1"), "address"), None);
    }
}

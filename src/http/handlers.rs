//! Endpoint handlers.
//!
//! Each handler receives its parameter through `http::extract`, makes one
//! upstream call via `UpstreamClient` and shapes the result. Missing or
//! undecodable parameters are rejected before the upstream is touched.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::http::error::{ApiError, PROPERTY_ID_NOT_FOUND, PROPERTY_NOT_FOUND};
use crate::http::extract::{AddressParam, IdParam};
use crate::http::server::AppState;
use crate::upstream::Lookup;

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<Value>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PropertyIdResponse {
    pub address: String,
    pub id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TimelineResponse {
    /// `None` when the upstream sent `"events": null`.
    pub timeline: Option<Vec<Value>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
}

fn found<T>(lookup: Lookup<T>) -> Result<T, ApiError> {
    lookup.found().ok_or(ApiError::NotFound(PROPERTY_NOT_FOUND))
}

/// `GET /search?address=`
pub async fn search_address(
    State(state): State<AppState>,
    AddressParam(address): AddressParam,
) -> Result<Json<SearchResponse>, ApiError> {
    let results = state.upstream.search_address(&address).await?;

    tracing::debug!(matches = results.len(), "Address search complete");
    Ok(Json(SearchResponse { results }))
}

/// `GET /property-id?address=`
pub async fn property_id(
    State(state): State<AppState>,
    AddressParam(address): AddressParam,
) -> Result<Json<PropertyIdResponse>, ApiError> {
    let id = state.upstream.property_id(&address).await?;

    if id.is_empty() {
        return Err(ApiError::NotFound(PROPERTY_ID_NOT_FOUND));
    }
    Ok(Json(PropertyIdResponse { address, id }))
}

/// Bare and empty-segment forms of the id endpoints.
pub async fn missing_id() -> ApiError {
    ApiError::MissingParameter("id")
}

/// `GET /overview/{id}`
pub async fn overview(
    State(state): State<AppState>,
    IdParam(id): IdParam,
) -> Result<Json<Value>, ApiError> {
    let overview = found(state.upstream.property_overview(&id).await?)?;
    Ok(Json(overview))
}

/// `GET /timeline/{id}`
pub async fn timeline(
    State(state): State<AppState>,
    IdParam(id): IdParam,
) -> Result<Json<TimelineResponse>, ApiError> {
    let timeline = found(state.upstream.property_timeline(&id).await?)?;
    Ok(Json(TimelineResponse { timeline }))
}

/// `GET /estimate-history/{id}`
pub async fn estimate_history(
    State(state): State<AppState>,
    IdParam(id): IdParam,
) -> Result<Json<Value>, ApiError> {
    let history = found(state.upstream.estimate_history(&id).await?)?;
    Ok(Json(history))
}

/// `GET /details/{id}`
pub async fn details(
    State(state): State<AppState>,
    IdParam(id): IdParam,
) -> Result<Json<Value>, ApiError> {
    let details = found(state.upstream.property_details(&id).await?)?;
    Ok(Json(details))
}

pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub async fn route_not_found() -> ApiError {
    ApiError::NotFound("Not found")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lookup_absence_is_property_not_found() {
        for lookup in [Lookup::<Value>::NotFound, Lookup::UpstreamError(json!({"error": 1}))] {
            let err = found(lookup).unwrap_err();
            assert_eq!(err.to_string(), PROPERTY_NOT_FOUND);
        }
    }

    #[test]
    fn test_null_timeline_serializes_as_null() {
        let body = serde_json::to_value(TimelineResponse { timeline: None }).unwrap();
        assert_eq!(body, json!({"timeline": null}));
    }
}

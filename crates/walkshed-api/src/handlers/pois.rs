use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, ConnectInfo, FromRequestParts, Query, State},
    http::request::Parts,
    Json,
};
use walkshed_core::models::{LookupRequest, LookupResponse};

use crate::dto::PoiQuery;
use crate::error::ApiError;
use crate::state::AppState;

/// Header carrying an explicit caller identity
pub const CLIENT_ID_HEADER: &str = "x-client-id";

/// Caller identity used for quota accounting.
///
/// Taken from `x-client-id` when present, otherwise the peer IP address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIdentity(pub String);

impl<S> FromRequestParts<S> for ClientIdentity
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let from_header = parts
            .headers
            .get(CLIENT_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty());

        if let Some(id) = from_header {
            return Ok(Self(id.to_string()));
        }

        let from_peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string());

        Ok(Self(from_peer.unwrap_or_else(|| "unknown".to_string())))
    }
}

/// GET /api/v1/pois?lat=&lon=
pub async fn lookup_pois(
    State(state): State<Arc<AppState>>,
    ClientIdentity(identity): ClientIdentity,
    query: Result<Query<PoiQuery>, QueryRejection>,
) -> Result<Json<LookupResponse>, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::bad_request(e.body_text()))?;

    tracing::info!(lat = query.lat, lon = query.lon, requested_by = %identity, "Processing lookup");

    let request = LookupRequest::new(query.lat, query.lon, identity);
    let response = state.lookup.handle(&request).await.map_err(|e| {
        tracing::warn!(error = %e, code = ?e.code(), "Lookup rejected");
        ApiError::from(e)
    })?;

    Ok(Json(response))
}

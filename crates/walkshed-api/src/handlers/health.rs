use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, Json};

use crate::dto::HealthResponse;
use crate::state::AppState;

/// Liveness plus reachability of the durable tier.
///
/// The durable tier is optional for serving lookups, so an unreachable one
/// degrades the report without failing the probe.
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.durable_store.health_check().await {
        Ok(()) => Json(HealthResponse::ok()),
        Err(e) => {
            tracing::warn!(error = %e, "Durable tier health check failed");
            Json(HealthResponse::degraded())
        }
    }
}

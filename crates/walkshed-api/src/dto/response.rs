use serde::Serialize;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub durable: &'static str,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self { status: "ok", service: "walkshed-api", durable: "ok" }
    }

    pub fn degraded() -> Self {
        Self { status: "degraded", service: "walkshed-api", durable: "unavailable" }
    }
}

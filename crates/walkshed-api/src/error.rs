use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value as JsonValue;
use thiserror::Error;
use walkshed_core::error::{ErrorCode, WalkshedError};

/// Unified API error type
#[derive(Debug, Error)]
#[error("{code:?} ({status}): {error}")]
pub struct ApiError {
    pub status: StatusCode,
    pub code: ErrorCode,

    /// Message, or the provider body verbatim on exhaustion
    pub error: JsonValue,

    pub retry_after_secs: Option<u64>,
}

impl ApiError {
    fn new(status: StatusCode, code: ErrorCode, error: impl Into<JsonValue>) -> Self {
        Self {
            status,
            code,
            error: error.into(),
            retry_after_secs: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, ErrorCode::InvalidCoordinate, message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::Internal, message.into())
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: JsonValue,
    code: ErrorCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    retry_after_secs: Option<u64>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.error,
            code: self.code,
            retry_after_secs: self.retry_after_secs,
        };
        let mut response = (self.status, Json(body)).into_response();

        if let Some(secs) = self.retry_after_secs {
            response.headers_mut().insert(header::RETRY_AFTER, HeaderValue::from(secs));
        }

        response
    }
}

impl From<WalkshedError> for ApiError {
    fn from(err: WalkshedError) -> Self {
        let code = err.code();
        match err {
            WalkshedError::ProviderExhausted { response } => {
                Self::new(StatusCode::SERVICE_UNAVAILABLE, code, response)
            }
            WalkshedError::IsochroneFailure { reason } => {
                tracing::error!(reason = %reason, "Isochrone lookup failed");
                Self::new(StatusCode::BAD_GATEWAY, code, "Isochrone provider failed")
            }
            WalkshedError::QuotaExceeded { retry_after, .. } => {
                // Whole seconds, rounded up
                let secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
                let mut api_error = Self::new(StatusCode::TOO_MANY_REQUESTS, code, err.to_string());
                api_error.retry_after_secs = Some(secs);
                api_error
            }
            WalkshedError::InvalidCoordinate { .. } => {
                Self::new(StatusCode::BAD_REQUEST, code, err.to_string())
            }
            other => {
                tracing::error!(error = %other, "Lookup failed");
                Self::internal("Internal error")
            }
        }
    }
}

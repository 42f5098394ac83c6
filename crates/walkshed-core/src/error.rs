//! Error types for walkshed

use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WalkshedError {
    // Upstream provider errors
    #[error("POI provider returned no feature list")]
    ProviderExhausted { response: serde_json::Value },

    #[error("Isochrone provider failed: {reason}")]
    IsochroneFailure { reason: String },

    #[error("Upstream provider {provider} failed: {reason}")]
    Upstream { provider: String, reason: String },

    // Quota errors
    #[error("Unique location quota exceeded for {identity}; retry in {}s", retry_after.as_secs())]
    QuotaExceeded {
        identity: String,
        retry_after: Duration,
    },

    // Request errors
    #[error("Invalid coordinate ({lat}, {lon}): {reason}")]
    InvalidCoordinate { lat: f64, lon: f64, reason: String },

    // Cache tier errors, absorbed by the lookup layer
    #[error("Persistence failure: {0}")]
    Persistence(String),

    // Configuration errors
    #[error("Missing required configuration: {key}")]
    ConfigMissing { key: String },

    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Machine-readable error code carried in the `code` field of error responses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    ProviderExhausted,
    IsochroneFailure,
    QuotaExceeded,
    InvalidCoordinate,
    Internal,
}

impl WalkshedError {
    /// Error code surfaced to callers
    pub fn code(&self) -> ErrorCode {
        match self {
            WalkshedError::ProviderExhausted { .. } => ErrorCode::ProviderExhausted,
            WalkshedError::IsochroneFailure { .. } => ErrorCode::IsochroneFailure,
            WalkshedError::QuotaExceeded { .. } => ErrorCode::QuotaExceeded,
            WalkshedError::InvalidCoordinate { .. } => ErrorCode::InvalidCoordinate,
            _ => ErrorCode::Internal,
        }
    }
}

impl From<serde_json::Error> for WalkshedError {
    fn from(err: serde_json::Error) -> Self {
        WalkshedError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, WalkshedError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let exhausted = WalkshedError::ProviderExhausted { response: serde_json::json!({}) };
        assert_eq!(exhausted.code(), ErrorCode::ProviderExhausted);

        let quota = WalkshedError::QuotaExceeded {
            identity: "client-a".to_string(),
            retry_after: Duration::from_secs(120),
        };
        assert_eq!(quota.code(), ErrorCode::QuotaExceeded);
        assert!(quota.to_string().contains("retry in 120s"));

        let persistence = WalkshedError::Persistence("connection reset".to_string());
        assert_eq!(persistence.code(), ErrorCode::Internal);
    }

    #[test]
    fn test_error_code_serialization() {
        let code = serde_json::to_value(ErrorCode::IsochroneFailure).unwrap();
        assert_eq!(code, serde_json::json!("ISOCHRONE_FAILURE"));
    }
}

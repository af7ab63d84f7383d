use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use thiserror::Error;

/// Plan generation errors.
#[derive(Debug, Error)]
pub enum LlmError {
    /// The request body could not be interpreted.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Authentication against the provider failed (missing or invalid API key).
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The provider rejected the configured model.
    #[error("Model not found: {0}")]
    ModelNotFound(String),

    /// The provider rate limited us.
    #[error("Rate limit exceeded: {message}")]
    RateLimitExceeded {
        /// Provider-supplied message.
        message: String,
    },

    /// Insufficient quota or credits at the provider.
    #[error("Insufficient quota: {0}")]
    InsufficientQuota(String),

    /// Provider API returned an error.
    #[error("Provider API error ({status}): {message}")]
    ProviderApiError {
        /// HTTP status returned by the provider.
        status: u16,
        /// Provider-supplied message.
        message: String,
    },

    /// Network or connection error.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Internal server error.
    /// If Some(message), it came from the provider and can be shown.
    /// If None, it's an internal Planforge error and should not leak details.
    #[error("Internal server error")]
    InternalError(Option<String>),
}

/// Error body returned for failures that happen before the stream starts.
///
/// Once streaming has begun the status code is committed, so later failures
/// are logged only; this body is the whole pre-stream error contract.
/// Every failure class maps to a 500 here, undifferentiated.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    details: String,
    timestamp: String,
}

impl IntoResponse for LlmError {
    fn into_response(self) -> Response {
        match &self {
            Self::InternalError(Some(provider_msg)) => {
                log::error!("Provider returned internal error: {provider_msg}");
            }
            Self::InternalError(None) => {
                log::error!("Internal server error occurred");
            }
            _ => {
                log::error!("Plan generation failed: {self}");
            }
        }

        let details = match &self {
            Self::InternalError(Some(provider_msg)) => provider_msg.clone(),
            Self::InternalError(None) => "Unknown error".to_string(),
            _ => self.to_string(),
        };

        let error_response = ErrorResponse {
            error: "Failed to generate project plan".to_string(),
            details,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        };

        (StatusCode::INTERNAL_SERVER_ERROR, Json(error_response)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_error_does_not_leak_details() {
        let error = LlmError::InternalError(None);
        let response = error.into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn error_body_has_generic_message_and_timestamp() {
        let error = LlmError::InvalidRequest("body is not JSON".to_string());

        let body = ErrorResponse {
            error: "Failed to generate project plan".to_string(),
            details: error.to_string(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        };

        assert_eq!(body.details, "Invalid request: body is not JSON");
        assert!(body.timestamp.ends_with('Z'));
    }
}

//! Mapping of [`GrowthfyError`] to HTTP responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use growthfy_core::GrowthfyError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, warn};

/// JSON body of every error response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    /// Body returned by the vendor, for forwarded vendor errors
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    /// Cause of an internal error
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorResponse {
    fn new<S: Into<String>>(error: S) -> Self {
        Self {
            error: error.into(),
            details: None,
            message: None,
        }
    }
}

/// Error returned by handlers
#[derive(Debug)]
pub struct ApiError(pub GrowthfyError);

impl From<GrowthfyError> for ApiError {
    fn from(error: GrowthfyError) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self.0 {
            GrowthfyError::Validation { message } => {
                (StatusCode::BAD_REQUEST, ErrorResponse::new(message))
            }
            GrowthfyError::Configuration { message } => {
                error!("Proxy misconfigured: {}", message);
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorResponse::new(message))
            }
            GrowthfyError::Upstream {
                status,
                message,
                details,
            } => {
                warn!("Forwarding vendor status {}", status);
                let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
                (
                    status,
                    ErrorResponse {
                        details,
                        ..ErrorResponse::new(message)
                    },
                )
            }
            other => {
                error!("Request failed ({}): {}", other.category(), other);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        message: Some(other.to_string()),
                        ..ErrorResponse::new("Internal server error")
                    },
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn render(error: GrowthfyError) -> (StatusCode, Value) {
        let response = ApiError(error).into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_validation_is_bad_request() {
        let (status, body) =
            render(GrowthfyError::validation("Missing required parameter: query")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Missing required parameter: query"}));
    }

    #[tokio::test]
    async fn test_missing_key_is_internal() {
        let (status, body) = render(GrowthfyError::configuration("API key not configured")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "API key not configured"}));
    }

    #[tokio::test]
    async fn test_upstream_status_forwarded() {
        let details = json!({"message": "Rate limit exceeded"});
        let (status, body) = render(GrowthfyError::upstream(
            429,
            "Error from socialdata API",
            Some(details.clone()),
        ))
        .await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(body["error"], "Error from socialdata API");
        assert_eq!(body["details"], details);
    }

    #[tokio::test]
    async fn test_network_is_internal_with_message() {
        let (status, body) = render(GrowthfyError::network("connection reset")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal server error");
        assert_eq!(body["message"], "Network error: connection reset");
        assert!(body.get("details").is_none());
    }
}

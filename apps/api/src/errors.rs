use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::auth::AuthError;
use crate::embedding::EmbeddingError;
use crate::llm_client::LlmError;
use crate::profile::validation::FieldErrors;
use crate::retrieval::IndexError;

/// External platform a request depends on. Used to pick a generic,
/// client-safe failure description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamService {
    Embedding,
    VectorIndex,
    ChatModel,
    ProfileStore,
}

impl UpstreamService {
    fn public_details(self) -> &'static str {
        match self {
            UpstreamService::Embedding => "Failed to process the question",
            UpstreamService::VectorIndex => "Failed to search occupation data",
            UpstreamService::ChatModel => "Failed to generate a response",
            UpstreamService::ProfileStore => "Profile storage is unavailable",
        }
    }
}

impl fmt::Display for UpstreamService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UpstreamService::Embedding => "embedding service",
            UpstreamService::VectorIndex => "vector index",
            UpstreamService::ChatModel => "chat model",
            UpstreamService::ProfileStore => "profile store",
        };
        f.write_str(name)
    }
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
/// Only the messages of the 4xx variants reach the client.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Validation failed for {} field(s)", .0.len())]
    Validation(FieldErrors),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("{service} error: {message}")]
    Upstream {
        service: UpstreamService,
        message: String,
    },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn upstream(service: UpstreamService, message: impl Into<String>) -> Self {
        AppError::Upstream {
            service,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Upstream { .. }
            | AppError::Configuration(_)
            | AppError::Database(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<LlmError> for AppError {
    fn from(e: LlmError) -> Self {
        AppError::upstream(UpstreamService::ChatModel, e.to_string())
    }
}

impl From<EmbeddingError> for AppError {
    fn from(e: EmbeddingError) -> Self {
        AppError::upstream(UpstreamService::Embedding, e.to_string())
    }
}

impl From<IndexError> for AppError {
    fn from(e: IndexError) -> Self {
        AppError::upstream(UpstreamService::VectorIndex, e.to_string())
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::MissingToken => {
                AppError::Unauthorized("Unauthorized: Missing or malformed token".to_string())
            }
            other => {
                tracing::warn!("Token rejected: {other}");
                AppError::Unauthorized("Authentication failed".to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match &self {
            AppError::InvalidInput(msg) | AppError::Unauthorized(msg) | AppError::NotFound(msg) => {
                json!({ "error": msg })
            }
            AppError::Validation(fields) => json!({
                "error": "Please correct the highlighted fields",
                "fields": fields,
            }),
            AppError::Upstream { service, message } => {
                tracing::error!("{service} call failed: {message}");
                internal_body(service.public_details())
            }
            AppError::Configuration(msg) => {
                tracing::error!("Configuration error: {msg}");
                internal_body("Service is misconfigured")
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                internal_body(UpstreamService::ProfileStore.public_details())
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                internal_body("An error occurred while processing your request")
            }
        };

        (status, Json(body)).into_response()
    }
}

fn internal_body(details: &str) -> serde_json::Value {
    json!({
        "error": "Internal server error",
        "details": details,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_invalid_input_is_400_with_message() {
        let (status, body) = body_json(AppError::InvalidInput("Message is required".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Message is required" }));
    }

    #[tokio::test]
    async fn test_upstream_error_does_not_leak_message() {
        let err = AppError::upstream(
            UpstreamService::ChatModel,
            "401 invalid api key sk-secret-123",
        );
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal server error");
        assert_eq!(body["details"], "Failed to generate a response");
        assert!(!body.to_string().contains("sk-secret-123"));
    }

    #[tokio::test]
    async fn test_configuration_error_is_generic_500() {
        let (status, body) =
            body_json(AppError::Configuration("dimension 1536 != 3072".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["details"], "Service is misconfigured");
    }

    #[tokio::test]
    async fn test_validation_error_lists_fields() {
        let mut fields = FieldErrors::new();
        fields.insert("fullName".into(), "Full name is required".into());
        let (status, body) = body_json(AppError::Validation(fields)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["fields"]["fullName"], "Full name is required");
    }

    #[tokio::test]
    async fn test_expired_token_maps_to_generic_401() {
        let (status, body) = body_json(AppError::from(AuthError::Expired)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Authentication failed");
    }
}

use async_graphql::ErrorExtensions;
use axum::{http::StatusCode, response::IntoResponse};
use serde_json::json;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

/// Application error type
///
/// The three upstream variants are the failure taxonomy of the aggregation
/// pipeline. They are never retried or translated on the way up; the REST and
/// GraphQL layers own the protocol mapping.
#[derive(Error, Debug)]
pub enum AppError {
    // ===== Upstream Failures =====
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("upstream timed out: {0}")]
    UpstreamTimeout(String),

    #[error("upstream error: {0}")]
    UpstreamError(String),

    // ===== Serialization Errors =====
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ===== Configuration Errors =====
    #[error("configuration error: {0}")]
    Config(String),

    // ===== Internal Server Errors =====
    #[error("internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::UpstreamUnavailable(_) | AppError::UpstreamError(_) => {
                StatusCode::BAD_GATEWAY
            }
            AppError::UpstreamTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get error code for programmatic error handling
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::UpstreamUnavailable(_) => "UPSTREAM_UNAVAILABLE",
            AppError::UpstreamTimeout(_) => "UPSTREAM_TIMEOUT",
            AppError::UpstreamError(_) => "UPSTREAM_ERROR",
            AppError::Json(_) => "JSON_ERROR",
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get a user-friendly error message (without backend addresses or payloads)
    pub fn user_message(&self) -> String {
        match self {
            AppError::UpstreamUnavailable(_) => "Backend service unavailable".to_string(),
            AppError::UpstreamTimeout(_) => "Backend service timed out".to_string(),
            AppError::UpstreamError(_) => "Backend service error".to_string(),
            AppError::Json(_) => "Serialization error".to_string(),
            AppError::Config(msg) => format!("Configuration error: {}", msg),
            AppError::Internal(_) => "Internal server error".to_string(),
        }
    }

    /// Log this error with appropriate level and context
    pub fn log(&self) {
        let status = self.status_code();
        let code = self.error_code();

        if status.is_server_error() {
            tracing::error!(
                error = %self,
                error_code = %code,
                status = %status.as_u16(),
                "Request failed"
            );
        } else {
            tracing::debug!(
                error = %self,
                error_code = %code,
                "Client error occurred"
            );
        }
    }

    /// Create an internal server error
    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }

    /// Create an upstream-unavailable error
    pub fn unavailable(msg: impl Into<String>) -> Self {
        AppError::UpstreamUnavailable(msg.into())
    }

    /// Create an upstream-timeout error
    pub fn timeout(msg: impl Into<String>) -> Self {
        AppError::UpstreamTimeout(msg.into())
    }

    /// Create an upstream error (backend returned an explicit failure)
    pub fn upstream(msg: impl Into<String>) -> Self {
        AppError::UpstreamError(msg.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        self.log();

        let status = self.status_code();
        let error_response = json!({
            "error": self.user_message(),
            "error_code": self.error_code(),
            "status": status.as_u16(),
        });

        (status, axum::Json(error_response)).into_response()
    }
}

// ============================================================================
// Conversion from transport error types
// ============================================================================

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() {
            AppError::UpstreamUnavailable(err.to_string())
        } else if err.is_timeout() {
            AppError::UpstreamTimeout(err.to_string())
        } else {
            AppError::UpstreamError(err.to_string())
        }
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for AppError {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        AppError::UpstreamUnavailable(err.to_string())
    }
}

// ============================================================================
// GraphQL error mapping
// ============================================================================

impl ErrorExtensions for AppError {
    fn extend(&self) -> async_graphql::Error {
        let code = self.error_code();
        async_graphql::Error::new(self.user_message()).extend_with(|_, e| e.set("code", code))
    }
}

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// API-wide error taxonomy. Every variant renders as a JSON envelope
/// `{ "error": message }` with the status below; backend messages pass
/// through verbatim.
#[derive(Error, Debug)]
pub enum ApiError {
    /// No resolvable caller identity.
    #[error("Not authenticated: {0}")]
    Unauthenticated(String),
    /// Row missing or invisible to the caller (owner-scope mismatch).
    #[error("Not found")]
    NotFound,
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Database error: {0}")]
    Database(sqlx::Error),
    /// The external LLM call failed or returned non-2xx.
    #[error("Upstream error: {0}")]
    Upstream(String),
    /// LLM output was not the JSON shape we asked for.
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Self::NotFound,
            other => Self::Database(other),
        }
    }
}

impl ApiError {
    const fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthenticated(_) | Self::Jwt(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            // The AI proxy contract collapses upstream and parse failures
            // into a plain 500 envelope.
            Self::Database(_) | Self::Upstream(_) | Self::Parse(_) | Self::Serialization(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err = ApiError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, ApiError::NotFound));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_upstream_collapses_to_500() {
        let err = ApiError::Upstream("model provider returned 429".to_string());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_unauthenticated_is_401() {
        let err = ApiError::Unauthenticated("missing bearer token".to_string());
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
    }
}

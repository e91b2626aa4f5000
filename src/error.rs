use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

pub type ApiResult<T> = Result<T, ApiError>;

/// Domain errors surfaced to clients. Every variant maps to the uniform
/// `{"success": false, "message": ...}` body with its status code; anything
/// unexpected collapses into `Internal` and is logged, never echoed.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("User not authenticated")]
    Unauthenticated,

    #[error("Reset password token is invalid or has expired")]
    InvalidOrExpiredToken,

    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Failed to send email: {0}")]
    DeliveryFailed(String),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_)
            | ApiError::InvalidCredentials
            | ApiError::InvalidOrExpiredToken
            | ApiError::UploadFailed(_)
            | ApiError::DeliveryFailed(_)
            | ApiError::NotFound(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::Internal(e) => {
                error!(error = %e, "internal error");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        (status, Json(json!({ "success": false, "message": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_match_taxonomy() {
        assert_eq!(
            ApiError::Validation("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::InvalidCredentials.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::Unauthenticated.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::InvalidOrExpiredToken.status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Internal(anyhow::anyhow!("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn internal_error_message_is_generic() {
        let resp = ApiError::Internal(anyhow::anyhow!("db password leaked")).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn credential_errors_share_one_message() {
        // Enumeration resistance: unknown email and wrong password must be
        // indistinguishable to the caller.
        assert_eq!(
            ApiError::InvalidCredentials.to_string(),
            "Invalid email or password"
        );
    }
}

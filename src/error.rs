use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    auth::AuthError,
    models::ErrorResponse,
    repository::RepoError,
};

/// ApiError
///
/// Every way a handler can fail. Each variant renders the same JSON body
/// (`{success:false, error, code, message}`) so clients only ever parse one error shape.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Missing, unparsable or incomplete request body.
    #[error("{0}")]
    BadRequest(String),

    /// Rejected by the auth guard.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Unmatched route or an identity with no record behind it.
    #[error("resource not found")]
    NotFound,

    #[error("method not allowed")]
    MethodNotAllowed,

    #[error(transparent)]
    Repository(#[from] RepoError),
}

/// Convenience type alias for handler return values.
pub type ApiResult<T> = Result<T, ApiError>;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Auth(err) => err.into_response(),
            ApiError::BadRequest(detail) => {
                error_response(StatusCode::BAD_REQUEST, "bad_request", detail)
            }
            ApiError::NotFound => {
                error_response(StatusCode::NOT_FOUND, "not_found", "resource not found")
            }
            ApiError::MethodNotAllowed => error_response(
                StatusCode::METHOD_NOT_ALLOWED,
                "method_not_allowed",
                "method not allowed",
            ),
            ApiError::Repository(err @ RepoError::NotFound { .. }) => {
                error_response(StatusCode::NOT_FOUND, "not_found", err.to_string())
            }
            ApiError::Repository(err) => {
                // The driver message can contain SQL; it goes to the log, not the client.
                tracing::error!(error = %err, "repository failure");
                error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_server_error",
                    "internal server error",
                )
            }
        }
    }
}

/// Builds the JSON error body shared by [`ApiError`] and [`AuthError`].
pub fn error_response(status: StatusCode, code: &str, message: impl Into<String>) -> Response {
    let body = ErrorResponse {
        success: false,
        error: status.as_u16(),
        code: code.to_string(),
        message: message.into(),
    };
    (status, Json(body)).into_response()
}

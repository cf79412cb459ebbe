//! Consistent JSON error responses.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use taskhub_auth::{AuthError, AuthFailure};
use taskhub_core::DomainError;

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

/// Map an authentication outcome to a response.
///
/// Unknown email and wrong password share one body. A lockout discloses a
/// retry time, never the attempt counter. Store and hash faults become a
/// generic 500 with the detail kept in the logs.
pub fn auth_error_to_response(err: AuthError) -> axum::response::Response {
    match err {
        AuthError::Rejected(AuthFailure::InvalidInput) => json_error(
            StatusCode::BAD_REQUEST,
            "invalid_input",
            "malformed login request",
        ),
        AuthError::Rejected(AuthFailure::RateLimited) => json_error(
            StatusCode::TOO_MANY_REQUESTS,
            "rate_limited",
            "too many attempts, slow down",
        ),
        AuthError::Rejected(AuthFailure::InvalidCredentials) => json_error(
            StatusCode::UNAUTHORIZED,
            "invalid_credentials",
            "invalid email or password",
        ),
        AuthError::Rejected(AuthFailure::AccountLocked { retry_after_secs }) => (
            StatusCode::LOCKED,
            axum::Json(json!({
                "error": "account_locked",
                "message": "account temporarily locked",
                "retry_after_secs": retry_after_secs,
            })),
        )
            .into_response(),
        AuthError::Store(e) => {
            tracing::error!(error = %e, "auth store failure");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal", "internal error")
        }
        AuthError::Hash(e) => {
            tracing::error!(error = %e, "password hash failure");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal", "internal error")
        }
    }
}

pub fn domain_error_to_response(err: &DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(msg) => {
            json_error(StatusCode::BAD_REQUEST, "validation_error", msg.clone())
        }
        DomainError::InvariantViolation(msg) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "invariant_violation", msg.clone())
        }
        DomainError::InvalidId(msg) => {
            json_error(StatusCode::BAD_REQUEST, "invalid_id", msg.clone())
        }
        DomainError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        DomainError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg.clone()),
    }
}

/// Generic 500 for faults that reached the handler without a mapping.
pub fn internal_error(err: impl core::fmt::Display) -> axum::response::Response {
    tracing::error!(error = %err, "request failed");
    json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal", "internal error")
}

use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};

use crate::context::SessionContext;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn whoami(Extension(session): Extension<SessionContext>) -> impl IntoResponse {
    let claim = session.claim();
    Json(serde_json::json!({
        "account_id": claim.account_id.to_string(),
        "email": claim.email.as_str(),
        "display_name": claim.display_name,
        "role": claim.role.as_str(),
        "expires_at": claim.expires_at,
    }))
}

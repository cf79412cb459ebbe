use std::sync::Arc;

use axum::{
    Json, Router,
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};

use taskhub_core::DomainError;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::authz;
use crate::context::SessionContext;

pub fn router() -> Router {
    Router::new().route("/accounts", post(create_account))
}

/// POST /admin/accounts - provision an account (user management).
pub async fn create_account(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(session): Extension<SessionContext>,
    Json(body): Json<dto::CreateAccountRequest>,
) -> axum::response::Response {
    if let Err(denied) =
        authz::require_capability(&services.resolver, &session, |caps| caps.can_manage_users)
    {
        return denied;
    }

    match services
        .create_account(&body.email, &body.display_name, &body.password, body.role)
        .await
    {
        Ok(account) => (
            StatusCode::CREATED,
            Json(serde_json::json!({
                "id": account.id.to_string(),
                "email": account.email.as_str(),
                "role": account.role.as_str(),
            })),
        )
            .into_response(),
        Err(e) => match e.downcast_ref::<DomainError>() {
            Some(domain_err) => errors::domain_error_to_response(domain_err),
            None => errors::internal_error(e),
        },
    }
}

use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};

use taskhub_auth::TokenCodec;

use crate::context::SessionContext;

#[derive(Clone)]
pub struct AuthState {
    pub codec: Arc<dyn TokenCodec>,
}

/// Require a valid bearer session token and insert the session context.
///
/// Every decode failure collapses to 401; callers learn nothing about why
/// a token was rejected.
pub async fn session_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let token = bearer_token(req.headers())?;

    let claim = state
        .codec
        .decode(token)
        .map_err(|_e| StatusCode::UNAUTHORIZED)?;

    req.extensions_mut().insert(SessionContext::new(claim));

    Ok(next.run(req).await)
}

pub(crate) fn bearer_token(headers: &HeaderMap) -> Result<&str, StatusCode> {
    let header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let header = header.to_str().map_err(|_| StatusCode::UNAUTHORIZED)?;

    let header = header
        .strip_prefix("Bearer ")
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let token = header.trim();
    if token.is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    Ok(token)
}

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{ConnectInfo, Extension},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
};
use chrono::Utc;

use taskhub_auth::TokenError;

use crate::app::{dto, errors};
use crate::app::services::AppServices;
use crate::middleware;

pub fn router() -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/renew", post(renew))
}

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    Json(body): Json<dto::LoginRequest>,
) -> axum::response::Response {
    // Source key is the peer address; the proxy tier is expected to be
    // absent in this deployment shape.
    let source_key = peer.ip().to_string();

    let claim = match services
        .verifier
        .authenticate(&source_key, &body.email, &body.password)
        .await
    {
        Ok(claim) => claim,
        Err(e) => return errors::auth_error_to_response(e),
    };

    match services.codec.encode(&claim) {
        Ok(token) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "token": token,
                "expires_at": claim.expires_at,
            })),
        )
            .into_response(),
        Err(e) => errors::internal_error(e),
    }
}

pub async fn renew(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
) -> axum::response::Response {
    let Ok(token) = middleware::bearer_token(&headers) else {
        return errors::json_error(StatusCode::UNAUTHORIZED, "unauthorized", "missing bearer token");
    };

    let claim = match services.codec.decode(token) {
        Ok(claim) => claim,
        Err(TokenError::Expired) => {
            return errors::json_error(StatusCode::UNAUTHORIZED, "expired", "session has expired");
        }
        Err(_) => {
            return errors::json_error(
                StatusCode::UNAUTHORIZED,
                "invalid_token",
                "invalid session token",
            );
        }
    };

    let renewed = match services.issuer.renew(&claim, Utc::now()) {
        Ok(renewed) => renewed,
        Err(_) => {
            return errors::json_error(StatusCode::UNAUTHORIZED, "expired", "session has expired");
        }
    };

    match services.codec.encode(&renewed) {
        Ok(token) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "token": token,
                "expires_at": renewed.expires_at,
            })),
        )
            .into_response(),
        Err(e) => errors::internal_error(e),
    }
}

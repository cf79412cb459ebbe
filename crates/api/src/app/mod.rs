//! HTTP application wiring (axum router + service wiring).
//!
//! - `services.rs`: infrastructure wiring (stores, auth core, token codec)
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request/response DTOs
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use chrono::Utc;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::{AppServices, build_services};

/// Build the full HTTP router for a prepared service bundle.
pub fn build_app(services: Arc<AppServices>) -> Router {
    let auth_state = middleware::AuthState {
        codec: services.codec.clone(),
    };

    // Protected routes: require a valid session.
    let protected = routes::protected_router()
        .layer(Extension(services.clone()))
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::session_middleware,
        ));

    Router::new()
        .route("/health", get(routes::system::health))
        .nest(
            "/auth",
            routes::auth::router().layer(Extension(services.clone())),
        )
        .merge(protected)
}

/// Spawn the background sweep that bounds rate-limiter memory.
///
/// Admission correctness never depends on this; it only drops windows for
/// sources that stopped coming back.
pub fn spawn_rate_limit_sweep(services: &Arc<AppServices>) {
    let limiter = services.rate_limiter.clone();
    let period = services
        .config
        .rate_limit_window
        .to_std()
        .unwrap_or(std::time::Duration::from_secs(300));

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            limiter.sweep_expired(Utc::now());
        }
    });
}

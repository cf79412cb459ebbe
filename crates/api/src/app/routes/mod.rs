use axum::{Router, routing::get};

pub mod admin;
pub mod auth;
pub mod projects;
pub mod system;

/// Router for all authenticated endpoints.
pub fn protected_router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .merge(projects::router())
        .nest("/admin", admin::router())
}

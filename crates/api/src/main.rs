use std::net::SocketAddr;

use taskhub_auth::{AuthConfig, SystemRole};

#[tokio::main]
async fn main() {
    taskhub_observability::init();

    let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
        tracing::warn!("JWT_SECRET not set; using insecure dev default");
        "dev-secret".to_string()
    });

    let services = taskhub_api::app::build_services(AuthConfig::default(), jwt_secret.as_bytes())
        .expect("service wiring failed");

    // Optional bootstrap admin for fresh environments.
    if let (Ok(email), Ok(password)) = (
        std::env::var("ROOT_ADMIN_EMAIL"),
        std::env::var("ROOT_ADMIN_PASSWORD"),
    ) {
        match services
            .create_account(&email, "Root Admin", &password, SystemRole::RootAdmin)
            .await
        {
            Ok(account) => tracing::info!(account = %account.id, "seeded root admin"),
            Err(e) => tracing::error!(error = %e, "failed to seed root admin"),
        }
    }

    let app = taskhub_api::app::build_app(services.clone());
    taskhub_api::app::spawn_rate_limit_sweep(&services);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:8080")
        .await
        .expect("failed to bind 0.0.0.0:8080");

    tracing::info!("listening on {}", listener.local_addr().unwrap());

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .unwrap();
}

pub mod api;
pub mod auth;
pub mod cli;
pub mod db;
pub mod jwt;
pub mod password;

use api::create_api_router;
use axum::{Json, Router, http::StatusCode, response::IntoResponse};
use db::Database;
use jwt::JwtConfig;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Server configuration, assembled once at startup and passed into the
/// modules that need it. Nothing reads global state at request time.
pub struct ServerConfig {
    /// Database connection (cloneable, uses a connection pool internally)
    pub db: Database,
    /// JWT secret for signing session tokens
    pub jwt_secret: Vec<u8>,
    /// Whether to set the Secure flag on cookies (true for HTTPS deployments)
    pub secure_cookies: bool,
}

/// Create the application router with the given configuration.
pub fn create_app(config: &ServerConfig) -> Router {
    let jwt = Arc::new(JwtConfig::new(&config.jwt_secret));

    let api_router = create_api_router(config.db.clone(), jwt, config.secure_cookies);

    Router::new()
        .nest("/api", api_router)
        .fallback(unknown_endpoint)
        .layer(TraceLayer::new_for_http())
}

/// Generic handler for unmatched routes.
async fn unknown_endpoint() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "error": "Unknown endpoint" })),
    )
}

/// Run the server on the given listener. This function blocks until the server exits.
pub async fn run_server(config: ServerConfig, listener: TcpListener) -> Result<(), std::io::Error> {
    let app = create_app(&config);
    axum::serve(listener, app).await
}

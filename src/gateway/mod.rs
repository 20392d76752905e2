//! HTTP gateway
//!
//! Route groups:
//! - `/api/v1/health`: public health check
//! - `/api/v1/auth/*`: registration and login (public)
//! - `/api/v1/accounts`, `/api/v1/transfers`: bearer-token protected

pub mod handlers;
pub mod openapi;
pub mod state;
pub mod types;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use tokio::net::TcpListener;

use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::auth::{TokenMaker, middleware::jwt_auth_middleware};
use crate::config::AppConfig;
use crate::ledger::Database;
use state::AppState;

/// Start the HTTP gateway and serve until the process exits
pub async fn run_server(config: &AppConfig, db: Arc<Database>) -> anyhow::Result<()> {
    let token_maker = TokenMaker::new(config.auth.jwt_secret.clone())
        .map_err(|e| anyhow::anyhow!("cannot create token maker: {e}"))?;

    let state = Arc::new(AppState::new(
        db,
        token_maker,
        chrono::Duration::minutes(config.auth.token_duration_minutes),
        Duration::from_millis(config.gateway.request_timeout_ms),
    ));

    let auth_routes = Router::new()
        .route("/register", post(handlers::user::register))
        .route("/login", post(handlers::user::login));

    let private_routes = Router::new()
        .route(
            "/accounts",
            post(handlers::account::create_account).get(handlers::account::list_accounts),
        )
        .route("/accounts/{id}", get(handlers::account::get_account))
        .route("/transfers", post(handlers::transfer::create_transfer))
        .layer(from_fn_with_state(state.clone(), jwt_auth_middleware));

    let app = Router::new()
        .route("/api/v1/health", get(handlers::health::health_check))
        .nest("/api/v1/auth", auth_routes)
        .nest("/api/v1", private_routes)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", openapi::ApiDoc::openapi()));

    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| anyhow::anyhow!("failed to bind to {addr}: {e}"))?;

    tracing::info!("Gateway listening on http://{addr}");
    tracing::info!("API docs at http://{addr}/docs");

    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("server error: {e}"))
}

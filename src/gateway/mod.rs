//! HTTP Gateway
//!
//! ```text
//! /api/v1/health                 public
//! /api/v1/accounts/profile       JWT
//! /api/v1/accounts/transfer      JWT + admin
//! /api/v1/balance-reset          JWT + admin
//! /docs                          Swagger UI
//! ```

pub mod handlers;
pub mod openapi;
pub mod state;
pub mod types;

use std::sync::Arc;

use axum::{
    Router,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::auth::{jwt_auth_middleware, require_admin};
use state::AppState;

/// Build the complete router for the given state.
pub fn build_router(state: Arc<AppState>) -> Router {
    // ==========================================================================
    // Admin Routes - JWT + admin role
    // ==========================================================================
    let admin_routes = Router::new()
        .route("/accounts/transfer", post(handlers::transfer_balance))
        .route("/balance-reset", post(handlers::trigger_balance_reset))
        .route_layer(from_fn(require_admin));

    // ==========================================================================
    // Authenticated Routes - any valid JWT
    // ==========================================================================
    let protected_routes = Router::new()
        .route("/accounts/profile", get(handlers::get_profile))
        .merge(admin_routes)
        .route_layer(from_fn_with_state(state.clone(), jwt_auth_middleware));

    Router::new()
        .route("/api/v1/health", get(handlers::health_check))
        .nest("/api/v1", protected_routes)
        .with_state(state)
        // OpenAPI / Swagger UI (stateless, added after with_state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", openapi::ApiDoc::openapi()))
}

/// Bind and serve until `shutdown` resolves.
pub async fn run_server(
    addr: &str,
    state: Arc<AppState>,
    shutdown: impl std::future::Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr).await.map_err(|e| {
        anyhow::anyhow!("Failed to bind to {}: {} (port may already be in use)", addr, e)
    })?;

    tracing::info!(%addr, "Gateway listening");
    tracing::info!("API Docs: http://{}/docs", addr);

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

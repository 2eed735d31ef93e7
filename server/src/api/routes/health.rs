//! Root and health check endpoints

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use utoipa::ToSchema;

use crate::core::config::DatabaseConfig;
use crate::domain::ListingService;
use crate::domain::listings::StoreDiagnostics;

/// Shared state for the health endpoint
#[derive(Clone)]
pub struct HealthApiState {
    pub listings: ListingService,
    pub database_name: Option<String>,
    pub database_url_configured: bool,
}

/// Build root and health routes
pub fn routes(listings: ListingService, database: &DatabaseConfig) -> Router<()> {
    let state = HealthApiState {
        listings,
        database_name: database.name.clone(),
        database_url_configured: database.url_configured(),
    };

    Router::new()
        .route("/", get(root))
        .route("/api/v1/health", get(health))
        .with_state(state)
}

#[derive(Serialize, ToSchema)]
pub struct RootResponse {
    pub message: &'static str,
}

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    /// `ok` when the store answers, `degraded` otherwise
    pub status: &'static str,
    pub version: &'static str,
    pub database: StoreDiagnostics,
    pub database_name: Option<String>,
    pub database_url_configured: bool,
}

/// Liveness message
#[utoipa::path(
    get,
    path = "/",
    tag = "health",
    responses(
        (status = 200, description = "Service is running", body = RootResponse)
    )
)]
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Real Estate API is running",
    })
}

/// Health check with store diagnostics
#[utoipa::path(
    get,
    path = "/api/v1/health",
    tag = "health",
    responses(
        (status = 200, description = "Service and store status", body = HealthResponse)
    )
)]
pub async fn health(State(state): State<HealthApiState>) -> Json<HealthResponse> {
    let database = state.listings.diagnostics().await;
    let status = if database.connected { "ok" } else { "degraded" };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        database,
        database_name: state.database_name,
        database_url_configured: state.database_url_configured,
    })
}

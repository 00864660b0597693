//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes
//! - Authentication middleware
//! - Tenant extraction from the `X-Company-ID` header
//! - List version tracking for conditional GET

pub mod extractors;
pub mod list_version;
pub mod middleware;
pub mod response;
pub mod routes;

use axum::Router;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use list_version::ListVersions;
use miosaas_core::storage::StorageService;
use miosaas_shared::JwtService;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// JWT service for token operations.
    pub jwt_service: Arc<JwtService>,
    /// Storage service for presigned uploads (optional).
    pub storage: Option<Arc<StorageService>>,
    /// Per-(company, resource) list versions for ETag handling.
    pub list_versions: Arc<ListVersions>,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/tenants", routes::api_routes_with_state(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

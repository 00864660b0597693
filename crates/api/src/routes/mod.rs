//! API route definitions.

use axum::{Router, middleware};

use crate::{AppState, middleware::auth::auth_middleware};

pub mod auth;
pub mod clienti;
pub mod commesse;
pub mod entrate;
pub mod fornitori;
pub mod health;
pub mod rapportini;
pub mod uploads;
pub mod uscite;

/// Creates the API router with protected routes that need state for middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    // Protected routes that require authentication
    let protected_routes = Router::new()
        .merge(clienti::routes())
        .merge(fornitori::routes())
        .merge(commesse::routes())
        .merge(entrate::routes())
        .merge(uscite::routes())
        .merge(rapportini::routes())
        .merge(uploads::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Combine public and protected routes
    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(protected_routes)
}

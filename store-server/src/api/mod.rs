//! API Routing
//!
//! One router per resource, nested under `/api/...`:
//!
//! - [`health`] — liveness probe
//! - [`auth`] — admin login and session info
//! - [`catalog`] — public storefront listings
//! - [`checkout`] — public order creation
//! - [`categories`] — category management (admin)
//! - [`products`] — product management (admin)
//! - [`orders`] — order management (admin)
//! - [`activity`] — audit trail (admin)

pub mod activity;
pub mod auth;
pub mod catalog;
pub mod categories;
pub mod checkout;
pub mod health;
pub mod orders;
pub mod products;

use axum::{middleware, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::core::ServerState;

/// Merge every resource router
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(catalog::router())
        .merge(checkout::router())
        .merge(categories::router())
        .merge(products::router())
        .merge(orders::router())
        .merge(activity::router())
}

/// Full application: routes plus auth, CORS and request tracing layers
pub fn build_app(state: ServerState) -> Router {
    build_router()
        .layer(middleware::from_fn_with_state(
            state.clone(),
            crate::auth::require_auth,
        ))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

//! Activity API Module (admin)

mod handler;

use axum::{middleware, routing::get, Router};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/activity", get(handler::list))
        .layer(middleware::from_fn(crate::auth::require_admin))
}

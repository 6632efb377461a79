//! Catalog API Module — public storefront surface, no authentication

mod handler;

use axum::{routing::get, Router};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/catalog", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/categories", get(handler::categories))
        .route("/{id}", get(handler::get_by_id))
}

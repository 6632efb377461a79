//! Catalog API Handlers
//!
//! Storefront projections: effective prices, launch flags, no cost data.

use axum::{
    extract::{Path, State},
    Json,
};

use shared::models::{Category, ProductView};

use crate::core::ServerState;
use crate::db::repository::{category, product};
use crate::utils::{AppError, AppResult};

/// GET /api/catalog — storefront listing, launches and discounts first
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<ProductView>>> {
    let views = product::storefront_views(&state.pool).await?;
    Ok(Json(views))
}

/// GET /api/catalog/categories
pub async fn categories(State(state): State<ServerState>) -> AppResult<Json<Vec<Category>>> {
    let categories = category::find_all(&state.pool).await?;
    Ok(Json(categories))
}

/// GET /api/catalog/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ProductView>> {
    let view = product::find_view_by_id(&state.pool, id, false)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Product {id} not found")))?;
    Ok(Json(view))
}

//! Product API Handlers
//!
//! Admin views carry cost_price; discounts are validated to a sane range
//! before the repository writes anything.

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde_json::json;

use shared::models::{ProductCreate, ProductImageInput, ProductUpdate, ProductView};

use crate::activity::ActivityAction;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::product;
use crate::utils::validation::{
    validate_optional_text, validate_required_text, MAX_DESCRIPTION_LEN, MAX_NAME_LEN,
    MAX_SHORT_TEXT_LEN, MAX_URL_LEN,
};
use crate::utils::{AppError, AppResult};

/// GET /api/products
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<ProductView>>> {
    Ok(Json(product::find_all_views(&state.pool).await?))
}

/// GET /api/products/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ProductView>> {
    let view = product::find_view_by_id(&state.pool, id, true)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Product {id} not found")))?;
    Ok(Json(view))
}

/// POST /api/products
pub async fn create(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<ProductCreate>,
) -> AppResult<Json<ProductView>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_DESCRIPTION_LEN)?;
    validate_optional_text(&payload.team, "team", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.gender, "gender", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.origin, "origin", MAX_SHORT_TEXT_LEN)?;
    validate_images(&payload.images)?;
    validate_pricing(payload.sale_price, payload.cost_price, payload.discount_percentage)?;

    let created = product::create(&state.write_pool, payload).await?;
    state.activity.record(
        Some(user.id),
        Some(&user.username),
        ActivityAction::ProductCreated,
        created.id,
        json!({"name": created.name, "sale_price": created.sale_price}),
    );

    let view = product::find_view_by_id(&state.pool, created.id, true)
        .await?
        .ok_or_else(|| AppError::internal("Created product vanished"))?;
    Ok(Json(view))
}

/// PUT /api/products/{id}
pub async fn update(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<ProductUpdate>,
) -> AppResult<Json<ProductView>> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_optional_text(&payload.description, "description", MAX_DESCRIPTION_LEN)?;
    if let Some(images) = &payload.images {
        validate_images(images)?;
    }
    if let Some(pct) = payload.discount_percentage {
        if !(0.0..=100.0).contains(&pct) {
            return Err(AppError::validation("discount_percentage must be between 0 and 100"));
        }
    }
    if let Some(price) = payload.sale_price {
        if price < 0.0 {
            return Err(AppError::validation("sale_price must not be negative"));
        }
    }

    let updated = product::update(&state.write_pool, id, payload).await?;
    state.activity.record(
        Some(user.id),
        Some(&user.username),
        ActivityAction::ProductUpdated,
        id,
        json!({"name": updated.name}),
    );

    let view = product::find_view_by_id(&state.pool, id, true)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Product {id} not found")))?;
    Ok(Json(view))
}

/// DELETE /api/products/{id}
pub async fn delete(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<serde_json::Value>> {
    product::delete(&state.write_pool, id).await?;
    state.activity.record(
        Some(user.id),
        Some(&user.username),
        ActivityAction::ProductDeleted,
        id,
        json!({}),
    );
    Ok(Json(json!({"deleted": id})))
}

fn validate_images(images: &[ProductImageInput]) -> Result<(), AppError> {
    let main_count = images.iter().filter(|i| i.is_main).count();
    if main_count > 1 {
        return Err(AppError::validation("Only one image can be flagged as main"));
    }
    for image in images {
        validate_required_text(&image.url, "image url", MAX_URL_LEN)?;
    }
    Ok(())
}

fn validate_pricing(sale_price: f64, cost_price: f64, discount_percentage: f64) -> Result<(), AppError> {
    if sale_price < 0.0 || cost_price < 0.0 {
        return Err(AppError::validation("Prices must not be negative"));
    }
    if !(0.0..=100.0).contains(&discount_percentage) {
        return Err(AppError::validation("discount_percentage must be between 0 and 100"));
    }
    Ok(())
}

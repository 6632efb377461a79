//! Category API Handlers

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde_json::json;

use shared::models::{Category, CategoryCreate, CategoryUpdate};

use crate::activity::ActivityAction;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::category;
use crate::utils::validation::{
    validate_optional_text, validate_required_text, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN,
};
use crate::utils::{AppError, AppResult};

/// GET /api/categories
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Category>>> {
    Ok(Json(category::find_all(&state.pool).await?))
}

/// GET /api/categories/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Category>> {
    let cat = category::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Category {id} not found")))?;
    Ok(Json(cat))
}

/// POST /api/categories
pub async fn create(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<CategoryCreate>,
) -> AppResult<Json<Category>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&payload.slug, "slug", MAX_SHORT_TEXT_LEN)?;

    let cat = category::create(&state.write_pool, payload).await?;
    state.activity.record(
        Some(user.id),
        Some(&user.username),
        ActivityAction::CategoryCreated,
        cat.id,
        json!({"name": cat.name, "slug": cat.slug}),
    );
    Ok(Json(cat))
}

/// PUT /api/categories/{id}
pub async fn update(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<CategoryUpdate>,
) -> AppResult<Json<Category>> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_optional_text(&payload.slug, "slug", MAX_SHORT_TEXT_LEN)?;

    let cat = category::update(&state.write_pool, id, payload).await?;
    state.activity.record(
        Some(user.id),
        Some(&user.username),
        ActivityAction::CategoryUpdated,
        id,
        json!({"name": cat.name}),
    );
    Ok(Json(cat))
}

/// DELETE /api/categories/{id}
pub async fn delete(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<serde_json::Value>> {
    category::delete(&state.write_pool, id).await?;
    state.activity.record(
        Some(user.id),
        Some(&user.username),
        ActivityAction::CategoryDeleted,
        id,
        json!({}),
    );
    Ok(Json(json!({"deleted": id})))
}

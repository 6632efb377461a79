//! Activity API Handlers

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use shared::models::ActivityLog;

use crate::core::ServerState;
use crate::db::repository::activity;
use crate::utils::AppResult;

const DEFAULT_LIMIT: i64 = 100;
const MAX_LIMIT: i64 = 1000;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
}

/// GET /api/activity — newest first
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<ActivityLog>>> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    Ok(Json(activity::find_recent(&state.pool, limit).await?))
}

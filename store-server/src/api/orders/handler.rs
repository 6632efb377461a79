//! Order API Handlers (admin)

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::json;

use shared::models::{Order, OrderStatus, OrderStatusUpdate, OrderWithItems};

use crate::activity::ActivityAction;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::order;
use crate::orders::service;
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<OrderStatus>,
}

/// GET /api/orders — newest first, optional `?status=` filter
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Order>>> {
    let orders = match query.status {
        Some(status) => order::find_by_status(&state.pool, status).await?,
        None => order::find_all(&state.pool).await?,
    };
    Ok(Json(orders))
}

/// GET /api/orders/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<OrderWithItems>> {
    let ord = order::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {id} not found")))?;
    let items = order::find_items(&state.pool, id).await?;
    Ok(Json(OrderWithItems { order: ord, items }))
}

/// PUT /api/orders/{id}/status — pending orders only; cancellation restocks
pub async fn update_status(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<OrderStatusUpdate>,
) -> AppResult<Json<OrderWithItems>> {
    let updated =
        service::update_status(&state.write_pool, id, payload.status, Some(user.id)).await?;

    state.activity.record(
        Some(user.id),
        Some(&user.username),
        ActivityAction::OrderStatusChanged,
        id,
        json!({
            "order_number": updated.order.order_number,
            "status": updated.order.status,
        }),
    );
    Ok(Json(updated))
}

//! Checkout Handler

use axum::{extract::State, http::StatusCode, Json};
use serde_json::json;

use shared::models::{OrderCreate, OrderWithItems};

use crate::activity::ActivityAction;
use crate::core::ServerState;
use crate::orders::service;
use crate::utils::validation::{
    validate_optional_text, validate_required_text, MAX_ADDRESS_LEN, MAX_EMAIL_LEN, MAX_NAME_LEN,
    MAX_SHORT_TEXT_LEN,
};
use crate::utils::AppResult;

/// POST /api/checkout
///
/// Creates a pending order with stock reserved. An insufficient item fails
/// the whole request with 422 and leaves stock untouched.
pub async fn checkout(
    State(state): State<ServerState>,
    Json(payload): Json<OrderCreate>,
) -> AppResult<(StatusCode, Json<OrderWithItems>)> {
    validate_required_text(&payload.customer_name, "customer_name", MAX_NAME_LEN)?;
    validate_required_text(&payload.customer_phone, "customer_phone", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.customer_email, "customer_email", MAX_EMAIL_LEN)?;
    validate_optional_text(&payload.delivery_address, "delivery_address", MAX_ADDRESS_LEN)?;

    let created = service::create_order(&state.write_pool, payload).await?;

    state.activity.record(
        created.order.user_id,
        None,
        ActivityAction::OrderCreated,
        created.order.id,
        json!({
            "order_number": created.order.order_number,
            "total_amount": created.order.total_amount,
            "items": created.items.len(),
        }),
    );
    Ok((StatusCode::CREATED, Json(created)))
}

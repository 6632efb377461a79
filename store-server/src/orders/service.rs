//! Order Service — checkout and status lifecycle
//!
//! `create_order` runs order number allocation, stock reservation and row
//! inserts in one transaction on the write pool. Any failure — including a
//! single item short on stock — drops the transaction and rolls everything
//! back, so no partial order or partial decrement ever lands.

use shared::models::{Order, OrderCreate, OrderItem, OrderStatus, OrderWithItems};
use sqlx::SqlitePool;

use crate::db::repository::{inventory, order};

use super::{number, OrderError, OrderResult};

/// Create an order from a checkout payload.
///
/// The order lands in `pending` with stock already reserved. Pricing is
/// taken from the submitted items; totals are recomputed server-side from
/// unit price and quantity.
pub async fn create_order(write_pool: &SqlitePool, data: OrderCreate) -> OrderResult<OrderWithItems> {
    validate_payload(&data)?;

    let now = shared::util::now_millis();
    let order_id = shared::util::snowflake_id();
    let total_amount = round_cents(
        data.items
            .iter()
            .map(|item| item.unit_price * item.quantity as f64)
            .sum(),
    );

    let mut tx = write_pool.begin().await?;

    let order_number = number::next_order_number(&mut tx).await?;

    for item in &data.items {
        inventory::reserve(&mut tx, item.product_id, item.size.as_deref(), item.quantity).await?;
    }

    let order = Order {
        id: order_id,
        order_number,
        user_id: data.user_id,
        customer_name: data.customer_name,
        customer_phone: data.customer_phone,
        customer_email: data.customer_email,
        delivery_address: data.delivery_address,
        total_amount,
        status: OrderStatus::Pending,
        updated_by: None,
        created_at: now,
        updated_at: now,
    };
    order::insert_order(&mut tx, &order).await?;

    let mut items = Vec::with_capacity(data.items.len());
    for input in data.items {
        let item = OrderItem {
            id: shared::util::snowflake_id(),
            order_id,
            product_id: input.product_id,
            product_name: input.product_name,
            size: input.size,
            image: input.image,
            unit_price: input.unit_price,
            quantity: input.quantity,
            subtotal: round_cents(input.unit_price * input.quantity as f64),
        };
        order::insert_item(&mut tx, &item).await?;
        items.push(item);
    }

    tx.commit().await?;

    tracing::info!(
        order_number = %order.order_number,
        total = order.total_amount,
        items = items.len(),
        "Order created"
    );
    Ok(OrderWithItems { order, items })
}

/// Move a pending order to a terminal status.
///
/// Only `pending -> completed` and `pending -> cancelled` are legal;
/// cancellation releases every reserved item back to stock in the same
/// transaction that flips the status.
pub async fn update_status(
    write_pool: &SqlitePool,
    id: i64,
    new_status: OrderStatus,
    actor: Option<i64>,
) -> OrderResult<OrderWithItems> {
    if new_status == OrderStatus::Pending {
        return Err(OrderError::Validation(
            "Orders cannot be moved back to pending".into(),
        ));
    }

    let mut tx = write_pool.begin().await?;

    let order = order::find_by_id_on(&mut tx, id)
        .await?
        .ok_or(OrderError::NotFound(id))?;
    if order.status != OrderStatus::Pending {
        return Err(OrderError::InvalidTransition {
            status: order.status,
        });
    }

    let items = order::find_items_on(&mut tx, id).await?;
    if new_status == OrderStatus::Cancelled {
        for item in &items {
            inventory::release(&mut tx, item.product_id, item.size.as_deref(), item.quantity)
                .await?;
        }
    }
    let now = shared::util::now_millis();
    order::update_status_row(&mut tx, id, new_status, actor, now).await?;

    tx.commit().await?;

    tracing::info!(order_number = %order.order_number, status = %new_status, "Order status changed");
    Ok(OrderWithItems {
        order: Order {
            status: new_status,
            updated_by: actor,
            updated_at: now,
            ..order
        },
        items,
    })
}

// Text length limits are checked at the handler; this enforces the rules
// that must hold no matter who calls in.
fn validate_payload(data: &OrderCreate) -> OrderResult<()> {
    if data.customer_name.trim().is_empty() {
        return Err(OrderError::Validation("customer_name must not be empty".into()));
    }
    if data.customer_phone.trim().is_empty() {
        return Err(OrderError::Validation("customer_phone must not be empty".into()));
    }
    if data.items.is_empty() {
        return Err(OrderError::Validation("Order must have at least one item".into()));
    }
    for item in &data.items {
        if item.quantity <= 0 {
            return Err(OrderError::Validation(format!(
                "Item '{}' has non-positive quantity",
                item.product_name
            )));
        }
        if item.unit_price < 0.0 {
            return Err(OrderError::Validation(format!(
                "Item '{}' has negative unit price",
                item.product_name
            )));
        }
    }
    Ok(())
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

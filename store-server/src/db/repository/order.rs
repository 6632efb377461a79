//! Order Repository
//!
//! Inserts run on a caller-provided connection so the checkout service can
//! keep order rows, item rows and stock decrements in a single transaction.

use shared::models::{Order, OrderItem, OrderStatus};
use sqlx::{SqliteConnection, SqlitePool};

use super::{RepoError, RepoResult};

const ORDER_SELECT: &str = "SELECT id, order_number, user_id, customer_name, customer_phone, \
     customer_email, delivery_address, total_amount, status, updated_by, created_at, updated_at \
     FROM orders";

pub async fn insert_order(conn: &mut SqliteConnection, order: &Order) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO orders (id, order_number, user_id, customer_name, customer_phone, \
         customer_email, delivery_address, total_amount, status, updated_by, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
    )
    .bind(order.id)
    .bind(&order.order_number)
    .bind(order.user_id)
    .bind(&order.customer_name)
    .bind(&order.customer_phone)
    .bind(&order.customer_email)
    .bind(&order.delivery_address)
    .bind(order.total_amount)
    .bind(order.status)
    .bind(order.updated_by)
    .bind(order.created_at)
    .bind(order.updated_at)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub async fn insert_item(conn: &mut SqliteConnection, item: &OrderItem) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO order_items (id, order_id, product_id, product_name, size, image, \
         unit_price, quantity, subtotal) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
    )
    .bind(item.id)
    .bind(item.order_id)
    .bind(item.product_id)
    .bind(&item.product_name)
    .bind(&item.size)
    .bind(&item.image)
    .bind(item.unit_price)
    .bind(item.quantity)
    .bind(item.subtotal)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Order>> {
    let sql = format!("{ORDER_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Order>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Variant for callers already holding a transaction connection
pub async fn find_by_id_on(conn: &mut SqliteConnection, id: i64) -> RepoResult<Option<Order>> {
    let sql = format!("{ORDER_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Order>(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(row)
}

pub async fn find_items_on(conn: &mut SqliteConnection, order_id: i64) -> RepoResult<Vec<OrderItem>> {
    let rows = sqlx::query_as::<_, OrderItem>(
        "SELECT id, order_id, product_id, product_name, size, image, unit_price, quantity, subtotal \
         FROM order_items WHERE order_id = ? ORDER BY id",
    )
    .bind(order_id)
    .fetch_all(&mut *conn)
    .await?;
    Ok(rows)
}

pub async fn find_items(pool: &SqlitePool, order_id: i64) -> RepoResult<Vec<OrderItem>> {
    let rows = sqlx::query_as::<_, OrderItem>(
        "SELECT id, order_id, product_id, product_name, size, image, unit_price, quantity, subtotal \
         FROM order_items WHERE order_id = ? ORDER BY id",
    )
    .bind(order_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// All orders, newest first
pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Order>> {
    let sql = format!("{ORDER_SELECT} ORDER BY created_at DESC, id DESC");
    let rows = sqlx::query_as::<_, Order>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find_by_status(pool: &SqlitePool, status: OrderStatus) -> RepoResult<Vec<Order>> {
    let sql = format!("{ORDER_SELECT} WHERE status = ? ORDER BY created_at DESC, id DESC");
    let rows = sqlx::query_as::<_, Order>(&sql)
        .bind(status)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn update_status_row(
    conn: &mut SqliteConnection,
    id: i64,
    status: OrderStatus,
    updated_by: Option<i64>,
    now: i64,
) -> RepoResult<()> {
    let rows = sqlx::query(
        "UPDATE orders SET status = ?1, updated_by = ?2, updated_at = ?3 WHERE id = ?4",
    )
    .bind(status)
    .bind(updated_by)
    .bind(now)
    .bind(id)
    .execute(&mut *conn)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Order {id} not found")));
    }
    Ok(())
}

//! Inventory Repository — per-(product, size) stock rows
//!
//! `reserve` and `release` run on a connection provided by the caller and
//! never commit; during checkout that connection is the order transaction,
//! so a failed reservation rolls the whole order back. The decrement
//! re-validates sufficiency inside the UPDATE itself (`quantity >= ?`), so
//! the check-then-decrement pair cannot race a concurrent writer into a
//! negative quantity.

use shared::models::{InventoryEntry, Stock, GENERAL_SIZE, GENERAL_SIZE_ALT};
use sqlx::{SqliteConnection, SqlitePool};

use super::{RepoError, RepoResult};

/// Atomically check and decrement stock for one (product, size) row.
///
/// `size = None` targets the sentinel row of non-sized products. Fails with
/// [`RepoError::InsufficientStock`] when the row is missing or short.
pub async fn reserve(
    conn: &mut SqliteConnection,
    product_id: i64,
    size: Option<&str>,
    quantity: i64,
) -> RepoResult<()> {
    if quantity <= 0 {
        return Err(RepoError::Validation(format!(
            "Reserve quantity must be positive, got {quantity}"
        )));
    }

    let label = size.unwrap_or(GENERAL_SIZE);
    let rows = decrement(conn, product_id, label, quantity).await?;
    let rows = if rows == 0 && size.is_none() {
        // Legacy data may carry the alternate sentinel label
        decrement(conn, product_id, GENERAL_SIZE_ALT, quantity).await?
    } else {
        rows
    };

    if rows == 0 {
        return Err(insufficient(conn, product_id, size).await?);
    }
    Ok(())
}

/// Increment stock for one (product, size) row (restock on cancellation).
///
/// Unconditional: no upper bound, no sufficiency check. A missing row means
/// the product's inventory was deleted after the order was placed; that is
/// logged and skipped rather than failing the cancellation.
pub async fn release(
    conn: &mut SqliteConnection,
    product_id: i64,
    size: Option<&str>,
    quantity: i64,
) -> RepoResult<()> {
    let label = size.unwrap_or(GENERAL_SIZE);
    let rows = increment(conn, product_id, label, quantity).await?;
    let rows = if rows == 0 && size.is_none() {
        increment(conn, product_id, GENERAL_SIZE_ALT, quantity).await?
    } else {
        rows
    };

    if rows == 0 {
        tracing::warn!(
            product_id,
            size = label,
            quantity,
            "Restock skipped — inventory row no longer exists"
        );
    }
    Ok(())
}

async fn decrement(
    conn: &mut SqliteConnection,
    product_id: i64,
    label: &str,
    quantity: i64,
) -> RepoResult<u64> {
    let result = sqlx::query(
        "UPDATE product_inventory SET quantity = quantity - ?1 WHERE product_id = ?2 AND size = ?3 AND quantity >= ?1",
    )
    .bind(quantity)
    .bind(product_id)
    .bind(label)
    .execute(&mut *conn)
    .await?;
    Ok(result.rows_affected())
}

async fn increment(
    conn: &mut SqliteConnection,
    product_id: i64,
    label: &str,
    quantity: i64,
) -> RepoResult<u64> {
    let result = sqlx::query(
        "UPDATE product_inventory SET quantity = quantity + ?1 WHERE product_id = ?2 AND size = ?3",
    )
    .bind(quantity)
    .bind(product_id)
    .bind(label)
    .execute(&mut *conn)
    .await?;
    Ok(result.rows_affected())
}

/// Build the user-facing insufficiency error (product name + available qty)
async fn insufficient(
    conn: &mut SqliteConnection,
    product_id: i64,
    size: Option<&str>,
) -> RepoResult<RepoError> {
    let name: Option<String> = sqlx::query_scalar("SELECT name FROM products WHERE id = ?")
        .bind(product_id)
        .fetch_optional(&mut *conn)
        .await?;
    let name = name.ok_or_else(|| RepoError::NotFound(format!("Product {product_id} not found")))?;

    // The legacy label only stands in for the sentinel, never for an
    // explicit size.
    let available: Option<i64> = match size {
        Some(label) => {
            sqlx::query_scalar(
                "SELECT quantity FROM product_inventory WHERE product_id = ?1 AND size = ?2",
            )
            .bind(product_id)
            .bind(label)
            .fetch_optional(&mut *conn)
            .await?
        }
        None => {
            sqlx::query_scalar(
                "SELECT quantity FROM product_inventory WHERE product_id = ?1 AND size IN (?2, ?3) LIMIT 1",
            )
            .bind(product_id)
            .bind(GENERAL_SIZE)
            .bind(GENERAL_SIZE_ALT)
            .fetch_optional(&mut *conn)
            .await?
        }
    };

    Ok(RepoError::InsufficientStock {
        product: name,
        size: size.map(str::to_string),
        available: available.unwrap_or(0),
    })
}

/// Replace all stock rows for a product (admin create/update path)
pub async fn set_stock(
    conn: &mut SqliteConnection,
    product_id: i64,
    stock: &Stock,
) -> RepoResult<()> {
    sqlx::query("DELETE FROM product_inventory WHERE product_id = ?")
        .bind(product_id)
        .execute(&mut *conn)
        .await?;

    match stock {
        Stock::Sized(map) => {
            for (label, qty) in map {
                if *qty < 0 {
                    return Err(RepoError::Validation(format!(
                        "Stock for size '{label}' must not be negative"
                    )));
                }
                insert_row(conn, product_id, label, *qty).await?;
            }
        }
        Stock::Simple(qty) => {
            if *qty < 0 {
                return Err(RepoError::Validation(
                    "Stock quantity must not be negative".into(),
                ));
            }
            insert_row(conn, product_id, GENERAL_SIZE, *qty).await?;
        }
    }
    Ok(())
}

async fn insert_row(
    conn: &mut SqliteConnection,
    product_id: i64,
    label: &str,
    quantity: i64,
) -> RepoResult<()> {
    sqlx::query("INSERT INTO product_inventory (product_id, size, quantity) VALUES (?1, ?2, ?3)")
        .bind(product_id)
        .bind(label)
        .bind(quantity)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

pub async fn find_by_product(pool: &SqlitePool, product_id: i64) -> RepoResult<Vec<InventoryEntry>> {
    let rows = sqlx::query_as::<_, InventoryEntry>(
        "SELECT product_id, size, quantity FROM product_inventory WHERE product_id = ? ORDER BY size",
    )
    .bind(product_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MIGRATOR;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        MIGRATOR.run(&pool).await.unwrap();

        sqlx::query("INSERT INTO categories (id, name, slug, has_sizes) VALUES (1, 'Camisas', 'camisas', 1)")
            .execute(&pool).await.unwrap();
        sqlx::query(
            "INSERT INTO products (id, name, category_id, sale_price) VALUES (10, 'Camisa Titular', 1, 199.9)",
        )
        .execute(&pool)
        .await
        .unwrap();
        sqlx::query("INSERT INTO product_inventory (product_id, size, quantity) VALUES (10, 'M', 5)")
            .execute(&pool).await.unwrap();
        pool
    }

    async fn qty(pool: &SqlitePool, size: &str) -> i64 {
        sqlx::query_scalar("SELECT quantity FROM product_inventory WHERE product_id = 10 AND size = ?")
            .bind(size)
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn reserve_within_stock_decrements() {
        let pool = test_pool().await;
        let mut conn = pool.acquire().await.unwrap();
        reserve(&mut conn, 10, Some("M"), 3).await.unwrap();
        drop(conn);
        assert_eq!(qty(&pool, "M").await, 2);
    }

    #[tokio::test]
    async fn reserve_beyond_stock_fails_and_leaves_quantity() {
        let pool = test_pool().await;
        let mut conn = pool.acquire().await.unwrap();
        let err = reserve(&mut conn, 10, Some("M"), 6).await.unwrap_err();
        match err {
            RepoError::InsufficientStock {
                product,
                size,
                available,
            } => {
                assert_eq!(product, "Camisa Titular");
                assert_eq!(size.as_deref(), Some("M"));
                assert_eq!(available, 5);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        drop(conn);
        assert_eq!(qty(&pool, "M").await, 5);
    }

    #[tokio::test]
    async fn reserve_exact_stock_drains_to_zero() {
        let pool = test_pool().await;
        let mut conn = pool.acquire().await.unwrap();
        reserve(&mut conn, 10, Some("M"), 5).await.unwrap();
        drop(conn);
        assert_eq!(qty(&pool, "M").await, 0);
    }

    #[tokio::test]
    async fn reserve_then_release_round_trips() {
        let pool = test_pool().await;
        let mut conn = pool.acquire().await.unwrap();
        reserve(&mut conn, 10, Some("M"), 4).await.unwrap();
        release(&mut conn, 10, Some("M"), 4).await.unwrap();
        drop(conn);
        assert_eq!(qty(&pool, "M").await, 5);
    }

    #[tokio::test]
    async fn sentinel_defaults_to_general_row() {
        let pool = test_pool().await;
        sqlx::query("INSERT INTO product_inventory (product_id, size, quantity) VALUES (10, 'Geral', 7)")
            .execute(&pool).await.unwrap();
        let mut conn = pool.acquire().await.unwrap();
        reserve(&mut conn, 10, None, 2).await.unwrap();
        drop(conn);
        assert_eq!(qty(&pool, "Geral").await, 5);
    }

    #[tokio::test]
    async fn sentinel_falls_back_to_legacy_label() {
        let pool = test_pool().await;
        sqlx::query("INSERT INTO product_inventory (product_id, size, quantity) VALUES (10, 'Único', 3)")
            .execute(&pool).await.unwrap();
        let mut conn = pool.acquire().await.unwrap();
        reserve(&mut conn, 10, None, 1).await.unwrap();
        drop(conn);
        assert_eq!(qty(&pool, "Único").await, 2);
        let mut conn = pool.acquire().await.unwrap();
        release(&mut conn, 10, None, 1).await.unwrap();
        drop(conn);
        assert_eq!(qty(&pool, "Único").await, 3);
    }

    #[tokio::test]
    async fn legacy_label_does_not_answer_for_explicit_sizes() {
        let pool = test_pool().await;
        sqlx::query("INSERT INTO product_inventory (product_id, size, quantity) VALUES (10, 'Único', 9)")
            .execute(&pool).await.unwrap();
        let mut conn = pool.acquire().await.unwrap();

        let err = reserve(&mut conn, 10, Some("GG"), 1).await.unwrap_err();
        match err {
            RepoError::InsufficientStock { size, available, .. } => {
                assert_eq!(size.as_deref(), Some("GG"));
                assert_eq!(available, 0);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        drop(conn);
        assert_eq!(qty(&pool, "Único").await, 9);
    }

    #[tokio::test]
    async fn release_on_missing_row_is_noop() {
        let pool = test_pool().await;
        let mut conn = pool.acquire().await.unwrap();
        release(&mut conn, 10, Some("GG"), 2).await.unwrap();
        drop(conn);
        assert_eq!(qty(&pool, "M").await, 5);
    }

    #[tokio::test]
    async fn set_stock_replaces_rows() {
        let pool = test_pool().await;
        let mut conn = pool.acquire().await.unwrap();
        let mut map = std::collections::BTreeMap::new();
        map.insert("P".to_string(), 1);
        map.insert("G".to_string(), 2);
        set_stock(&mut conn, 10, &Stock::Sized(map)).await.unwrap();
        drop(conn);

        let rows = find_by_product(&pool, 10).await.unwrap();
        let labels: Vec<&str> = rows.iter().map(|r| r.size.as_str()).collect();
        assert_eq!(labels, vec!["G", "P"]);
    }
}

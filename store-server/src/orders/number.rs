//! Order Number Generation
//!
//! Numbers follow `ORD-YYYYMMDD-NNNN`: a day bucket plus a zero-padded
//! sequence starting at 0001. The next number is derived from the highest
//! existing number of the day, read on the same connection as the order
//! insert so the whole allocation sits inside the checkout transaction.
//! Zero-padding keeps lexicographic and numeric order identical, so
//! `ORDER BY order_number DESC` finds the latest without parsing every row.

use chrono::Local;
use sqlx::SqliteConnection;

use super::{OrderError, OrderResult};

/// Highest sequence a single day can hold
pub const DAILY_SEQUENCE_MAX: u32 = 9999;

/// Next order number for today (local time day bucket)
pub async fn next_order_number(conn: &mut SqliteConnection) -> OrderResult<String> {
    let day = Local::now().format("%Y%m%d").to_string();
    next_for_day(conn, &day).await
}

async fn next_for_day(conn: &mut SqliteConnection, day: &str) -> OrderResult<String> {
    let prefix = format!("ORD-{day}-");
    let latest: Option<String> = sqlx::query_scalar(
        "SELECT order_number FROM orders WHERE order_number LIKE ?1 ORDER BY order_number DESC LIMIT 1",
    )
    .bind(format!("{prefix}%"))
    .fetch_optional(&mut *conn)
    .await?;

    let next = match latest {
        None => 1,
        Some(number) => {
            let suffix = number.rsplit('-').next().unwrap_or_default();
            let current: u32 = suffix.parse().map_err(|_| {
                OrderError::Validation(format!("Malformed order number in database: {number}"))
            })?;
            current + 1
        }
    };
    if next > DAILY_SEQUENCE_MAX {
        return Err(OrderError::SequenceExhausted {
            day: day.to_string(),
        });
    }

    Ok(format!("{prefix}{next:04}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MIGRATOR;
    use sqlx::sqlite::SqlitePoolOptions;
    use sqlx::SqlitePool;

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        MIGRATOR.run(&pool).await.unwrap();
        pool
    }

    async fn insert_order(pool: &SqlitePool, number: &str) {
        sqlx::query(
            "INSERT INTO orders (id, order_number, customer_name, customer_phone) VALUES (?1, ?2, 'Ana', '11999990000')",
        )
        .bind(shared::util::snowflake_id())
        .bind(number)
        .execute(pool)
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn starts_at_one_per_day() {
        let pool = test_pool().await;
        let mut conn = pool.acquire().await.unwrap();
        let number = next_for_day(&mut conn, "20260829").await.unwrap();
        assert_eq!(number, "ORD-20260829-0001");
    }

    #[tokio::test]
    async fn increments_from_highest_of_day() {
        let pool = test_pool().await;
        insert_order(&pool, "ORD-20260829-0001").await;
        insert_order(&pool, "ORD-20260829-0007").await;
        insert_order(&pool, "ORD-20260830-0042").await;

        let mut conn = pool.acquire().await.unwrap();
        let number = next_for_day(&mut conn, "20260829").await.unwrap();
        assert_eq!(number, "ORD-20260829-0008");
    }

    #[tokio::test]
    async fn day_buckets_are_independent() {
        let pool = test_pool().await;
        insert_order(&pool, "ORD-20260829-0123").await;

        let mut conn = pool.acquire().await.unwrap();
        let number = next_for_day(&mut conn, "20260830").await.unwrap();
        assert_eq!(number, "ORD-20260830-0001");
    }

    #[tokio::test]
    async fn overflow_is_rejected() {
        let pool = test_pool().await;
        insert_order(&pool, "ORD-20260829-9999").await;

        let mut conn = pool.acquire().await.unwrap();
        let err = next_for_day(&mut conn, "20260829").await.unwrap_err();
        assert!(matches!(err, OrderError::SequenceExhausted { .. }));
    }
}

//! Activity Log Repository (append-only)

use shared::models::ActivityLog;
use sqlx::SqlitePool;

use super::RepoResult;

pub async fn insert(pool: &SqlitePool, log: &ActivityLog) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO activity_logs (id, actor_id, actor_name, action, target_table, target_id, details, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
    )
    .bind(log.id)
    .bind(log.actor_id)
    .bind(&log.actor_name)
    .bind(&log.action)
    .bind(&log.target_table)
    .bind(&log.target_id)
    .bind(&log.details)
    .bind(log.created_at)
    .execute(pool)
    .await?;
    Ok(())
}

/// Most recent entries, newest first
pub async fn find_recent(pool: &SqlitePool, limit: i64) -> RepoResult<Vec<ActivityLog>> {
    let rows = sqlx::query_as::<_, ActivityLog>(
        "SELECT id, actor_id, actor_name, action, target_table, target_id, details, created_at \
         FROM activity_logs ORDER BY created_at DESC, id DESC LIMIT ?",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

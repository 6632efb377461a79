//! Activity Worker — drains the channel into the database

use shared::models::ActivityLog;
use sqlx::SqlitePool;
use tokio::sync::mpsc;

use crate::db::repository::activity;

use super::types::ActivityRequest;

pub struct ActivityWorker {
    pool: SqlitePool,
}

impl ActivityWorker {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Run until every sender is dropped
    pub async fn run(self, mut rx: mpsc::Receiver<ActivityRequest>) {
        tracing::info!("Activity worker started");
        while let Some(request) = rx.recv().await {
            let log = ActivityLog {
                id: shared::util::snowflake_id(),
                actor_id: request.actor_id,
                actor_name: request.actor_name,
                action: request.action.as_str().to_string(),
                target_table: request.action.target_table().to_string(),
                target_id: request.target_id,
                details: request.details.to_string(),
                created_at: shared::util::now_millis(),
            };
            if let Err(e) = activity::insert(&self.pool, &log).await {
                tracing::error!(action = %log.action, error = %e, "Failed to persist activity record");
            }
        }
        tracing::info!("Activity worker stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::{ActivityAction, ActivityLogger};
    use crate::db::MIGRATOR;
    use sqlx::sqlite::SqlitePoolOptions;

    #[tokio::test]
    async fn records_flow_from_logger_to_table() {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        MIGRATOR.run(&pool).await.unwrap();

        let (logger, rx) = ActivityLogger::channel();
        let worker = tokio::spawn(ActivityWorker::new(pool.clone()).run(rx));

        logger.record(
            Some(1),
            Some("admin"),
            ActivityAction::ProductCreated,
            42,
            serde_json::json!({"name": "Bola Oficial"}),
        );
        drop(logger);
        worker.await.unwrap();

        let logs = activity::find_recent(&pool, 10).await.unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].action, "product.created");
        assert_eq!(logs[0].target_table, "products");
        assert_eq!(logs[0].target_id, "42");
    }
}

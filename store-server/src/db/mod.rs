//! Database Module
//!
//! Handles SQLite connection pools and migrations.

pub mod repository;

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;

use crate::utils::AppError;

/// Embedded migrations — also used by tests to build throwaway schemas
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Database service — owns the SQLite connection pools.
///
/// WAL mode with a split pool setup: a read pool with several connections
/// and a write pool capped at one connection. SQLite allows a single writer
/// at a time anyway; funnelling all mutations through one connection means
/// order transactions serialize instead of failing with a busy snapshot.
#[derive(Clone)]
pub struct DbService {
    /// Read pool (catalog queries, listings)
    pub pool: SqlitePool,
    /// Write pool (single connection; all mutations)
    pub write_pool: SqlitePool,
}

impl DbService {
    /// Open the database, apply pragmas and run migrations
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let options = SqliteConnectOptions::from_str(&format!("sqlite:{db_path}"))
            .map_err(|e| AppError::database(format!("Invalid database path: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .pragma("foreign_keys", "ON")
            // busy_timeout: wait up to 5s on write contention instead of failing
            .pragma("busy_timeout", "5000");

        let write_pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options.clone())
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        MIGRATOR
            .run(&write_pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to apply migrations: {e}")))?;

        tracing::info!("Database ready (SQLite WAL, busy_timeout=5000ms)");

        Ok(Self { pool, write_pool })
    }
}

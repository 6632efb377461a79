//! Repository Module
//!
//! Module-level CRUD functions per table, all taking a pool or connection
//! handle from the caller. Nothing here opens its own transaction; the
//! functions that participate in order creation take `&mut SqliteConnection`
//! so the caller's transaction boundary governs atomicity.

pub mod activity;
pub mod category;
pub mod inventory;
pub mod order;
pub mod product;
pub mod user;

use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// Reservation failed — carries what a user-facing message needs
    #[error("Insufficient stock for {product}{}: {available} available", size_suffix(.size))]
    InsufficientStock {
        product: String,
        size: Option<String>,
        available: i64,
    },
}

fn size_suffix(size: &Option<String>) -> String {
    match size {
        Some(s) => format!(" (size {s})"),
        None => String::new(),
    }
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

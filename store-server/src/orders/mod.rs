//! Order Domain
//!
//! Checkout (order creation with stock reservation) and the order status
//! lifecycle. Repository calls stay in `db::repository`; this module owns
//! the transaction boundaries and business rules.

pub mod number;
pub mod service;

use shared::models::OrderStatus;
use thiserror::Error;

use crate::db::repository::RepoError;

#[derive(Debug, Error)]
pub enum OrderError {
    #[error(transparent)]
    Repo(#[from] RepoError),

    #[error("Order {0} not found")]
    NotFound(i64),

    /// Terminal orders are immutable
    #[error("Order is already {status} and cannot be changed")]
    InvalidTransition { status: OrderStatus },

    #[error("Daily order number sequence exhausted for {day}")]
    SequenceExhausted { day: String },

    #[error("{0}")]
    Validation(String),
}

impl From<sqlx::Error> for OrderError {
    fn from(err: sqlx::Error) -> Self {
        OrderError::Repo(RepoError::from(err))
    }
}

pub type OrderResult<T> = Result<T, OrderError>;

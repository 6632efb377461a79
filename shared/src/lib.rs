//! Shared models and utilities for the Arena store
//!
//! Data models are plain serde structs; enabling the `db` feature adds
//! `sqlx::FromRow` derives so the server can map query rows directly.

pub mod models;
pub mod util;

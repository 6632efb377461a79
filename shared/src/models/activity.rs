//! Activity Log Model

use serde::{Deserialize, Serialize};

/// Append-only audit record. Rows are written once and never updated or
/// deleted; `details` holds free-form JSON serialized as text.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ActivityLog {
    pub id: i64,
    pub actor_id: Option<i64>,
    pub actor_name: Option<String>,
    pub action: String,
    pub target_table: String,
    pub target_id: String,
    pub details: String,
    pub created_at: i64,
}

//! Activity record types

use serde_json::Value;

/// Known audit actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityAction {
    ProductCreated,
    ProductUpdated,
    ProductDeleted,
    CategoryCreated,
    CategoryUpdated,
    CategoryDeleted,
    OrderCreated,
    OrderStatusChanged,
    LoginFailed,
}

impl ActivityAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityAction::ProductCreated => "product.created",
            ActivityAction::ProductUpdated => "product.updated",
            ActivityAction::ProductDeleted => "product.deleted",
            ActivityAction::CategoryCreated => "category.created",
            ActivityAction::CategoryUpdated => "category.updated",
            ActivityAction::CategoryDeleted => "category.deleted",
            ActivityAction::OrderCreated => "order.created",
            ActivityAction::OrderStatusChanged => "order.status_changed",
            ActivityAction::LoginFailed => "auth.login_failed",
        }
    }

    /// Table the action targets
    pub fn target_table(&self) -> &'static str {
        match self {
            ActivityAction::ProductCreated
            | ActivityAction::ProductUpdated
            | ActivityAction::ProductDeleted => "products",
            ActivityAction::CategoryCreated
            | ActivityAction::CategoryUpdated
            | ActivityAction::CategoryDeleted => "categories",
            ActivityAction::OrderCreated | ActivityAction::OrderStatusChanged => "orders",
            ActivityAction::LoginFailed => "users",
        }
    }
}

/// One record travelling from handler to worker
#[derive(Debug, Clone)]
pub struct ActivityRequest {
    pub actor_id: Option<i64>,
    pub actor_name: Option<String>,
    pub action: ActivityAction,
    pub target_id: String,
    pub details: Value,
}

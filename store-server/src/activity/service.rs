//! Activity Logger — handler-facing side of the channel

use serde_json::Value;
use tokio::sync::mpsc;

use super::types::{ActivityAction, ActivityRequest};

const CHANNEL_CAPACITY: usize = 256;

/// Cheap-to-clone sender handle shared through application state
#[derive(Clone)]
pub struct ActivityLogger {
    tx: mpsc::Sender<ActivityRequest>,
}

impl ActivityLogger {
    pub fn channel() -> (Self, mpsc::Receiver<ActivityRequest>) {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        (Self { tx }, rx)
    }

    /// Queue an activity record. Never fails the caller: a full or closed
    /// channel is logged and the record dropped.
    pub fn record(
        &self,
        actor_id: Option<i64>,
        actor_name: Option<&str>,
        action: ActivityAction,
        target_id: impl ToString,
        details: Value,
    ) {
        let request = ActivityRequest {
            actor_id,
            actor_name: actor_name.map(str::to_string),
            action,
            target_id: target_id.to_string(),
            details,
        };
        if let Err(e) = self.tx.try_send(request) {
            tracing::error!(action = action.as_str(), error = %e, "Failed to queue activity record");
        }
    }
}

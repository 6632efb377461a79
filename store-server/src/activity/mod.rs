//! Activity Logging
//!
//! Fire-and-forget audit trail. Handlers push records onto a channel and
//! move on; a background worker drains the channel and writes rows. Logging
//! failures are logged and swallowed, never surfaced to the request.

mod service;
mod types;
mod worker;

pub use service::ActivityLogger;
pub use types::{ActivityAction, ActivityRequest};
pub use worker::ActivityWorker;

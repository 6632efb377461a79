//! Core Module — configuration, state and the server itself
//!
//! - [`Config`] — environment-driven configuration
//! - [`ServerState`] — shared application state
//! - [`Server`] — HTTP server

pub mod config;
pub mod server;
pub mod state;

pub use config::Config;
pub use server::Server;
pub use state::ServerState;

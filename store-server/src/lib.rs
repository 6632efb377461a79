//! Store Server — sporting goods storefront backend
//!
//! # Module layout
//!
//! ```text
//! store-server/src/
//! ├── core/          # configuration, state, server
//! ├── auth/          # JWT sessions, Argon2 hashing, middleware
//! ├── api/           # HTTP routes and handlers
//! ├── orders/        # checkout and status lifecycle
//! ├── activity/      # fire-and-forget audit trail
//! ├── db/            # pools, migrations, repositories
//! └── utils/         # errors, logging, validation
//! ```
//!
//! The public storefront (catalog, checkout) needs no authentication; the
//! admin panel (catalog management, orders, activity) sits behind JWT.

pub mod activity;
pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod orders;
pub mod utils;

pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use utils::logger::{init_logger, init_logger_with_file};
pub use utils::{AppError, AppResponse, AppResult};

pub fn print_banner() {
    println!(
        r#"
   ___                             _____ __
  /   |  ________  ____  ____ _   / ___// /_____  ________
 / /| | / ___/ _ \/ __ \/ __ `/   \__ \/ __/ __ \/ ___/ _ \
/ ___ |/ /  /  __/ / / / /_/ /   ___/ / /_/ /_/ / /  /  __/
/_/  |_/_/   \___/_/ /_/\__,_/   /____/\__/\____/_/   \___/
"#
    );
}

/// Load `.env`, make sure the work directory exists and wire up logging.
/// Must run before [`Config::from_env`] so `.env` values are visible.
pub fn setup_environment() -> Result<(), AppError> {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    config.ensure_work_dir_structure()?;

    let log_dir = config.log_dir();
    init_logger_with_file(Some(&config.log_level), log_dir.to_str());
    Ok(())
}

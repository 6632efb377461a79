use std::sync::Arc;

use sqlx::SqlitePool;

use crate::activity::{ActivityLogger, ActivityWorker};
use crate::auth::JwtService;
use crate::core::Config;
use crate::db::repository::user;
use crate::db::DbService;
use crate::utils::AppError;

/// Shared application state — cheap to clone, handed to every handler.
///
/// | Field | Purpose |
/// |-------|---------|
/// | config | Immutable configuration |
/// | pool | Read pool (catalog queries, listings) |
/// | write_pool | Single-connection pool, all mutations |
/// | jwt_service | Token generation and validation |
/// | activity | Fire-and-forget audit channel |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub pool: SqlitePool,
    pub write_pool: SqlitePool,
    pub jwt_service: Arc<JwtService>,
    pub activity: ActivityLogger,
}

impl ServerState {
    /// Initialize everything the server needs: work directory, database
    /// pools with migrations, the seeded admin account and the activity
    /// worker task.
    pub async fn initialize(config: Config) -> Result<Self, AppError> {
        config.ensure_work_dir_structure()?;

        let db_path = config.database_path();
        let db = DbService::new(&db_path.to_string_lossy()).await?;

        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));

        seed_admin_if_empty(&db.write_pool).await?;

        let (activity, rx) = ActivityLogger::channel();
        tokio::spawn(ActivityWorker::new(db.write_pool.clone()).run(rx));

        Ok(Self {
            config,
            pool: db.pool,
            write_pool: db.write_pool,
            jwt_service,
            activity,
        })
    }
}

/// First boot: create the admin account so the panel is reachable.
///
/// Credentials come from ADMIN_USERNAME / ADMIN_PASSWORD; the development
/// fallback password must be changed before production use.
async fn seed_admin_if_empty(pool: &SqlitePool) -> Result<(), AppError> {
    if user::count(pool).await? > 0 {
        return Ok(());
    }

    let username = std::env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".into());
    let password = std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| {
        tracing::warn!("ADMIN_PASSWORD not set, seeding admin with the default password");
        "admin123".into()
    });

    let hash = crate::auth::hash_password(&password)?;
    user::create(pool, &username, "Administrador", &hash, "admin").await?;
    tracing::info!(username = %username, "Seeded initial admin account");
    Ok(())
}

//! User Repository

use shared::models::User;
use sqlx::SqlitePool;

use super::{RepoError, RepoResult};

const USER_SELECT: &str = "SELECT id, username, display_name, password_hash, role, is_active, \
     created_at, updated_at FROM users";

pub async fn find_by_username(pool: &SqlitePool, username: &str) -> RepoResult<Option<User>> {
    let sql = format!("{USER_SELECT} WHERE username = ?");
    let row = sqlx::query_as::<_, User>(&sql)
        .bind(username)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<User>> {
    let sql = format!("{USER_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, User>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn count(pool: &SqlitePool) -> RepoResult<i64> {
    let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;
    Ok(n)
}

pub async fn create(
    pool: &SqlitePool,
    username: &str,
    display_name: &str,
    password_hash: &str,
    role: &str,
) -> RepoResult<User> {
    if find_by_username(pool, username).await?.is_some() {
        return Err(RepoError::Duplicate(format!(
            "Username '{username}' already exists"
        )));
    }

    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO users (id, username, display_name, password_hash, role, is_active, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, 1, ?6, ?6)",
    )
    .bind(id)
    .bind(username)
    .bind(display_name)
    .bind(password_hash)
    .bind(role)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create user".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MIGRATOR;
    use sqlx::sqlite::SqlitePoolOptions;

    #[tokio::test]
    async fn create_and_lookup() {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        MIGRATOR.run(&pool).await.unwrap();

        assert_eq!(count(&pool).await.unwrap(), 0);
        let user = create(&pool, "admin", "Administrador", "$argon2$fake", "admin")
            .await
            .unwrap();
        assert!(user.is_active);
        assert_eq!(count(&pool).await.unwrap(), 1);

        let err = create(&pool, "admin", "Outro", "$argon2$fake", "admin")
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));

        let fetched = find_by_username(&pool, "admin").await.unwrap().unwrap();
        assert_eq!(fetched.id, user.id);
    }
}

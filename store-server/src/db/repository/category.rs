//! Category Repository

use shared::models::{Category, CategoryCreate, CategoryUpdate};
use sqlx::SqlitePool;

use super::{RepoError, RepoResult};

const CATEGORY_SELECT: &str =
    "SELECT id, name, slug, has_sizes, created_at, updated_at FROM categories";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Category>> {
    let sql = format!("{CATEGORY_SELECT} ORDER BY name");
    let rows = sqlx::query_as::<_, Category>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Category>> {
    let sql = format!("{CATEGORY_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Category>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_slug(pool: &SqlitePool, slug: &str) -> RepoResult<Option<Category>> {
    let sql = format!("{CATEGORY_SELECT} WHERE slug = ?");
    let row = sqlx::query_as::<_, Category>(&sql)
        .bind(slug)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, data: CategoryCreate) -> RepoResult<Category> {
    if find_by_slug(pool, &data.slug).await?.is_some() {
        return Err(RepoError::Duplicate(format!(
            "Category slug '{}' already exists",
            data.slug
        )));
    }

    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO categories (id, name, slug, has_sizes, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
    )
    .bind(id)
    .bind(&data.name)
    .bind(&data.slug)
    .bind(data.has_sizes)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create category".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: CategoryUpdate) -> RepoResult<Category> {
    if let Some(slug) = &data.slug {
        if let Some(existing) = find_by_slug(pool, slug).await? {
            if existing.id != id {
                return Err(RepoError::Duplicate(format!(
                    "Category slug '{slug}' already exists"
                )));
            }
        }
    }

    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE categories SET name = COALESCE(?1, name), slug = COALESCE(?2, slug), has_sizes = COALESCE(?3, has_sizes), updated_at = ?4 WHERE id = ?5",
    )
    .bind(&data.name)
    .bind(&data.slug)
    .bind(data.has_sizes)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Category {id} not found")));
    }

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Category {id} not found")))
}

/// Hard delete. Refused while any product still references the category.
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    let product_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE category_id = ?")
            .bind(id)
            .fetch_one(pool)
            .await?;
    if product_count > 0 {
        return Err(RepoError::Validation(format!(
            "Category {id} still has {product_count} products"
        )));
    }

    let rows = sqlx::query("DELETE FROM categories WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Category {id} not found")));
    }
    Ok(())
}

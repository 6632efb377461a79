//! Product Repository — catalog CRUD and denormalized views
//!
//! Views join product, category, images and inventory into the shape the
//! storefront renders directly: effective price after discount, the
//! pre-discount price only when a discount applies, and a launch flag for
//! products created inside the launch window.

use std::collections::HashMap;

use shared::models::{
    InventoryEntry, Product, ProductCreate, ProductImage, ProductUpdate, ProductView, Stock,
    GENERAL_SIZE, GENERAL_SIZE_ALT,
};
use sqlx::SqlitePool;

use super::{inventory, RepoError, RepoResult};

/// Products created within this window are flagged as launches (7 days)
pub const LAUNCH_WINDOW_MS: i64 = 7 * 24 * 60 * 60 * 1000;

const PRODUCT_SELECT: &str = "SELECT id, name, description, category_id, team, gender, origin, \
     cost_price, sale_price, is_discounted, discount_percentage, created_at, updated_at \
     FROM products";

const VIEW_SELECT: &str = "SELECT p.id, p.name, p.description, p.category_id, c.name AS category_name, \
     c.has_sizes, p.team, p.gender, p.origin, p.cost_price, p.sale_price, \
     p.is_discounted, p.discount_percentage, p.created_at \
     FROM products p JOIN categories c ON c.id = p.category_id";

#[derive(sqlx::FromRow)]
struct ViewRow {
    id: i64,
    name: String,
    description: Option<String>,
    category_id: i64,
    category_name: String,
    has_sizes: bool,
    team: Option<String>,
    gender: Option<String>,
    origin: Option<String>,
    cost_price: f64,
    sale_price: f64,
    is_discounted: bool,
    discount_percentage: f64,
    created_at: i64,
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Product>> {
    let sql = format!("{PRODUCT_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Product>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, data: ProductCreate) -> RepoResult<Product> {
    let category = super::category::find_by_id(pool, data.category_id)
        .await?
        .ok_or_else(|| {
            RepoError::Validation(format!("Category {} does not exist", data.category_id))
        })?;
    check_stock_shape(category.has_sizes, &data.stock)?;

    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();

    let mut tx = pool.begin().await?;
    sqlx::query(
        "INSERT INTO products (id, name, description, category_id, team, gender, origin, \
         cost_price, sale_price, is_discounted, discount_percentage, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?12)",
    )
    .bind(id)
    .bind(&data.name)
    .bind(&data.description)
    .bind(data.category_id)
    .bind(&data.team)
    .bind(&data.gender)
    .bind(&data.origin)
    .bind(data.cost_price)
    .bind(data.sale_price)
    .bind(data.is_discounted)
    .bind(data.discount_percentage)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    for image in &data.images {
        sqlx::query("INSERT INTO product_images (id, product_id, url, is_main) VALUES (?1, ?2, ?3, ?4)")
            .bind(shared::util::snowflake_id())
            .bind(id)
            .bind(&image.url)
            .bind(image.is_main)
            .execute(&mut *tx)
            .await?;
    }
    inventory::set_stock(&mut tx, id, &data.stock).await?;
    tx.commit().await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create product".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: ProductUpdate) -> RepoResult<Product> {
    let current = find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Product {id} not found")))?;

    let category_id = data.category_id.unwrap_or(current.category_id);
    let category = super::category::find_by_id(pool, category_id)
        .await?
        .ok_or_else(|| RepoError::Validation(format!("Category {category_id} does not exist")))?;
    if let Some(stock) = &data.stock {
        check_stock_shape(category.has_sizes, stock)?;
    }

    let now = shared::util::now_millis();
    let mut tx = pool.begin().await?;
    sqlx::query(
        "UPDATE products SET name = COALESCE(?1, name), description = COALESCE(?2, description), \
         category_id = COALESCE(?3, category_id), team = COALESCE(?4, team), \
         gender = COALESCE(?5, gender), origin = COALESCE(?6, origin), \
         cost_price = COALESCE(?7, cost_price), sale_price = COALESCE(?8, sale_price), \
         is_discounted = COALESCE(?9, is_discounted), \
         discount_percentage = COALESCE(?10, discount_percentage), updated_at = ?11 \
         WHERE id = ?12",
    )
    .bind(&data.name)
    .bind(&data.description)
    .bind(data.category_id)
    .bind(&data.team)
    .bind(&data.gender)
    .bind(&data.origin)
    .bind(data.cost_price)
    .bind(data.sale_price)
    .bind(data.is_discounted)
    .bind(data.discount_percentage)
    .bind(now)
    .bind(id)
    .execute(&mut *tx)
    .await?;

    // Images and stock replace wholesale when the payload carries them
    if let Some(images) = &data.images {
        sqlx::query("DELETE FROM product_images WHERE product_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        for image in images {
            sqlx::query(
                "INSERT INTO product_images (id, product_id, url, is_main) VALUES (?1, ?2, ?3, ?4)",
            )
            .bind(shared::util::snowflake_id())
            .bind(id)
            .bind(&image.url)
            .bind(image.is_main)
            .execute(&mut *tx)
            .await?;
        }
    }
    if let Some(stock) = &data.stock {
        inventory::set_stock(&mut tx, id, stock).await?;
    }
    tx.commit().await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Product {id} not found")))
}

/// Hard delete; images and inventory rows go with it via cascade
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    let rows = sqlx::query("DELETE FROM products WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Product {id} not found")));
    }
    Ok(())
}

/// Single product view. `admin` exposes cost_price.
pub async fn find_view_by_id(
    pool: &SqlitePool,
    id: i64,
    admin: bool,
) -> RepoResult<Option<ProductView>> {
    let sql = format!("{VIEW_SELECT} WHERE p.id = ?");
    let row = sqlx::query_as::<_, ViewRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    let Some(row) = row else { return Ok(None) };

    let images = images_for(pool, &[id]).await?.remove(&id).unwrap_or_default();
    let entries = inventory_for(pool, &[id]).await?.remove(&id).unwrap_or_default();
    let now = shared::util::now_millis();
    Ok(Some(build_view(row, images, entries, now, admin)))
}

/// Admin listing: every product, ordered by name
pub async fn find_all_views(pool: &SqlitePool) -> RepoResult<Vec<ProductView>> {
    let sql = format!("{VIEW_SELECT} ORDER BY p.name");
    let rows = sqlx::query_as::<_, ViewRow>(&sql).fetch_all(pool).await?;
    assemble_views(pool, rows, true).await
}

/// Storefront listing: launches first, then discounted, then by name
pub async fn storefront_views(pool: &SqlitePool) -> RepoResult<Vec<ProductView>> {
    let sql = format!("{VIEW_SELECT}");
    let rows = sqlx::query_as::<_, ViewRow>(&sql).fetch_all(pool).await?;
    let mut views = assemble_views(pool, rows, false).await?;
    views.sort_by(|a, b| {
        (!a.is_launch, !discount_applies(a.is_discounted, a.discount_percentage))
            .cmp(&(!b.is_launch, !discount_applies(b.is_discounted, b.discount_percentage)))
            .then_with(|| a.name.cmp(&b.name))
    });
    Ok(views)
}

async fn assemble_views(
    pool: &SqlitePool,
    rows: Vec<ViewRow>,
    admin: bool,
) -> RepoResult<Vec<ProductView>> {
    let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
    let mut images = images_for(pool, &ids).await?;
    let mut entries = inventory_for(pool, &ids).await?;
    let now = shared::util::now_millis();

    Ok(rows
        .into_iter()
        .map(|row| {
            let imgs = images.remove(&row.id).unwrap_or_default();
            let inv = entries.remove(&row.id).unwrap_or_default();
            build_view(row, imgs, inv, now, admin)
        })
        .collect())
}

fn build_view(
    row: ViewRow,
    images: Vec<ProductImage>,
    entries: Vec<InventoryEntry>,
    now: i64,
    admin: bool,
) -> ProductView {
    let (price, old_price) =
        display_price(row.sale_price, row.is_discounted, row.discount_percentage);
    ProductView {
        id: row.id,
        name: row.name,
        description: row.description,
        category_id: row.category_id,
        category_name: row.category_name,
        has_sizes: row.has_sizes,
        team: row.team,
        gender: row.gender,
        origin: row.origin,
        price,
        old_price,
        is_discounted: row.is_discounted,
        discount_percentage: row.discount_percentage,
        cost_price: admin.then_some(row.cost_price),
        is_launch: now - row.created_at < LAUNCH_WINDOW_MS,
        images,
        stock: fold_inventory(row.has_sizes, entries),
        created_at: row.created_at,
    }
}

/// Effective display price. Returns (price, pre-discount price when one applies).
pub fn display_price(sale_price: f64, is_discounted: bool, discount_percentage: f64) -> (f64, Option<f64>) {
    if discount_applies(is_discounted, discount_percentage) {
        let discounted = sale_price * (1.0 - discount_percentage / 100.0);
        (round_cents(discounted), Some(sale_price))
    } else {
        (sale_price, None)
    }
}

fn discount_applies(is_discounted: bool, discount_percentage: f64) -> bool {
    is_discounted && discount_percentage > 0.0
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Fold inventory rows into the shape the category dictates.
///
/// Sized categories get the full label map; others collapse to the total,
/// accepting either sentinel label on read.
pub fn fold_inventory(has_sizes: bool, entries: Vec<InventoryEntry>) -> Stock {
    if has_sizes {
        Stock::Sized(
            entries
                .into_iter()
                .map(|entry| (entry.size, entry.quantity))
                .collect(),
        )
    } else {
        Stock::Simple(
            entries
                .iter()
                .filter(|e| e.size == GENERAL_SIZE || e.size == GENERAL_SIZE_ALT)
                .map(|e| e.quantity)
                .sum(),
        )
    }
}

fn check_stock_shape(has_sizes: bool, stock: &Stock) -> RepoResult<()> {
    match (has_sizes, stock) {
        (true, Stock::Sized(_)) | (false, Stock::Simple(_)) => Ok(()),
        (true, Stock::Simple(_)) => Err(RepoError::Validation(
            "Category requires per-size stock".into(),
        )),
        (false, Stock::Sized(_)) => Err(RepoError::Validation(
            "Category does not carry per-size stock".into(),
        )),
    }
}

async fn images_for(pool: &SqlitePool, ids: &[i64]) -> RepoResult<HashMap<i64, Vec<ProductImage>>> {
    let mut map: HashMap<i64, Vec<ProductImage>> = HashMap::new();
    if ids.is_empty() {
        return Ok(map);
    }
    let sql = format!(
        "SELECT id, product_id, url, is_main FROM product_images WHERE product_id IN ({}) \
         ORDER BY is_main DESC, id",
        placeholders(ids.len())
    );
    let mut query = sqlx::query_as::<_, ProductImage>(&sql);
    for id in ids {
        query = query.bind(id);
    }
    for image in query.fetch_all(pool).await? {
        map.entry(image.product_id).or_default().push(image);
    }
    Ok(map)
}

async fn inventory_for(
    pool: &SqlitePool,
    ids: &[i64],
) -> RepoResult<HashMap<i64, Vec<InventoryEntry>>> {
    let mut map: HashMap<i64, Vec<InventoryEntry>> = HashMap::new();
    if ids.is_empty() {
        return Ok(map);
    }
    let sql = format!(
        "SELECT product_id, size, quantity FROM product_inventory WHERE product_id IN ({}) \
         ORDER BY size",
        placeholders(ids.len())
    );
    let mut query = sqlx::query_as::<_, InventoryEntry>(&sql);
    for id in ids {
        query = query.bind(id);
    }
    for entry in query.fetch_all(pool).await? {
        map.entry(entry.product_id).or_default().push(entry);
    }
    Ok(map)
}

fn placeholders(count: usize) -> String {
    let mut out = String::from("?");
    for _ in 1..count {
        out.push_str(", ?");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MIGRATOR;
    use shared::models::{CategoryCreate, ProductImageInput};
    use sqlx::sqlite::SqlitePoolOptions;
    use std::collections::BTreeMap;

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        MIGRATOR.run(&pool).await.unwrap();
        pool
    }

    async fn seed_category(pool: &SqlitePool, slug: &str, has_sizes: bool) -> i64 {
        super::super::category::create(
            pool,
            CategoryCreate {
                name: slug.to_string(),
                slug: slug.to_string(),
                has_sizes,
            },
        )
        .await
        .unwrap()
        .id
    }

    fn shirt(category_id: i64, name: &str, sale_price: f64) -> ProductCreate {
        let mut sizes = BTreeMap::new();
        sizes.insert("M".to_string(), 4);
        sizes.insert("G".to_string(), 2);
        ProductCreate {
            name: name.to_string(),
            description: None,
            category_id,
            team: Some("Flamengo".to_string()),
            gender: None,
            origin: None,
            cost_price: 50.0,
            sale_price,
            is_discounted: false,
            discount_percentage: 0.0,
            images: vec![ProductImageInput {
                url: "https://cdn.example.com/shirt.jpg".to_string(),
                is_main: true,
            }],
            stock: Stock::Sized(sizes),
        }
    }

    #[tokio::test]
    async fn create_writes_images_and_inventory() {
        let pool = test_pool().await;
        let cat = seed_category(&pool, "camisas", true).await;
        let product = create(&pool, shirt(cat, "Camisa Titular", 199.9)).await.unwrap();

        let view = find_view_by_id(&pool, product.id, true).await.unwrap().unwrap();
        assert_eq!(view.images.len(), 1);
        assert_eq!(view.stock.total(), 6);
        assert_eq!(view.cost_price, Some(50.0));
        assert!(view.is_launch);
    }

    #[tokio::test]
    async fn stock_shape_must_match_category() {
        let pool = test_pool().await;
        let cat = seed_category(&pool, "bolas", false).await;
        let mut data = shirt(cat, "Bola Oficial", 149.9);
        data.stock = Stock::Sized(BTreeMap::new());
        let err = create(&pool, data).await.unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));
    }

    #[tokio::test]
    async fn discount_yields_effective_and_old_price() {
        let (price, old) = display_price(100.0, true, 20.0);
        assert_eq!(price, 80.0);
        assert_eq!(old, Some(100.0));

        // Flag without percentage is not an effective discount
        let (price, old) = display_price(100.0, true, 0.0);
        assert_eq!(price, 100.0);
        assert_eq!(old, None);

        let (price, old) = display_price(100.0, false, 20.0);
        assert_eq!(price, 100.0);
        assert_eq!(old, None);
    }

    #[tokio::test]
    async fn storefront_orders_launches_then_discounts_then_name() {
        let pool = test_pool().await;
        let cat = seed_category(&pool, "camisas", true).await;

        let plain_b = create(&pool, shirt(cat, "B Camisa", 100.0)).await.unwrap();
        let plain_a = create(&pool, shirt(cat, "A Camisa", 100.0)).await.unwrap();
        let discounted = create(&pool, {
            let mut d = shirt(cat, "Z Promo", 100.0);
            d.is_discounted = true;
            d.discount_percentage = 10.0;
            d
        })
        .await
        .unwrap();
        let launch = create(&pool, shirt(cat, "Y Lançamento", 100.0)).await.unwrap();

        // Age everything but the launch out of the launch window
        let old = shared::util::now_millis() - LAUNCH_WINDOW_MS - 1;
        for id in [plain_b.id, plain_a.id, discounted.id] {
            sqlx::query("UPDATE products SET created_at = ? WHERE id = ?")
                .bind(old)
                .bind(id)
                .execute(&pool)
                .await
                .unwrap();
        }

        let views = storefront_views(&pool).await.unwrap();
        let names: Vec<&str> = views.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["Y Lançamento", "Z Promo", "A Camisa", "B Camisa"]);
        assert!(views.iter().all(|v| v.cost_price.is_none()));
    }

    #[tokio::test]
    async fn update_replaces_stock_wholesale() {
        let pool = test_pool().await;
        let cat = seed_category(&pool, "camisas", true).await;
        let product = create(&pool, shirt(cat, "Camisa Reserva", 179.9)).await.unwrap();

        let mut sizes = BTreeMap::new();
        sizes.insert("P".to_string(), 9);
        update(
            &pool,
            product.id,
            ProductUpdate {
                name: None,
                description: None,
                category_id: None,
                team: None,
                gender: None,
                origin: None,
                cost_price: None,
                sale_price: None,
                is_discounted: None,
                discount_percentage: None,
                images: None,
                stock: Some(Stock::Sized(sizes)),
            },
        )
        .await
        .unwrap();

        let view = find_view_by_id(&pool, product.id, false).await.unwrap().unwrap();
        assert_eq!(view.stock, Stock::Sized([("P".to_string(), 9)].into_iter().collect()));
    }

    #[tokio::test]
    async fn fold_collapses_sentinel_rows() {
        let entries = vec![InventoryEntry {
            product_id: 1,
            size: "Único".to_string(),
            quantity: 8,
        }];
        assert_eq!(fold_inventory(false, entries), Stock::Simple(8));
    }
}

//! Product, image and inventory models

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Sentinel size label for products in categories without sized inventory
pub const GENERAL_SIZE: &str = "Geral";

/// Legacy alias for [`GENERAL_SIZE`]; accepted on read, never written
pub const GENERAL_SIZE_ALT: &str = "Único";

/// Product entity (catalog row, undecorated)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub category_id: i64,
    pub team: Option<String>,
    pub gender: Option<String>,
    pub origin: Option<String>,
    pub cost_price: f64,
    pub sale_price: f64,
    pub is_discounted: bool,
    pub discount_percentage: f64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Product image; at most one per product is flagged `is_main`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ProductImage {
    pub id: i64,
    pub product_id: i64,
    pub url: String,
    pub is_main: bool,
}

/// Per-(product, size) stock row
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct InventoryEntry {
    pub product_id: i64,
    pub size: String,
    pub quantity: i64,
}

/// Inventory shape keyed by the category's `has_sizes` flag.
///
/// Serializes untagged: a sized product carries a `{label: qty}` map, a
/// non-sized product a bare number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Stock {
    Sized(BTreeMap<String, i64>),
    Simple(i64),
}

impl Stock {
    /// Total units across all sizes
    pub fn total(&self) -> i64 {
        match self {
            Stock::Sized(map) => map.values().sum(),
            Stock::Simple(qty) => *qty,
        }
    }
}

/// Image input for create/update payloads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductImageInput {
    pub url: String,
    #[serde(default)]
    pub is_main: bool,
}

/// Create product payload
///
/// `stock` must match the category shape: `Sized` for `has_sizes`
/// categories, `Simple` otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    pub description: Option<String>,
    pub category_id: i64,
    pub team: Option<String>,
    pub gender: Option<String>,
    pub origin: Option<String>,
    pub cost_price: f64,
    pub sale_price: f64,
    #[serde(default)]
    pub is_discounted: bool,
    #[serde(default)]
    pub discount_percentage: f64,
    #[serde(default)]
    pub images: Vec<ProductImageInput>,
    pub stock: Stock,
}

/// Update product payload; `images`/`stock` replace wholesale when present
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<i64>,
    pub team: Option<String>,
    pub gender: Option<String>,
    pub origin: Option<String>,
    pub cost_price: Option<f64>,
    pub sale_price: Option<f64>,
    pub is_discounted: Option<bool>,
    pub discount_percentage: Option<f64>,
    pub images: Option<Vec<ProductImageInput>>,
    pub stock: Option<Stock>,
}

/// Denormalized product view (catalog and admin listings)
///
/// `price` is the effective display price; `old_price` is present only when
/// a discount applies. `cost_price` is filled for admin views only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductView {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub category_id: i64,
    pub category_name: String,
    pub has_sizes: bool,
    pub team: Option<String>,
    pub gender: Option<String>,
    pub origin: Option<String>,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_price: Option<f64>,
    pub is_discounted: bool,
    pub discount_percentage: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_price: Option<f64>,
    pub is_launch: bool,
    pub images: Vec<ProductImage>,
    pub stock: Stock,
    pub created_at: i64,
}

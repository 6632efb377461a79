//! Data models for the Arena store

pub mod activity;
pub mod category;
pub mod order;
pub mod product;
pub mod user;

pub use activity::ActivityLog;
pub use category::{Category, CategoryCreate, CategoryUpdate};
pub use order::{
    Order, OrderCreate, OrderItem, OrderItemInput, OrderStatus, OrderStatusUpdate, OrderWithItems,
};
pub use product::{
    InventoryEntry, Product, ProductCreate, ProductImage, ProductImageInput, ProductUpdate,
    ProductView, Stock, GENERAL_SIZE, GENERAL_SIZE_ALT,
};
pub use user::{LoginRequest, LoginResponse, User, UserInfo};

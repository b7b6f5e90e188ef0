//! Inventory domain module.
//!
//! This crate contains business rules for categories and products, implemented purely as
//! deterministic domain logic (no IO, no HTTP, no storage).

pub mod category;
pub mod overview;
pub mod product;
pub mod stock;

pub use category::{validate_category_input, Category, CategoryDraft};
pub use overview::{compute_overview, format_amount, OverviewMetrics};
pub use product::{validate_product_input, Product, ProductDraft, MAX_PRICE, MAX_QUANTITY};
pub use stock::{stock_status, StockStatus, LOW_STOCK_THRESHOLD};

pub use stockroom_core::{CategoryId, ProductId, ValidationError, ValidationResult};

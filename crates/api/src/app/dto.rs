use rust_decimal::Decimal;
use serde::Deserialize;

use stockroom_core::CategoryId;
use stockroom_inventory::{format_amount, Category, OverviewMetrics, Product};

use crate::app::services::{NewProduct, ProductView};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    pub price: Decimal,
    pub category_id: CategoryId,
}

impl From<CreateProductRequest> for NewProduct {
    fn from(req: CreateProductRequest) -> Self {
        NewProduct {
            name: req.name,
            quantity: req.quantity,
            price: req.price,
            category_id: req.category_id,
        }
    }
}

// -------------------------
// JSON mapping helpers
// -------------------------

pub fn category_to_json(c: Category) -> serde_json::Value {
    serde_json::json!({
        "id": c.id,
        "name": c.name,
        "description": c.description,
        "created_at": c.created_at.to_rfc3339(),
    })
}

pub fn product_to_json(p: Product) -> serde_json::Value {
    let status = p.stock_status();
    serde_json::json!({
        "id": p.id,
        "name": p.name,
        "quantity": p.quantity,
        "price": p.price,
        "category_id": p.category_id,
        "stock_status": status.as_str(),
        "stock_label": status.label(),
        "created_at": p.created_at.to_rfc3339(),
    })
}

pub fn product_view_to_json(view: ProductView) -> serde_json::Value {
    let mut json = product_to_json(view.product);
    json["category_name"] = serde_json::json!(view.category_name);
    json
}

pub fn overview_to_json(m: OverviewMetrics, currency: &str) -> serde_json::Value {
    serde_json::json!({
        "total_value": m.total_value,
        "total_value_display": format!("{} {}", format_amount(m.total_value), currency),
        "total_units": m.total_units,
        "item_count": m.item_count,
        "empty": m.is_empty(),
        "saturated": m.saturated,
        "low_stock_count": m.low_stock_count(),
        "low_stock": m.low_stock.into_iter().map(product_to_json).collect::<Vec<_>>(),
    })
}

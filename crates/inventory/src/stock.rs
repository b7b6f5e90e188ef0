use serde::{Deserialize, Serialize};

/// Products with fewer units than this are flagged as low stock.
pub const LOW_STOCK_THRESHOLD: i64 = 5;

/// Visual stock indicator for a product row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    OutOfStock,
    LowStock,
    InStock,
}

impl StockStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockStatus::OutOfStock => "out_of_stock",
            StockStatus::LowStock => "low_stock",
            StockStatus::InStock => "in_stock",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            StockStatus::OutOfStock => "Out of stock",
            StockStatus::LowStock => "Low stock",
            StockStatus::InStock => "In stock",
        }
    }
}

impl core::fmt::Display for StockStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify a quantity on hand.
///
/// Negative quantities never pass validation; if one is read back from the store it is
/// treated as out of stock.
pub fn stock_status(quantity: i64) -> StockStatus {
    if quantity <= 0 {
        StockStatus::OutOfStock
    } else if quantity < LOW_STOCK_THRESHOLD {
        StockStatus::LowStock
    } else {
        StockStatus::InStock
    }
}

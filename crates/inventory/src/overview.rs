//! Derived warehouse metrics (the Overview screen).

use rust_decimal::Decimal;
use serde::Serialize;

use crate::product::{to_price_scale, Product, PRICE_SCALE};
use crate::stock::LOW_STOCK_THRESHOLD;

/// Aggregate figures over the current product snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverviewMetrics {
    /// Sum of `price * quantity`, in exact decimal arithmetic.
    pub total_value: Decimal,
    pub total_units: i64,
    pub item_count: usize,
    /// Products below [`LOW_STOCK_THRESHOLD`], in input order.
    pub low_stock: Vec<Product>,
    /// A total left its numeric range and was clamped (`Decimal::MAX` / `i64::MAX`).
    pub saturated: bool,
}

impl OverviewMetrics {
    /// True when there are no products at all.
    pub fn is_empty(&self) -> bool {
        self.item_count == 0
    }

    pub fn low_stock_count(&self) -> usize {
        self.low_stock.len()
    }
}

/// Compute overview metrics for a product snapshot.
///
/// Pure function of its input: no IO, no clock. Never panics: a total that overflows is
/// clamped to its type's bound and [`OverviewMetrics::saturated`] is set.
pub fn compute_overview(products: &[Product]) -> OverviewMetrics {
    let mut total_value = Some(Decimal::ZERO);
    let mut total_units = Some(0i64);
    let mut low_stock = Vec::new();

    for product in products {
        total_value = total_value
            .zip(product.stock_value())
            .and_then(|(sum, value)| sum.checked_add(value));
        total_units = total_units.and_then(|sum| sum.checked_add(product.quantity));
        if product.quantity < LOW_STOCK_THRESHOLD {
            low_stock.push(product.clone());
        }
    }

    let saturated = total_value.is_none() || total_units.is_none();
    OverviewMetrics {
        total_value: total_value.map_or(Decimal::MAX, to_price_scale),
        total_units: total_units.unwrap_or(i64::MAX),
        item_count: products.len(),
        low_stock,
        saturated,
    }
}

/// Render an amount with two decimals and `,` thousands separators (`1,234.50`).
pub fn format_amount(amount: Decimal) -> String {
    let rounded = to_price_scale(amount);
    let plain = format!("{:.prec$}", rounded.abs(), prec = PRICE_SCALE as usize);
    let (int_part, frac_part) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}{grouped}.{frac_part}")
}

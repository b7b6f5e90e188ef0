use std::collections::HashSet;

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use stockroom_core::{CategoryId, Entity, ProductId, ValidationError, ValidationResult};

use crate::stock::{stock_status, StockStatus};

/// Number of decimal places kept for prices.
pub const PRICE_SCALE: u32 = 2;

/// Largest price the `NUMERIC(12, 2)` column holds: `9,999,999,999.99`.
pub const MAX_PRICE: Decimal = Decimal::from_parts(0xD4A5_0FFF, 0xE8, 0, false, PRICE_SCALE);

/// Largest stock level accepted for a single product.
pub const MAX_QUANTITY: i64 = 1_000_000_000;

/// A stored product: a stocked item belonging to exactly one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub quantity: i64,
    pub price: Decimal,
    pub category_id: CategoryId,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Value of the units on hand (`price * quantity`), or `None` if it exceeds the decimal
    /// range. Rows written outside validation can carry arbitrary values.
    pub fn stock_value(&self) -> Option<Decimal> {
        self.price.checked_mul(Decimal::from(self.quantity))
    }

    pub fn stock_status(&self) -> StockStatus {
        stock_status(self.quantity)
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> Self::Id {
        self.id
    }
}

/// Validated, store-ready product (no id yet).
///
/// Only constructed through [`validate_product_input`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductDraft {
    name: String,
    quantity: i64,
    price: Decimal,
    category_id: CategoryId,
}

impl ProductDraft {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    pub fn category_id(&self) -> CategoryId {
        self.category_id
    }

    /// Attach store-assigned identity, producing the stored record.
    pub fn into_product(self, id: ProductId, created_at: DateTime<Utc>) -> Product {
        Product {
            id,
            name: self.name,
            quantity: self.quantity,
            price: self.price,
            category_id: self.category_id,
            created_at,
        }
    }
}

/// Round to cents and pin the scale, so `20` is carried as `20.00`.
pub(crate) fn to_price_scale(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(PRICE_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(PRICE_SCALE);
    rounded
}

/// Validate raw product form input against the categories that currently exist.
///
/// Checks run in order (name, quantity, price, category) and the first failure is returned.
/// Quantity is capped at [`MAX_QUANTITY`] and the rounded price at [`MAX_PRICE`]. On success
/// the price is rounded to [`PRICE_SCALE`] decimal places.
pub fn validate_product_input(
    name: &str,
    quantity: i64,
    price: Decimal,
    category_id: CategoryId,
    known_category_ids: &HashSet<CategoryId>,
) -> ValidationResult<ProductDraft> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if quantity < 0 {
        return Err(ValidationError::NegativeQuantity);
    }
    if quantity > MAX_QUANTITY {
        return Err(ValidationError::QuantityTooLarge);
    }
    if price.is_sign_negative() && !price.is_zero() {
        return Err(ValidationError::NegativePrice);
    }
    let price = to_price_scale(price);
    if price > MAX_PRICE {
        return Err(ValidationError::PriceTooLarge);
    }
    if !known_category_ids.contains(&category_id) {
        return Err(ValidationError::UnknownCategory);
    }

    Ok(ProductDraft {
        name: name.to_string(),
        quantity,
        price,
        category_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn known(ids: &[i64]) -> HashSet<CategoryId> {
        ids.iter().copied().map(CategoryId::new).collect()
    }

    fn price(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn valid_input_produces_draft() {
        let draft =
            validate_product_input("Bolt", 10, price("1.00"), CategoryId::new(1), &known(&[1]))
                .unwrap();

        assert_eq!(draft.name(), "Bolt");
        assert_eq!(draft.quantity(), 10);
        assert_eq!(draft.price(), price("1.00"));
        assert_eq!(draft.category_id(), CategoryId::new(1));
    }

    #[test]
    fn empty_name_is_rejected() {
        let err = validate_product_input("  ", 1, price("1"), CategoryId::new(1), &known(&[1]))
            .unwrap_err();
        assert_eq!(err, ValidationError::EmptyName);
    }

    #[test]
    fn negative_quantity_is_rejected() {
        let err = validate_product_input("Bolt", -1, price("1.0"), CategoryId::new(1), &known(&[1]))
            .unwrap_err();
        assert_eq!(err, ValidationError::NegativeQuantity);
    }

    #[test]
    fn negative_price_is_rejected() {
        let err =
            validate_product_input("Bolt", 1, price("-0.01"), CategoryId::new(1), &known(&[1]))
                .unwrap_err();
        assert_eq!(err, ValidationError::NegativePrice);
    }

    #[test]
    fn negative_zero_price_is_accepted() {
        let draft = validate_product_input("Bolt", 1, price("-0.00"), CategoryId::new(1), &known(&[1]))
            .unwrap();
        assert!(draft.price().is_zero());
    }

    #[test]
    fn unknown_category_is_rejected() {
        let err = validate_product_input("Bolt", 10, price("1.0"), CategoryId::new(2), &known(&[1]))
            .unwrap_err();
        assert_eq!(err, ValidationError::UnknownCategory);
    }

    #[test]
    fn no_categories_means_every_reference_is_unknown() {
        let err = validate_product_input("Bolt", 10, price("1.0"), CategoryId::new(1), &known(&[]))
            .unwrap_err();
        assert_eq!(err, ValidationError::UnknownCategory);
    }

    #[test]
    fn first_failing_check_wins() {
        let err = validate_product_input("", -1, price("-1"), CategoryId::new(9), &known(&[1]))
            .unwrap_err();
        assert_eq!(err, ValidationError::EmptyName);

        let err = validate_product_input("Bolt", -1, price("-1"), CategoryId::new(9), &known(&[1]))
            .unwrap_err();
        assert_eq!(err, ValidationError::NegativeQuantity);
    }

    #[test]
    fn price_is_rounded_to_cents() {
        let draft =
            validate_product_input("Bolt", 1, price("0.125"), CategoryId::new(1), &known(&[1]))
                .unwrap();
        assert_eq!(draft.price(), price("0.13"));

        let draft =
            validate_product_input("Bolt", 1, price("19.994"), CategoryId::new(1), &known(&[1]))
                .unwrap();
        assert_eq!(draft.price(), price("19.99"));
    }

    #[test]
    fn price_keeps_two_decimal_places() {
        let draft = validate_product_input("Bolt", 1, price("20"), CategoryId::new(1), &known(&[1]))
            .unwrap();
        assert_eq!(draft.price().to_string(), "20.00");
    }

    #[test]
    fn stock_value_multiplies_exactly() {
        let product = validate_product_input("Nail", 3, price("0.10"), CategoryId::new(1), &known(&[1]))
            .unwrap()
            .into_product(ProductId::new(1), Utc::now());

        assert_eq!(product.stock_value(), Some(price("0.30")));
        assert_eq!(product.id(), ProductId::new(1));
    }

    #[test]
    fn max_price_matches_the_column_bound() {
        assert_eq!(MAX_PRICE, price("9999999999.99"));
        assert_eq!(MAX_PRICE.to_string(), "9999999999.99");
    }

    #[test]
    fn largest_accepted_values_pass() {
        let draft = validate_product_input(
            "Crate",
            MAX_QUANTITY,
            MAX_PRICE,
            CategoryId::new(1),
            &known(&[1]),
        )
        .unwrap();
        assert_eq!(draft.quantity(), MAX_QUANTITY);
        assert_eq!(draft.price(), MAX_PRICE);
    }

    #[test]
    fn quantity_above_ceiling_is_rejected() {
        let err = validate_product_input(
            "Crate",
            MAX_QUANTITY + 1,
            price("1.00"),
            CategoryId::new(1),
            &known(&[1]),
        )
        .unwrap_err();
        assert_eq!(err, ValidationError::QuantityTooLarge);

        let err = validate_product_input("Crate", i64::MAX, price("1.00"), CategoryId::new(1), &known(&[1]))
            .unwrap_err();
        assert_eq!(err, ValidationError::QuantityTooLarge);
    }

    #[test]
    fn price_above_column_bound_is_rejected() {
        let err = validate_product_input(
            "Crate",
            1,
            price("10000000000.00"),
            CategoryId::new(1),
            &known(&[1]),
        )
        .unwrap_err();
        assert_eq!(err, ValidationError::PriceTooLarge);

        // Rounds up past the bound.
        let err = validate_product_input(
            "Crate",
            1,
            price("9999999999.995"),
            CategoryId::new(1),
            &known(&[1]),
        )
        .unwrap_err();
        assert_eq!(err, ValidationError::PriceTooLarge);

        let err = validate_product_input("Crate", 1, Decimal::MAX, CategoryId::new(1), &known(&[1]))
            .unwrap_err();
        assert_eq!(err, ValidationError::PriceTooLarge);
    }

    #[test]
    fn stock_value_reports_overflow_instead_of_panicking() {
        let product = Product {
            id: ProductId::new(1),
            name: "Crate".to_string(),
            quantity: i64::MAX,
            price: Decimal::MAX,
            category_id: CategoryId::new(1),
            created_at: Utc::now(),
        };
        assert_eq!(product.stock_value(), None);
    }
}

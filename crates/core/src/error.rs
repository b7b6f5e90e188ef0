//! Domain error model.

use thiserror::Error;

/// Result type used by input validation.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Input rejected before it reaches the store.
///
/// Keep this focused on deterministic, field-level failures. Storage failures belong to the
/// infrastructure layer.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// Name is empty or whitespace-only.
    #[error("name cannot be empty")]
    EmptyName,

    #[error("quantity cannot be negative")]
    NegativeQuantity,

    /// Quantity above the largest stock level a row may hold.
    #[error("quantity is too large")]
    QuantityTooLarge,

    #[error("price cannot be negative")]
    NegativePrice,

    /// Price does not fit the stored `NUMERIC(12, 2)` column.
    #[error("price is too large")]
    PriceTooLarge,

    /// The referenced category does not exist.
    #[error("category does not exist")]
    UnknownCategory,
}

impl ValidationError {
    /// Input field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::EmptyName => "name",
            ValidationError::NegativeQuantity | ValidationError::QuantityTooLarge => "quantity",
            ValidationError::NegativePrice | ValidationError::PriceTooLarge => "price",
            ValidationError::UnknownCategory => "category_id",
        }
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::EmptyName => "empty_name",
            ValidationError::NegativeQuantity => "negative_quantity",
            ValidationError::QuantityTooLarge => "quantity_too_large",
            ValidationError::NegativePrice => "negative_price",
            ValidationError::PriceTooLarge => "price_too_large",
            ValidationError::UnknownCategory => "unknown_category",
        }
    }
}

/// An identifier failed to parse.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid identifier: {kind}: {reason}")]
pub struct InvalidIdError {
    pub kind: &'static str,
    pub reason: String,
}

//! Strongly-typed identifiers used across the domain.
//!
//! Ids are assigned by the store on insert (sequential integers) and never change.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::InvalidIdError;

/// Identifier of a category row.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(i64);

/// Identifier of a product row.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(i64);

macro_rules! impl_row_id {
    ($t:ty, $name:literal) => {
        impl $t {
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            pub const fn get(&self) -> i64 {
                self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<i64> for $t {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl From<$t> for i64 {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl FromStr for $t {
            type Err = InvalidIdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let value = s.trim().parse::<i64>().map_err(|e| InvalidIdError {
                    kind: $name,
                    reason: e.to_string(),
                })?;
                if value <= 0 {
                    return Err(InvalidIdError {
                        kind: $name,
                        reason: "must be positive".to_string(),
                    });
                }
                Ok(Self(value))
            }
        }
    };
}

impl_row_id!(CategoryId, "CategoryId");
impl_row_id!(ProductId, "ProductId");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_positive_integers() {
        assert_eq!("42".parse::<CategoryId>().unwrap(), CategoryId::new(42));
        assert_eq!(" 7 ".parse::<ProductId>().unwrap().get(), 7);
    }

    #[test]
    fn rejects_garbage_and_non_positive_values() {
        let err = "abc".parse::<ProductId>().unwrap_err();
        assert_eq!(err.kind, "ProductId");
        assert!("0".parse::<CategoryId>().is_err());
        assert!("-3".parse::<CategoryId>().is_err());
    }

    #[test]
    fn serializes_as_bare_integer() {
        let json = serde_json::to_string(&CategoryId::new(5)).unwrap();
        assert_eq!(json, "5");
    }
}

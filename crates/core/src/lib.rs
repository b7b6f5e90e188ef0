//! `stockroom-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod entity;
pub mod error;
pub mod id;

pub use entity::Entity;
pub use error::{InvalidIdError, ValidationError, ValidationResult};
pub use id::{CategoryId, ProductId};

//! Data store abstraction over the `categories` and `products` tables.

pub mod in_memory;
pub mod postgres;

use std::sync::Arc;

use thiserror::Error;

use stockroom_core::{CategoryId, ProductId};
use stockroom_inventory::{Category, CategoryDraft, Product, ProductDraft};

pub use in_memory::InMemoryInventoryStore;
pub use postgres::PostgresInventoryStore;

/// Data store operation error.
///
/// These are **infrastructure errors** as opposed to input validation failures, which never
/// reach the store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The store could not be reached (network, pool exhausted/closed, TLS).
    #[error("data store unreachable: {0}")]
    ConnectionFailure(String),

    /// A row still references the target (delete) or the referenced row is gone (insert).
    #[error("foreign key violation: {0}")]
    ForeignKeyViolation(String),

    #[error("data store error: {0}")]
    Unknown(String),
}

/// Select-all / insert / delete-by-id over the two inventory tables.
///
/// Every call is a single atomic row operation. Listings are ordered by id.
#[async_trait::async_trait]
pub trait InventoryStore: Send + Sync {
    /// Cheap connectivity probe used at startup.
    async fn ping(&self) -> Result<(), StoreError>;

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError>;

    async fn list_products(&self) -> Result<Vec<Product>, StoreError>;

    async fn insert_category(&self, draft: CategoryDraft) -> Result<Category, StoreError>;

    /// Fails with [`StoreError::ForeignKeyViolation`] if the draft's category no longer exists.
    async fn insert_product(&self, draft: ProductDraft) -> Result<Product, StoreError>;

    /// Fails with [`StoreError::ForeignKeyViolation`] while any product references the
    /// category. Deleting an id that does not exist succeeds.
    async fn delete_category(&self, id: CategoryId) -> Result<(), StoreError>;

    /// Deleting an id that does not exist succeeds.
    async fn delete_product(&self, id: ProductId) -> Result<(), StoreError>;
}

#[async_trait::async_trait]
impl<S> InventoryStore for Arc<S>
where
    S: InventoryStore + ?Sized,
{
    async fn ping(&self) -> Result<(), StoreError> {
        (**self).ping().await
    }

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        (**self).list_categories().await
    }

    async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        (**self).list_products().await
    }

    async fn insert_category(&self, draft: CategoryDraft) -> Result<Category, StoreError> {
        (**self).insert_category(draft).await
    }

    async fn insert_product(&self, draft: ProductDraft) -> Result<Product, StoreError> {
        (**self).insert_product(draft).await
    }

    async fn delete_category(&self, id: CategoryId) -> Result<(), StoreError> {
        (**self).delete_category(id).await
    }

    async fn delete_product(&self, id: ProductId) -> Result<(), StoreError> {
        (**self).delete_product(id).await
    }
}

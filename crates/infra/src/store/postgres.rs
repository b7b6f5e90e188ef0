//! Postgres-backed inventory store.
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | StoreError |
//! |------------|----------------------|------------|
//! | Database (foreign key violation) | `23503` | `ForeignKeyViolation` |
//! | Database (other) | Any other | `Unknown` |
//! | Io / Tls / PoolTimedOut / PoolClosed | N/A | `ConnectionFailure` |
//! | Other | N/A | `Unknown` |
//!
//! Rows are decoded into typed records here; a row that cannot be decoded is an error,
//! never a defaulted value.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::PgPoolOptions;
use sqlx::{FromRow, PgPool};
use tracing::instrument;

use stockroom_core::{CategoryId, ProductId};
use stockroom_inventory::{Category, CategoryDraft, Product, ProductDraft};

use super::{InventoryStore, StoreError};

/// Schema bootstrap, applied by [`PostgresInventoryStore::ensure_schema`].
const SCHEMA: &str = include_str!("../../migrations/0001_inventory.sql");

const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, FromRow)]
struct CategoryRow {
    id: i64,
    name: String,
    description: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Category {
            id: CategoryId::new(row.id),
            name: row.name,
            description: row.description,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    quantity: i64,
    price: Decimal,
    category_id: i64,
    created_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: ProductId::new(row.id),
            name: row.name,
            quantity: row.quantity,
            price: row.price,
            category_id: CategoryId::new(row.category_id),
            created_at: row.created_at,
        }
    }
}

/// Postgres-backed store.
///
/// ## Thread Safety
///
/// Uses the SQLx connection pool, which is `Send + Sync`; one shared handle serves every
/// request.
///
/// ## Referential integrity
///
/// `products.category_id REFERENCES categories(id)` has no cascade, so the database itself
/// rejects deleting a category that still has products.
#[derive(Debug, Clone)]
pub struct PostgresInventoryStore {
    pool: Arc<PgPool>,
}

impl PostgresInventoryStore {
    /// Create a store over an existing connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Open a pool and verify that the server answers.
    #[instrument(skip(database_url), err)]
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect(database_url)
            .await
            .map_err(|e| match map_sqlx_error("connect", e) {
                // Anything failing during connect means the store is not usable.
                StoreError::Unknown(msg) => StoreError::ConnectionFailure(msg),
                other => other,
            })?;

        Ok(Self::new(pool))
    }

    /// Create the `categories` / `products` tables if they do not exist yet.
    #[instrument(skip(self), err)]
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::raw_sql(SCHEMA)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("ensure_schema", e))?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl InventoryStore for PostgresInventoryStore {
    #[instrument(skip(self), err)]
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("ping", e))?;
        Ok(())
    }

    #[instrument(skip(self), err)]
    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            r#"
            SELECT id, name, description, created_at
            FROM categories
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_categories", e))?;

        Ok(rows.into_iter().map(Category::from).collect())
    }

    #[instrument(skip(self), err)]
    async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, name, quantity, price, category_id, created_at
            FROM products
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_products", e))?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    #[instrument(skip(self, draft), fields(name = %draft.name()), err)]
    async fn insert_category(&self, draft: CategoryDraft) -> Result<Category, StoreError> {
        let row = sqlx::query_as::<_, CategoryRow>(
            r#"
            INSERT INTO categories (name, description)
            VALUES ($1, $2)
            RETURNING id, name, description, created_at
            "#,
        )
        .bind(draft.name())
        .bind(draft.description())
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_category", e))?;

        Ok(row.into())
    }

    #[instrument(
        skip(self, draft),
        fields(name = %draft.name(), category_id = %draft.category_id()),
        err
    )]
    async fn insert_product(&self, draft: ProductDraft) -> Result<Product, StoreError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            INSERT INTO products (name, quantity, price, category_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, quantity, price, category_id, created_at
            "#,
        )
        .bind(draft.name())
        .bind(draft.quantity())
        .bind(draft.price())
        .bind(draft.category_id().get())
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_product", e))?;

        Ok(row.into())
    }

    #[instrument(skip(self), fields(category_id = %id), err)]
    async fn delete_category(&self, id: CategoryId) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id.get())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_category", e))?;
        Ok(())
    }

    #[instrument(skip(self), fields(product_id = %id), err)]
    async fn delete_product(&self, id: ProductId) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id.get())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_product", e))?;
        Ok(())
    }
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());
            match db_err.code().as_deref() {
                Some("23503") => StoreError::ForeignKeyViolation(msg),
                _ => StoreError::Unknown(msg),
            }
        }
        sqlx::Error::Io(e) => {
            StoreError::ConnectionFailure(format!("io error in {}: {}", operation, e))
        }
        sqlx::Error::Tls(e) => {
            StoreError::ConnectionFailure(format!("tls error in {}: {}", operation, e))
        }
        sqlx::Error::PoolTimedOut => {
            StoreError::ConnectionFailure(format!("connection pool timed out in {}", operation))
        }
        sqlx::Error::PoolClosed => {
            StoreError::ConnectionFailure(format!("connection pool closed in {}", operation))
        }
        other => StoreError::Unknown(format!("sqlx error in {}: {}", operation, other)),
    }
}

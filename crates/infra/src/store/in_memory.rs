use std::collections::BTreeMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;

use stockroom_core::{CategoryId, ProductId};
use stockroom_inventory::{Category, CategoryDraft, Product, ProductDraft};

use super::{InventoryStore, StoreError};

#[derive(Debug, Default)]
struct Tables {
    categories: BTreeMap<CategoryId, Category>,
    products: BTreeMap<ProductId, Product>,
    last_category_id: i64,
    last_product_id: i64,
}

/// In-memory store for tests/dev.
///
/// Mirrors the relational schema: ids come from per-table sequences starting at 1 and the
/// `products.category_id` foreign key is enforced on insert and on category delete.
#[derive(Debug)]
pub struct InMemoryInventoryStore {
    inner: RwLock<Tables>,
    reachable: AtomicBool,
}

impl InMemoryInventoryStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Tables::default()),
            reachable: AtomicBool::new(true),
        }
    }

    /// Simulate losing (or regaining) the connection: while unreachable every operation
    /// fails with [`StoreError::ConnectionFailure`] and no table is touched.
    pub fn set_reachable(&self, reachable: bool) {
        self.reachable.store(reachable, Ordering::SeqCst);
    }

    fn ensure_reachable(&self) -> Result<(), StoreError> {
        if self.reachable.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::ConnectionFailure(
                "in-memory store marked unreachable".to_string(),
            ))
        }
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Tables>, StoreError> {
        self.ensure_reachable()?;
        self.inner
            .read()
            .map_err(|_| StoreError::Unknown("store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Tables>, StoreError> {
        self.ensure_reachable()?;
        self.inner
            .write()
            .map_err(|_| StoreError::Unknown("store lock poisoned".to_string()))
    }
}

impl Default for InMemoryInventoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl InventoryStore for InMemoryInventoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        self.read().map(|_| ())
    }

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        Ok(self.read()?.categories.values().cloned().collect())
    }

    async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        Ok(self.read()?.products.values().cloned().collect())
    }

    async fn insert_category(&self, draft: CategoryDraft) -> Result<Category, StoreError> {
        let mut tables = self.write()?;
        tables.last_category_id += 1;
        let id = CategoryId::new(tables.last_category_id);

        let category = draft.into_category(id, Utc::now());
        tables.categories.insert(id, category.clone());
        Ok(category)
    }

    async fn insert_product(&self, draft: ProductDraft) -> Result<Product, StoreError> {
        let mut tables = self.write()?;
        if !tables.categories.contains_key(&draft.category_id()) {
            return Err(StoreError::ForeignKeyViolation(format!(
                "products.category_id={} is not present in categories",
                draft.category_id()
            )));
        }

        tables.last_product_id += 1;
        let id = ProductId::new(tables.last_product_id);

        let product = draft.into_product(id, Utc::now());
        tables.products.insert(id, product.clone());
        Ok(product)
    }

    async fn delete_category(&self, id: CategoryId) -> Result<(), StoreError> {
        let mut tables = self.write()?;
        let referencing = tables
            .products
            .values()
            .filter(|p| p.category_id == id)
            .count();
        if referencing > 0 {
            return Err(StoreError::ForeignKeyViolation(format!(
                "category {id} is still referenced by {referencing} product(s)"
            )));
        }

        tables.categories.remove(&id);
        Ok(())
    }

    async fn delete_product(&self, id: ProductId) -> Result<(), StoreError> {
        self.write()?.products.remove(&id);
        Ok(())
    }
}

//! Screen-level operations: each one reloads what it needs from the store, applies the
//! domain rules and performs at most one mutation.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use rust_decimal::Decimal;
use thiserror::Error;

use stockroom_core::{CategoryId, ProductId, ValidationError};
use stockroom_infra::{
    InMemoryInventoryStore, InventoryStore, PostgresInventoryStore, StoreBackend, StoreConfig,
    StoreError,
};
use stockroom_inventory::{
    compute_overview, validate_category_input, validate_product_input, Category, OverviewMetrics,
    Product,
};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Products cannot be added before any category exists.
    #[error("no categories exist yet; create a category first")]
    NoCategories,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Raw product form input.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub quantity: i64,
    pub price: Decimal,
    pub category_id: CategoryId,
}

/// A product row as shown on the Products screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductView {
    pub product: Product,
    /// `None` only if the category vanished between the two reads.
    pub category_name: Option<String>,
}

/// Shared application services (one store handle for every request).
#[derive(Clone)]
pub struct AppServices {
    store: Arc<dyn InventoryStore>,
    currency: String,
}

impl AppServices {
    pub fn new(store: Arc<dyn InventoryStore>, currency: impl Into<String>) -> Self {
        Self {
            store,
            currency: currency.into(),
        }
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Startup probe; the server must not serve anything if this fails.
    pub async fn ensure_reachable(&self) -> Result<(), StoreError> {
        self.store.ping().await
    }

    pub async fn overview(&self) -> Result<OverviewMetrics, ServiceError> {
        let products = self.store.list_products().await?;
        Ok(compute_overview(&products))
    }

    pub async fn categories(&self) -> Result<Vec<Category>, ServiceError> {
        Ok(self.store.list_categories().await?)
    }

    pub async fn add_category(
        &self,
        name: &str,
        description: &str,
    ) -> Result<Category, ServiceError> {
        let draft = validate_category_input(name, description).inspect_err(|e| {
            tracing::warn!(field = e.field(), "category rejected: {e}");
        })?;

        let category = self.store.insert_category(draft).await?;
        tracing::info!(category_id = %category.id, name = %category.name, "category added");
        Ok(category)
    }

    pub async fn delete_category(&self, id: CategoryId) -> Result<(), ServiceError> {
        match self.store.delete_category(id).await {
            Ok(()) => {
                tracing::info!(category_id = %id, "category deleted");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(category_id = %id, "category delete failed: {e}");
                Err(e.into())
            }
        }
    }

    pub async fn products(&self) -> Result<Vec<ProductView>, ServiceError> {
        let categories = self.store.list_categories().await?;
        let products = self.store.list_products().await?;

        let names: HashMap<CategoryId, String> =
            categories.into_iter().map(|c| (c.id, c.name)).collect();

        Ok(products
            .into_iter()
            .map(|product| ProductView {
                category_name: names.get(&product.category_id).cloned(),
                product,
            })
            .collect())
    }

    pub async fn add_product(&self, input: NewProduct) -> Result<Product, ServiceError> {
        let known: HashSet<CategoryId> = self
            .store
            .list_categories()
            .await?
            .into_iter()
            .map(|c| c.id)
            .collect();
        if known.is_empty() {
            tracing::warn!("product rejected: no categories exist");
            return Err(ServiceError::NoCategories);
        }

        let draft = validate_product_input(
            &input.name,
            input.quantity,
            input.price,
            input.category_id,
            &known,
        )
        .inspect_err(|e| {
            tracing::warn!(field = e.field(), "product rejected: {e}");
        })?;

        let product = self.store.insert_product(draft).await?;
        tracing::info!(
            product_id = %product.id,
            category_id = %product.category_id,
            quantity = product.quantity,
            "product added"
        );
        Ok(product)
    }

    pub async fn delete_product(&self, id: ProductId) -> Result<(), ServiceError> {
        self.store.delete_product(id).await?;
        tracing::info!(product_id = %id, "product deleted");
        Ok(())
    }
}

/// Open the configured store. For Postgres this connects, bootstraps the schema and
/// verifies the connection.
pub async fn connect_store(config: &StoreConfig) -> Result<Arc<dyn InventoryStore>, StoreError> {
    match &config.backend {
        StoreBackend::InMemory => {
            tracing::warn!("using in-memory store; data is lost on exit");
            Ok(Arc::new(InMemoryInventoryStore::new()))
        }
        StoreBackend::Postgres {
            database_url,
            max_connections,
        } => {
            let store = PostgresInventoryStore::connect(database_url, *max_connections).await?;
            store.ensure_schema().await?;
            store.ping().await?;
            Ok(Arc::new(store))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use stockroom_inventory::{CategoryDraft, ProductDraft};

    /// Wraps the in-memory store and counts mutation attempts.
    #[derive(Default)]
    struct CountingStore {
        inner: InMemoryInventoryStore,
        inserts: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl InventoryStore for CountingStore {
        async fn ping(&self) -> Result<(), StoreError> {
            self.inner.ping().await
        }

        async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
            self.inner.list_categories().await
        }

        async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
            self.inner.list_products().await
        }

        async fn insert_category(&self, draft: CategoryDraft) -> Result<Category, StoreError> {
            self.inserts.fetch_add(1, Ordering::SeqCst);
            self.inner.insert_category(draft).await
        }

        async fn insert_product(&self, draft: ProductDraft) -> Result<Product, StoreError> {
            self.inserts.fetch_add(1, Ordering::SeqCst);
            self.inner.insert_product(draft).await
        }

        async fn delete_category(&self, id: CategoryId) -> Result<(), StoreError> {
            self.inner.delete_category(id).await
        }

        async fn delete_product(&self, id: ProductId) -> Result<(), StoreError> {
            self.inner.delete_product(id).await
        }
    }

    fn setup() -> (Arc<CountingStore>, AppServices) {
        let store = Arc::new(CountingStore::default());
        let services = AppServices::new(store.clone(), "zł");
        (store, services)
    }

    fn new_product(name: &str, quantity: i64, price: &str, category_id: CategoryId) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            quantity,
            price: price.parse().unwrap(),
            category_id,
        }
    }

    #[tokio::test]
    async fn invalid_category_never_reaches_the_store() {
        let (store, services) = setup();

        let err = services.add_category("   ", "x").await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(ValidationError::EmptyName)));
        assert_eq!(store.inserts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn product_requires_an_existing_category() {
        let (store, services) = setup();

        let err = services
            .add_product(new_product("Bolt", 1, "1.00", CategoryId::new(1)))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NoCategories));

        services.add_category("Tools", "").await.unwrap();
        let err = services
            .add_product(new_product("Bolt", 1, "1.00", CategoryId::new(42)))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(ValidationError::UnknownCategory)));

        // Only the category insert reached the store.
        assert_eq!(store.inserts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn overview_reflects_reloaded_products() {
        let (_store, services) = setup();
        let tools = services.add_category("Tools", "").await.unwrap();
        services
            .add_product(new_product("Hammer", 3, "20.00", tools.id))
            .await
            .unwrap();
        services
            .add_product(new_product("Nail", 0, "0.05", tools.id))
            .await
            .unwrap();

        let overview = services.overview().await.unwrap();
        assert_eq!(overview.total_value, "60.00".parse::<Decimal>().unwrap());
        assert_eq!(overview.total_units, 3);
        assert_eq!(overview.item_count, 2);
        assert_eq!(overview.low_stock.len(), 2);
    }

    #[tokio::test]
    async fn referenced_category_cannot_be_deleted() {
        let (_store, services) = setup();
        let tools = services.add_category("Tools", "").await.unwrap();
        services
            .add_product(new_product("Hammer", 3, "20.00", tools.id))
            .await
            .unwrap();

        let err = services.delete_category(tools.id).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Store(StoreError::ForeignKeyViolation(_))
        ));
        assert_eq!(services.categories().await.unwrap().len(), 1);
        assert_eq!(services.products().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn product_views_carry_category_names() {
        let (_store, services) = setup();
        let tools = services.add_category("Tools", "").await.unwrap();
        services
            .add_product(new_product("Hammer", 7, "20.00", tools.id))
            .await
            .unwrap();

        let views = services.products().await.unwrap();
        assert_eq!(views[0].category_name.as_deref(), Some("Tools"));
        assert_eq!(views[0].product.name, "Hammer");
    }

    #[tokio::test]
    async fn unreachable_store_fails_startup_probe() {
        let store = Arc::new(InMemoryInventoryStore::new());
        store.set_reachable(false);
        let services = AppServices::new(store, "zł");

        assert!(matches!(
            services.ensure_reachable().await,
            Err(StoreError::ConnectionFailure(_))
        ));
    }

    #[tokio::test]
    async fn memory_backend_connects_without_a_server() {
        let store = connect_store(&StoreConfig::in_memory()).await.unwrap();
        assert!(store.list_products().await.unwrap().is_empty());
    }
}

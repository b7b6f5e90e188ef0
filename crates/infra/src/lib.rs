//! Infrastructure layer: data store adapters and configuration.

pub mod config;
pub mod store;

pub use config::{ConfigError, StoreBackend, StoreConfig};
pub use store::{InMemoryInventoryStore, InventoryStore, PostgresInventoryStore, StoreError};

use async_trait::async_trait;
use thiserror::Error;

use catalog_core::domain::product::{Product, ProductId};

pub mod memory;
pub mod product;

pub use memory::InMemoryCatalogStore;
pub use product::SqlCatalogStore;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("product not found")]
    NotFound,
    #[error("cannot decrement: no inventory left")]
    InsufficientInventory,
    #[error("database error: {0}")]
    Store(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
}

/// Mediates all access to persisted product data. The decrement is the only
/// write and must be atomic: no caller ever observes a partially decremented
/// quantity, and quantity never drops below zero.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Every persisted product, in whatever order the store yields. An empty
    /// catalog is an empty vec, not an error.
    async fn list_products(&self) -> Result<Vec<Product>, CatalogError>;

    /// The product with the given id, or `NotFound`.
    async fn find_by_id(&self, id: ProductId) -> Result<Product, CatalogError>;

    /// Atomically reduce the product's quantity by exactly one. Fails with
    /// `NotFound` for a missing id and `InsufficientInventory` at quantity
    /// zero; in every failure case nothing is written.
    async fn decrement_quantity(&self, id: ProductId) -> Result<(), CatalogError>;
}

use std::collections::BTreeMap;

use tokio::sync::RwLock;

use catalog_core::domain::product::{Product, ProductId};

use super::{CatalogError, CatalogStore};

/// Map-backed catalog double with the same decrement semantics as the SQL
/// store. The write lock spans the whole read-check-update sequence, so
/// concurrent decrements serialize just like the SQL transaction does.
#[derive(Default)]
pub struct InMemoryCatalogStore {
    products: RwLock<BTreeMap<i64, Product>>,
}

impl InMemoryCatalogStore {
    pub async fn insert(&self, product: Product) {
        let mut products = self.products.write().await;
        products.insert(product.id.0, product);
    }
}

#[async_trait::async_trait]
impl CatalogStore for InMemoryCatalogStore {
    async fn list_products(&self) -> Result<Vec<Product>, CatalogError> {
        let products = self.products.read().await;
        Ok(products.values().cloned().collect())
    }

    async fn find_by_id(&self, id: ProductId) -> Result<Product, CatalogError> {
        let products = self.products.read().await;
        products.get(&id.0).cloned().ok_or(CatalogError::NotFound)
    }

    async fn decrement_quantity(&self, id: ProductId) -> Result<(), CatalogError> {
        let mut products = self.products.write().await;
        let product = products.get_mut(&id.0).ok_or(CatalogError::NotFound)?;
        if product.quantity == 0 {
            return Err(CatalogError::InsufficientInventory);
        }
        product.quantity -= 1;
        Ok(())
    }
}

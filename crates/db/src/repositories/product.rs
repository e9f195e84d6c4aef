use std::str::FromStr;

use rust_decimal::Decimal;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use catalog_core::domain::product::{Product, ProductId};

use super::{CatalogError, CatalogStore};
use crate::DbPool;

pub struct SqlCatalogStore {
    pool: DbPool,
}

impl SqlCatalogStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_product(row: &SqliteRow) -> Result<Product, CatalogError> {
    let id: i64 = row.try_get("id")?;
    let description: String = row.try_get("description")?;
    let price_str: String = row.try_get("price")?;
    let quantity: i64 = row.try_get("quantity")?;

    let price = Decimal::from_str(&price_str)
        .map_err(|error| CatalogError::Decode(format!("invalid price `{price_str}`: {error}")))?;

    Ok(Product { id: ProductId(id), description, price, quantity })
}

#[async_trait::async_trait]
impl CatalogStore for SqlCatalogStore {
    async fn list_products(&self) -> Result<Vec<Product>, CatalogError> {
        let rows = sqlx::query("SELECT id, description, price, quantity FROM products")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_product).collect()
    }

    async fn find_by_id(&self, id: ProductId) -> Result<Product, CatalogError> {
        let row = sqlx::query("SELECT id, description, price, quantity FROM products WHERE id = ?")
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(ref r) => row_to_product(r),
            None => Err(CatalogError::NotFound),
        }
    }

    async fn decrement_quantity(&self, id: ProductId) -> Result<(), CatalogError> {
        // Immediate transaction: the write lock is taken at BEGIN, so two
        // concurrent decrements serialize and the loser re-reads the
        // committed quantity instead of failing on a snapshot upgrade.
        let mut tx = self.pool.begin_with("BEGIN IMMEDIATE").await?;

        let quantity: Option<i64> =
            sqlx::query_scalar("SELECT quantity FROM products WHERE id = ?")
                .bind(id.0)
                .fetch_optional(&mut *tx)
                .await?;

        // Early returns drop `tx`, which rolls the transaction back.
        let quantity = quantity.ok_or(CatalogError::NotFound)?;
        if quantity == 0 {
            return Err(CatalogError::InsufficientInventory);
        }

        sqlx::query("UPDATE products SET quantity = quantity - 1 WHERE id = ?")
            .bind(id.0)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}

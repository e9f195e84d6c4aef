use sqlx::migrate::{MigrateError, Migrator};

use crate::DbPool;

pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

pub async fn run_pending(pool: &DbPool) -> Result<(), MigrateError> {
    MIGRATOR.run(pool).await
}

#[cfg(test)]
mod tests {
    use sqlx::Row;

    use super::run_pending;
    use crate::connect_with_settings;

    #[tokio::test]
    async fn migrations_create_products_table() {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        run_pending(&pool).await.expect("run migrations");

        let count = sqlx::query(
            "SELECT COUNT(*) AS count FROM sqlite_master WHERE type = 'table' AND name = 'products'",
        )
        .fetch_one(&pool)
        .await
        .expect("check products table")
        .get::<i64, _>("count");

        assert_eq!(count, 1, "migrations should create the products table");
    }

    #[tokio::test]
    async fn migrations_are_idempotent_on_rerun() {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        run_pending(&pool).await.expect("first run");
        run_pending(&pool).await.expect("second run should be a no-op");
    }

    #[tokio::test]
    async fn products_schema_rejects_negative_quantity() {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        run_pending(&pool).await.expect("run migrations");

        let result = sqlx::query(
            "INSERT INTO products (id, description, price, quantity) VALUES (1, 'x', '1.00', -1)",
        )
        .execute(&pool)
        .await;

        assert!(result.is_err(), "quantity CHECK constraint should reject negative values");
    }
}

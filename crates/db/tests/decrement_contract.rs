//! Transactional contract of the inventory decrement, exercised across real
//! pool connections against an on-disk database.

use std::path::Path;
use std::sync::Arc;

use catalog_core::domain::product::ProductId;
use catalog_db::repositories::{CatalogError, CatalogStore, SqlCatalogStore};
use catalog_db::{connect_with_settings, migrations, DbPool};

async fn file_pool(path: &Path, max_connections: u32) -> DbPool {
    let url = format!("sqlite://{}?mode=rwc", path.display());
    connect_with_settings(&url, max_connections, 30).await.expect("connect")
}

async fn seed_product(pool: &DbPool, id: i64, quantity: i64) {
    sqlx::query("INSERT INTO products (id, description, price, quantity) VALUES (?, ?, ?, ?)")
        .bind(id)
        .bind("a kettle")
        .bind("34.50")
        .bind(quantity)
        .execute(pool)
        .await
        .expect("seed product");
}

#[tokio::test]
async fn concurrent_decrements_of_last_unit_yield_one_success_one_rejection() {
    let dir = tempfile::tempdir().expect("tempdir");
    let pool = file_pool(&dir.path().join("catalog.db"), 4).await;
    migrations::run_pending(&pool).await.expect("migrations");
    seed_product(&pool, 1, 1).await;
    let store = Arc::new(SqlCatalogStore::new(pool.clone()));

    let first = tokio::spawn({
        let store = store.clone();
        async move { store.decrement_quantity(ProductId(1)).await }
    });
    let second = tokio::spawn({
        let store = store.clone();
        async move { store.decrement_quantity(ProductId(1)).await }
    });

    let outcomes = [first.await.expect("join"), second.await.expect("join")];
    let successes = outcomes.iter().filter(|outcome| outcome.is_ok()).count();
    let rejections = outcomes
        .iter()
        .filter(|outcome| matches!(outcome, Err(CatalogError::InsufficientInventory)))
        .count();

    assert_eq!(successes, 1, "exactly one concurrent decrement may win");
    assert_eq!(rejections, 1, "the loser must see the committed zero quantity");

    let product = store.find_by_id(ProductId(1)).await.expect("find product");
    assert_eq!(product.quantity, 0, "stock must never go negative");

    pool.close().await;
}

#[tokio::test]
async fn concurrent_decrements_never_oversell_the_stock() {
    let dir = tempfile::tempdir().expect("tempdir");
    let pool = file_pool(&dir.path().join("catalog.db"), 4).await;
    migrations::run_pending(&pool).await.expect("migrations");
    seed_product(&pool, 1, 3).await;
    let store = Arc::new(SqlCatalogStore::new(pool.clone()));

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let store = store.clone();
            tokio::spawn(async move { store.decrement_quantity(ProductId(1)).await })
        })
        .collect();

    let mut successes = 0;
    let mut rejections = 0;
    for task in tasks {
        match task.await.expect("join") {
            Ok(()) => successes += 1,
            Err(CatalogError::InsufficientInventory) => rejections += 1,
            Err(other) => panic!("unexpected decrement failure: {other}"),
        }
    }

    assert_eq!(successes, 3, "successes must match the seeded stock");
    assert_eq!(rejections, 5);

    let product = store.find_by_id(ProductId(1)).await.expect("find product");
    assert_eq!(product.quantity, 0);

    pool.close().await;
}

#[tokio::test]
async fn retrying_after_a_transient_store_error_decrements_exactly_once() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("catalog.db");

    let failing_pool = file_pool(&path, 1).await;
    migrations::run_pending(&failing_pool).await.expect("migrations");
    seed_product(&failing_pool, 1, 3).await;
    let failing_store = SqlCatalogStore::new(failing_pool.clone());

    // A closed pool makes every operation fail before anything commits.
    failing_pool.close().await;
    let error =
        failing_store.decrement_quantity(ProductId(1)).await.expect_err("pool is closed");
    assert!(matches!(error, CatalogError::Store(_)));

    let pool = file_pool(&path, 1).await;
    let store = SqlCatalogStore::new(pool.clone());

    let before_retry = store.find_by_id(ProductId(1)).await.expect("find product");
    assert_eq!(before_retry.quantity, 3, "a failed decrement must not change stock");

    store.decrement_quantity(ProductId(1)).await.expect("retry succeeds");

    let after_retry = store.find_by_id(ProductId(1)).await.expect("find product");
    assert_eq!(after_retry.quantity, 2, "the retried decrement lands exactly once");

    pool.close().await;
}

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use catalog_core::config::{AppConfig, ConfigError, LoadOptions};
use catalog_db::{connect_with_settings, migrations, CatalogStore, DbPool, SqlCatalogStore};

pub struct Application {
    pub config: AppConfig,
    pub db_pool: DbPool,
    pub store: Arc<dyn CatalogStore>,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("database connection failed: {0}")]
    DatabaseConnect(#[source] sqlx::Error),
    #[error("database migration failed: {0}")]
    Migration(#[source] sqlx::migrate::MigrateError),
}

pub async fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config).await
}

pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(event_name = "system.bootstrap.start", "starting application bootstrap");

    let db_pool = connect_with_settings(
        &config.database.url,
        config.database.max_connections,
        config.database.timeout_secs,
    )
    .await
    .map_err(BootstrapError::DatabaseConnect)?;
    info!(
        event_name = "system.bootstrap.database_connected",
        "database connection established"
    );

    migrations::run_pending(&db_pool).await.map_err(BootstrapError::Migration)?;
    info!(event_name = "system.bootstrap.migrations_applied", "database migrations applied");

    let store: Arc<dyn CatalogStore> = Arc::new(SqlCatalogStore::new(db_pool.clone()));

    Ok(Application { config, db_pool, store })
}

#[cfg(test)]
mod tests {
    use catalog_core::config::{ConfigOverrides, LoadOptions};
    use catalog_db::CatalogStore;

    use crate::bootstrap::bootstrap;

    fn overrides(database_url: &str) -> LoadOptions {
        LoadOptions {
            overrides: ConfigOverrides {
                database_url: Some(database_url.to_string()),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        }
    }

    #[tokio::test]
    async fn bootstrap_fails_fast_with_a_non_sqlite_database_url() {
        let result = bootstrap(overrides("mysql://catalog:3306/products")).await;

        assert!(result.is_err());
        let message = result.err().expect("error").to_string();
        assert!(message.contains("database.url"));
    }

    #[tokio::test]
    async fn bootstrap_migrates_the_schema_and_exposes_a_working_store() {
        let app = bootstrap(overrides("sqlite::memory:?cache=shared"))
            .await
            .expect("bootstrap should succeed against an in-memory database");

        let (table_count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'products'",
        )
        .fetch_one(&app.db_pool)
        .await
        .expect("products table should exist after bootstrap");
        assert_eq!(table_count, 1);

        let products = app.store.list_products().await.expect("store should be usable");
        assert!(products.is_empty(), "fresh schema starts with an empty catalog");

        app.db_pool.close().await;
    }
}

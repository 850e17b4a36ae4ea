use std::sync::Arc;

use axum::Router;
use microhabit_core::config::{AppConfig, ConfigError};
use microhabit_core::habits::{RecommendationEngine, RecommendationService};
use microhabit_db::{connect_with_settings, migrations, DbPool, SqlSuggestionStore};
use thiserror::Error;
use tracing::info;

use crate::{api, health};

pub struct Application {
    pub config: AppConfig,
    /// Present only when suggestion storage is enabled.
    pub db_pool: Option<DbPool>,
    pub service: RecommendationService,
}

impl Application {
    pub fn router(&self) -> Router {
        api::router(self.service.clone()).merge(health::router(self.db_pool.clone()))
    }
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

pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    config.validate()?;
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        storage_enabled = config.storage.enabled,
        "starting application bootstrap"
    );
    let engine = RecommendationEngine::default();

    if !config.storage.enabled {
        info!(
            event_name = "system.bootstrap.storage_disabled",
            correlation_id = "bootstrap",
            "suggestion storage disabled; recommendations will not be persisted"
        );
        let service = RecommendationService::without_storage(engine).with_history(config.history);
        return Ok(Application { config, db_pool: None, service });
    }

    let db_pool = connect_with_settings(
        &config.database.url,
        config.database.max_connections,
        config.database.timeout_secs,
    )
    .await
    .map_err(BootstrapError::DatabaseConnect)?;
    info!(
        event_name = "system.bootstrap.database_connected",
        correlation_id = "bootstrap",
        "database connection established"
    );

    migrations::run_pending(&db_pool).await.map_err(BootstrapError::Migration)?;
    info!(
        event_name = "system.bootstrap.migrations_applied",
        correlation_id = "bootstrap",
        "database migrations applied"
    );

    let store = Arc::new(SqlSuggestionStore::new(db_pool.clone()));
    let service = RecommendationService::new(engine, store).with_history(config.history);

    Ok(Application { config, db_pool: Some(db_pool), service })
}

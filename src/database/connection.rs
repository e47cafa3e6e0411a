//! Database connection management

use sqlx::{Pool, Postgres};
use std::sync::Arc;
use std::time::Duration;

use crate::config::{Settings, StorageBackend};
use crate::database::memory::MemoryParticipationStore;
use crate::database::postgres::PgParticipationStore;
use crate::database::store::ParticipationStore;
use crate::utils::errors::Result;

pub type DatabasePool = Pool<Postgres>;

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Option<Duration>,
    pub max_lifetime: Option<Duration>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgresql://localhost/community_events".to_string(),
            max_connections: 10,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(30),
            idle_timeout: Some(Duration::from_secs(600)),
            max_lifetime: Some(Duration::from_secs(1800)),
        }
    }
}

impl From<&crate::config::DatabaseConfig> for DatabaseConfig {
    fn from(settings: &crate::config::DatabaseConfig) -> Self {
        Self {
            url: settings.url.clone(),
            max_connections: settings.max_connections,
            min_connections: settings.min_connections,
            acquire_timeout: Duration::from_secs(settings.acquire_timeout_seconds),
            ..Self::default()
        }
    }
}

/// Create a new database connection pool
pub async fn create_pool(config: &DatabaseConfig) -> Result<DatabasePool> {
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.acquire_timeout)
        .idle_timeout(config.idle_timeout)
        .max_lifetime(config.max_lifetime)
        .connect(&config.url)
        .await?;

    // Test the connection
    sqlx::query("SELECT 1")
        .execute(&pool)
        .await?;

    tracing::info!("Database connection pool created successfully");
    Ok(pool)
}

/// Run database migrations
pub async fn run_migrations(pool: &DatabasePool) -> Result<()> {
    tracing::info!("Running database migrations...");

    sqlx::migrate!("./migrations")
        .run(pool)
        .await?;

    tracing::info!("Database migrations completed successfully");
    Ok(())
}

/// Check database health
pub async fn health_check(pool: &DatabasePool) -> Result<()> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await?;

    Ok(())
}

/// Open the participation store selected by `engine.storage`
pub async fn open_store(settings: &Settings) -> Result<Arc<dyn ParticipationStore>> {
    match settings.engine.storage {
        StorageBackend::Postgres => {
            let pool = create_pool(&DatabaseConfig::from(&settings.database)).await?;
            if settings.database.run_migrations {
                run_migrations(&pool).await?;
            }
            Ok(Arc::new(PgParticipationStore::new(pool)))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory participation store; data will not survive a restart");
            Ok(Arc::new(MemoryParticipationStore::new()))
        }
    }
}

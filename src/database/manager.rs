use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::info;

/// Errors from DatabaseManager
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    UniqueViolation(String),

    #[error(transparent)]
    Query(#[from] crate::query::QueryError),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Centralized connection pool manager.
///
/// Every request shares one lazily created pool; no other cross-request
/// mutable state exists in the process.
pub struct DatabaseManager;

static POOL: OnceCell<PgPool> = OnceCell::const_new();

impl DatabaseManager {
    /// Get the shared pool, creating it on first use
    pub async fn pool() -> Result<PgPool, DatabaseError> {
        let pool = POOL
            .get_or_try_init(|| async {
                let url = std::env::var("DATABASE_URL")
                    .map_err(|_| DatabaseError::ConfigMissing("DATABASE_URL"))?;
                url::Url::parse(&url).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;

                let db_config = &crate::config::config().database;
                let pool = PgPoolOptions::new()
                    .max_connections(db_config.max_connections)
                    .acquire_timeout(Duration::from_secs(db_config.connect_timeout_secs))
                    .connect(&url)
                    .await?;

                info!("Created database pool");
                Ok::<_, DatabaseError>(pool)
            })
            .await?;
        Ok(pool.clone())
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check() -> Result<(), DatabaseError> {
        let pool = Self::pool().await?;
        sqlx::query("SELECT 1").execute(&pool).await?;
        Ok(())
    }

    /// Apply the idempotent schema bootstrap
    pub async fn migrate() -> Result<(), DatabaseError> {
        let pool = Self::pool().await?;
        for statement in crate::database::schema::BOOTSTRAP {
            sqlx::query(statement).execute(&pool).await?;
        }
        info!("Schema bootstrap applied");
        Ok(())
    }
}

/// Map a sqlx error to `UniqueViolation` when a unique index rejected the
/// write, so callers can answer 409 instead of 500.
pub fn on_unique_violation(err: sqlx::Error, message: &str) -> DatabaseError {
    if let sqlx::Error::Database(ref db_err) = err {
        if db_err.code().as_deref() == Some("23505") {
            return DatabaseError::UniqueViolation(message.to_string());
        }
    }
    DatabaseError::Sqlx(err)
}

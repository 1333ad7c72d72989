//! Store adapter: the narrow persistence surface the handlers depend on.

mod memory;
mod postgres;

pub use memory::MemoryCollection;
pub use postgres::{PgCollection, PgResource, PgStore};

use crate::config::{Config, StoreBackend};
use crate::model::{Institution, Plant, RecordId, Resource};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tokio_postgres::error::SqlState;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Unique constraint violated: {constraint}")]
    UniqueViolation { constraint: String },

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("{0}")]
    Backend(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// CRUD primitives over one collection. Each call is a single store
/// operation; nothing spans calls.
#[async_trait]
pub trait Collection<R: Resource>: Send + Sync {
    async fn create(&self, draft: R::Draft) -> StoreResult<R>;

    /// All records, ordered by id.
    async fn find_many(&self) -> StoreResult<Vec<R>>;

    async fn find_unique(&self, id: RecordId) -> StoreResult<Option<R>>;

    /// Removes the record and returns it, or `None` if nothing matched.
    async fn delete(&self, id: RecordId) -> StoreResult<Option<R>>;
}

/// Reachability check used by the health endpoint.
#[async_trait]
pub trait Probe: Send + Sync {
    async fn ping(&self) -> StoreResult<()>;
}

/// The collections the API serves, behind trait objects so the backend is
/// chosen at startup.
#[derive(Clone)]
pub struct Stores {
    pub plants: Arc<dyn Collection<Plant>>,
    pub institutions: Arc<dyn Collection<Institution>>,
    pub probe: Arc<dyn Probe>,
}

impl Stores {
    pub async fn from_config(config: &Config) -> StoreResult<Self> {
        match config.store_backend {
            StoreBackend::Postgres => Self::postgres(config).await,
            StoreBackend::Memory => Ok(Self::in_memory()),
        }
    }

    pub async fn postgres(config: &Config) -> StoreResult<Self> {
        let store = PgStore::connect(&config.database_url, config.max_connections).await?;

        Ok(Self {
            plants: Arc::new(store.collection::<Plant>()),
            institutions: Arc::new(store.collection::<Institution>()),
            probe: Arc::new(store),
        })
    }

    pub fn in_memory() -> Self {
        Self::with_memory(
            Arc::new(MemoryCollection::new()),
            Arc::new(MemoryCollection::new()),
        )
    }

    pub fn with_memory(
        plants: Arc<MemoryCollection<Plant>>,
        institutions: Arc<MemoryCollection<Institution>>,
    ) -> Self {
        Self {
            probe: plants.clone(),
            plants,
            institutions,
        }
    }
}

impl From<tokio_postgres::Error> for StoreError {
    fn from(err: tokio_postgres::Error) -> Self {
        match err.as_db_error() {
            Some(db) if *db.code() == SqlState::UNIQUE_VIOLATION => StoreError::UniqueViolation {
                constraint: db.constraint().unwrap_or("unknown").to_string(),
            },
            Some(db) => StoreError::Backend(db.message().to_string()),
            None => StoreError::Backend(err.to_string()),
        }
    }
}

impl From<deadpool_postgres::PoolError> for StoreError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        StoreError::Unavailable(format!("Pool error: {}", err))
    }
}

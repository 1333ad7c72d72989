use super::{Collection, Probe, StoreError, StoreResult};
use crate::model::{Institution, Plant, RecordId, Resource};
use async_trait::async_trait;
use deadpool_postgres::{Config as PoolConfig, Pool, Runtime};
use std::marker::PhantomData;
use std::time::Duration;
use tokio_postgres::types::ToSql;
use tokio_postgres::{NoTls, Row};
use tracing::{debug, info};

/// Table mapping for a resource stored in PostgreSQL.
pub trait PgResource: Resource {
    const TABLE: &'static str;
    /// Columns selected and returned, in order.
    const COLUMNS: &'static [&'static str];
    /// Columns written on insert; `params` binds them in the same order.
    const INSERT_COLUMNS: &'static [&'static str];

    fn from_row(row: &Row) -> Result<Self, tokio_postgres::Error>;

    fn params(draft: &Self::Draft) -> Vec<&(dyn ToSql + Sync)>;
}

impl PgResource for Plant {
    const TABLE: &'static str = "plant";
    const COLUMNS: &'static [&'static str] = &["id", "name", "institution_id"];
    const INSERT_COLUMNS: &'static [&'static str] = &["name", "institution_id"];

    fn from_row(row: &Row) -> Result<Self, tokio_postgres::Error> {
        Ok(Plant {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            institution_id: row.try_get("institution_id")?,
        })
    }

    fn params(draft: &Self::Draft) -> Vec<&(dyn ToSql + Sync)> {
        vec![&draft.name, &draft.institution_id]
    }
}

impl PgResource for Institution {
    const TABLE: &'static str = "institution";
    const COLUMNS: &'static [&'static str] = &["id", "name"];
    const INSERT_COLUMNS: &'static [&'static str] = &["name"];

    fn from_row(row: &Row) -> Result<Self, tokio_postgres::Error> {
        Ok(Institution {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
        })
    }

    fn params(draft: &Self::Draft) -> Vec<&(dyn ToSql + Sync)> {
        vec![&draft.name]
    }
}

/// Connection pool shared by every PostgreSQL-backed collection.
#[derive(Clone)]
pub struct PgStore {
    pool: Pool,
}

impl PgStore {
    pub async fn connect(database_url: &str, max_size: u32) -> StoreResult<Self> {
        let pool = create_pool(database_url, max_size)?;
        let store = Self { pool };

        store.ping().await?;
        info!("Connected to PostgreSQL");

        Ok(store)
    }

    pub fn collection<R: PgResource>(&self) -> PgCollection<R> {
        PgCollection {
            pool: self.pool.clone(),
            _resource: PhantomData,
        }
    }
}

#[async_trait]
impl Probe for PgStore {
    async fn ping(&self) -> StoreResult<()> {
        let client = self.pool.get().await?;
        client.execute("SELECT 1", &[]).await?;
        Ok(())
    }
}

pub struct PgCollection<R> {
    pool: Pool,
    _resource: PhantomData<fn() -> R>,
}

#[async_trait]
impl<R: PgResource> Collection<R> for PgCollection<R> {
    async fn create(&self, draft: R::Draft) -> StoreResult<R> {
        let client = self.pool.get().await?;
        let sql = insert_sql(R::TABLE, R::INSERT_COLUMNS, R::COLUMNS);
        let params = R::params(&draft);

        let row = client.query_one(&sql, &params).await?;
        let record = R::from_row(&row)?;
        debug!("Inserted {} {}", R::SINGULAR, record.id());

        Ok(record)
    }

    async fn find_many(&self) -> StoreResult<Vec<R>> {
        let client = self.pool.get().await?;
        let sql = format!(
            "SELECT {} FROM {} ORDER BY id",
            R::COLUMNS.join(", "),
            R::TABLE
        );

        let rows = client.query(&sql, &[]).await?;
        rows.iter()
            .map(|row| R::from_row(row).map_err(StoreError::from))
            .collect()
    }

    async fn find_unique(&self, id: RecordId) -> StoreResult<Option<R>> {
        let client = self.pool.get().await?;
        let sql = format!(
            "SELECT {} FROM {} WHERE id = $1",
            R::COLUMNS.join(", "),
            R::TABLE
        );

        let row = client.query_opt(&sql, &[&id]).await?;
        Ok(row.as_ref().map(R::from_row).transpose()?)
    }

    async fn delete(&self, id: RecordId) -> StoreResult<Option<R>> {
        let client = self.pool.get().await?;
        let sql = format!(
            "DELETE FROM {} WHERE id = $1 RETURNING {}",
            R::TABLE,
            R::COLUMNS.join(", ")
        );

        let row = client.query_opt(&sql, &[&id]).await?;
        Ok(row.as_ref().map(R::from_row).transpose()?)
    }
}

fn insert_sql(table: &str, insert_columns: &[&str], returning: &[&str]) -> String {
    let placeholders: Vec<String> = (1..=insert_columns.len())
        .map(|i| format!("${}", i))
        .collect();

    format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
        table,
        insert_columns.join(", "),
        placeholders.join(", "),
        returning.join(", ")
    )
}

fn create_pool(database_url: &str, max_size: u32) -> StoreResult<Pool> {
    let mut cfg = PoolConfig::new();
    cfg.url = Some(database_url.to_string());

    cfg.pool = Some(deadpool_postgres::PoolConfig {
        max_size: max_size as usize,
        timeouts: deadpool_postgres::Timeouts {
            wait: Some(Duration::from_secs(5)),
            create: Some(Duration::from_secs(5)),
            recycle: Some(Duration::from_secs(5)),
        },
        ..Default::default()
    });

    cfg.create_pool(Some(Runtime::Tokio1), NoTls)
        .map_err(|e| StoreError::Unavailable(format!("Failed to create pool: {}", e)))
}

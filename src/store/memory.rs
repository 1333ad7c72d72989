use super::{Collection, Probe, StoreError, StoreResult};
use crate::model::{RecordId, Resource};
use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use tracing::debug;

struct Table<R> {
    next_id: RecordId,
    rows: BTreeMap<RecordId, R>,
}

/// In-process collection. Ids are handed out sequentially and never reused;
/// the unique field is checked under the same write lock as the insert.
pub struct MemoryCollection<R> {
    table: RwLock<Table<R>>,
}

impl<R: Resource> MemoryCollection<R> {
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    /// Seeds existing records, keeping their ids.
    pub fn with_records(records: Vec<R>) -> Self {
        let next_id = records.iter().map(|r| r.id()).max().unwrap_or(0) + 1;
        let rows = records.into_iter().map(|r| (r.id(), r)).collect();

        Self {
            table: RwLock::new(Table { next_id, rows }),
        }
    }

    pub async fn len(&self) -> usize {
        self.table.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl<R: Resource> Default for MemoryCollection<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<R: Resource> Collection<R> for MemoryCollection<R> {
    async fn create(&self, draft: R::Draft) -> StoreResult<R> {
        let mut table = self.table.write().await;

        let wanted = R::draft_unique_value(&draft);
        if table.rows.values().any(|r| r.unique_value() == wanted) {
            return Err(StoreError::UniqueViolation {
                constraint: format!("{}_{}_key", R::SINGULAR, R::UNIQUE_FIELD),
            });
        }

        let id = table.next_id;
        table.next_id += 1;

        let record = R::from_draft(id, draft);
        table.rows.insert(id, record.clone());
        debug!("Inserted {} {} into memory store", R::SINGULAR, id);

        Ok(record)
    }

    async fn find_many(&self) -> StoreResult<Vec<R>> {
        Ok(self.table.read().await.rows.values().cloned().collect())
    }

    async fn find_unique(&self, id: RecordId) -> StoreResult<Option<R>> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn delete(&self, id: RecordId) -> StoreResult<Option<R>> {
        Ok(self.table.write().await.rows.remove(&id))
    }
}

#[async_trait]
impl<R: Resource> Probe for MemoryCollection<R> {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

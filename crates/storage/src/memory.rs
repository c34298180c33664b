//! In-Memory Store Implementation

use crate::{Measurement, MeasurementId, MeasurementStore, StorageError, StoreQuery, MEASUREMENT_GROUP};
use async_trait::async_trait;
use std::sync::Mutex;
use tracing::{debug, info};

/// Stored row: record plus its group tag and insertion sequence
#[derive(Debug, Clone)]
struct Row {
    id: i64,
    group: &'static str,
    record: Measurement,
}

#[derive(Debug, Default)]
struct Inner {
    rows: Vec<Row>,
    next_id: i64,
}

/// Mutex-guarded in-process store.
///
/// Not durable across restarts. Used by tests and by `database_url = "memory"`.
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        info!("Creating in-memory measurement store");
        Self {
            inner: Mutex::new(Inner {
                rows: Vec::with_capacity(1024),
                next_id: 1,
            }),
        }
    }

    /// Number of stored records
    pub fn len(&self) -> Result<usize, StorageError> {
        Ok(self.lock()?.rows.len())
    }

    pub fn is_empty(&self) -> Result<bool, StorageError> {
        Ok(self.len()? == 0)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Inner>, StorageError> {
        self.inner
            .lock()
            .map_err(|e| StorageError::Unavailable(format!("Lock error: {}", e)))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MeasurementStore for MemoryStore {
    async fn append(&self, record: Measurement) -> Result<MeasurementId, StorageError> {
        let mut inner = self.lock()?;

        let id = inner.next_id;
        inner.next_id += 1;
        inner.rows.push(Row {
            id,
            group: MEASUREMENT_GROUP,
            record,
        });

        debug!("Appended measurement {} (date={})", id, record.date);
        Ok(MeasurementId(id))
    }

    async fn query(&self, query: &StoreQuery) -> Result<Vec<Measurement>, StorageError> {
        let inner = self.lock()?;

        let mut matched: Vec<&Row> = inner
            .rows
            .iter()
            .filter(|r| r.group == query.group)
            .filter(|r| query.since.map_or(true, |since| r.record.date >= since))
            .collect();

        matched.sort_unstable_by(|a, b| b.record.date.cmp(&a.record.date).then(b.id.cmp(&a.id)));

        Ok(matched
            .into_iter()
            .take(query.limit)
            .map(|r| r.record)
            .collect())
    }
}

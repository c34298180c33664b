//! Storage Layer
//!
//! Append-only persistence of measurements inside a single consistency
//! group, plus the standing query shapes served to callers.
//!
//! Every record is written to [`MEASUREMENT_GROUP`]. Reads scoped to that
//! group observe all previously acknowledged writes. The price is a write
//! ceiling of roughly [`MAX_SUSTAINED_WRITES_PER_SECOND`] for the whole
//! system; callers must surface [`StorageError::Contention`] instead of
//! retrying in a tight loop.

mod memory;
mod model;
mod query;
mod sqlite;

pub use memory::MemoryStore;
pub use model::{Measurement, MeasurementId};
pub use query::{QueryEngine, ROLLING_WINDOW_MS, WINDOW_LIMIT};
pub use sqlite::{SqliteStore, SqliteStoreConfig};

use async_trait::async_trait;
use thiserror::Error;

/// Name of the one consistency group every measurement belongs to
pub const MEASUREMENT_GROUP: &str = "default_measurement";

/// Sustainable writes per second into [`MEASUREMENT_GROUP`]
pub const MAX_SUSTAINED_WRITES_PER_SECOND: u32 = 1;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),
    #[error("Consistency group is contended, retry later: {0}")]
    Contention(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Storage backend unavailable: {0}")]
    Unavailable(String),
}

/// Parameters of a group-scoped read.
///
/// Results are always ordered by `date` descending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreQuery {
    /// Consistency group to read from
    pub group: String,
    /// Maximum number of records returned
    pub limit: usize,
    /// Inclusive lower bound on `date` (ms since epoch)
    pub since: Option<i64>,
}

impl StoreQuery {
    /// Query over [`MEASUREMENT_GROUP`] with the given limit
    pub fn new(limit: usize) -> Self {
        Self {
            group: MEASUREMENT_GROUP.to_string(),
            limit,
            since: None,
        }
    }

    /// Exclude records older than `since_ms`
    pub fn since(mut self, since_ms: i64) -> Self {
        self.since = Some(since_ms);
        self
    }
}

/// Durable, ordered measurement persistence.
///
/// Implementations must make an acknowledged `append` visible to every
/// subsequent `query` on the same group, and must order query results by
/// `date` descending with ties broken newest-insert first.
///
/// Concurrent appends are serialized by the backend. Sustained write rates
/// above [`MAX_SUSTAINED_WRITES_PER_SECOND`] may be rejected with
/// [`StorageError::Contention`].
#[async_trait]
pub trait MeasurementStore: Send + Sync {
    /// Persist one record in [`MEASUREMENT_GROUP`] and return its new id
    async fn append(&self, record: Measurement) -> Result<MeasurementId, StorageError>;

    /// Read records matching `query`, newest first
    async fn query(&self, query: &StoreQuery) -> Result<Vec<Measurement>, StorageError>;

    /// Cheap liveness probe of the backend
    async fn health_check(&self) -> Result<(), StorageError> {
        Ok(())
    }
}

//! Standing Query Shapes

use crate::{Measurement, MeasurementStore, StorageError, StoreQuery};
use chrono::Utc;
use std::sync::Arc;
use tracing::debug;

/// Cap on every windowed read
pub const WINDOW_LIMIT: usize = 500;

/// Width of the rolling window (7 days in ms)
pub const ROLLING_WINDOW_MS: i64 = 7 * 24 * 60 * 60 * 1000;

/// Builds the bounded, newest-first views served to callers.
///
/// Failures are returned unchanged from the store; there is no retry and
/// no cached fallback.
#[derive(Clone)]
pub struct QueryEngine {
    store: Arc<dyn MeasurementStore>,
}

impl QueryEngine {
    pub fn new(store: Arc<dyn MeasurementStore>) -> Self {
        Self { store }
    }

    /// The most recent [`WINDOW_LIMIT`] records, no time bound
    pub async fn recent(&self) -> Result<Vec<Measurement>, StorageError> {
        self.run("recent", StoreQuery::new(WINDOW_LIMIT)).await
    }

    /// Records with `date >= now_ms - 7 days`, capped at [`WINDOW_LIMIT`]
    pub async fn rolling_window(&self, now_ms: i64) -> Result<Vec<Measurement>, StorageError> {
        let since = now_ms.saturating_sub(ROLLING_WINDOW_MS);
        self.run("rolling", StoreQuery::new(WINDOW_LIMIT).since(since))
            .await
    }

    /// [`Self::rolling_window`] anchored at the current wall clock
    pub async fn rolling_window_now(&self) -> Result<Vec<Measurement>, StorageError> {
        self.rolling_window(Utc::now().timestamp_millis()).await
    }

    /// The single newest record, or nothing when the store is empty
    pub async fn latest(&self) -> Result<Vec<Measurement>, StorageError> {
        self.run("latest", StoreQuery::new(1)).await
    }

    async fn run(&self, shape: &'static str, query: StoreQuery) -> Result<Vec<Measurement>, StorageError> {
        let rows = self.store.query(&query).await?;
        debug!("Query {} returned {} records (since={:?})", shape, rows.len(), query.since);
        Ok(rows)
    }
}

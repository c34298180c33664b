//! Ingestor Implementation

use crate::IngestError;
use data_validator::{decode_measurement, PlausibilityPolicy};
use std::sync::Arc;
use storage::{MeasurementId, MeasurementStore};
use tracing::{debug, warn};

/// Validated append path into the measurement store
#[derive(Clone)]
pub struct Ingestor {
    store: Arc<dyn MeasurementStore>,
    policy: PlausibilityPolicy,
}

impl Ingestor {
    /// Ingestor that accepts any decodable record
    pub fn new(store: Arc<dyn MeasurementStore>) -> Self {
        Self::with_policy(store, PlausibilityPolicy::accept_all())
    }

    pub fn with_policy(store: Arc<dyn MeasurementStore>, policy: PlausibilityPolicy) -> Self {
        Self { store, policy }
    }

    /// Decode `payload` and append it.
    ///
    /// Decoding and plausibility failures never reach the store. Storage
    /// failures are returned as-is; nothing is retried.
    pub async fn ingest(&self, payload: &[u8]) -> Result<MeasurementId, IngestError> {
        let outcome = self.try_ingest(payload).await;

        match &outcome {
            Ok(id) => {
                metrics::counter!("measurements_ingested_total").increment(1);
                debug!("Ingested measurement {}", id);
            }
            Err(e) => {
                metrics::counter!("measurements_rejected_total", "reason" => e.reason()).increment(1);
                warn!("Measurement rejected ({}): {}", e.reason(), e);
            }
        }

        outcome
    }

    async fn try_ingest(&self, payload: &[u8]) -> Result<MeasurementId, IngestError> {
        let record = decode_measurement(payload)?;

        if self.policy.rejects_on_ingest() {
            self.policy.check(&record)?;
        }

        Ok(self.store.append(record).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use data_validator::{PlausibilityConfig, ValidationError};
    use storage::{Measurement, MemoryStore, QueryEngine, StorageError, StoreQuery};

    struct UnavailableStore;

    #[async_trait]
    impl MeasurementStore for UnavailableStore {
        async fn append(&self, _record: Measurement) -> Result<MeasurementId, StorageError> {
            Err(StorageError::Unavailable("backend down".to_string()))
        }

        async fn query(&self, _query: &StoreQuery) -> Result<Vec<Measurement>, StorageError> {
            Err(StorageError::Unavailable("backend down".to_string()))
        }
    }

    fn setup() -> (Arc<MemoryStore>, Ingestor) {
        let store = Arc::new(MemoryStore::new());
        let ingestor = Ingestor::new(store.clone());
        (store, ingestor)
    }

    #[tokio::test]
    async fn test_ingest_example_pair() {
        let (store, ingestor) = setup();

        ingestor
            .ingest(br#"{"Temperature":21.5,"Humidity":40.2,"Date":1700000000000}"#)
            .await
            .unwrap();
        ingestor
            .ingest(br#"{"Temperature":22.0,"Humidity":41.0,"Date":1700000600000}"#)
            .await
            .unwrap();

        let engine = QueryEngine::new(store);
        assert_eq!(
            engine.recent().await.unwrap(),
            vec![
                Measurement::new(22.0, 41.0, 1_700_000_600_000),
                Measurement::new(21.5, 40.2, 1_700_000_000_000),
            ]
        );
    }

    #[tokio::test]
    async fn test_bad_payload_leaves_store_unchanged() {
        let (store, ingestor) = setup();
        ingestor
            .ingest(br#"{"Temperature":1.0,"Humidity":2.0,"Date":3}"#)
            .await
            .unwrap();
        let before = store.query(&StoreQuery::new(500)).await.unwrap();

        let missing_date = ingestor.ingest(br#"{"Temperature":1.0,"Humidity":2.0}"#).await;
        assert!(matches!(missing_date, Err(IngestError::Validation(_))));

        let bad_temp = ingestor
            .ingest(br#"{"Temperature":"hot","Humidity":2.0,"Date":4}"#)
            .await;
        assert!(matches!(bad_temp, Err(IngestError::Validation(_))));

        let after = store.query(&StoreQuery::new(500)).await.unwrap();
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn test_f32_overflow_rejected_before_store() {
        let (store, ingestor) = setup();
        ingestor
            .ingest(br#"{"Temperature":1.0,"Humidity":2.0,"Date":3}"#)
            .await
            .unwrap();
        let before = store.query(&StoreQuery::new(500)).await.unwrap();

        let err = ingestor
            .ingest(br#"{"Temperature":1e39,"Humidity":40.0,"Date":1}"#)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            IngestError::Validation(ValidationError::InvalidFormat(_))
        ));

        let after = store.query(&StoreQuery::new(500)).await.unwrap();
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn test_out_of_range_values_accepted_by_default() {
        let (store, ingestor) = setup();
        ingestor
            .ingest(br#"{"Temperature":-400.0,"Humidity":180.0,"Date":1}"#)
            .await
            .unwrap();
        assert_eq!(store.len().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_policy_can_reject_on_ingest() {
        let store = Arc::new(MemoryStore::new());
        let policy = PlausibilityPolicy::new(PlausibilityConfig {
            enabled: true,
            reject_on_ingest: true,
            ..Default::default()
        });
        let ingestor = Ingestor::with_policy(store.clone(), policy);

        let err = ingestor
            .ingest(br#"{"Temperature":20.0,"Humidity":180.0,"Date":1}"#)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            IngestError::Validation(ValidationError::Implausible { field: "humidity", .. })
        ));
        assert_eq!(err.reason(), "implausible");
        assert!(store.is_empty().unwrap());
    }

    #[tokio::test]
    async fn test_storage_failure_propagates() {
        let ingestor = Ingestor::new(Arc::new(UnavailableStore));
        let err = ingestor
            .ingest(br#"{"Temperature":1.0,"Humidity":2.0,"Date":3}"#)
            .await
            .unwrap_err();
        assert!(matches!(err, IngestError::Storage(StorageError::Unavailable(_))));
        assert_eq!(err.to_string(), "Storage backend unavailable: backend down");
    }
}

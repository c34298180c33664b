//! Measurement Ingestion
//!
//! Decodes a raw sensor payload and appends it to the store. Either exactly
//! one record is persisted or nothing is.

mod ingestor;

pub use ingestor::Ingestor;

use data_validator::ValidationError;
use storage::StorageError;
use thiserror::Error;

/// Ingestion errors
#[derive(Debug, Error)]
pub enum IngestError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl IngestError {
    /// Short label used in logs and metrics
    pub fn reason(&self) -> &'static str {
        match self {
            IngestError::Validation(ValidationError::Implausible { .. }) => "implausible",
            IngestError::Validation(_) => "invalid",
            IngestError::Storage(StorageError::Contention(_)) => "contention",
            IngestError::Storage(_) => "storage",
        }
    }
}

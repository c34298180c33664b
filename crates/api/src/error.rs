//! API Error Mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use ingestion::IngestError;
use storage::StorageError;
use thiserror::Error;
use tracing::error;

/// Errors surfaced by request handlers.
///
/// Every variant maps to a 500 whose body is the raw error text.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Ingest(#[from] IngestError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("Render error: {0}")]
    Render(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!("Request failed: {}", self);
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}

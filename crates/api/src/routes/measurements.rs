//! Measurement Routes

use axum::{
    body::Bytes,
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use storage::Measurement;
use tracing::info;

use crate::{ApiError, SharedState};

/// Measurements from the last 7 days, newest first
pub async fn get_window(
    State(state): State<SharedState>,
) -> Result<Json<Vec<Measurement>>, ApiError> {
    metrics::counter!("measurement_queries_total", "shape" => "rolling").increment(1);
    Ok(Json(state.queries.rolling_window_now().await?))
}

/// The newest measurement as a 0 or 1 element array
pub async fn get_latest(
    State(state): State<SharedState>,
) -> Result<Json<Vec<Measurement>>, ApiError> {
    metrics::counter!("measurement_queries_total", "shape" => "latest").increment(1);
    Ok(Json(state.queries.latest().await?))
}

/// Ingest one JSON measurement and redirect back to the chart
pub async fn add(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let id = state.ingestor.ingest(&body).await?;
    info!("Stored measurement {}", id);

    Ok((StatusCode::FOUND, [(header::LOCATION, "/")]))
}

//! Chart Page Route

use axum::{extract::State, response::Html};

use crate::{ApiError, SharedState};

/// Render the most recent window as a chart page
pub async fn index(State(state): State<SharedState>) -> Result<Html<String>, ApiError> {
    metrics::counter!("measurement_queries_total", "shape" => "recent").increment(1);

    let records = state.queries.recent().await?;
    let chart = state.chart.transform(&records);

    Ok(Html(state.page.render(&chart)?))
}

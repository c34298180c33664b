//! Measurement Station API Server
//!
//! HTTP surface over the measurement store: the chart page, JSON reads,
//! the ingestion endpoint, health and metrics.

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chart_data::ChartTransform;
use data_validator::PlausibilityPolicy;
use ingestion::Ingestor;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use serde::Serialize;
use std::str::FromStr;
use std::sync::Arc;
use storage::{MeasurementStore, MemoryStore, QueryEngine, SqliteStore, StorageError};
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

mod config;
mod error;
mod page;
mod rate_limit;
mod routes;

pub use self::config::{ServerConfig, DEFAULT_CONFIG_PATH, MEMORY_DATABASE};
pub use error::ApiError;
pub use page::ChartPage;
pub use rate_limit::{create_governor_config, RateLimitConfig};

/// Application state shared across handlers.
///
/// Built once at startup and never mutated afterwards.
pub struct AppState {
    /// Backing store
    pub store: Arc<dyn MeasurementStore>,
    /// Standing read shapes over the store
    pub queries: QueryEngine,
    /// Validated write path
    pub ingestor: Ingestor,
    /// Measurement to series shaping
    pub chart: ChartTransform,
    /// Chart page template
    pub page: ChartPage,
    /// Prometheus exporter, when installed
    pub metrics: Option<PrometheusHandle>,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: std::time::Instant,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    /// Create new application state
    pub fn new(store: Arc<dyn MeasurementStore>, policy: PlausibilityPolicy) -> Self {
        Self {
            queries: QueryEngine::new(store.clone()),
            ingestor: Ingestor::with_policy(store.clone(), policy.clone()),
            chart: ChartTransform::new(policy),
            page: ChartPage::new(),
            store,
            metrics: None,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: std::time::Instant::now(),
        }
    }

    /// Attach a Prometheus handle for `/metrics`
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: i64,
    pub version: String,
    pub uptime_seconds: u64,
    pub database: ComponentHealth,
}

/// Individual component health
#[derive(Debug, Serialize)]
pub struct ComponentHealth {
    pub status: String,
    pub error: Option<String>,
}

/// Create the application router
pub fn create_router(state: SharedState, limits: &RateLimitConfig) -> Router {
    let add = match rate_limit::write_limit_layer(limits) {
        Some(layer) => post(routes::measurements::add).layer(layer),
        None => post(routes::measurements::add),
    };

    Router::new()
        .route("/", get(routes::chart::index))
        .route("/get", get(routes::measurements::get_window))
        .route("/latest", get(routes::measurements::get_latest))
        .route("/add", add)
        .route("/api/v1/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check handler
async fn health_handler(State(state): State<SharedState>) -> impl IntoResponse {
    let database = match state.store.health_check().await {
        Ok(()) => ComponentHealth {
            status: "ok".to_string(),
            error: None,
        },
        Err(e) => ComponentHealth {
            status: "error".to_string(),
            error: Some(e.to_string()),
        },
    };

    let (code, status) = if database.error.is_none() {
        (StatusCode::OK, "healthy")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    let response = HealthResponse {
        status: status.to_string(),
        timestamp: chrono::Utc::now().timestamp(),
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        database,
    };

    (code, Json(response))
}

/// Prometheus exposition
async fn metrics_handler(State(state): State<SharedState>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (StatusCode::NOT_FOUND, "metrics recorder not installed".to_string()),
    }
}

/// Initialize logging
pub fn init_logging(config: &ServerConfig) -> anyhow::Result<()> {
    let level = Level::from_str(&config.log_level)
        .map_err(|e| anyhow::anyhow!("invalid log_level `{}`: {}", config.log_level, e))?;

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true);

    if config.log_json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}

/// Open the store selected by `database_url`
pub async fn open_store(config: &ServerConfig) -> Result<Arc<dyn MeasurementStore>, StorageError> {
    if config.uses_memory_store() {
        return Ok(Arc::new(MemoryStore::new()));
    }
    Ok(Arc::new(SqliteStore::connect(&config.sqlite()).await?))
}

/// Run the server
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let store = open_store(&config).await?;
    let metrics = PrometheusBuilder::new().install_recorder()?;

    let state = AppState::new(store, PlausibilityPolicy::new(config.plausibility.clone()))
        .with_metrics(metrics);
    let app = create_router(Arc::new(state), &config.rate_limit);

    info!("Starting API server on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

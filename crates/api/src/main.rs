//! Measurement Station - Main Entry Point

use api::{init_logging, run_server, ServerConfig, DEFAULT_CONFIG_PATH};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = ServerConfig::load(&path)?;

    init_logging(&config)?;

    info!("=== Measurement Station v{} ===", env!("CARGO_PKG_VERSION"));
    info!("Config: {:?}", config);

    run_server(config).await
}

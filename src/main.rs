//! gauge: live rolling charts for host telemetry.
//!
//! Run with:  `RUST_LOG=info gauge [path/to/gauge.toml]`

use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Structured logging on stderr; stdout carries the charts.
    // RUST_LOG controls verbosity (default: info).
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("gauge v{} starting", env!("CARGO_PKG_VERSION"));

    let config_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(gauge_config::default_path);
    let config = gauge_config::load(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;

    gauge_dashboard::run(config, &config_path).await.map_err(Into::into)
}

pub mod schema;
pub mod watcher;

pub use schema::{
    DashboardConfig, FeedConfig, FeedSource, GaugeConfig, LocalConfig, PresentationConfig,
    WindowConfig,
};
pub use watcher::ConfigWatcher;

use gauge_core::{GaugeError, Result};
use std::path::{Path, PathBuf};

/// Load configuration from a TOML file.  Returns `GaugeConfig::default()` if
/// the file doesn't exist so the dashboard always has sensible defaults.
pub fn load(path: impl AsRef<Path>) -> Result<GaugeConfig> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::warn!(
            "Config file not found at '{}'; using defaults.",
            path.display()
        );
        return Ok(GaugeConfig::default());
    }

    let raw = std::fs::read_to_string(path)
        .map_err(|e| GaugeError::Config(format!("cannot read '{}': {e}", path.display())))?;

    parse(&raw)
}

/// Parse a TOML document into a [`GaugeConfig`].
pub fn parse(raw: &str) -> Result<GaugeConfig> {
    toml::from_str(raw).map_err(|e| GaugeError::Config(format!("TOML parse error: {e}")))
}

/// Return the default config path, honouring `$XDG_CONFIG_HOME`.
pub fn default_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("gauge").join("gauge.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let cfg = load("/nonexistent/gauge.toml").unwrap();
        assert_eq!(cfg.window.capacity, 60);
        assert_eq!(cfg.window.span_ms, 60_000);
    }

    #[test]
    fn partial_document_keeps_defaults() {
        let cfg = parse(
            r#"
            [feed]
            source = "local"

            [dashboard]
            host_id = 7
            metrics = ["cpu", "network"]

            [presentation]
            custom_background = "https://example.org/bg.png"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.feed.source, FeedSource::Local);
        assert_eq!(cfg.feed.history_len, 30);
        assert_eq!(cfg.dashboard.host_id, 7);
        assert_eq!(cfg.dashboard.metrics, vec!["cpu", "network"]);
        assert_eq!(cfg.dashboard.tick_ms, 1_000);
        assert!(cfg.presentation.has_custom_background());
    }

    #[test]
    fn malformed_document_is_a_config_error() {
        let err = parse("[window]\nspan_ms = \"soon\"").unwrap_err();
        assert!(matches!(err, GaugeError::Config(_)));
    }
}

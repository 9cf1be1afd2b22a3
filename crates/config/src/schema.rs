use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure parsed from `gauge.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GaugeConfig {
    /// Where frames come from.
    pub feed: FeedConfig,
    /// Local sampler settings, used when `feed.source = "local"`.
    pub local: LocalConfig,
    /// Sliding-window geometry shared by every chart.
    pub window: WindowConfig,
    /// Which host and metrics to chart.
    pub dashboard: DashboardConfig,
    /// Styling inputs handed to the presenter.
    pub presentation: PresentationConfig,
}

/// Frame source selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FeedSource {
    /// Remote dashboard websocket.
    #[default]
    Websocket,
    /// Sample this machine with `sysinfo`.
    Local,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub source: FeedSource,
    /// Websocket endpoint streaming frames.
    pub url: String,
    /// Number of recent frames retained for chart bootstrap.
    pub history_len: usize,
    /// Upper bound on the reconnect backoff, in seconds.
    pub reconnect_max_secs: u64,
    /// Optional JSON file holding a newest-first array of frames to replay.
    pub history_file: Option<PathBuf>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            source: FeedSource::Websocket,
            url: "ws://127.0.0.1:8008/api/v1/ws/server".to_string(),
            history_len: 30,
            reconnect_max_secs: 10,
            history_file: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalConfig {
    /// Poll interval in milliseconds.
    pub interval_ms: u64,
    /// Host id stamped on locally sampled records.
    pub host_id: u64,
    /// Display name; empty = use the system hostname.
    pub host_name: String,
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            interval_ms: 2_000,
            host_id: 1,
            host_name: String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Width of the visible window in milliseconds.
    pub span_ms: i64,
    /// Maximum retained points per chart.
    pub capacity: usize,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            span_ms: 60_000,
            capacity: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Host whose charts are displayed.
    pub host_id: u64,
    /// Metric identifiers, in display order.
    pub metrics: Vec<String>,
    /// Display refresh interval in milliseconds.
    pub tick_ms: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            host_id: 1,
            metrics: ["cpu", "gpu", "process", "disk", "memory", "network", "connections"]
                .into_iter()
                .map(String::from)
                .collect(),
            tick_ms: 1_000,
        }
    }
}

/// Presentation inputs.  Threaded into the presenter explicitly rather than
/// read from process-wide state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresentationConfig {
    /// Background image URL; empty = none.  Cards render translucent when set.
    pub custom_background: String,
    /// Print axis bounds next to each chart.
    pub show_axis: bool,
}

impl PresentationConfig {
    pub fn has_custom_background(&self) -> bool {
        !self.custom_background.trim().is_empty()
    }
}

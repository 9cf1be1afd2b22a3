//! Dashboard runtime for `gauge`.
//!
//! Owns the single-task event loop and wires together all background tasks:
//! - Telemetry source (remote websocket feed or local `sysinfo` monitor)
//! - Config file watcher (live reload of presentation settings)
//! - Display timer (relative-time refresh)
//!
//! Charts and the clock offset live on the loop's task only; producers hand
//! over frames through channels, so no state is shared or locked.

pub mod presenter;

use gauge_chart::{local_now_ms, ClockSync, HostCharts};
use gauge_config::{load as load_config, ConfigWatcher, FeedSource, GaugeConfig};
use gauge_core::{Frame, Message, Result, ServerRecord};
use gauge_feed::{load_history_file, FeedClient, MessageHistory};
use gauge_system::LocalHost;
use presenter::Presenter;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// What the loop should do after a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// Repaint the screen, then continue.
    Redraw,
    Stop,
}

// ── State ─────────────────────────────────────────────────────────────────────

/// All mutable dashboard state.
pub struct Dashboard {
    config:      GaugeConfig,
    config_path: PathBuf,
    charts:      HostCharts,
    clock:       ClockSync,
    history:     MessageHistory,
    presenter:   Presenter,
    /// Latest record for the displayed host.
    latest:      Option<ServerRecord>,
    connected:   bool,
}

impl Dashboard {
    pub fn new(config: GaugeConfig, config_path: PathBuf, seed: Vec<Frame>) -> Self {
        let charts = HostCharts::new(
            config.dashboard.host_id,
            &config.dashboard.metrics,
            config.window.span_ms,
            config.window.capacity,
        );
        let history = MessageHistory::with_frames(config.feed.history_len, seed);
        let presenter = Presenter::new(config.presentation.clone());

        Self {
            config,
            config_path,
            charts,
            clock: ClockSync::new(),
            history,
            presenter,
            latest: None,
            connected: false,
        }
    }

    pub fn charts(&self) -> &HostCharts {
        &self.charts
    }

    pub fn clock(&self) -> &ClockSync {
        &self.clock
    }

    pub fn history(&self) -> &MessageHistory {
        &self.history
    }

    pub fn presenter(&self) -> &Presenter {
        &self.presenter
    }

    // ── Update ────────────────────────────────────────────────────────────────

    pub fn update(&mut self, message: Message) -> Flow {
        match message {
            Message::Connected => {
                self.connected = true;
                info!("Feed online");
            }
            Message::Disconnected => {
                self.connected = false;
                warn!("Feed offline; charts hold their last window");
            }
            Message::Frame { frame, received_at } => self.on_frame(frame, received_at),
            Message::ConfigReloaded => self.reload_config(),
            Message::Tick => return Flow::Redraw,
            Message::Shutdown => {
                info!("Shutting down");
                return Flow::Stop;
            }
        }
        Flow::Continue
    }

    fn on_frame(&mut self, frame: Frame, received_at: i64) {
        self.clock.observe(frame.now, received_at);

        // Charts mounted before the first live frame replay whatever history
        // has accumulated so far; the live frame is recorded afterwards so it
        // is not counted twice.
        let history: Vec<&Frame> = self.history.frames().collect();
        self.charts.observe(&frame, received_at, &history, &self.clock);

        if let Some(server) = frame.server(self.charts.host_id()) {
            self.latest = Some(server.clone());
        } else {
            debug!(host = self.charts.host_id(), "Frame does not carry the displayed host");
        }
        self.history.record(frame);
    }

    fn reload_config(&mut self) {
        match load_config(&self.config_path) {
            Ok(cfg) => {
                if cfg.presentation != self.config.presentation {
                    info!("Presentation settings reloaded");
                    self.presenter.set_presentation(cfg.presentation.clone());
                }
                if cfg.dashboard.host_id != self.config.dashboard.host_id
                    || cfg.dashboard.metrics != self.config.dashboard.metrics
                    || cfg.feed.url != self.config.feed.url
                {
                    warn!("Host, metric and feed changes take effect on restart");
                }
                self.config.presentation = cfg.presentation;
            }
            Err(e) => warn!("Config reload failed: {e}"),
        }
    }

    // ── View ──────────────────────────────────────────────────────────────────

    /// Render the current state as text lines.
    pub fn view(&self, local_now: i64) -> Vec<String> {
        let mut lines = Vec::new();
        match &self.latest {
            Some(server) => lines.extend(self.presenter.overview(server, &self.clock, local_now)),
            None => lines.push(format!("waiting for host {}…", self.charts.host_id())),
        }
        if !self.connected && self.config.feed.source == FeedSource::Websocket {
            lines.push("(offline)".to_string());
        }
        lines.extend(self.presenter.render(&self.charts));
        lines
    }

    /// Clear the terminal behind `out` and paint [`view`](Self::view).
    pub fn draw<W: Write>(&self, out: &mut W, local_now: i64) -> std::io::Result<()> {
        write!(out, "\x1b[2J\x1b[H")?;
        for line in self.view(local_now) {
            writeln!(out, "{line}")?;
        }
        out.flush()
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

/// Run the dashboard until Ctrl-C.
pub async fn run(config: GaugeConfig, config_path: impl AsRef<Path>) -> Result<()> {
    let config_path = config_path.as_ref().to_path_buf();

    let seed = match &config.feed.history_file {
        Some(path) => load_history_file(path)?,
        None => Vec::new(),
    };

    let (tx, mut rx) = mpsc::channel::<Message>(64);

    spawn_source(&config, tx.clone())?;
    let _watcher = ConfigWatcher::spawn(&config_path, tx.clone());
    spawn_shutdown(tx.clone());

    let tick_ms = config.dashboard.tick_ms.max(100);
    // Seeded history is replayed on the first live frame, once the clock
    // offset is known.
    let mut dashboard = Dashboard::new(config, config_path, seed);

    let mut ticker = tokio::time::interval(Duration::from_millis(tick_ms));
    let stdout = std::io::stdout();

    loop {
        let message = tokio::select! {
            Some(message) = rx.recv() => message,
            _ = ticker.tick() => Message::Tick,
        };
        match dashboard.update(message) {
            Flow::Continue => {}
            Flow::Redraw => dashboard.draw(&mut stdout.lock(), local_now_ms())?,
            Flow::Stop => break,
        }
    }

    Ok(())
}

/// Start the configured frame producer and forward its messages into `tx`.
fn spawn_source(config: &GaugeConfig, tx: mpsc::Sender<Message>) -> Result<()> {
    let rx = match config.feed.source {
        FeedSource::Websocket => {
            let client = FeedClient::new(&config.feed.url, config.feed.reconnect_max_secs)?;
            info!(url = %client.url(), "Using websocket feed");
            client.spawn_listener()
        }
        FeedSource::Local => {
            let host = LocalHost {
                id:   config.local.host_id,
                name: config.local.host_name.clone(),
            };
            info!("Using local system monitor");
            gauge_system::spawn_monitor(config.local.interval_ms, host)
        }
    };

    tokio::spawn(forward(rx, tx));
    Ok(())
}

async fn forward(mut rx: mpsc::Receiver<Message>, tx: mpsc::Sender<Message>) {
    while let Some(message) = rx.recv().await {
        if tx.send(message).await.is_err() {
            break;
        }
    }
}

fn spawn_shutdown(tx: mpsc::Sender<Message>) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = tx.send(Message::Shutdown).await;
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(now: i64, id: u64, cpu: f64) -> Frame {
        let mut record = ServerRecord { id, name: format!("host-{id}"), ..Default::default() };
        record.state.cpu = cpu;
        Frame { now, servers: vec![record] }
    }

    fn dashboard() -> Dashboard {
        let mut config = GaugeConfig::default();
        config.dashboard.metrics = vec!["cpu".into()];
        Dashboard::new(config, PathBuf::from("/nonexistent/gauge.toml"), Vec::new())
    }

    #[test]
    fn frames_feed_charts_and_history() {
        let mut dash = dashboard();
        dash.update(Message::Frame { frame: frame(10_000, 1, 20.0), received_at: 10_500 });
        dash.update(Message::Frame { frame: frame(11_000, 1, 30.0), received_at: 11_500 });

        assert_eq!(dash.clock().offset_ms(), Some(500));
        assert_eq!(dash.history().len(), 2);
        let cpu = dash.charts().singles()[0].snapshot();
        let stamps: Vec<i64> = cpu.iter().map(|s| s.timestamp).collect();
        assert_eq!(stamps, vec![10_500, 10_500, 11_500]);
    }

    #[test]
    fn seeded_history_bootstraps_on_first_frame() {
        let mut config = GaugeConfig::default();
        config.dashboard.metrics = vec!["cpu".into()];
        let seed = vec![frame(9_000, 1, 5.0), frame(8_000, 1, 4.0)];
        let mut dash = Dashboard::new(config, PathBuf::from("/nonexistent/gauge.toml"), seed);

        dash.update(Message::Frame { frame: frame(10_000, 1, 6.0), received_at: 10_000 });

        let values: Vec<f64> = dash.charts().singles()[0].snapshot().iter().map(|s| s.values[0]).collect();
        assert_eq!(values, vec![4.0, 5.0, 6.0]);
    }

    #[test]
    fn shutdown_stops_the_loop() {
        let mut dash = dashboard();
        assert_eq!(dash.update(Message::Connected), Flow::Continue);
        assert_eq!(dash.update(Message::Shutdown), Flow::Stop);
    }

    #[test]
    fn tick_draws_the_view_through_the_writer() {
        let mut dash = dashboard();
        dash.update(Message::Frame { frame: frame(1_000, 1, 7.0), received_at: 1_000 });
        assert_eq!(dash.update(Message::Tick), Flow::Redraw);

        let mut out = Vec::new();
        dash.draw(&mut out, 1_000).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("\x1b[2J\x1b[H"));
        assert_eq!(text.lines().count(), dash.view(1_000).len());
        assert!(text.contains("7.00%"));
    }

    #[test]
    fn reload_swaps_presentation_and_keeps_windows() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[dashboard]\nmetrics = [\"cpu\"]").unwrap();

        let mut config = GaugeConfig::default();
        config.dashboard.metrics = vec!["cpu".into()];
        let mut dash = Dashboard::new(config, file.path().to_path_buf(), Vec::new());
        dash.update(Message::Frame { frame: frame(1_000, 1, 20.0), received_at: 1_000 });
        dash.update(Message::Frame { frame: frame(2_000, 1, 30.0), received_at: 2_000 });
        let before = dash.charts().singles()[0].snapshot().to_vec();
        assert!(!dash.presenter().presentation().show_axis);

        writeln!(file, "[presentation]\nshow_axis = true\ncustom_background = \"bg.png\"").unwrap();
        file.flush().unwrap();
        assert_eq!(dash.update(Message::ConfigReloaded), Flow::Continue);

        assert!(dash.presenter().presentation().show_axis);
        assert!(dash.presenter().presentation().has_custom_background());
        assert_eq!(dash.charts().singles()[0].snapshot(), before.as_slice());
        assert_eq!(dash.history().len(), 2);
    }

    #[test]
    fn failed_reload_keeps_current_presentation() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[presentation]\nshow_axis = \"maybe\"").unwrap();

        let mut config = GaugeConfig::default();
        config.presentation.show_axis = true;
        let mut dash = Dashboard::new(config, file.path().to_path_buf(), Vec::new());
        dash.update(Message::ConfigReloaded);

        assert!(dash.presenter().presentation().show_axis);
    }

    #[test]
    fn view_waits_for_host_then_shows_it() {
        let mut dash = dashboard();
        assert!(dash.view(0)[0].starts_with("waiting for host 1"));

        dash.update(Message::Frame { frame: frame(1_000, 1, 1.0), received_at: 1_000 });
        assert!(dash.view(1_000)[0].contains("host-1"));
    }
}

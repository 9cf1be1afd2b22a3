//! Plain-text chart presenter.
//!
//! Turns each chart's window into a one-line sparkline plus current values.
//! Timestamps are shown as elapsed time relative to the newest point, not as
//! wall-clock time.

use gauge_chart::{
    format_time_ago, AxisDomain, Chart, ChartRef, ClockSync, DualMetric, HostCharts, Sample,
    Series, SingleMetric,
};
use gauge_config::PresentationConfig;
use gauge_core::ServerRecord;
use gauge_system::memory::{format_bytes, format_rate_mib};
use std::fmt::Write as _;

const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Renders the dashboard as text.  Styling comes solely from the
/// [`PresentationConfig`] handed in at construction.
#[derive(Debug, Clone)]
pub struct Presenter {
    presentation: PresentationConfig,
}

impl Presenter {
    pub fn new(presentation: PresentationConfig) -> Self {
        Self { presentation }
    }

    /// Swap in a reloaded presentation config.
    pub fn set_presentation(&mut self, presentation: PresentationConfig) {
        self.presentation = presentation;
    }

    pub fn presentation(&self) -> &PresentationConfig {
        &self.presentation
    }

    /// Card gutter: translucent cards over a custom background, solid otherwise.
    fn gutter(&self) -> &'static str {
        if self.presentation.has_custom_background() {
            "┆ "
        } else {
            "│ "
        }
    }

    /// Host card: status, report age, uptime and boot time on the first
    /// line; static host details and traffic totals on the second.  Ages
    /// advance with the extrapolated server clock.
    pub fn overview(&self, server: &ServerRecord, clock: &ClockSync, local_now: i64) -> Vec<String> {
        let online = server.is_online(clock.server_time(local_now));

        let mut status = format!(
            "{}{}  {}",
            self.gutter(),
            server.name,
            if online { "● online" } else { "○ offline" }
        );
        if online {
            let _ = write!(status, "  · up {}", format_uptime(server.state.uptime));
        }
        if let Some(active) = server.last_active_ms() {
            let _ = write!(status, "  · last seen {}", clock.time_ago(active, local_now));
        }
        if let Some(boot) = server.boot_time_ms() {
            let _ = write!(status, "  · booted {} ago", clock.since(boot, local_now));
        }

        let host = &server.host;
        let mut details: Vec<String> = Vec::new();
        let system = [host.platform.as_str(), host.arch.as_str()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if !system.is_empty() {
            details.push(system);
        }
        if !host.cpu.is_empty() {
            details.push(format!("CPU {}", host.cpu.join(", ")));
        }
        if !host.gpu.is_empty() {
            details.push(format!("GPU {}", host.gpu.join(", ")));
        }
        details.push(format!(
            "mem {}  disk {}",
            format_bytes(host.mem_total),
            format_bytes(host.disk_total)
        ));
        if server.state.net_out_transfer > 0 || server.state.net_in_transfer > 0 {
            details.push(format!(
                "↑ {}  ↓ {}",
                format_bytes(server.state.net_out_transfer),
                format_bytes(server.state.net_in_transfer)
            ));
        }

        vec![status, format!("{}{}", self.gutter(), details.join("  · "))]
    }

    /// One line per chart, in configured display order.
    pub fn render(&self, charts: &HostCharts) -> Vec<String> {
        charts
            .in_display_order()
            .map(|chart| match chart {
                ChartRef::Single(c) => self.single_line(c),
                ChartRef::Dual(c) => self.dual_line(c),
            })
            .collect()
    }

    fn single_line(&self, chart: &Chart<1, SingleMetric>) -> String {
        let value = chart
            .snapshot()
            .last()
            .map(|s| format_single(chart.series(), s.values[0]))
            .unwrap_or_else(|| "—".to_string());
        self.line(chart.title(), &value, chart.snapshot(), chart.domain())
    }

    fn dual_line(&self, chart: &Chart<2, DualMetric>) -> String {
        let names = chart.series().channels();
        let value = chart
            .snapshot()
            .last()
            .map(|s| {
                format!(
                    "{} {}  {} {}",
                    names[0],
                    format_dual(chart.series(), s.values[0]),
                    names[1],
                    format_dual(chart.series(), s.values[1]),
                )
            })
            .unwrap_or_else(|| "—".to_string());
        self.line(chart.title(), &value, chart.snapshot(), chart.domain())
    }

    fn line<const N: usize>(
        &self,
        title: &str,
        value: &str,
        samples: &[Sample<N>],
        domain: AxisDomain,
    ) -> String {
        let mut out = format!("{}{title:<16} {:<40} {}", self.gutter(), sparkline(samples, domain), value);
        if self.presentation.show_axis {
            let _ = write!(out, "  [{}, {}]", trim_float(domain.low), trim_float(domain.high));
        }
        if let (Some(first), Some(last)) = (samples.first(), samples.last()) {
            let _ = write!(out, "  {} → now", axis_label(first.timestamp, last.timestamp));
        }
        out
    }
}

/// Elapsed-time label for `timestamp` relative to `newest`, both on the
/// chart's own clock.
pub fn axis_label(timestamp: i64, newest: i64) -> String {
    format_time_ago(((newest - timestamp).max(0) / 1000) as u64)
}

/// Map the first channel of each sample onto block glyphs within `domain`.
pub fn sparkline<const N: usize>(samples: &[Sample<N>], domain: AxisDomain) -> String {
    let span = domain.high - domain.low;
    samples
        .iter()
        .filter_map(|s| s.values.first())
        .map(|&v| {
            if span <= 0.0 || !v.is_finite() {
                return BARS[0];
            }
            let level = ((v - domain.low) / span * (BARS.len() - 1) as f64).round();
            BARS[level.clamp(0.0, (BARS.len() - 1) as f64) as usize]
        })
        .collect()
}

/// Uptime as whole days and hours, or hours alone under a day.
fn format_uptime(secs: u64) -> String {
    let days = secs / 86_400;
    let hours = (secs % 86_400) / 3_600;
    if days >= 1 {
        format!("{days} days {hours} hours")
    } else {
        format!("{hours} hours")
    }
}

fn format_single(metric: &SingleMetric, value: f64) -> String {
    match metric {
        SingleMetric::Process => format!("{value:.0}"),
        _ => format!("{value:.2}%"),
    }
}

fn format_dual(metric: &DualMetric, value: f64) -> String {
    match metric {
        DualMetric::Memory => format!("{value:.0}%"),
        DualMetric::Network => format_rate_mib(value),
        DualMetric::Connections => format!("{value:.0}"),
    }
}

fn trim_float(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{v:.0}")
    } else {
        format!("{v:.2}")
    }
}

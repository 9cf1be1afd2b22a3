use crate::scale::{Quantity, ScalePolicy};
use crate::window::Interpolation;
use gauge_core::ServerRecord;

const MIB: f64 = 1024.0 * 1024.0;

/// Everything metric-specific about a chart: which channels it carries, how
/// they are read out of a record, how boundary values are interpolated and
/// how the axis is scaled.  The window engine itself is metric-agnostic.
pub trait Series<const N: usize> {
    /// Stable identifier, e.g. `"cpu"` or `"gpu1"`.
    fn id(&self) -> String;

    /// Channel names, index-aligned with [`Sample::values`](crate::Sample).
    fn channels(&self) -> [&'static str; N];

    /// Read this metric's channel values from a host record.  `None` when the
    /// record does not carry the metric.
    fn extract(&self, server: &ServerRecord) -> Option<[f64; N]>;

    fn interpolation(&self) -> Interpolation {
        Interpolation::Linear
    }

    fn scale(&self) -> ScalePolicy {
        ScalePolicy::PERCENT
    }
}

/// Metrics charted as a single series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SingleMetric {
    Cpu,
    /// Load of the GPU at this index.
    Gpu(usize),
    Process,
    Disk,
}

impl SingleMetric {
    /// Default chart title.  Named GPUs are titled by the host instead.
    pub fn title(&self) -> String {
        match self {
            Self::Cpu => "CPU".into(),
            Self::Gpu(i) => format!("GPU: #{}", i + 1),
            Self::Process => "Process".into(),
            Self::Disk => "Disk".into(),
        }
    }
}

impl Series<1> for SingleMetric {
    fn id(&self) -> String {
        match self {
            Self::Cpu => "cpu".into(),
            Self::Gpu(i) => format!("gpu{i}"),
            Self::Process => "process".into(),
            Self::Disk => "disk".into(),
        }
    }

    fn channels(&self) -> [&'static str; 1] {
        match self {
            Self::Cpu => ["cpu"],
            Self::Gpu(_) => ["gpu"],
            Self::Process => ["process"],
            Self::Disk => ["disk"],
        }
    }

    fn extract(&self, server: &ServerRecord) -> Option<[f64; 1]> {
        let value = match self {
            Self::Cpu => server.state.cpu,
            Self::Gpu(i) => *server.state.gpu.get(*i)?,
            Self::Process => server.state.process_count as f64,
            Self::Disk => server.disk_percent(),
        };
        Some([value])
    }

    fn interpolation(&self) -> Interpolation {
        match self {
            Self::Process => Interpolation::Rounded,
            _ => Interpolation::Linear,
        }
    }

    fn scale(&self) -> ScalePolicy {
        match self {
            Self::Process => ScalePolicy::Adaptive(Quantity::Count),
            _ => ScalePolicy::PERCENT,
        }
    }
}

/// Metrics charted as two series on a shared axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DualMetric {
    /// RAM and swap usage, percent.
    Memory,
    /// Upload and download rate, MiB/s.
    Network,
    /// TCP and UDP connection counts.
    Connections,
}

impl DualMetric {
    pub fn title(&self) -> &'static str {
        match self {
            Self::Memory => "Memory",
            Self::Network => "Network",
            Self::Connections => "Connections",
        }
    }
}

impl Series<2> for DualMetric {
    fn id(&self) -> String {
        match self {
            Self::Memory => "memory",
            Self::Network => "network",
            Self::Connections => "connections",
        }
        .into()
    }

    fn channels(&self) -> [&'static str; 2] {
        match self {
            Self::Memory => ["mem", "swap"],
            Self::Network => ["upload", "download"],
            Self::Connections => ["tcp", "udp"],
        }
    }

    fn extract(&self, server: &ServerRecord) -> Option<[f64; 2]> {
        let state = &server.state;
        Some(match self {
            Self::Memory => [server.mem_percent(), server.swap_percent()],
            Self::Network => [
                state.net_out_speed as f64 / MIB,
                state.net_in_speed as f64 / MIB,
            ],
            Self::Connections => [state.tcp_conn_count as f64, state.udp_conn_count as f64],
        })
    }

    fn interpolation(&self) -> Interpolation {
        match self {
            Self::Connections => Interpolation::Rounded,
            _ => Interpolation::Linear,
        }
    }

    fn scale(&self) -> ScalePolicy {
        match self {
            Self::Memory => ScalePolicy::PERCENT,
            Self::Network => ScalePolicy::Adaptive(Quantity::Throughput),
            Self::Connections => ScalePolicy::Adaptive(Quantity::Count),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> ServerRecord {
        let mut r = ServerRecord::default();
        r.host.mem_total = 4_000;
        r.host.swap_total = 1_000;
        r.host.disk_total = 200;
        r.state.cpu = 37.5;
        r.state.mem_used = 1_000;
        r.state.swap_used = 500;
        r.state.disk_used = 50;
        r.state.net_out_speed = 2 * 1024 * 1024;
        r.state.net_in_speed = 512 * 1024;
        r.state.process_count = 312;
        r.state.tcp_conn_count = 48;
        r.state.udp_conn_count = 6;
        r.state.gpu = vec![12.0, 88.0];
        r
    }

    #[test]
    fn single_channel_extraction() {
        let r = record();
        assert_eq!(SingleMetric::Cpu.extract(&r), Some([37.5]));
        assert_eq!(SingleMetric::Disk.extract(&r), Some([25.0]));
        assert_eq!(SingleMetric::Process.extract(&r), Some([312.0]));
        assert_eq!(SingleMetric::Gpu(1).extract(&r), Some([88.0]));
        assert_eq!(SingleMetric::Gpu(2).extract(&r), None);
    }

    #[test]
    fn dual_channel_extraction() {
        let r = record();
        assert_eq!(DualMetric::Memory.extract(&r), Some([25.0, 50.0]));
        assert_eq!(DualMetric::Network.extract(&r), Some([2.0, 0.5]));
        assert_eq!(DualMetric::Connections.extract(&r), Some([48.0, 6.0]));
    }

    #[test]
    fn policies_follow_quantity() {
        assert_eq!(SingleMetric::Cpu.scale(), ScalePolicy::PERCENT);
        assert_eq!(SingleMetric::Process.interpolation(), Interpolation::Rounded);
        assert_eq!(DualMetric::Network.scale(), ScalePolicy::Adaptive(Quantity::Throughput));
        assert_eq!(DualMetric::Connections.scale(), ScalePolicy::Adaptive(Quantity::Count));
        assert_eq!(DualMetric::Memory.channels(), ["mem", "swap"]);
    }

    #[test]
    fn default_titles() {
        assert_eq!(SingleMetric::Gpu(0).title(), "GPU: #1");
        assert_eq!(SingleMetric::Process.title(), "Process");
        assert_eq!(DualMetric::Connections.title(), "Connections");
    }
}

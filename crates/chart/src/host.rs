use crate::clock::ClockSync;
use crate::scale::AxisDomain;
use crate::series::{DualMetric, Series, SingleMetric};
use crate::window::{Sample, WindowBuffer};
use gauge_core::{Frame, ServerRecord};
use tracing::{debug, trace, warn};

/// One mounted chart: a metric definition plus the window it owns.
///
/// The chart, not the buffer, guards bootstrap: history is replayed at most
/// once, and live samples are ignored until that has happened.
#[derive(Debug, Clone)]
pub struct Chart<const N: usize, S> {
    series: S,
    title: String,
    buffer: WindowBuffer<N>,
    bootstrapped: bool,
}

impl<const N: usize, S: Series<N>> Chart<N, S> {
    pub fn new(series: S, title: impl Into<String>, span_ms: i64, capacity: usize) -> Self {
        let buffer = WindowBuffer::with_window(span_ms, capacity, series.interpolation());
        Self {
            series,
            title: title.into(),
            buffer,
            bootstrapped: false,
        }
    }

    /// Replay `history` (newest first, as delivered) into the buffer.
    ///
    /// Frames without a record for `host_id`, or whose record lacks this
    /// metric, are skipped.  Server timestamps are moved onto the local clock
    /// so they line up with live samples.  No-op once bootstrapped.
    pub fn bootstrap(&mut self, host_id: u64, history: &[&Frame], clock: &ClockSync) {
        if self.bootstrapped {
            return;
        }

        let mut samples: Vec<Sample<N>> = history
            .iter()
            .filter_map(|frame| {
                let values = self.series.extract(frame.server(host_id)?)?;
                Some(Sample::new(clock.to_local(frame.now), values))
            })
            .collect();
        samples.reverse();

        debug!(chart = %self.series.id(), points = samples.len(), "Chart bootstrapped");
        self.buffer.bootstrap(samples);
        self.bootstrapped = true;
    }

    /// Append the live value carried by `server`, received at local time
    /// `received_at`.
    pub fn ingest(&mut self, server: &ServerRecord, received_at: i64) {
        if !self.bootstrapped {
            trace!(chart = %self.series.id(), "Live sample before bootstrap ignored");
            return;
        }
        if let Some(values) = self.series.extract(server) {
            self.buffer.append(Sample::new(received_at, values), received_at);
        }
    }

    pub fn domain(&self) -> AxisDomain {
        self.series.scale().domain(self.buffer.snapshot())
    }

    pub fn snapshot(&self) -> &[Sample<N>] {
        self.buffer.snapshot()
    }

    pub fn series(&self) -> &S {
        &self.series
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn is_bootstrapped(&self) -> bool {
        self.bootstrapped
    }
}

/// Position of a configured metric in the display order.  `Gpus` stands for
/// every GPU chart mounted so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Single(SingleMetric),
    Dual(DualMetric),
    Gpus,
}

/// A mounted chart of either width, borrowed in display order.
#[derive(Debug, Clone, Copy)]
pub enum ChartRef<'a> {
    Single(&'a Chart<1, SingleMetric>),
    Dual(&'a Chart<2, DualMetric>),
}

/// The set of charts displayed for one host.
#[derive(Debug, Clone)]
pub struct HostCharts {
    host_id: u64,
    span_ms: i64,
    capacity: usize,
    order: Vec<Slot>,
    singles: Vec<Chart<1, SingleMetric>>,
    duals: Vec<Chart<2, DualMetric>>,
}

impl HostCharts {
    /// Mount charts for `metrics` (`cpu`, `gpu`, `process`, `disk`, `memory`,
    /// `network`, `connections`), displayed in the order given.  GPU charts
    /// appear at the `gpu` entry once a frame reports GPUs.
    pub fn new<M: AsRef<str>>(host_id: u64, metrics: &[M], span_ms: i64, capacity: usize) -> Self {
        let mut charts = Self {
            host_id,
            span_ms,
            capacity,
            order: Vec::new(),
            singles: Vec::new(),
            duals: Vec::new(),
        };

        for name in metrics {
            let slot = match name.as_ref() {
                "cpu" => Slot::Single(SingleMetric::Cpu),
                "gpu" => Slot::Gpus,
                "process" => Slot::Single(SingleMetric::Process),
                "disk" => Slot::Single(SingleMetric::Disk),
                "memory" => Slot::Dual(DualMetric::Memory),
                "network" => Slot::Dual(DualMetric::Network),
                "connections" => Slot::Dual(DualMetric::Connections),
                other => {
                    warn!("Unknown metric '{other}' ignored");
                    continue;
                }
            };
            if charts.order.contains(&slot) {
                warn!("Metric '{}' listed twice; keeping the first", name.as_ref());
                continue;
            }
            match slot {
                Slot::Single(m) => charts.singles.push(Chart::new(m, m.title(), span_ms, capacity)),
                Slot::Dual(m) => charts.duals.push(Chart::new(m, m.title(), span_ms, capacity)),
                Slot::Gpus => {}
            }
            charts.order.push(slot);
        }

        charts
    }

    pub fn host_id(&self) -> u64 {
        self.host_id
    }

    /// Bootstrap every chart that has not been bootstrapped yet.
    pub fn bootstrap(&mut self, history: &[&Frame], clock: &ClockSync) {
        let host = self.host_id;
        for chart in &mut self.singles {
            chart.bootstrap(host, history, clock);
        }
        for chart in &mut self.duals {
            chart.bootstrap(host, history, clock);
        }
    }

    /// Feed one live frame.  Frames without this host are skipped.  GPU
    /// charts discovered here are bootstrapped from `history` before the
    /// live value is appended.
    pub fn observe(&mut self, frame: &Frame, received_at: i64, history: &[&Frame], clock: &ClockSync) {
        let Some(server) = frame.server(self.host_id) else {
            trace!(host = self.host_id, "Frame without host skipped");
            return;
        };

        if self.order.contains(&Slot::Gpus) {
            self.mount_gpus(server);
        }
        self.bootstrap(history, clock);

        for chart in &mut self.singles {
            chart.ingest(server, received_at);
        }
        for chart in &mut self.duals {
            chart.ingest(server, received_at);
        }
    }

    /// Add charts for GPUs beyond those already mounted.  Names come from the
    /// host's GPU list when it matches the reported load count, otherwise
    /// `#1`, `#2`, …
    fn mount_gpus(&mut self, server: &ServerRecord) {
        let reported = server.state.gpu.len();
        let mounted = self
            .singles
            .iter()
            .filter(|c| matches!(c.series(), SingleMetric::Gpu(_)))
            .count();
        if reported <= mounted {
            return;
        }

        let named = server.host.gpu.len() == reported;
        for index in mounted..reported {
            let metric = SingleMetric::Gpu(index);
            let title = if named {
                format!("GPU: {}", server.host.gpu[index])
            } else {
                metric.title()
            };
            debug!(host = self.host_id, gpu = index, "Mounting GPU chart");
            self.singles
                .push(Chart::new(metric, title, self.span_ms, self.capacity));
        }
    }

    /// Every mounted chart in configured display order.
    pub fn in_display_order<'a>(&'a self) -> impl Iterator<Item = ChartRef<'a>> + 'a {
        self.order.iter().flat_map(move |slot| -> Vec<ChartRef<'a>> {
            match *slot {
                Slot::Single(metric) => self
                    .singles
                    .iter()
                    .filter(|c| *c.series() == metric)
                    .map(ChartRef::Single)
                    .collect(),
                Slot::Dual(metric) => self
                    .duals
                    .iter()
                    .filter(|c| *c.series() == metric)
                    .map(ChartRef::Dual)
                    .collect(),
                Slot::Gpus => self
                    .singles
                    .iter()
                    .filter(|c| matches!(c.series(), SingleMetric::Gpu(_)))
                    .map(ChartRef::Single)
                    .collect(),
            }
        })
    }

    pub fn singles(&self) -> &[Chart<1, SingleMetric>] {
        &self.singles
    }

    pub fn duals(&self) -> &[Chart<2, DualMetric>] {
        &self.duals
    }
}

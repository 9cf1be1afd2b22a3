//! Rolling-window chart engine: one generic buffer shared by every metric,
//! plus axis scaling and server-clock compensation.

pub mod clock;
pub mod host;
pub mod scale;
pub mod series;
pub mod window;

pub use clock::{format_duration, format_time_ago, local_now_ms, ClockSync};
pub use host::{Chart, ChartRef, HostCharts};
pub use scale::{AxisDomain, Quantity, ScalePolicy};
pub use series::{DualMetric, Series, SingleMetric};
pub use window::{Interpolation, Sample, WindowBuffer};

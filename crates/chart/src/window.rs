/// Default width of the visible window, in milliseconds.
pub const DEFAULT_SPAN_MS: i64 = 60_000;

/// Default cap on retained points per buffer.
pub const DEFAULT_CAPACITY: usize = 60;

/// One reading of an `N`-channel metric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample<const N: usize> {
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    /// Channel values, in the order the metric names its channels.
    pub values: [f64; N],
}

impl<const N: usize> Sample<N> {
    pub fn new(timestamp: i64, values: [f64; N]) -> Self {
        Self { timestamp, values }
    }

    /// Linear interpolation between `older` and `newer` at `at`, which must
    /// lie strictly between their timestamps.
    fn between(older: &Self, newer: &Self, at: i64, rule: Interpolation) -> Self {
        let ratio = (at - older.timestamp) as f64 / (newer.timestamp - older.timestamp) as f64;
        let values = std::array::from_fn(|c| {
            rule.finish(older.values[c] + ratio * (newer.values[c] - older.values[c]))
        });
        Self { timestamp: at, values }
    }
}

/// How a synthesized boundary value is finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interpolation {
    /// Keep the interpolated value as is.
    #[default]
    Linear,
    /// Round to the nearest integer, for count-valued metrics.
    Rounded,
}

impl Interpolation {
    fn finish(self, value: f64) -> f64 {
        match self {
            Self::Linear => value,
            Self::Rounded => value.round(),
        }
    }
}

/// Time-bounded, capacity-bounded series for one metric of one host.
///
/// Samples are ordered by non-decreasing timestamp.  After every
/// [`append`](Self::append) the buffer covers at most `span_ms` (plus one
/// point before the cutoff when no interpolation was possible) and never
/// holds more than `capacity` points.  A non-empty buffer always holds at
/// least two points so renderers can draw a segment.
#[derive(Debug, Clone)]
pub struct WindowBuffer<const N: usize> {
    samples: Vec<Sample<N>>,
    capacity: usize,
    span_ms: i64,
    interpolation: Interpolation,
}

impl<const N: usize> WindowBuffer<N> {
    /// A 60 s / 60 point buffer.
    pub fn new(interpolation: Interpolation) -> Self {
        Self::with_window(DEFAULT_SPAN_MS, DEFAULT_CAPACITY, interpolation)
    }

    /// Custom geometry.  `capacity` is raised to 2 so the first append's
    /// duplicated point always fits.
    pub fn with_window(span_ms: i64, capacity: usize, interpolation: Interpolation) -> Self {
        let capacity = capacity.max(2);
        Self {
            samples: Vec::with_capacity(capacity + 1),
            capacity,
            span_ms,
            interpolation,
        }
    }

    /// Replace the contents with chronological `history`.
    ///
    /// No windowing or interpolation is applied; the first live
    /// [`append`](Self::append) performs the first trim.  Only the newest
    /// `capacity` points are kept.
    pub fn bootstrap(&mut self, mut history: Vec<Sample<N>>) {
        if history.len() > self.capacity {
            history.drain(..history.len() - self.capacity);
        }
        self.samples = history;
    }

    /// Absorb a live sample and re-window the buffer relative to `now`.
    ///
    /// A sample older than the newest stored one is clamped to the newest
    /// timestamp so ordering holds.
    pub fn append(&mut self, mut sample: Sample<N>, now: i64) {
        let Some(&last) = self.samples.last() else {
            self.samples.push(sample);
            self.samples.push(sample);
            return;
        };

        if sample.timestamp < last.timestamp {
            tracing::debug!(
                sample = sample.timestamp,
                newest = last.timestamp,
                "Out-of-order sample clamped"
            );
            sample.timestamp = last.timestamp;
        }

        self.samples.push(sample);
        self.trim(now - self.span_ms);

        if self.samples.len() > self.capacity {
            let excess = self.samples.len() - self.capacity;
            self.samples.drain(..excess);
        }
    }

    fn trim(&mut self, cutoff: i64) {
        // No sample inside the window means nothing to anchor on; leave it.
        let Some(first_inside) = self.samples.iter().position(|s| s.timestamp >= cutoff) else {
            return;
        };
        if first_inside == 0 {
            return;
        }

        let older = self.samples[first_inside - 1];
        let newer = self.samples[first_inside];

        if older.timestamp < cutoff && cutoff < newer.timestamp {
            let boundary = Sample::between(&older, &newer, cutoff, self.interpolation);
            self.samples.splice(..first_inside, [boundary]);
        } else {
            // Keep one point before the cutoff for continuity.
            self.samples.drain(..first_inside - 1);
        }
    }

    /// Current samples, oldest first.
    pub fn snapshot(&self) -> &[Sample<N>] {
        &self.samples
    }

    pub fn latest(&self) -> Option<&Sample<N>> {
        self.samples.last()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

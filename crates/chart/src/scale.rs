use crate::window::Sample;

/// Fraction of the plot height at which the largest value sits.
const MAX_AT: f64 = 0.85;
/// Fraction of the plot height at which the smallest non-zero value sits.
const MIN_AT: f64 = 0.15;
/// Smallest lower bound for continuous throughput axes.
const THROUGHPUT_FLOOR: f64 = 0.1;

/// Y-axis bounds for one chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisDomain {
    pub low: f64,
    pub high: f64,
}

impl AxisDomain {
    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }
}

/// What kind of values an adaptive axis carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantity {
    /// Integer counts (processes, connections): the lower bound is floored.
    Count,
    /// Continuous rates (network MiB/s): the lower bound never drops below 0.1.
    Throughput,
}

/// How a metric's axis is scaled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScalePolicy {
    /// Always the same range, e.g. `[0, 100]` for percentages.
    Fixed(AxisDomain),
    /// Range follows the window's contents across every channel.
    Adaptive(Quantity),
}

impl ScalePolicy {
    pub const PERCENT: Self = Self::Fixed(AxisDomain::new(0.0, 100.0));

    /// Compute the axis domain for the current window contents.
    ///
    /// Adaptive axes place the maximum at 85 % of the height and a non-zero
    /// minimum at 15 %; a zero minimum touches the floor.  Empty windows get
    /// `[0, 100]` for counts and `[0, 1]` for throughput.
    pub fn domain<const N: usize>(&self, samples: &[Sample<N>]) -> AxisDomain {
        let quantity = match *self {
            Self::Fixed(domain) => return domain,
            Self::Adaptive(quantity) => quantity,
        };

        let mut values = samples.iter().flat_map(|s| s.values.iter().copied());
        let Some(first) = values.next() else {
            return match quantity {
                Quantity::Count => AxisDomain::new(0.0, 100.0),
                Quantity::Throughput => AxisDomain::new(0.0, 1.0),
            };
        };
        let (min, max) = values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));

        let high = (max / MAX_AT).ceil();
        let low = if min == 0.0 {
            0.0
        } else {
            let raw = min - min * MIN_AT / MAX_AT;
            match quantity {
                Quantity::Count => raw.floor(),
                Quantity::Throughput => raw.max(THROUGHPUT_FLOOR),
            }
        };

        AxisDomain::new(low, high)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(values: &[f64]) -> Vec<Sample<1>> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| Sample::new(i as i64 * 1_000, [*v]))
            .collect()
    }

    #[test]
    fn percent_ignores_contents() {
        let samples = series(&[250.0, -3.0]);
        assert_eq!(ScalePolicy::PERCENT.domain(&samples), AxisDomain::new(0.0, 100.0));
        assert_eq!(ScalePolicy::PERCENT.domain::<1>(&[]), AxisDomain::new(0.0, 100.0));
    }

    #[test]
    fn counts_floor_the_lower_bound() {
        let samples = series(&[5.0, 5.0, 20.0]);
        let domain = ScalePolicy::Adaptive(Quantity::Count).domain(&samples);
        assert_eq!(domain, AxisDomain::new(4.0, 24.0));
    }

    #[test]
    fn zero_minimum_touches_floor() {
        let samples = series(&[0.0, 18.0]);
        let domain = ScalePolicy::Adaptive(Quantity::Count).domain(&samples);
        assert_eq!(domain, AxisDomain::new(0.0, 22.0));
    }

    #[test]
    fn throughput_spans_all_channels_and_clamps_floor() {
        let samples = vec![Sample::new(0, [0.05, 1.7]), Sample::new(1_000, [0.08, 0.9])];
        let domain = ScalePolicy::Adaptive(Quantity::Throughput).domain(&samples);
        // min 0.05 → 0.05 - 0.05*0.15/0.85 ≈ 0.041, clamped to 0.1; max 1.7 → ceil(2.0)
        assert_eq!(domain, AxisDomain::new(0.1, 2.0));
    }

    #[test]
    fn empty_windows_use_defaults() {
        assert_eq!(
            ScalePolicy::Adaptive(Quantity::Count).domain::<2>(&[]),
            AxisDomain::new(0.0, 100.0)
        );
        assert_eq!(
            ScalePolicy::Adaptive(Quantity::Throughput).domain::<2>(&[]),
            AxisDomain::new(0.0, 1.0)
        );
    }
}

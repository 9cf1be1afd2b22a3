//! Server-clock drift compensation and the relative-time strings built on it.

/// Tracks the offset between the feed server's clock and ours.
///
/// `offset = local receipt time − server time`, refreshed on every frame.
/// Between frames the server's clock is extrapolated from the local one so
/// "N seconds ago" and uptime displays keep moving once per second.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClockSync {
    offset_ms: Option<i64>,
}

impl ClockSync {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a frame stamped `server_now` that arrived at `local_receipt`.
    pub fn observe(&mut self, server_now: i64, local_receipt: i64) {
        let offset = local_receipt - server_now;
        if self.offset_ms != Some(offset) {
            tracing::trace!(offset_ms = offset, "Clock offset updated");
        }
        self.offset_ms = Some(offset);
    }

    /// Current offset, `None` before the first frame.
    pub fn offset_ms(&self) -> Option<i64> {
        self.offset_ms
    }

    /// Server time extrapolated from `local_now`.  Before any frame has been
    /// observed this is `local_now` itself.
    pub fn server_time(&self, local_now: i64) -> i64 {
        local_now - self.offset_ms.unwrap_or(0)
    }

    /// Translate a server timestamp onto the local clock.
    pub fn to_local(&self, server_ts: i64) -> i64 {
        server_ts + self.offset_ms.unwrap_or(0)
    }

    /// "Ns ago" style label for a server-side event at `event_ms`.
    pub fn time_ago(&self, event_ms: i64, local_now: i64) -> String {
        format_time_ago(elapsed_secs(self.server_time(local_now), event_ms))
    }

    /// Compact duration since a server-side instant, e.g. boot time.
    pub fn since(&self, start_ms: i64, local_now: i64) -> String {
        format_duration(elapsed_secs(self.server_time(local_now), start_ms))
    }
}

/// Local wall-clock time in milliseconds since the Unix epoch.
pub fn local_now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

fn elapsed_secs(now_ms: i64, then_ms: i64) -> u64 {
    ((now_ms - then_ms).max(0) / 1000) as u64
}

/// `<60s` → `Ns ago`, `<60min` → `Nmin ago`, `<24h` → `Nh ago`, else `Nd ago`.
pub fn format_time_ago(secs: u64) -> String {
    let mins = secs / 60;
    let hours = mins / 60;

    if secs < 60 {
        format!("{secs}s ago")
    } else if mins < 60 {
        format!("{mins}min ago")
    } else if hours < 24 {
        format!("{hours}h ago")
    } else {
        format!("{}d ago", hours / 24)
    }
}

/// Concatenate the non-zero `d`/`h`/`min`/`s` parts; seconds always appear
/// when every larger unit is zero.
pub fn format_duration(secs: u64) -> String {
    let days = secs / 86_400;
    let hours = secs % 86_400 / 3_600;
    let mins = secs % 3_600 / 60;
    let rest = secs % 60;

    let mut out = String::new();
    if days > 0 {
        out.push_str(&format!("{days}d"));
    }
    if hours > 0 {
        out.push_str(&format!("{hours}h"));
    }
    if mins > 0 {
        out.push_str(&format!("{mins}min"));
    }
    if rest > 0 || out.is_empty() {
        out.push_str(&format!("{rest}s"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extrapolates_server_time() {
        let mut clock = ClockSync::new();
        assert_eq!(clock.server_time(5_000), 5_000);

        // Local clock runs 1.5 s ahead of the server.
        clock.observe(10_000, 11_500);
        assert_eq!(clock.offset_ms(), Some(1_500));
        assert_eq!(clock.server_time(14_500), 13_000);
        assert_eq!(clock.to_local(13_000), 14_500);
    }

    #[test]
    fn time_ago_ladder() {
        assert_eq!(format_time_ago(0), "0s ago");
        assert_eq!(format_time_ago(59), "59s ago");
        assert_eq!(format_time_ago(60), "1min ago");
        assert_eq!(format_time_ago(3_599), "59min ago");
        assert_eq!(format_time_ago(3_600), "1h ago");
        assert_eq!(format_time_ago(86_399), "23h ago");
        assert_eq!(format_time_ago(3 * 86_400), "3d ago");
    }

    #[test]
    fn duration_skips_zero_units() {
        assert_eq!(format_duration(0), "0s");
        assert_eq!(format_duration(45), "45s");
        assert_eq!(format_duration(3_600), "1h");
        assert_eq!(format_duration(90_061), "1d1h1min1s");
        assert_eq!(format_duration(86_400 + 120), "1d2min");
    }

    #[test]
    fn displays_advance_between_frames() {
        let mut clock = ClockSync::new();
        clock.observe(100_000, 100_000);

        assert_eq!(clock.time_ago(90_000, 100_000), "10s ago");
        assert_eq!(clock.time_ago(90_000, 101_000), "11s ago");
        assert_eq!(clock.since(0, 101_000), "1min41s");
    }

    #[test]
    fn future_events_read_as_now() {
        let clock = ClockSync::new();
        assert_eq!(clock.time_ago(10_000, 5_000), "0s ago");
    }
}

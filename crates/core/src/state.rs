use chrono::{DateTime, Datelike};
use serde::{Deserialize, Serialize};

/// A host counts as online while its last report is at most this old.
pub const ONLINE_WINDOW_MS: i64 = 30_000;

/// One message from the telemetry feed: the server's clock plus a record for
/// every monitored host.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Frame {
    /// Authoritative server time in milliseconds since the Unix epoch.
    pub now: i64,
    pub servers: Vec<ServerRecord>,
}

impl Frame {
    /// Record for host `id`, if this frame carries one.
    #[must_use]
    pub fn server(&self, id: u64) -> Option<&ServerRecord> {
        self.servers.iter().find(|s| s.id == id)
    }
}

/// Telemetry for a single host inside a [`Frame`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerRecord {
    pub id: u64,
    pub name: String,
    /// RFC 3339 timestamp of the last report; a `0001-…` value means never.
    #[serde(default)]
    pub last_active: String,
    #[serde(default)]
    pub host: HostInfo,
    #[serde(default)]
    pub state: HostState,
}

impl ServerRecord {
    /// Last report time in milliseconds, `None` if the host never reported.
    #[must_use]
    pub fn last_active_ms(&self) -> Option<i64> {
        let parsed = DateTime::parse_from_rfc3339(&self.last_active).ok()?;
        if parsed.year() <= 1 {
            return None;
        }
        Some(parsed.timestamp_millis())
    }

    /// Whether the host reported within [`ONLINE_WINDOW_MS`] of `server_now`.
    #[must_use]
    pub fn is_online(&self, server_now: i64) -> bool {
        self.last_active_ms()
            .is_some_and(|active| server_now - active <= ONLINE_WINDOW_MS)
    }

    /// Boot time in milliseconds, `None` when unknown.
    #[must_use]
    pub fn boot_time_ms(&self) -> Option<i64> {
        (self.host.boot_time > 0).then(|| self.host.boot_time as i64 * 1000)
    }
}

/// Mostly static host description.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HostInfo {
    pub platform: String,
    pub arch: String,
    pub cpu: Vec<String>,
    /// GPU model names, index-aligned with [`HostState::gpu`] when complete.
    pub gpu: Vec<String>,
    pub mem_total: u64,
    pub swap_total: u64,
    pub disk_total: u64,
    /// Boot time in seconds since the Unix epoch.
    pub boot_time: u64,
}

/// A point-in-time snapshot of host resource usage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HostState {
    /// CPU usage (0.0 – 100.0).
    pub cpu: f64,
    pub mem_used: u64,
    pub swap_used: u64,
    pub disk_used: u64,
    /// Network receive rate in bytes/second.
    pub net_in_speed: u64,
    /// Network transmit rate in bytes/second.
    pub net_out_speed: u64,
    pub net_in_transfer: u64,
    pub net_out_transfer: u64,
    /// Uptime in seconds.
    pub uptime: u64,
    pub process_count: u64,
    pub tcp_conn_count: u64,
    pub udp_conn_count: u64,
    /// Per-GPU load (0.0 – 100.0).
    pub gpu: Vec<f64>,
}

impl ServerRecord {
    /// RAM usage as a percentage of `host.mem_total`.
    #[must_use]
    pub fn mem_percent(&self) -> f64 {
        percent(self.state.mem_used, self.host.mem_total)
    }

    /// Swap usage as a percentage of `host.swap_total`.
    #[must_use]
    pub fn swap_percent(&self) -> f64 {
        percent(self.state.swap_used, self.host.swap_total)
    }

    /// Disk usage as a percentage of `host.disk_total`.
    #[must_use]
    pub fn disk_percent(&self) -> f64 {
        percent(self.state.disk_used, self.host.disk_total)
    }
}

fn percent(used: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    used as f64 / total as f64 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_sparse_record() {
        let raw = r#"{"now":1700000000000,"servers":[{"id":3,"name":"edge"}]}"#;
        let frame: Frame = serde_json::from_str(raw).unwrap();
        let server = frame.server(3).unwrap();
        assert_eq!(server.name, "edge");
        assert_eq!(server.state.process_count, 0);
        assert!(frame.server(4).is_none());
    }

    #[test]
    fn percentages_guard_zero_totals() {
        let mut record = ServerRecord::default();
        record.state.mem_used = 512;
        assert_eq!(record.mem_percent(), 0.0);

        record.host.mem_total = 2048;
        assert_eq!(record.mem_percent(), 25.0);
    }

    #[test]
    fn zero_year_last_active_means_never() {
        let mut record = ServerRecord {
            last_active: "0001-01-01T00:00:00Z".into(),
            ..Default::default()
        };
        assert_eq!(record.last_active_ms(), None);

        record.last_active = "2024-01-01T00:00:10Z".into();
        assert_eq!(record.last_active_ms(), Some(1_704_067_210_000));
    }

    #[test]
    fn online_within_thirty_seconds_of_last_report() {
        let mut record = ServerRecord {
            last_active: "2024-01-01T00:00:10Z".into(),
            ..Default::default()
        };
        let active = 1_704_067_210_000;
        assert!(record.is_online(active + ONLINE_WINDOW_MS));
        assert!(!record.is_online(active + ONLINE_WINDOW_MS + 1));

        record.last_active = "0001-01-01T00:00:00Z".into();
        assert!(!record.is_online(active));
    }

    #[test]
    fn boot_time_in_millis() {
        let mut record = ServerRecord::default();
        assert_eq!(record.boot_time_ms(), None);
        record.host.boot_time = 100;
        assert_eq!(record.boot_time_ms(), Some(100_000));
    }
}

//! Local telemetry source: samples this machine and emits frames in the same
//! shape the remote feed delivers, so charts cannot tell the two apart.

pub mod connections;
pub mod memory;

use gauge_core::{Frame, HostInfo, HostState, Message, ServerRecord};
use std::time::Duration;
use sysinfo::{Disks, Networks, System};
use tokio::sync::mpsc;
use tokio::time;

/// Identity stamped on locally produced records.
#[derive(Debug, Clone)]
pub struct LocalHost {
    pub id: u64,
    /// Empty = use the system hostname.
    pub name: String,
}

/// Spawn a background Tokio task that polls system stats every `interval_ms`
/// milliseconds and forwards single-server [`Frame`]s through the returned
/// channel.
///
/// The task stops automatically when the receiver is dropped.
pub fn spawn_monitor(interval_ms: u64, host: LocalHost) -> mpsc::Receiver<Message> {
    let (tx, rx) = mpsc::channel(4);
    let interval = Duration::from_millis(interval_ms.max(1));
    let interval_secs = interval.as_secs_f64();

    tokio::spawn(async move {
        let mut sys      = System::new_all();
        let mut networks = Networks::new_with_refreshed_list();
        let mut ticker   = time::interval(interval);
        let name = if host.name.is_empty() {
            System::host_name().unwrap_or_else(|| "localhost".to_string())
        } else {
            host.name.clone()
        };

        tracing::info!(host = %name, interval_ms, "Local monitor started");

        loop {
            ticker.tick().await;
            sys.refresh_all();
            networks.refresh(false); // false = keep existing interfaces list

            let now = chrono::Utc::now().timestamp_millis();
            let record = take_record(&sys, &networks, interval_secs, host.id, &name, now);
            let frame = Frame { now, servers: vec![record] };

            if tx.send(Message::Frame { frame, received_at: now }).await.is_err() {
                tracing::debug!("Local monitor receiver dropped; stopping");
                break; // all receivers dropped
            }
        }
    });

    rx
}

fn take_record(
    sys: &System,
    networks: &Networks,
    interval_secs: f64,
    id: u64,
    name: &str,
    now: i64,
) -> ServerRecord {
    // ── Disk ─────────────────────────────────────────────────────────────────
    let disks = Disks::new_with_refreshed_list();
    let (disk_used, disk_total) = disks
        .iter()
        .find(|d| d.mount_point() == std::path::Path::new("/"))
        .map(|d| (d.total_space() - d.available_space(), d.total_space()))
        .unwrap_or((0, 0));

    // ── Network ──────────────────────────────────────────────────────────────
    // `received()` / `transmitted()` are deltas since the last refresh.
    // Dividing by the interval gives bytes/second.
    let raw_rx: u64 = networks.iter().map(|(_, d)| d.received()).sum();
    let raw_tx: u64 = networks.iter().map(|(_, d)| d.transmitted()).sum();
    let net_in_transfer: u64 = networks.iter().map(|(_, d)| d.total_received()).sum();
    let net_out_transfer: u64 = networks.iter().map(|(_, d)| d.total_transmitted()).sum();

    let host = HostInfo {
        platform:   System::long_os_version().unwrap_or_default(),
        arch:       std::env::consts::ARCH.to_string(),
        cpu:        sys.cpus().first().map(|c| vec![c.brand().to_string()]).unwrap_or_default(),
        gpu:        Vec::new(),
        mem_total:  sys.total_memory(),
        swap_total: sys.total_swap(),
        disk_total,
        boot_time:  System::boot_time(),
    };

    let state = HostState {
        cpu:              f64::from(sys.global_cpu_usage()),
        mem_used:         sys.used_memory(),
        swap_used:        sys.used_swap(),
        disk_used,
        net_in_speed:     (raw_rx as f64 / interval_secs) as u64,
        net_out_speed:    (raw_tx as f64 / interval_secs) as u64,
        net_in_transfer,
        net_out_transfer,
        uptime:           System::uptime(),
        process_count:    sys.processes().len() as u64,
        tcp_conn_count:   connections::read_connections("tcp"),
        udp_conn_count:   connections::read_connections("udp"),
        gpu:              Vec::new(),
    };

    let last_active = chrono::DateTime::from_timestamp_millis(now)
        .map(|t| t.to_rfc3339())
        .unwrap_or_default();

    ServerRecord {
        id,
        name: name.to_string(),
        last_active,
        host,
        state,
    }
}

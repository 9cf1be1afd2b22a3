use crate::state::Frame;

/// All messages (events) that can flow into the dashboard event loop.
///
/// Sources:
/// - Websocket feed task   → `Connected`, `Frame`, `Disconnected`
/// - Local monitor task    → `Frame`
/// - Config watcher task   → `ConfigReloaded`
/// - Timer                 → `Tick`
#[derive(Debug, Clone)]
pub enum Message {
    // ── Feed ──────────────────────────────────────────────────────────────────
    /// Connection to the upstream feed established.
    Connected,
    /// A decoded frame, paired with the local receipt time in milliseconds.
    Frame { frame: Frame, received_at: i64 },
    /// Upstream connection dropped; the producer will retry.
    Disconnected,

    // ── Config ────────────────────────────────────────────────────────────────
    /// Config file changed on disk; triggers a live reload.
    ConfigReloaded,

    // ── Internal ──────────────────────────────────────────────────────────────
    /// One-second timer tick. Refreshes relative-time displays only.
    Tick,
    /// Graceful shutdown requested.
    Shutdown,
}

use gauge_core::{Frame, GaugeError, Result};
use std::path::Path;

/// Decode one feed message into a [`Frame`].
pub fn decode_frame(raw: &str) -> Result<Frame> {
    serde_json::from_str(raw).map_err(|e| GaugeError::Decode(format!("frame: {e}")))
}

/// Parse a JSON array of frames, newest first (the history endpoint's order).
pub fn parse_history(raw: &str) -> Result<Vec<Frame>> {
    serde_json::from_str(raw).map_err(|e| GaugeError::Decode(format!("history: {e}")))
}

/// Read and parse a history dump from disk.
pub fn load_history_file(path: impl AsRef<Path>) -> Result<Vec<Frame>> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)
        .map_err(|e| GaugeError::Feed(format!("cannot read '{}': {e}", path.display())))?;
    let frames = parse_history(&raw)?;
    tracing::info!(frames = frames.len(), "Loaded history from {}", path.display());
    Ok(frames)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_full_frame() {
        let raw = r#"{
            "now": 1700000005000,
            "servers": [{
                "id": 1,
                "name": "db-1",
                "last_active": "2023-11-14T22:13:25Z",
                "host": { "mem_total": 1024, "gpu": ["A100"] },
                "state": { "cpu": 12.5, "mem_used": 256, "tcp_conn_count": 40, "gpu": [33.0] }
            }]
        }"#;
        let frame = decode_frame(raw).unwrap();
        assert_eq!(frame.now, 1_700_000_005_000);
        let server = frame.server(1).unwrap();
        assert_eq!(server.state.cpu, 12.5);
        assert_eq!(server.mem_percent(), 25.0);
        assert_eq!(server.host.gpu, vec!["A100"]);
        assert_eq!(server.state.gpu, vec![33.0]);
    }

    #[test]
    fn garbage_is_a_decode_error() {
        assert!(matches!(decode_frame("not json"), Err(GaugeError::Decode(_))));
        assert!(matches!(decode_frame(r#"{"servers":[]}"#), Err(GaugeError::Decode(_))));
    }

    #[test]
    fn history_keeps_delivery_order() {
        let raw = r#"[{"now":3000,"servers":[]},{"now":2000,"servers":[]},{"now":1000,"servers":[]}]"#;
        let frames = parse_history(raw).unwrap();
        let stamps: Vec<i64> = frames.iter().map(|f| f.now).collect();
        assert_eq!(stamps, vec![3000, 2000, 1000]);
    }

    #[test]
    fn missing_history_file_is_a_feed_error() {
        assert!(matches!(
            load_history_file("/nonexistent/history.json"),
            Err(GaugeError::Feed(_))
        ));
    }
}

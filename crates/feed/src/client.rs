use crate::frame::decode_frame;
use futures::StreamExt;
use gauge_core::{GaugeError, Message, Result};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message as WsMessage};
use tracing::{debug, error, info, warn};
use url::Url;

/// Initial reconnect delay; doubles after each failed attempt.
const INITIAL_BACKOFF: Duration = Duration::from_secs(1);

/// Websocket client for the telemetry feed.
///
/// Streams decoded frames as [`Message::Frame`], each stamped with the local
/// receipt time.  Automatically reconnects with exponential backoff if the
/// connection drops.
pub struct FeedClient {
    url: Url,
    max_backoff: Duration,
}

impl FeedClient {
    /// Create a client for `url` (`ws://` or `wss://`).
    pub fn new(url: &str, max_backoff_secs: u64) -> Result<Self> {
        let url = Url::parse(url).map_err(|e| GaugeError::Feed(format!("invalid url '{url}': {e}")))?;
        if !matches!(url.scheme(), "ws" | "wss") {
            return Err(GaugeError::Feed(format!(
                "unsupported scheme '{}' (expected ws or wss)",
                url.scheme()
            )));
        }

        Ok(Self {
            url,
            max_backoff: Duration::from_secs(max_backoff_secs.max(1)),
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Spawn a background task that reads from the feed socket and forwards
    /// [`Message`]s on the returned channel.
    ///
    /// The task reconnects automatically and stops once the receiver is dropped.
    pub fn spawn_listener(self) -> mpsc::Receiver<Message> {
        let (tx, rx) = mpsc::channel(32);

        tokio::spawn(async move {
            let mut backoff = INITIAL_BACKOFF;

            loop {
                match connect_async(self.url.as_str()).await {
                    Ok((mut stream, _)) => {
                        info!(url = %self.url, "Connected to telemetry feed");
                        backoff = INITIAL_BACKOFF;
                        if tx.send(Message::Connected).await.is_err() {
                            return;
                        }

                        while let Some(msg) = stream.next().await {
                            let raw = match msg {
                                Ok(WsMessage::Text(text)) => text.as_str().to_owned(),
                                Ok(WsMessage::Binary(bytes)) => match std::str::from_utf8(&bytes) {
                                    Ok(s) => s.to_owned(),
                                    Err(e) => {
                                        warn!("Dropping non-UTF-8 binary frame: {e}");
                                        continue;
                                    }
                                },
                                Ok(WsMessage::Close(_)) => {
                                    info!("Feed closed by upstream");
                                    break;
                                }
                                Ok(_) => continue,
                                Err(e) => {
                                    error!("Feed read error: {e}");
                                    break;
                                }
                            };

                            let received_at = chrono::Utc::now().timestamp_millis();
                            match decode_frame(&raw) {
                                Ok(frame) => {
                                    if tx.send(Message::Frame { frame, received_at }).await.is_err() {
                                        return; // all receivers dropped
                                    }
                                }
                                Err(e) => warn!("Skipping undecodable frame: {e}"),
                            }
                        }

                        if tx.send(Message::Disconnected).await.is_err() {
                            return;
                        }
                        warn!(?backoff, "Feed connection lost; reconnecting");
                    }
                    Err(e) => {
                        error!(?backoff, "Cannot connect to feed: {e}; retrying");
                    }
                }

                if tx.is_closed() {
                    return;
                }
                tokio::time::sleep(backoff).await;
                backoff = next_backoff(backoff, self.max_backoff);
            }
        });

        rx
    }
}

fn next_backoff(current: Duration, max: Duration) -> Duration {
    let next = (current * 2).min(max);
    debug!(?next, "Next reconnect backoff");
    next
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_websocket_urls() {
        assert!(FeedClient::new("http://example.org/ws", 10).is_err());
        assert!(FeedClient::new("not a url", 10).is_err());
        assert!(FeedClient::new("wss://example.org/api/v1/ws/server", 10).is_ok());
    }

    #[test]
    fn backoff_doubles_up_to_cap() {
        let max = Duration::from_secs(5);
        let mut b = INITIAL_BACKOFF;
        let mut seen = Vec::new();
        for _ in 0..4 {
            b = next_backoff(b, max);
            seen.push(b.as_secs());
        }
        assert_eq!(seen, vec![2, 4, 5, 5]);
    }
}

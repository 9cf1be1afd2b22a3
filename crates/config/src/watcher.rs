use gauge_core::Message;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Coalescing window for bursts of filesystem events from a single save.
const SETTLE: Duration = Duration::from_millis(250);

/// Watches the config file and emits [`Message::ConfigReloaded`] after each
/// settled change.
///
/// The parent directory is watched rather than the file itself, so editors
/// that save by renaming a temporary file over the original are still seen.
///
/// Watching stops when this handle is dropped.
pub struct ConfigWatcher {
    task: JoinHandle<()>,
}

impl ConfigWatcher {
    /// Spawn a filesystem watcher for `path`, forwarding reload messages on
    /// `tx`.  The task also stops once `tx`'s receiver is dropped.
    pub fn spawn(path: impl AsRef<Path>, tx: mpsc::Sender<Message>) -> Self {
        let path = path.as_ref().to_path_buf();
        Self { task: tokio::spawn(watch_loop(path, tx)) }
    }
}

impl Drop for ConfigWatcher {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Directory to watch for `path`.  A bare file name lives in the current
/// directory.
fn watch_dir(path: &Path) -> Option<PathBuf> {
    match path.parent() {
        Some(dir) if dir.as_os_str().is_empty() => Some(PathBuf::from(".")),
        Some(dir) => Some(dir.to_path_buf()),
        None => None,
    }
}

async fn watch_loop(path: PathBuf, tx: mpsc::Sender<Message>) {
    use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

    let Some(dir) = watch_dir(&path) else {
        error!("Config path '{}' has no parent directory", path.display());
        return;
    };
    if !dir.exists() {
        warn!("Config directory '{}' missing; live reload disabled", dir.display());
        return;
    }

    let (sync_tx, mut sync_rx) = mpsc::channel::<notify::Result<Event>>(16);

    let mut watcher = match RecommendedWatcher::new(
        move |res| {
            let _ = sync_tx.blocking_send(res);
        },
        Config::default().with_poll_interval(Duration::from_secs(2)),
    ) {
        Ok(w) => w,
        Err(e) => {
            error!("Failed to create filesystem watcher: {e}");
            return;
        }
    };

    if let Err(e) = watcher.watch(&dir, RecursiveMode::NonRecursive) {
        error!("Failed to watch '{}': {e}", dir.display());
        return;
    }

    info!("Watching config file: {}", path.display());

    while let Some(event) = sync_rx.recv().await {
        match event {
            Ok(e) => {
                let touches_config = e.paths.iter().any(|p| p.file_name() == path.file_name());
                if !touches_config || !matches!(e.kind, EventKind::Modify(_) | EventKind::Create(_)) {
                    continue;
                }

                // Drain the rest of the burst before reloading once.
                tokio::time::sleep(SETTLE).await;
                while sync_rx.try_recv().is_ok() {}

                debug!("Config change detected");
                if tx.send(Message::ConfigReloaded).await.is_err() {
                    break; // receiver dropped
                }
            }
            Err(e) => warn!("Watcher error: {e}"),
        }
    }
}

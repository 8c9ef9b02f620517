use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Burst of filesystem events collapsed into one reload notification.
const DEBOUNCE: Duration = Duration::from_millis(250);

/// Watches a config file for changes and sends a notification on every write.
///
/// The parent directory is watched rather than the file itself: editors that
/// save by writing a temp file and renaming it would otherwise detach the
/// watch after the first save.
///
/// # Example
/// ```no_run
/// # async fn demo() {
/// use dash_config::ConfigWatcher;
/// let (_, mut rx) = ConfigWatcher::spawn("/home/user/.config/dash/dash.toml");
/// while rx.recv().await.is_some() {
///     println!("config changed — reloading");
/// }
/// # }
/// ```
pub struct ConfigWatcher {
    path: PathBuf,
}

impl ConfigWatcher {
    /// Spawn a filesystem watcher for `path`.
    /// Returns the watcher handle and a receiver that fires on every detected change.
    pub fn spawn(path: impl AsRef<Path>) -> (Self, mpsc::Receiver<()>) {
        let (tx, rx) = mpsc::channel(1);
        let path = path.as_ref().to_path_buf();
        let watcher = Self { path: path.clone() };

        tokio::spawn(watch_loop(path, tx));

        (watcher, rx)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Whether `event` touches the file named `file_name` in a way worth reloading.
fn is_relevant(event: &notify::Event, file_name: &OsString) -> bool {
    use notify::EventKind::{Create, Modify};

    matches!(event.kind, Modify(_) | Create(_))
        && event
            .paths
            .iter()
            .any(|p| p.file_name().is_some_and(|n| n == file_name.as_os_str()))
}

async fn watch_loop(path: PathBuf, tx: mpsc::Sender<()>) {
    use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};

    let Some(file_name) = path.file_name().map(OsString::from) else {
        error!("Config path '{}' has no file name; not watching", path.display());
        return;
    };
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };

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
        warn!("Failed to watch '{}': {e}; live reload disabled", dir.display());
        return;
    }

    info!("Watching config file: {}", path.display());

    while let Some(event) = sync_rx.recv().await {
        match event {
            Ok(e) if is_relevant(&e, &file_name) => {
                // Swallow the rest of the burst (truncate + write + close).
                tokio::time::sleep(DEBOUNCE).await;
                while sync_rx.try_recv().is_ok() {}

                debug!("Config change detected: {:?}", e.kind);
                if tx.send(()).await.is_err() {
                    break; // receiver dropped
                }
            }
            Ok(_) => {}
            Err(e) => warn!("Watcher error: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, DataChange, EventKind, ModifyKind, RemoveKind};

    fn event(kind: EventKind, path: &str) -> notify::Event {
        notify::Event::new(kind).add_path(PathBuf::from(path))
    }

    #[test]
    fn writes_to_the_config_file_are_relevant() {
        let name = OsString::from("dash.toml");
        let write = event(
            EventKind::Modify(ModifyKind::Data(DataChange::Content)),
            "/cfg/dash/dash.toml",
        );
        let create = event(EventKind::Create(CreateKind::File), "/cfg/dash/dash.toml");
        assert!(is_relevant(&write, &name));
        assert!(is_relevant(&create, &name));
    }

    #[test]
    fn other_files_and_removals_are_ignored() {
        let name = OsString::from("dash.toml");
        let sibling = event(
            EventKind::Modify(ModifyKind::Data(DataChange::Content)),
            "/cfg/dash/dash.toml.swp",
        );
        let removed = event(EventKind::Remove(RemoveKind::File), "/cfg/dash/dash.toml");
        assert!(!is_relevant(&sibling, &name));
        assert!(!is_relevant(&removed, &name));
    }
}

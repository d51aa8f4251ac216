//! Filesystem event source for the watch loop.

use crate::error::{ReloaderError, Result};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher as NotifyWatcher};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// What the observer reports to the watch loop.
#[derive(Debug)]
pub enum ObserverEvent {
    /// Something changed in a watched directory.
    Changed(Vec<PathBuf>),
    /// The underlying watcher reported an error.
    Error(ReloaderError),
}

/// Events discarded by [`FsObserver::drain_pending`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Drained {
    /// Queued events dropped, errors included.
    pub events: usize,
    /// How many of those were watcher errors.
    pub errors: usize,
}

/// Best-effort filesystem observer for a watch target.
///
/// Uses the `notify` crate to watch the target (non-recursively) and forwards
/// events whose containing directory is one of the registered watch
/// directories: the target's parent, plus the target itself when it is a
/// directory. Event delivery is best effort; renames-over, nested directory
/// changes and atomic replaces can be missed, so the watch loop's interval
/// timer stays authoritative.
///
/// Dropping the observer stops watching.
///
/// # Examples
///
/// ```rust,no_run
/// use config_reloader::notify::{FsObserver, ObserverEvent};
///
/// # async fn example() -> config_reloader::error::Result<()> {
/// let mut observer = FsObserver::new("/etc/prometheus/prometheus.yml")?;
///
/// while let Some(event) = observer.next().await {
///     if let ObserverEvent::Changed(paths) = event {
///         println!("changed: {:?}", paths);
///     }
/// }
/// # Ok(())
/// # }
/// ```
pub struct FsObserver {
    _watcher: Option<RecommendedWatcher>,
    events: mpsc::UnboundedReceiver<notify::Result<Event>>,
    watch_dirs: HashSet<PathBuf>,
}

impl FsObserver {
    /// Start observing `target`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying watcher cannot be created or the
    /// target cannot be registered (e.g. it doesn't exist).
    pub fn new(target: impl AsRef<Path>) -> Result<Self> {
        let target = std::path::absolute(target.as_ref()).map_err(|e| {
            ReloaderError::WatchSetup(format!(
                "failed to resolve {}: {}",
                target.as_ref().display(),
                e
            ))
        })?;

        let (event_tx, events) = mpsc::unbounded_channel();
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            let _ = event_tx.send(res);
        })
        .map_err(|e| ReloaderError::WatchSetup(format!("failed to create file watcher: {}", e)))?;

        watcher
            .watch(&target, RecursiveMode::NonRecursive)
            .map_err(|e| {
                ReloaderError::WatchSetup(format!("failed to watch {}: {}", target.display(), e))
            })?;

        let mut watch_dirs = HashSet::new();
        if let Some(parent) = target.parent() {
            watch_dirs.insert(parent.to_path_buf());
        }
        if target.is_dir() {
            watch_dirs.insert(target.clone());
        }
        debug!(target = %target.display(), ?watch_dirs, "registered file watch");

        Ok(Self {
            _watcher: Some(watcher),
            events,
            watch_dirs,
        })
    }

    /// Observer fed from a scripted channel instead of the filesystem.
    #[cfg(test)]
    pub(crate) fn from_receiver(
        events: mpsc::UnboundedReceiver<notify::Result<Event>>,
        watch_dirs: impl IntoIterator<Item = PathBuf>,
    ) -> Self {
        Self {
            _watcher: None,
            events,
            watch_dirs: watch_dirs.into_iter().collect(),
        }
    }

    /// Wait for the next relevant event.
    ///
    /// Events outside the watch directories, and access-only events, are
    /// skipped. Returns `None` only if the underlying watcher has shut down.
    pub async fn next(&mut self) -> Option<ObserverEvent> {
        loop {
            match self.events.recv().await? {
                Ok(event) => {
                    if is_relevant(&event, &self.watch_dirs) {
                        return Some(ObserverEvent::Changed(event.paths));
                    }
                }
                Err(err) => {
                    return Some(ObserverEvent::Error(ReloaderError::Observer(err.to_string())));
                }
            }
        }
    }

    /// Discard events already queued.
    ///
    /// Used to coalesce a burst of events into a single cycle. Watcher errors
    /// in the burst are logged and counted.
    pub fn drain_pending(&mut self) -> Drained {
        let mut drained = Drained::default();
        while let Ok(res) = self.events.try_recv() {
            if let Err(err) = res {
                warn!(error = %err, "watch error");
                drained.errors += 1;
            }
            drained.events += 1;
        }
        drained
    }
}

/// Whether an event should trigger a cycle.
///
/// Access events are ignored: digesting the target opens it, which would
/// otherwise feed back into the loop.
fn is_relevant(event: &Event, watch_dirs: &HashSet<PathBuf>) -> bool {
    if matches!(event.kind, EventKind::Access(_)) {
        return false;
    }

    event
        .paths
        .iter()
        .filter_map(|path| path.parent())
        .any(|dir| watch_dirs.contains(dir))
}

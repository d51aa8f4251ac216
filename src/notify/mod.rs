//! Change observation and reload notification.
//!
//! Provides the filesystem observer that wakes the watch loop and the
//! notifier that tells the downstream service to reload.

pub mod watcher;
pub mod webhook;

pub use watcher::{Drained, FsObserver, ObserverEvent};
pub use webhook::{DEFAULT_REQUEST_TIMEOUT, HttpNotifier, Notifier, parse_reload_url};

//! # config-reloader
//!
//! Watches a configuration file or directory and triggers an HTTP reload of a
//! downstream service whenever the content changes.
//!
//! ## Overview
//!
//! `config-reloader` is meant to run as a sidecar next to a process (for
//! example a Prometheus server) that exposes a reload endpoint but cannot
//! watch its own files. It combines:
//! - A content digest over every file under the target, including paths
//! - A change gate that only lets a reload through when the digest differs
//! - A webhook notifier sending an empty `POST`, where only `200` counts
//! - A watch loop driven by filesystem events with an interval timer backstop
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use config_reloader::prelude::*;
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> config_reloader::error::Result<()> {
//! let reloader = Reloader::builder()
//!     .with_target("/etc/prometheus")
//!     .with_reload_url("http://localhost:9090/-/reload")
//!     .with_watch_interval(Duration::from_secs(180))
//!     .build()?;
//!
//! let token = CancellationToken::new();
//! reloader.run(token).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Failure policy
//!
//! A failed digest or a rejected reload stops the loop with an error and
//! leaves the committed digest untouched, so a restarted process retries the
//! same reload. Filesystem observer errors are only logged.
//!
//! ## Feature Flags
//!
//! - `metrics`: OpenTelemetry counters for cycles and reloads

#![warn(missing_docs, rust_2024_compatibility)]
#![deny(unsafe_code)]

pub mod cli;
pub mod core;
pub mod digest;
pub mod duration;
pub mod error;
pub mod logging;
pub mod notify;

#[cfg(feature = "metrics")]
pub mod metrics;

/// Convenient re-exports for common usage patterns.
pub mod prelude {
    pub use crate::core::{ChangeGate, CycleOutcome, Reloader, ReloaderBuilder};
    pub use crate::digest::{ContentDigest, ContentDigester};
    pub use crate::error::{ErrorClass, ReloaderError, Result};
    pub use crate::notify::{HttpNotifier, Notifier};
}

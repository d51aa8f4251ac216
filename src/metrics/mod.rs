//! Built-in metrics for the watch loop.
//!
//! Provides OpenTelemetry metrics tracking:
//! - Cycles run
//! - Reload attempts/success/failures
//! - Reload request duration
//! - Time since the last successful reload
//! - Filesystem observer errors
//!
//! # Examples
//!
//! ```rust,no_run
//! use config_reloader::prelude::*;
//! use opentelemetry::global;
//!
//! # fn example() -> Result<()> {
//! let meter = global::meter("config-reloader");
//!
//! let reloader = Reloader::builder()
//!     .with_target("/etc/prometheus/prometheus.yml")
//!     .with_reload_url("http://localhost:9090/-/reload")
//!     .with_metrics(meter)
//!     .build()?;
//! # Ok(())
//! # }
//! ```

mod reload_metrics;

pub use reload_metrics::ReloadMetrics;

//! Builder for constructing Reloader instances.

use crate::core::Reloader;
use crate::error::{ReloaderError, Result};
use crate::notify::{DEFAULT_REQUEST_TIMEOUT, HttpNotifier, Notifier};
use std::path::PathBuf;
use std::time::Duration;

#[cfg(feature = "metrics")]
use crate::metrics::ReloadMetrics;

/// Default interval between polls when no filesystem event arrives.
pub const DEFAULT_WATCH_INTERVAL: Duration = Duration::from_secs(3 * 60);

/// Builder for constructing a [`Reloader`].
///
/// # Examples
///
/// ```rust,no_run
/// use config_reloader::prelude::*;
/// use std::time::Duration;
///
/// # fn example() -> Result<()> {
/// let reloader = Reloader::builder()
///     .with_target("/etc/prometheus/rules")
///     .with_reload_url("http://localhost:9090/-/reload")
///     .with_watch_interval(Duration::from_secs(60))
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct ReloaderBuilder {
    target: Option<PathBuf>,
    reload_url: Option<String>,
    watch_interval: Duration,
    request_timeout: Duration,
    notifier: Option<Box<dyn Notifier>>,
    #[cfg(feature = "metrics")]
    metrics: Option<ReloadMetrics>,
}

impl ReloaderBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            target: None,
            reload_url: None,
            watch_interval: DEFAULT_WATCH_INTERVAL,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            notifier: None,
            #[cfg(feature = "metrics")]
            metrics: None,
        }
    }

    /// Set the file or directory to watch.
    pub fn with_target(mut self, path: impl Into<PathBuf>) -> Self {
        self.target = Some(path.into());
        self
    }

    /// Set the URL that receives the reload `POST`.
    pub fn with_reload_url(mut self, url: impl Into<String>) -> Self {
        self.reload_url = Some(url.into());
        self
    }

    /// Set how often the target is re-digested absent filesystem events.
    ///
    /// Default is 3 minutes.
    pub fn with_watch_interval(mut self, interval: Duration) -> Self {
        self.watch_interval = interval;
        self
    }

    /// Set the timeout for each reload request.
    ///
    /// Default is 30 seconds. Ignored when a custom notifier is supplied.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Use a custom notifier instead of the HTTP webhook.
    ///
    /// When set, no reload URL is required.
    pub fn with_notifier<N: Notifier + 'static>(mut self, notifier: N) -> Self {
        self.notifier = Some(Box::new(notifier));
        self
    }

    /// Record OpenTelemetry metrics for cycles and reloads.
    #[cfg(feature = "metrics")]
    pub fn with_metrics(mut self, meter: opentelemetry::metrics::Meter) -> Self {
        self.metrics = Some(ReloadMetrics::new(meter));
        self
    }

    /// Build the reloader.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No target is provided, or the target path is empty
    /// - The watch interval is zero
    /// - No notifier is supplied and the reload URL is missing or invalid
    /// - The HTTP client cannot be constructed
    pub fn build(self) -> Result<Reloader> {
        let target = self
            .target
            .filter(|path| !path.as_os_str().is_empty())
            .ok_or_else(|| ReloaderError::InvalidConfig("watch target is required".to_string()))?;

        if self.watch_interval.is_zero() {
            return Err(ReloaderError::InvalidConfig(
                "watch interval must be greater than zero".to_string(),
            ));
        }

        let notifier: Box<dyn Notifier> = match self.notifier {
            Some(notifier) => notifier,
            None => {
                let url = self.reload_url.ok_or_else(|| {
                    ReloaderError::InvalidConfig("reload URL is required".to_string())
                })?;
                Box::new(HttpNotifier::new(&url, self.request_timeout)?)
            }
        };

        let reloader = Reloader::with_notifier(target, self.watch_interval, notifier);

        #[cfg(feature = "metrics")]
        let reloader = match self.metrics {
            Some(metrics) => reloader.with_metrics(metrics),
            None => reloader,
        };

        Ok(reloader)
    }
}

impl Default for ReloaderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expect_invalid(builder: ReloaderBuilder) {
        match builder.build() {
            Err(ReloaderError::InvalidConfig(_)) => {}
            Err(other) => panic!("expected InvalidConfig, got {other:?}"),
            Ok(_) => panic!("expected InvalidConfig, got a reloader"),
        }
    }

    #[test]
    fn test_defaults() {
        let builder = ReloaderBuilder::new();
        assert_eq!(builder.watch_interval, DEFAULT_WATCH_INTERVAL);
        assert_eq!(builder.request_timeout, DEFAULT_REQUEST_TIMEOUT);
        assert!(builder.target.is_none());
    }

    #[test]
    fn test_build() {
        let reloader = ReloaderBuilder::new()
            .with_target("config.yaml")
            .with_reload_url("http://localhost:9090/-/reload")
            .with_watch_interval(Duration::from_secs(5))
            .build()
            .unwrap();

        assert_eq!(reloader.target(), std::path::Path::new("config.yaml"));
        assert_eq!(reloader.watch_interval(), Duration::from_secs(5));
        assert!(reloader.last_digest().is_none());
    }

    #[test]
    fn test_missing_target() {
        expect_invalid(ReloaderBuilder::new().with_reload_url("http://localhost/-/reload"));
        expect_invalid(
            ReloaderBuilder::new()
                .with_target("")
                .with_reload_url("http://localhost/-/reload"),
        );
    }

    #[test]
    fn test_zero_interval() {
        expect_invalid(
            ReloaderBuilder::new()
                .with_target("config.yaml")
                .with_reload_url("http://localhost/-/reload")
                .with_watch_interval(Duration::ZERO),
        );
    }

    #[test]
    fn test_missing_or_invalid_url() {
        expect_invalid(ReloaderBuilder::new().with_target("config.yaml"));
        expect_invalid(
            ReloaderBuilder::new()
                .with_target("config.yaml")
                .with_reload_url("not a url"),
        );
    }
}

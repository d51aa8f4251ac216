//! Reload metrics tracking using OpenTelemetry.

use opentelemetry::metrics::{Counter, Gauge, Histogram, Meter};
use std::sync::Arc;
use std::time::Instant;

/// Metrics collector for the watch loop.
///
/// # Examples
///
/// ```rust,no_run
/// use config_reloader::metrics::ReloadMetrics;
/// use opentelemetry::global;
///
/// let meter = global::meter("config-reloader");
/// let metrics = ReloadMetrics::new(meter);
///
/// metrics.record_cycle();
/// let timer = metrics.start_reload();
/// // ... send the reload request ...
/// metrics.record_reload_success(timer);
/// ```
#[derive(Clone)]
pub struct ReloadMetrics {
    cycles: Counter<u64>,
    reload_attempts: Counter<u64>,
    reload_success: Counter<u64>,
    reload_failures: Counter<u64>,
    reload_duration: Histogram<f64>,
    reload_age_seconds: Gauge<i64>,
    observer_errors: Counter<u64>,
    last_reload: Arc<parking_lot::Mutex<Option<Instant>>>,
}

impl ReloadMetrics {
    /// Create a new metrics collector with the provided meter.
    pub fn new(meter: Meter) -> Self {
        let cycles = meter
            .u64_counter("config_reloader.cycles")
            .with_description("Number of digest cycles run")
            .build();

        let reload_attempts = meter
            .u64_counter("config_reloader.reload.attempts")
            .with_description("Total number of reload requests sent")
            .build();

        let reload_success = meter
            .u64_counter("config_reloader.reload.success")
            .with_description("Number of reload requests answered with 200")
            .build();

        let reload_failures = meter
            .u64_counter("config_reloader.reload.failures")
            .with_description("Number of failed reload requests")
            .build();

        let reload_duration = meter
            .f64_histogram("config_reloader.reload.duration")
            .with_description("Duration of reload requests in seconds")
            .with_unit("s")
            .build();

        let reload_age_seconds = meter
            .i64_gauge("config_reloader.reload.age")
            .with_description("Time since the last successful reload in seconds")
            .with_unit("s")
            .build();

        let observer_errors = meter
            .u64_counter("config_reloader.observer.errors")
            .with_description("Number of errors reported by the filesystem observer")
            .build();

        Self {
            cycles,
            reload_attempts,
            reload_success,
            reload_failures,
            reload_duration,
            reload_age_seconds,
            observer_errors,
            last_reload: Arc::new(parking_lot::Mutex::new(None)),
        }
    }

    /// Record that a cycle started.
    pub fn record_cycle(&self) {
        self.cycles.add(1, &[]);
        self.update_reload_age();
    }

    /// Start a reload request timer.
    ///
    /// Pass the returned `Instant` to `record_reload_success` or
    /// `record_reload_failure` when the request completes.
    pub fn start_reload(&self) -> Instant {
        self.reload_attempts.add(1, &[]);
        Instant::now()
    }

    /// Record a reload request answered with 200.
    pub fn record_reload_success(&self, start: Instant) {
        self.reload_success.add(1, &[]);
        self.reload_duration.record(start.elapsed().as_secs_f64(), &[]);
        *self.last_reload.lock() = Some(Instant::now());
        self.update_reload_age();
    }

    /// Record a failed reload request.
    pub fn record_reload_failure(&self, start: Instant) {
        self.reload_failures.add(1, &[]);
        self.reload_duration.record(start.elapsed().as_secs_f64(), &[]);
    }

    /// Record errors reported by the filesystem observer.
    pub fn record_observer_errors(&self, count: u64) {
        if count > 0 {
            self.observer_errors.add(count, &[]);
        }
    }

    /// Update the reload age gauge. No-op until the first successful reload.
    pub fn update_reload_age(&self) {
        if let Some(last) = *self.last_reload.lock() {
            self.reload_age_seconds
                .record(last.elapsed().as_secs() as i64, &[]);
        }
    }
}

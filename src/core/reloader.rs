//! The watch loop: digest, compare, notify.

use crate::core::{ChangeGate, ReloaderBuilder};
use crate::digest::{ContentDigest, ContentDigester};
use crate::error::{ReloaderError, Result};
use crate::notify::{FsObserver, Notifier, ObserverEvent};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

#[cfg(feature = "metrics")]
use crate::metrics::ReloadMetrics;

/// Deadline used when the first tick would overflow the clock.
const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

/// Result of a single cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The digest matched the last committed one; nothing was sent.
    Unchanged,
    /// A reload was accepted and the digest committed.
    Reloaded(ContentDigest),
}

/// Watches a configuration target and triggers reloads when it changes.
///
/// Each cycle digests the target, compares the digest with the last one that
/// was successfully announced, and on a difference notifies the reload
/// endpoint. The digest is committed only after the endpoint accepts the
/// reload. Cycles are triggered at startup, on every watch interval tick, and
/// on filesystem events in the watched directories; they never overlap.
///
/// The reloader owns its state exclusively; [`run`] consumes it.
///
/// # Examples
///
/// ```rust,no_run
/// use config_reloader::prelude::*;
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example() -> Result<()> {
/// let reloader = Reloader::builder()
///     .with_target("/etc/prometheus/prometheus.yml")
///     .with_reload_url("http://localhost:9090/-/reload")
///     .build()?;
///
/// let token = CancellationToken::new();
/// reloader.run(token).await?;
/// # Ok(())
/// # }
/// ```
///
/// [`run`]: Reloader::run
pub struct Reloader {
    target: PathBuf,
    watch_interval: Duration,
    digester: ContentDigester,
    gate: ChangeGate,
    notifier: Box<dyn Notifier>,
    #[cfg(feature = "metrics")]
    metrics: Option<ReloadMetrics>,
}

impl Reloader {
    /// Create a new builder for constructing a reloader.
    pub fn builder() -> ReloaderBuilder {
        ReloaderBuilder::new()
    }

    /// Create a reloader from already-validated parts.
    pub(crate) fn with_notifier(
        target: PathBuf,
        watch_interval: Duration,
        notifier: Box<dyn Notifier>,
    ) -> Self {
        Self {
            digester: ContentDigester::new(&target),
            target,
            watch_interval,
            gate: ChangeGate::new(),
            notifier,
            #[cfg(feature = "metrics")]
            metrics: None,
        }
    }

    /// Attach a metrics collector.
    #[cfg(feature = "metrics")]
    pub(crate) fn with_metrics(mut self, metrics: ReloadMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// The watched file or directory.
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// The polling interval.
    pub fn watch_interval(&self) -> Duration {
        self.watch_interval
    }

    /// The digest of the last successful reload, if any.
    pub fn last_digest(&self) -> Option<&ContentDigest> {
        self.gate.last_digest()
    }

    /// Run one cycle: digest the target and, if it changed, notify.
    ///
    /// Cancelling `token` aborts an in-flight reload request.
    ///
    /// # Errors
    ///
    /// Returns an error if the target cannot be digested, if the reload is
    /// rejected or fails, or if `token` is cancelled during the request. The
    /// committed digest is unchanged in every error case.
    pub async fn run_cycle(&mut self, token: &CancellationToken) -> Result<CycleOutcome> {
        #[cfg(feature = "metrics")]
        if let Some(metrics) = &self.metrics {
            metrics.record_cycle();
        }

        let digester = self.digester.clone();
        let digest = tokio::task::spawn_blocking(move || digester.digest())
            .await
            .map_err(|e| ReloaderError::DigestTask(e.to_string()))??;

        if !self.gate.should_notify(&digest) {
            debug!(%digest, "config unchanged");
            return Ok(CycleOutcome::Unchanged);
        }

        debug!(%digest, endpoint = %self.notifier.endpoint(), "config changed, triggering reload");

        #[cfg(feature = "metrics")]
        let timer = self.metrics.as_ref().map(ReloadMetrics::start_reload);

        let result = tokio::select! {
            biased;
            _ = token.cancelled() => Err(ReloaderError::Cancelled),
            res = self.notifier.notify() => res,
        };

        #[cfg(feature = "metrics")]
        if let (Some(metrics), Some(timer)) = (&self.metrics, timer) {
            match &result {
                Ok(()) => metrics.record_reload_success(timer),
                Err(_) => metrics.record_reload_failure(timer),
            }
        }

        result?;
        self.gate.commit(digest);
        info!(%digest, "Reload triggered");
        Ok(CycleOutcome::Reloaded(digest))
    }

    /// Watch the target until `token` is cancelled or a cycle fails.
    ///
    /// Registers a filesystem observer, runs one cycle immediately, then runs
    /// a cycle on every interval tick and on every relevant filesystem event.
    /// Observer errors are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The filesystem observer cannot be set up
    /// - Any cycle fails (digest or reload); the loop stops immediately
    /// - `token` is cancelled while a reload request is in flight
    ///
    /// Cancellation while waiting for the next trigger returns `Ok(())`.
    pub async fn run(self, token: CancellationToken) -> Result<()> {
        let observer = FsObserver::new(&self.target)?;
        self.watch(observer, token).await
    }

    /// Run the loop against an already registered observer.
    pub(crate) async fn watch(
        mut self,
        mut observer: FsObserver,
        token: CancellationToken,
    ) -> Result<()> {
        self.run_cycle(&token).await?;

        let period = self.watch_interval;
        let mut ticker = time::interval_at(first_tick(Instant::now(), period), period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(cfg = %self.target.display(), interval = ?period, "started watching config for changes");

        loop {
            tokio::select! {
                biased;
                _ = token.cancelled() => {
                    info!("stopped watching config");
                    return Ok(());
                }
                _ = ticker.tick() => {
                    debug!("watch interval elapsed");
                }
                Some(event) = observer.next() => match event {
                    ObserverEvent::Changed(paths) => {
                        let drained = observer.drain_pending();
                        debug!(?paths, coalesced = drained.events, "filesystem change observed");
                        #[cfg(feature = "metrics")]
                        if let Some(metrics) = &self.metrics {
                            metrics.record_observer_errors(drained.errors as u64);
                        }
                    }
                    ObserverEvent::Error(err) => {
                        warn!(error = %err, "watch error");
                        #[cfg(feature = "metrics")]
                        if let Some(metrics) = &self.metrics {
                            metrics.record_observer_errors(1);
                        }
                        continue;
                    }
                },
            }

            self.run_cycle(&token).await?;
        }
    }
}

/// When the interval timer first fires.
///
/// Saturates to a far-future deadline for intervals the clock cannot represent.
fn first_tick(now: Instant, period: Duration) -> Instant {
    now.checked_add(period)
        .or_else(|| now.checked_add(FAR_FUTURE))
        .unwrap_or(now)
}

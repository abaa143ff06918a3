//! Active health checking.
//!
//! # Responsibilities
//! - Periodically probe candidates over TCP or HTTP
//! - Reset the marker of a candidate that answers, mark the one that does not

use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::{broadcast, watch};
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{self, MissedTickBehavior};

use crate::candidate::{marker_of, Candidate};
use crate::health::probe::{probe_http, probe_tcp, ProbeError};
use crate::lifecycle::Shutdown;
use crate::observability::metrics;

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(30);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_EXPECT_STATUS: u16 = 200;

/// How a candidate is probed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckType {
    #[default]
    Tcp,
    Http,
}

impl CheckType {
    /// `"http"` selects HTTP, anything else TCP.
    pub fn from_name(name: &str) -> Self {
        if name.trim().eq_ignore_ascii_case("http") {
            CheckType::Http
        } else {
            CheckType::Tcp
        }
    }
}

impl FromStr for CheckType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_name(s))
    }
}

impl fmt::Display for CheckType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckType::Tcp => f.write_str("tcp"),
            CheckType::Http => f.write_str("http"),
        }
    }
}

/// Normalised health check settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthCheckSettings {
    pub interval: Duration,
    pub timeout: Duration,
    pub check_type: CheckType,
    pub path: String,
    /// `None` accepts any 2xx/3xx status.
    pub expect_status: Option<u16>,
}

impl Default for HealthCheckSettings {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            timeout: DEFAULT_TIMEOUT,
            check_type: CheckType::Tcp,
            path: "/".to_string(),
            expect_status: Some(DEFAULT_EXPECT_STATUS),
        }
    }
}

/// Builder for [`HealthChecker`].
#[derive(Debug, Clone, Default)]
pub struct HealthCheckerBuilder {
    settings: HealthCheckSettings,
}

impl HealthCheckerBuilder {
    pub fn interval(mut self, interval: Duration) -> Self {
        self.settings.interval = interval;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.settings.timeout = timeout;
        self
    }

    pub fn check_type(mut self, check_type: CheckType) -> Self {
        self.settings.check_type = check_type;
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.settings.path = path.into();
        self
    }

    /// Expected HTTP status; `0` accepts any 2xx/3xx.
    pub fn expect_status(mut self, status: u16) -> Self {
        self.settings.expect_status = (status != 0).then_some(status);
        self
    }

    pub fn build(self) -> HealthChecker {
        HealthChecker::new(self.settings)
    }
}

/// Counts from one probe pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassSummary {
    pub healthy: usize,
    pub unhealthy: usize,
    pub skipped: usize,
}

struct Prober {
    settings: HealthCheckSettings,
    client: Option<reqwest::Client>,
}

impl Prober {
    async fn check_all<T>(self: &Arc<Self>, candidates: &[T]) -> PassSummary
    where
        T: Candidate + Clone + 'static,
    {
        let mut tasks = JoinSet::new();
        for candidate in candidates.iter().cloned() {
            let prober = self.clone();
            tasks.spawn(async move { prober.check(&candidate).await });
        }

        let mut summary = PassSummary::default();
        while let Some(result) = tasks.join_next().await {
            match result {
                Ok(Some(true)) => summary.healthy += 1,
                Ok(Some(false)) => summary.unhealthy += 1,
                Ok(None) => summary.skipped += 1,
                Err(e) => {
                    tracing::error!(error = %e, "health check task failed");
                    summary.skipped += 1;
                }
            }
        }
        summary
    }

    /// Probe one candidate. `None` if it has no address or no marker.
    async fn check<T: Candidate>(&self, candidate: &T) -> Option<bool> {
        let address = candidate
            .as_addressable()
            .map(|a| a.address().to_string())
            .filter(|a| !a.is_empty())?;
        let marker = marker_of(candidate)?;

        let result = match self.settings.check_type {
            CheckType::Http => match &self.client {
                Some(client) => {
                    probe_http(
                        client,
                        &address,
                        &self.settings.path,
                        self.settings.expect_status,
                        self.settings.timeout,
                    )
                    .await
                }
                None => Err(ProbeError::ClientUnavailable),
            },
            CheckType::Tcp => probe_tcp(&address, self.settings.timeout).await,
        };

        let healthy = match result {
            Ok(()) => {
                marker.reset();
                tracing::debug!(address = %address, "health check passed");
                true
            }
            Err(e) => {
                marker.mark();
                tracing::debug!(address = %address, error = %e, "health check failed");
                false
            }
        };
        metrics::record_health_check(&address, healthy, marker.count());
        Some(healthy)
    }
}

/// Background prober keeping candidate markers current.
///
/// Each pass probes every candidate concurrently and waits for all of them
/// before the next tick. [`stop`](Self::stop) is observed between passes; a
/// probe in flight runs until it finishes or times out.
pub struct HealthChecker {
    prober: Arc<Prober>,
    stop_tx: Mutex<Option<watch::Sender<bool>>>,
}

impl HealthChecker {
    /// Create a checker. Zero durations fall back to the defaults.
    pub fn new(mut settings: HealthCheckSettings) -> Self {
        if settings.interval.is_zero() {
            settings.interval = DEFAULT_INTERVAL;
        }
        if settings.timeout.is_zero() {
            settings.timeout = DEFAULT_TIMEOUT;
        }
        if settings.path.is_empty() {
            settings.path = "/".to_string();
        }

        let client = match reqwest::Client::builder()
            .timeout(settings.timeout)
            .danger_accept_invalid_certs(true)
            .no_proxy()
            .build()
        {
            Ok(client) => Some(client),
            Err(e) => {
                tracing::error!(error = %e, "failed to build health check http client");
                None
            }
        };

        Self {
            prober: Arc::new(Prober { settings, client }),
            stop_tx: Mutex::new(None),
        }
    }

    pub fn builder() -> HealthCheckerBuilder {
        HealthCheckerBuilder::default()
    }

    pub fn settings(&self) -> &HealthCheckSettings {
        &self.prober.settings
    }

    /// Spawn the probe loop over `candidates` on the current tokio runtime.
    ///
    /// The first pass runs immediately. Starting again without
    /// [`stop`](Self::stop) replaces the stop handle, which ends the previous
    /// loop after its current pass.
    pub fn start<T>(&self, candidates: Vec<T>) -> JoinHandle<()>
    where
        T: Candidate + Clone + 'static,
    {
        self.spawn(candidates, None)
    }

    /// Like [`start`](Self::start), but the loop also exits when `shutdown`
    /// is triggered.
    pub fn start_with_shutdown<T>(
        &self,
        candidates: Vec<T>,
        shutdown: &Shutdown,
    ) -> JoinHandle<()>
    where
        T: Candidate + Clone + 'static,
    {
        self.spawn(candidates, Some(shutdown.subscribe()))
    }

    fn spawn<T>(
        &self,
        candidates: Vec<T>,
        shutdown: Option<broadcast::Receiver<()>>,
    ) -> JoinHandle<()>
    where
        T: Candidate + Clone + 'static,
    {
        let (stop_tx, stop_rx) = watch::channel(false);
        *self.stop_tx.lock().unwrap_or_else(|e| e.into_inner()) = Some(stop_tx);

        tracing::info!(
            interval = ?self.prober.settings.interval,
            check_type = %self.prober.settings.check_type,
            candidates = candidates.len(),
            "health checker starting"
        );

        let prober = self.prober.clone();
        tokio::spawn(run(prober, candidates, stop_rx, shutdown))
    }

    /// Signal the loop to exit. Safe to call any number of times.
    pub fn stop(&self) {
        if let Some(tx) = self.stop_tx.lock().unwrap_or_else(|e| e.into_inner()).take() {
            let _ = tx.send(true);
        }
    }

    /// Run a single probe pass and wait for it.
    pub async fn check_all<T>(&self, candidates: &[T]) -> PassSummary
    where
        T: Candidate + Clone + 'static,
    {
        self.prober.check_all(candidates).await
    }
}

impl Default for HealthChecker {
    fn default() -> Self {
        Self::new(HealthCheckSettings::default())
    }
}

impl Drop for HealthChecker {
    fn drop(&mut self) {
        self.stop();
    }
}

impl fmt::Debug for HealthChecker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HealthChecker")
            .field("settings", &self.prober.settings)
            .finish()
    }
}

async fn run<T>(
    prober: Arc<Prober>,
    candidates: Vec<T>,
    mut stop: watch::Receiver<bool>,
    mut shutdown: Option<broadcast::Receiver<()>>,
) where
    T: Candidate + Clone + 'static,
{
    let mut ticker = time::interval(prober.settings.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            changed = stop.changed() => {
                // a dropped sender means the checker is gone or restarted
                if changed.is_err() || *stop.borrow() {
                    break;
                }
            }
            _ = shutdown_signal(&mut shutdown) => break,
            _ = ticker.tick() => {
                let summary = prober.check_all(&candidates).await;
                tracing::debug!(
                    healthy = summary.healthy,
                    unhealthy = summary.unhealthy,
                    skipped = summary.skipped,
                    "health check pass complete"
                );
            }
        }
    }

    tracing::info!("health checker stopped");
}

/// Resolves once shutdown is triggered or its sender is gone; never without
/// a receiver.
async fn shutdown_signal(shutdown: &mut Option<broadcast::Receiver<()>>) {
    match shutdown {
        Some(rx) => {
            let _ = rx.recv().await;
        }
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = HealthCheckSettings::default();
        assert_eq!(settings.interval, Duration::from_secs(30));
        assert_eq!(settings.timeout, Duration::from_secs(5));
        assert_eq!(settings.check_type, CheckType::Tcp);
        assert_eq!(settings.expect_status, Some(200));
    }

    #[test]
    fn test_zero_durations_coerced() {
        let checker = HealthChecker::builder()
            .interval(Duration::ZERO)
            .timeout(Duration::ZERO)
            .path("")
            .build();
        assert_eq!(checker.settings().interval, DEFAULT_INTERVAL);
        assert_eq!(checker.settings().timeout, DEFAULT_TIMEOUT);
        assert_eq!(checker.settings().path, "/");
    }

    #[test]
    fn test_expect_status_zero_means_any() {
        let checker = HealthChecker::builder().expect_status(0).build();
        assert_eq!(checker.settings().expect_status, None);
    }

    #[test]
    fn test_check_type_from_name() {
        assert_eq!(CheckType::from_name("HTTP"), CheckType::Http);
        assert_eq!(CheckType::from_name("tcp"), CheckType::Tcp);
        assert_eq!(CheckType::from_name("icmp"), CheckType::Tcp);
    }

    #[test]
    fn test_stop_without_start_is_noop() {
        let checker = HealthChecker::default();
        checker.stop();
        checker.stop();
    }
}

//! Periodic expiry sweep over registered caches
//!
//! The janitor owns one background task that calls
//! [`Sweepable::sweep_expired`] on every registered cache once per interval.
//! Caches are swept one after another, each under its own lock, and each
//! cache's counters are logged after its sweep. The task is cancelled by
//! [`Janitor::stop`] or when the janitor is dropped.

use std::sync::Arc;
use std::time::Duration;

use predcache_common::cache::utils::MetricsReporter;
use predcache_common::cache::Sweepable;
use predcache_common::time::{Interval, IntervalConfig};
use predcache_domain::JanitorConfig;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use super::error::{SchedulerError, SchedulerResult};

/// Type alias for task handle to avoid complexity warnings
type TaskHandle = Arc<Mutex<Option<JoinHandle<()>>>>;

/// How long `stop` waits for the sweep task to finish
const STOP_TIMEOUT: Duration = Duration::from_secs(5);

/// Entries removed from each cache by one sweep
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Cache name and removed count, in registration order
    pub per_cache: Vec<(String, usize)>,
}

impl SweepReport {
    /// Entries removed across all caches
    pub fn total(&self) -> usize {
        self.per_cache.iter().map(|(_, removed)| removed).sum()
    }

    /// Entries removed from the named cache, if it was swept
    pub fn removed_from(&self, cache: &str) -> Option<usize> {
        self.per_cache.iter().find(|(name, _)| name == cache).map(|(_, removed)| *removed)
    }
}

/// Background expiry sweeper with lifecycle management
pub struct Janitor {
    interval: Duration,
    jitter: Duration,
    caches: Vec<Arc<dyn Sweepable>>,
    cancellation_token: CancellationToken,
    task_handle: TaskHandle,
}

impl Janitor {
    /// Create a janitor sweeping every `interval`
    ///
    /// # Errors
    /// Returns `SchedulerError::InvalidSchedule` for a zero interval.
    pub fn new(interval: Duration) -> SchedulerResult<Self> {
        if interval.is_zero() {
            return Err(SchedulerError::InvalidSchedule("interval must be greater than zero".into()));
        }
        Ok(Self {
            interval,
            jitter: Duration::ZERO,
            caches: Vec::new(),
            cancellation_token: CancellationToken::new(),
            task_handle: Arc::new(Mutex::new(None)),
        })
    }

    /// Create a janitor from configuration
    ///
    /// # Errors
    /// Returns `SchedulerError::InvalidSchedule` for a zero interval.
    pub fn from_config(config: &JanitorConfig) -> SchedulerResult<Self> {
        Ok(Self::new(config.interval())?.with_jitter(config.jitter()))
    }

    /// Spread each tick by up to `jitter` either side of the interval
    pub fn with_jitter(mut self, jitter: Duration) -> Self {
        self.jitter = jitter.min(self.interval);
        self
    }

    /// Add a cache to sweep
    ///
    /// Caches registered while the janitor is running are picked up on the
    /// next `start`.
    pub fn register(&mut self, cache: Arc<dyn Sweepable>) {
        debug!(cache = cache.cache_name(), "Registered cache with janitor");
        self.caches.push(cache);
    }

    /// Number of registered caches
    pub fn cache_count(&self) -> usize {
        self.caches.len()
    }

    /// Base period between sweeps, before jitter
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Start the sweep task
    ///
    /// # Errors
    /// Returns `SchedulerError::AlreadyRunning` if the task is active.
    #[instrument(skip(self), fields(caches = self.caches.len()))]
    pub async fn start(&mut self) -> SchedulerResult<()> {
        if self.is_running().await {
            return Err(SchedulerError::AlreadyRunning);
        }
        if self.caches.is_empty() {
            warn!("Starting janitor with no registered caches");
        }

        // Fresh token so a stopped janitor can be restarted
        self.cancellation_token = CancellationToken::new();

        let caches = self.caches.clone();
        let interval = self.build_interval();
        let cancel = self.cancellation_token.clone();

        let handle = tokio::spawn(async move {
            Self::sweep_loop(caches, interval, cancel).await;
        });

        *self.task_handle.lock().await = Some(handle);

        info!(interval_secs = self.interval.as_secs_f64(), "Janitor started");

        Ok(())
    }

    /// Stop the sweep task and wait for it to finish
    ///
    /// # Errors
    /// Returns `SchedulerError::NotRunning` if there is no active task,
    /// `SchedulerError::Timeout` if it does not finish in time, and
    /// `SchedulerError::TaskJoinFailed` if it panicked.
    #[instrument(skip(self))]
    pub async fn stop(&mut self) -> SchedulerResult<()> {
        if !self.is_running().await {
            return Err(SchedulerError::NotRunning);
        }

        self.cancellation_token.cancel();

        if let Some(handle) = self.task_handle.lock().await.take() {
            match tokio::time::timeout(STOP_TIMEOUT, handle).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    warn!(error = %e, "Janitor task panicked");
                    return Err(SchedulerError::TaskJoinFailed(e.to_string()));
                }
                Err(_) => {
                    warn!("Janitor task did not complete within timeout");
                    return Err(SchedulerError::Timeout { seconds: STOP_TIMEOUT.as_secs() });
                }
            }
        }

        info!("Janitor stopped");

        Ok(())
    }

    /// Check if the sweep task is active
    pub async fn is_running(&self) -> bool {
        let guard = self.task_handle.lock().await;
        guard.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    /// Sweep every registered cache now
    pub fn sweep_once(&self) -> SweepReport {
        Self::sweep_all(&self.caches)
    }

    /// Counters of every registered cache as JSON, in registration order
    pub fn metrics_json(&self) -> Vec<serde_json::Value> {
        self.caches
            .iter()
            .map(|cache| MetricsReporter::new(cache.cache_name()).report_json(&cache.stats()))
            .collect()
    }

    fn build_interval(&self) -> Interval {
        let mut config =
            IntervalConfig::new(self.interval).immediate_first_tick(false).skip_missed_ticks(true);
        if !self.jitter.is_zero() {
            config = config.with_jitter(self.jitter.as_secs_f64() / self.interval.as_secs_f64());
        }
        Interval::new(config)
    }

    fn sweep_all(caches: &[Arc<dyn Sweepable>]) -> SweepReport {
        let per_cache: Vec<(String, usize)> = caches
            .iter()
            .map(|cache| (cache.cache_name().to_string(), cache.sweep_expired()))
            .collect();
        SweepReport { per_cache }
    }

    async fn sweep_loop(caches: Vec<Arc<dyn Sweepable>>, mut interval: Interval, cancel: CancellationToken) {
        let reporters: Vec<MetricsReporter> =
            caches.iter().map(|cache| MetricsReporter::new(cache.cache_name())).collect();
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("Janitor loop cancelled");
                    break;
                }
                _ = interval.tick() => {
                    let report = Self::sweep_all(&caches);
                    let remaining: usize = caches.iter().map(|cache| cache.entry_count()).sum();
                    debug!(removed = report.total(), remaining, "Periodic sweep completed");
                    for (reporter, cache) in reporters.iter().zip(&caches) {
                        reporter.report(&cache.stats());
                    }
                }
            }
        }
    }
}

impl Drop for Janitor {
    fn drop(&mut self) {
        self.cancellation_token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use predcache_common::cache::{CacheConfig, CacheStore};
    use predcache_common::time::MockClock;

    use super::*;

    fn store(name: &str, ttl_secs: u64, clock: &MockClock) -> CacheStore<u32, MockClock> {
        CacheStore::with_clock(
            CacheConfig::builder().name(name).ttl(Duration::from_secs(ttl_secs)).build(),
            clock.clone(),
        )
        .unwrap()
    }

    #[test]
    fn rejects_zero_interval() {
        assert!(matches!(Janitor::new(Duration::ZERO), Err(SchedulerError::InvalidSchedule(_))));
    }

    #[test]
    fn sweep_once_reports_per_cache_counts() {
        let clock = MockClock::new();
        let short = store("short", 10, &clock);
        let long = store("long", 100, &clock);
        short.set("a", 1);
        short.set("b", 2);
        long.set("c", 3);

        let mut janitor = Janitor::new(Duration::from_secs(60)).unwrap();
        janitor.register(Arc::new(short.clone()));
        janitor.register(Arc::new(long.clone()));

        clock.advance(Duration::from_secs(11));
        let report = janitor.sweep_once();

        assert_eq!(report.removed_from("short"), Some(2));
        assert_eq!(report.removed_from("long"), Some(0));
        assert_eq!(report.total(), 2);
        assert_eq!(long.len(), 1);
    }

    /// Validates per-cache metrics after a sweep.
    ///
    /// Assertions:
    /// - Confirms one JSON report per cache, in registration order.
    /// - Confirms swept entries show up as expirations.
    #[test]
    fn metrics_json_reports_each_cache() {
        let clock = MockClock::new();
        let response = store("response", 10, &clock);
        let query = store("query", 100, &clock);
        response.set("a", 1);
        query.set("b", 2);
        assert_eq!(query.get("b"), Some(2));

        let mut janitor = Janitor::new(Duration::from_secs(60)).unwrap();
        janitor.register(Arc::new(response.clone()));
        janitor.register(Arc::new(query.clone()));

        clock.advance(Duration::from_secs(11));
        janitor.sweep_once();
        let metrics = janitor.metrics_json();

        assert_eq!(metrics.len(), 2);
        assert_eq!(metrics[0]["cache_name"], "response");
        assert_eq!(metrics[0]["expirations"], 1);
        assert_eq!(metrics[0]["size"], 0);
        assert_eq!(metrics[1]["cache_name"], "query");
        assert_eq!(metrics[1]["hits"], 1);
        assert_eq!(metrics[1]["size"], 1);
    }

    #[tokio::test(start_paused = true)]
    async fn sweeps_on_each_tick() {
        let clock = MockClock::new();
        let cache = store("response", 30, &clock);
        cache.set("k", 1);

        let mut janitor = Janitor::new(Duration::from_secs(60)).unwrap();
        janitor.register(Arc::new(cache.clone()));
        janitor.start().await.unwrap();

        clock.advance(Duration::from_secs(31));
        // Expired but not yet swept
        assert_eq!(cache.len(), 1);

        tokio::time::sleep(Duration::from_secs(61)).await;
        assert_eq!(cache.len(), 0);

        janitor.stop().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn lifecycle_start_stop_restart() {
        let mut janitor = Janitor::new(Duration::from_secs(60)).unwrap();
        assert!(!janitor.is_running().await);
        assert!(matches!(janitor.stop().await, Err(SchedulerError::NotRunning)));

        janitor.start().await.unwrap();
        assert!(janitor.is_running().await);
        assert!(matches!(janitor.start().await, Err(SchedulerError::AlreadyRunning)));

        janitor.stop().await.unwrap();
        assert!(!janitor.is_running().await);

        janitor.start().await.unwrap();
        assert!(janitor.is_running().await);
        janitor.stop().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn stopped_janitor_no_longer_sweeps() {
        let clock = MockClock::new();
        let cache = store("query", 10, &clock);

        let mut janitor = Janitor::new(Duration::from_secs(60)).unwrap();
        janitor.register(Arc::new(cache.clone()));
        janitor.start().await.unwrap();
        janitor.stop().await.unwrap();

        cache.set("k", 1);
        clock.advance(Duration::from_secs(11));
        tokio::time::sleep(Duration::from_secs(120)).await;

        assert_eq!(cache.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn drop_cancels_task() {
        let mut janitor = Janitor::new(Duration::from_secs(60)).unwrap();
        janitor.start().await.unwrap();
        let handle = Arc::clone(&janitor.task_handle);

        drop(janitor);
        tokio::time::sleep(Duration::from_millis(1)).await;

        let guard = handle.lock().await;
        assert!(guard.as_ref().is_some_and(|task| task.is_finished()));
    }

    #[test]
    fn jitter_is_capped_at_interval() {
        let config = JanitorConfig { interval_seconds: 10, jitter_seconds: 30, enabled: true };
        let janitor = Janitor::from_config(&config).unwrap();
        assert_eq!(janitor.jitter, Duration::from_secs(10));
    }
}

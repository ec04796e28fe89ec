//! Recurring intervals with jitter support
//!
//! Drives periodic background work such as expiry sweeps. Jitter spreads the
//! sweeps of several processes so they do not all fire on the same tick.

use std::time::Duration;

use rand::Rng;
use tokio::time::{sleep, Instant, Interval as TokioInterval, MissedTickBehavior};

/// Configuration for an interval
#[derive(Debug, Clone)]
pub struct IntervalConfig {
    /// Base duration for the interval
    pub duration: Duration,

    /// Optional jitter factor (0.0 - 1.0)
    /// 0.0 = no jitter, 1.0 = up to 100% jitter
    pub jitter: Option<f64>,

    /// Whether to skip missed ticks
    pub skip_missed_ticks: bool,

    /// Whether the first tick fires immediately or after one period
    pub immediate_first_tick: bool,
}

impl IntervalConfig {
    /// Create a new interval configuration
    pub fn new(duration: Duration) -> Self {
        Self { duration, jitter: None, skip_missed_ticks: false, immediate_first_tick: true }
    }

    /// Set the jitter factor (0.0 - 1.0)
    pub fn with_jitter(mut self, jitter: f64) -> Self {
        self.jitter = Some(jitter.clamp(0.0, 1.0));
        self
    }

    /// Set whether to skip missed ticks
    pub fn skip_missed_ticks(mut self, skip: bool) -> Self {
        self.skip_missed_ticks = skip;
        self
    }

    /// Set whether the first tick completes immediately
    pub fn immediate_first_tick(mut self, immediate: bool) -> Self {
        self.immediate_first_tick = immediate;
        self
    }
}

/// A recurring interval with optional jitter
pub struct Interval {
    config: IntervalConfig,
    inner: Option<TokioInterval>,
    first_tick_pending: bool,
}

impl Interval {
    /// Create a new interval
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(config: IntervalConfig) -> Self {
        let jittered = config.jitter.is_some_and(|j| j > 0.0);
        let inner = if jittered {
            None
        } else {
            let mut interval = if config.immediate_first_tick {
                tokio::time::interval(config.duration)
            } else {
                tokio::time::interval_at(Instant::now() + config.duration, config.duration)
            };
            if config.skip_missed_ticks {
                interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            }
            Some(interval)
        };

        let first_tick_pending = config.immediate_first_tick;
        Self { config, inner, first_tick_pending }
    }

    /// Create a simple interval without jitter
    pub fn simple(duration: Duration) -> Self {
        Self::new(IntervalConfig::new(duration))
    }

    /// Create an interval with jitter
    pub fn with_jitter(duration: Duration, jitter: f64) -> Self {
        Self::new(IntervalConfig::new(duration).with_jitter(jitter))
    }

    /// Wait for the next tick
    pub async fn tick(&mut self) -> Instant {
        if let Some(ref mut inner) = self.inner {
            return inner.tick().await;
        }

        if self.first_tick_pending {
            self.first_tick_pending = false;
            return Instant::now();
        }

        sleep(self.next_jittered_delay()).await;
        Instant::now()
    }

    /// Reset the interval so the next tick is a full period away
    pub fn reset(&mut self) {
        if let Some(ref mut inner) = self.inner {
            inner.reset();
        }
    }

    /// Period this interval was configured with
    pub fn period(&self) -> Duration {
        self.config.duration
    }

    fn next_jittered_delay(&self) -> Duration {
        let base = self.config.duration.as_secs_f64();
        let jitter_range = base * self.config.jitter.unwrap_or(0.0);
        if jitter_range <= 0.0 {
            return self.config.duration;
        }
        let offset = rand::thread_rng().gen_range(-jitter_range..jitter_range);
        Duration::from_secs_f64((base + offset).max(0.0))
    }
}

/// Create a simple interval
pub fn interval(duration: Duration) -> Interval {
    Interval::simple(duration)
}

/// Create an interval with jitter
pub fn interval_with_jitter(duration: Duration, jitter: f64) -> Interval {
    Interval::with_jitter(duration, jitter)
}

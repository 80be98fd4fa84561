//! In-memory minimum-interval throttle.
//!
//! Remembers only the last attempt per key. Not shared across processes.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

use crate::adapters::lock_unpoisoned;
use crate::ports::Throttle;

/// Throttle enforcing a fixed minimum interval between attempts per key.
#[derive(Debug)]
pub struct IntervalThrottle {
    min_interval: Duration,
    last_attempts: Mutex<HashMap<String, Instant>>,
}

impl IntervalThrottle {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_attempts: Mutex::new(HashMap::new()),
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    fn is_spaced(&self, last: Option<&Instant>, now: Instant) -> bool {
        last.map_or(true, |last| now.saturating_duration_since(*last) >= self.min_interval)
    }
}

impl Throttle for IntervalThrottle {
    fn allow(&self, key: &str) -> bool {
        let last_attempts = lock_unpoisoned(&self.last_attempts);
        self.is_spaced(last_attempts.get(key), Instant::now())
    }

    fn record_attempt(&self, key: &str) {
        lock_unpoisoned(&self.last_attempts).insert(key.to_string(), Instant::now());
    }

    fn try_acquire(&self, key: &str) -> bool {
        let mut last_attempts = lock_unpoisoned(&self.last_attempts);
        let now = Instant::now();

        if !self.is_spaced(last_attempts.get(key), now) {
            tracing::debug!(key, "throttled: minimum interval not elapsed");
            return false;
        }
        last_attempts.insert(key.to_string(), now);
        true
    }

    fn last_attempt(&self, key: &str) -> Option<Instant> {
        lock_unpoisoned(&self.last_attempts).get(key).copied()
    }
}

//! Throttle port - minimum spacing between outbound calls.
//!
//! Unlike a windowed rate limiter, a throttle only remembers when the last
//! attempt for a key happened and refuses anything sooner than the
//! configured interval.

use tokio::time::Instant;

/// Port for per-key call spacing.
///
/// Implementations should be thread-safe and support concurrent access.
pub trait Throttle: Send + Sync {
    /// Returns `true` when at least the minimum interval has elapsed since
    /// the last recorded attempt for `key` (or none was ever recorded).
    fn allow(&self, key: &str) -> bool;

    /// Stamps the current time as the last attempt for `key`.
    fn record_attempt(&self, key: &str);

    /// Check and stamp in one step.
    ///
    /// Equivalent to `allow` followed by `record_attempt` when allowed, but
    /// implementations should do both under a single lock so two concurrent
    /// callers cannot both pass.
    fn try_acquire(&self, key: &str) -> bool {
        if self.allow(key) {
            self.record_attempt(key);
            true
        } else {
            false
        }
    }

    /// When the last attempt for `key` was recorded.
    fn last_attempt(&self, key: &str) -> Option<Instant>;
}

//! Analysis Cache Port - Interface for remembering recent ticket analyses.
//!
//! Keyed by ticket fingerprint. Best-effort: a cache never blocks or fails
//! its caller, so none of these operations return errors.

use crate::domain::triage::AnalysisResult;

/// Port for the TTL-bounded analysis cache.
pub trait AnalysisCache: Send + Sync {
    /// Returns the entry for `key` if it has not expired.
    ///
    /// Expired entries are removed as a side effect.
    fn get(&self, key: &str) -> Option<AnalysisResult>;

    /// Stores `result` under `key`, overwriting any previous entry.
    ///
    /// At capacity, expired entries are purged first; if the cache is
    /// still full, a new key is not stored.
    fn put(&self, key: &str, result: AnalysisResult);

    /// Number of stored entries, including any not yet purged.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes every expired entry, returning how many were dropped.
    fn purge_expired(&self) -> usize;

    /// Removes every entry.
    fn clear(&self);
}

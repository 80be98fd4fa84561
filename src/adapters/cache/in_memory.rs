//! In-memory TTL cache for ticket analyses.
//!
//! Bounded by entry count. When full, expired entries are purged; if that
//! frees nothing, new keys are dropped rather than evicting fresh ones.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

use crate::adapters::lock_unpoisoned;
use crate::domain::triage::AnalysisResult;
use crate::ports::AnalysisCache;

#[derive(Debug, Clone)]
struct CacheEntry {
    result: AnalysisResult,
    stored_at: Instant,
}

/// Analysis cache for single-process deployments.
#[derive(Debug)]
pub struct InMemoryAnalysisCache {
    ttl: Duration,
    max_entries: usize,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl InMemoryAnalysisCache {
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            ttl,
            max_entries,
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn is_fresh(&self, entry: &CacheEntry, now: Instant) -> bool {
        now.saturating_duration_since(entry.stored_at) < self.ttl
    }

    fn purge_locked(&self, entries: &mut HashMap<String, CacheEntry>, now: Instant) -> usize {
        let before = entries.len();
        entries.retain(|_, entry| self.is_fresh(entry, now));
        before - entries.len()
    }
}

impl AnalysisCache for InMemoryAnalysisCache {
    fn get(&self, key: &str) -> Option<AnalysisResult> {
        let mut entries = lock_unpoisoned(&self.entries);
        let now = Instant::now();

        match entries.get(key) {
            Some(entry) if self.is_fresh(entry, now) => Some(entry.result.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    fn put(&self, key: &str, result: AnalysisResult) {
        let mut entries = lock_unpoisoned(&self.entries);
        let now = Instant::now();

        if entries.len() >= self.max_entries && !entries.contains_key(key) {
            let purged = self.purge_locked(&mut entries, now);
            if entries.len() >= self.max_entries {
                tracing::debug!(
                    size = entries.len(),
                    purged,
                    "analysis cache full of fresh entries, skipping insert"
                );
                return;
            }
        }

        entries.insert(
            key.to_string(),
            CacheEntry {
                result,
                stored_at: now,
            },
        );
    }

    fn len(&self) -> usize {
        lock_unpoisoned(&self.entries).len()
    }

    fn purge_expired(&self) -> usize {
        let mut entries = lock_unpoisoned(&self.entries);
        self.purge_locked(&mut entries, Instant::now())
    }

    fn clear(&self) {
        lock_unpoisoned(&self.entries).clear();
    }
}

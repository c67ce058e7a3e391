//! Bounded LRU cache of enricher answers keyed by search term.

use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard, PoisonError};

use lru::LruCache;
use tracing::trace;

use crate::error::EnricherError;

/// Number of answers kept when no capacity is configured.
pub const DEFAULT_CACHE_CAPACITY: usize = 100;

/// Most recent enricher answers, evicting the least recently used term once full.
///
/// Reads and writes both refresh a term's recency. The map sits behind a
/// mutex so one cache can be shared by concurrently running actions; the lock
/// is never held across an await point.
pub struct LookupCache {
    entries: Mutex<LruCache<String, String>>,
}

impl LookupCache {
    /// Create a cache holding at most `capacity` terms.
    pub fn new(capacity: usize) -> Result<Self, EnricherError> {
        let capacity = NonZeroUsize::new(capacity).ok_or_else(|| {
            EnricherError::InvalidConfig("cache capacity must be greater than zero".to_string())
        })?;

        Ok(Self {
            entries: Mutex::new(LruCache::new(capacity)),
        })
    }

    /// Look up a term, marking it most recently used on a hit.
    pub fn get(&self, term: &str) -> Option<String> {
        self.lock().get(term).cloned()
    }

    /// Store an answer, marking it most recently used and evicting the oldest term if full.
    pub fn put(&self, term: impl Into<String>, answer: impl Into<String>) {
        let mut entries = self.lock();
        if let Some((evicted, _)) = entries.push(term.into(), answer.into()) {
            trace!(term = %evicted, "Replaced or evicted cached answer");
        }
    }

    /// Check for a term without touching its recency.
    pub fn contains(&self, term: &str) -> bool {
        self.lock().contains(term)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.lock().cap().get()
    }

    /// Drop every cached answer.
    pub fn clear(&self) {
        self.lock().clear();
    }

    // Entries are plain strings, so a panic mid-operation cannot leave them inconsistent.
    fn lock(&self) -> MutexGuard<'_, LruCache<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for LookupCache {
    fn default() -> Self {
        Self {
            entries: Mutex::new(LruCache::new(
                NonZeroUsize::new(DEFAULT_CACHE_CAPACITY).unwrap_or(NonZeroUsize::MIN),
            )),
        }
    }
}

impl std::fmt::Debug for LookupCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LookupCache")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(matches!(
            LookupCache::new(0),
            Err(EnricherError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_default_capacity() {
        let cache = LookupCache::default();
        assert_eq!(cache.capacity(), 100);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_retains_most_recent_terms() {
        let cache = LookupCache::new(3).unwrap();
        for term in ["a", "b", "c", "d", "e"] {
            cache.put(term, format!("answer-{term}"));
        }

        assert_eq!(cache.len(), 3);
        assert!(!cache.contains("a"));
        assert!(!cache.contains("b"));
        assert_eq!(cache.get("c").as_deref(), Some("answer-c"));
        assert_eq!(cache.get("d").as_deref(), Some("answer-d"));
        assert_eq!(cache.get("e").as_deref(), Some("answer-e"));
    }

    #[test]
    fn test_get_refreshes_recency() {
        let cache = LookupCache::new(2).unwrap();
        cache.put("KubePodCrashLooping", "restart it");
        cache.put("KubeJobFailed", "check logs");

        assert!(cache.get("KubePodCrashLooping").is_some());
        cache.put("TargetDown", "check scrape config");

        assert!(cache.contains("KubePodCrashLooping"));
        assert!(!cache.contains("KubeJobFailed"));
        assert!(cache.contains("TargetDown"));
    }

    #[test]
    fn test_put_overwrites_and_refreshes() {
        let cache = LookupCache::new(2).unwrap();
        cache.put("a", "first");
        cache.put("b", "second");
        cache.put("a", "updated");
        cache.put("c", "third");

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("a").as_deref(), Some("updated"));
        assert!(!cache.contains("b"));
    }

    #[test]
    fn test_contains_does_not_refresh() {
        let cache = LookupCache::new(2).unwrap();
        cache.put("a", "1");
        cache.put("b", "2");

        assert!(cache.contains("a"));
        cache.put("c", "3");

        assert!(!cache.contains("a"));
    }

    #[test]
    fn test_keys_are_case_sensitive() {
        let cache = LookupCache::new(4).unwrap();
        cache.put("TargetDown", "x");
        assert!(cache.get("targetdown").is_none());
    }

    #[test]
    fn test_empty_answer_is_cached() {
        let cache = LookupCache::new(1).unwrap();
        cache.put("X", "");
        assert_eq!(cache.get("X").as_deref(), Some(""));
    }

    #[test]
    fn test_clear() {
        let cache = LookupCache::new(2).unwrap();
        cache.put("a", "1");
        cache.clear();
        assert!(cache.is_empty());
    }
}

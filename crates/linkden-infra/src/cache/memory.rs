//! Bounded in-memory cache with per-entry time-to-live and LRU eviction.

use std::borrow::Borrow;
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::time::Duration;

use lru::LruCache;
use tokio::time::Instant;

/// In-memory cache holding at most `capacity` entries, each living for `ttl`
/// after its last write.
///
/// Expired entries read as absent and are dropped lazily. Inserting a new key
/// into a full cache first drops expired entries, then evicts the least
/// recently used one. Reads count as use.
///
/// Not synchronized: owners wrap it in a lock. Time comes from
/// [`tokio::time::Instant`], so a paused test runtime controls expiry.
pub struct ExpiringLruCache<K: Hash + Eq, V> {
    entries: LruCache<K, (V, Instant)>,
    ttl: Duration,
}

impl<K, V> ExpiringLruCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
            ttl,
        }
    }

    /// Current value, or `None` if never set or expired.
    pub fn get<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let (_, written_at) = self.entries.peek(key)?;
        if written_at.elapsed() >= self.ttl {
            self.entries.pop(key);
            return None;
        }

        self.entries.get(key).map(|(value, _)| value.clone())
    }

    /// Store `value` under `key`, restarting the entry's time-to-live.
    pub fn set(&mut self, key: K, value: V) {
        if !self.entries.contains(&key) && self.entries.len() >= self.entries.cap().get() {
            self.purge_expired();
        }

        self.entries.put(key, (value, Instant::now()));
    }

    /// Time left before `key` expires, if it is present.
    pub fn time_to_live<Q>(&self, key: &Q) -> Option<Duration>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let (_, written_at) = self.entries.peek(key)?;
        self.ttl.checked_sub(written_at.elapsed())
    }

    fn purge_expired(&mut self) {
        let ttl = self.ttl;
        let expired: Vec<K> = self
            .entries
            .iter()
            .filter(|(_, (_, written_at))| written_at.elapsed() >= ttl)
            .map(|(key, _)| key.clone())
            .collect();

        for key in expired {
            self.entries.pop(&key);
        }
    }
}

#[cfg(test)]
impl<K, V> ExpiringLruCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Number of stored entries, including expired ones not yet purged.
    fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_set_and_get() {
        let mut cache = ExpiringLruCache::new(10, Duration::from_secs(60));
        cache.set("key1".to_string(), 1u32);

        assert_eq!(cache.get("key1"), Some(1));
        assert_eq!(cache.get("missing"), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_expires_after_ttl() {
        let mut cache = ExpiringLruCache::new(10, Duration::from_secs(60));
        cache.set("key1".to_string(), 1u32);

        tokio::time::advance(Duration::from_secs(59)).await;
        assert_eq!(cache.get("key1"), Some(1));

        tokio::time::advance(Duration::from_secs(1)).await;
        assert_eq!(cache.get("key1"), None);
        assert_eq!(cache.len(), 0);
        assert_eq!(cache.time_to_live("key1"), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_restarts_ttl() {
        let mut cache = ExpiringLruCache::new(10, Duration::from_secs(60));
        cache.set("key1".to_string(), 1u32);

        tokio::time::advance(Duration::from_secs(45)).await;
        cache.set("key1".to_string(), 2);

        tokio::time::advance(Duration::from_secs(45)).await;
        assert_eq!(cache.get("key1"), Some(2));
        assert_eq!(cache.time_to_live("key1"), Some(Duration::from_secs(15)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_reads_do_not_extend_ttl() {
        let mut cache = ExpiringLruCache::new(10, Duration::from_secs(10));
        cache.set("key1".to_string(), 1u32);

        tokio::time::advance(Duration::from_secs(6)).await;
        assert_eq!(cache.get("key1"), Some(1));

        tokio::time::advance(Duration::from_secs(6)).await;
        assert_eq!(cache.get("key1"), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_evicts_least_recently_used() {
        let mut cache = ExpiringLruCache::new(2, Duration::from_secs(60));
        cache.set("a".to_string(), 1u32);
        cache.set("b".to_string(), 2);

        // Touch "a" so "b" becomes the eviction candidate.
        assert_eq!(cache.get("a"), Some(1));
        cache.set("c".to_string(), 3);

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("a"), Some(1));
        assert_eq!(cache.get("b"), None);
        assert_eq!(cache.get("c"), Some(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_cache_drops_expired_before_evicting() {
        let mut cache = ExpiringLruCache::new(2, Duration::from_secs(10));
        cache.set("old".to_string(), 1u32);

        tokio::time::advance(Duration::from_secs(8)).await;
        cache.set("recent".to_string(), 2);
        assert_eq!(cache.get("old"), Some(1));

        tokio::time::advance(Duration::from_secs(3)).await;
        cache.set("new".to_string(), 3);

        // "old" expired and was purged, so the live "recent" entry survives.
        assert_eq!(cache.get("recent"), Some(2));
        assert_eq!(cache.get("new"), Some(3));
        assert_eq!(cache.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_bounded_cache_does_not_grow_unbounded() {
        let mut cache = ExpiringLruCache::new(10, Duration::from_secs(60));
        for i in 0..100u32 {
            cache.set(format!("key{}", i), i);
        }

        assert_eq!(cache.len(), 10);
        assert_eq!(cache.get("key99"), Some(99));
        assert_eq!(cache.get("key0"), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_capacity_holds_one_entry() {
        let mut cache = ExpiringLruCache::new(0, Duration::from_secs(60));
        cache.set("a".to_string(), 1u32);
        cache.set("b".to_string(), 2);

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("b"), Some(2));
    }
}

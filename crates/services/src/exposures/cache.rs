use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use survey_core::Clock;
use survey_core::model::Exposure;

use super::ExposureProvider;
use crate::error::FetchError;

/// How long a fetched result stays fresh.
pub const DEFAULT_TTL_SECS: i64 = 3600;

/// Map whose entries expire a fixed time after insertion.
///
/// Expiry is checked on read against the supplied clock; stale entries are
/// evicted lazily.
pub struct TtlCache<K, V> {
    max_age: Duration,
    entries: Mutex<HashMap<K, (DateTime<Utc>, V)>>,
}

impl<K: Eq + Hash, V: Clone> TtlCache<K, V> {
    #[must_use]
    pub fn new(max_age: Duration) -> Self {
        Self {
            max_age,
            entries: Mutex::new(HashMap::new()),
        }
    }

    #[must_use]
    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    /// Fresh value for `key`, if any.
    pub fn get(&self, key: &K, clock: &Clock) -> Option<V> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let expired = {
            let (stored_at, _) = entries.get(key)?;
            clock.has_expired(*stored_at, self.max_age)
        };
        if expired {
            entries.remove(key);
            return None;
        }
        entries.get(key).map(|(_, value)| value.clone())
    }

    pub fn insert(&self, key: K, value: V, clock: &Clock) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key, (clock.now(), value));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Query key: the same topic asked with a different page size is a different query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct FetchKey {
    topic: String,
    max_count: usize,
}

/// Time-bounded cache in front of another provider.
///
/// Successful results are reused until they age past the window; failures
/// are never cached.
pub struct CachedExposureProvider {
    inner: Arc<dyn ExposureProvider>,
    cache: TtlCache<FetchKey, Vec<Exposure>>,
    clock: Clock,
}

impl CachedExposureProvider {
    #[must_use]
    pub fn new(inner: Arc<dyn ExposureProvider>, max_age: Duration) -> Self {
        Self {
            inner,
            cache: TtlCache::new(max_age),
            clock: Clock::default_clock(),
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }
}

#[async_trait]
impl ExposureProvider for CachedExposureProvider {
    async fn fetch(&self, topic: &str, max_count: usize) -> Result<Vec<Exposure>, FetchError> {
        let key = FetchKey {
            topic: topic.to_string(),
            max_count,
        };
        if let Some(hit) = self.cache.get(&key, &self.clock) {
            tracing::debug!(topic, max_count, items = hit.len(), "article cache hit");
            return Ok(hit);
        }

        let fetched = self.inner.fetch(topic, max_count).await?;
        tracing::debug!(topic, max_count, items = fetched.len(), "article cache miss");
        self.cache.insert(key, fetched.clone(), &self.clock);
        Ok(fetched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use survey_core::time::{fixed_clock, fixed_now};

    struct CountingProvider {
        calls: AtomicUsize,
        fail: bool,
    }

    impl CountingProvider {
        fn new(fail: bool) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail,
            }
        }
    }

    #[async_trait]
    impl ExposureProvider for CountingProvider {
        async fn fetch(&self, topic: &str, _max_count: usize) -> Result<Vec<Exposure>, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(FetchError::Api("boom".into()));
            }
            Ok(vec![Exposure::new(topic, "summary").unwrap()])
        }
    }

    #[test]
    fn ttl_cache_expires_after_window() {
        let cache: TtlCache<&str, u32> = TtlCache::new(Duration::hours(1));
        cache.insert("k", 7, &fixed_clock());

        let later = Clock::fixed(fixed_now() + Duration::minutes(59));
        assert_eq!(cache.get(&"k", &later), Some(7));

        let expired = Clock::fixed(fixed_now() + Duration::hours(1));
        assert_eq!(cache.get(&"k", &expired), None);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn repeated_queries_within_window_hit_once() {
        let inner = Arc::new(CountingProvider::new(false));
        let provider = CachedExposureProvider::new(inner.clone(), Duration::hours(1))
            .with_clock(fixed_clock());

        let first = provider.fetch("topic", 10).await.unwrap();
        let second = provider.fetch("topic", 10).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(inner.calls.load(Ordering::SeqCst), 1);

        provider.fetch("topic", 5).await.unwrap();
        provider.fetch("other", 10).await.unwrap();
        assert_eq!(inner.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let inner = Arc::new(CountingProvider::new(true));
        let provider = CachedExposureProvider::new(inner.clone(), Duration::hours(1))
            .with_clock(fixed_clock());

        assert!(provider.fetch("topic", 10).await.is_err());
        assert!(provider.fetch("topic", 10).await.is_err());
        assert_eq!(inner.calls.load(Ordering::SeqCst), 2);
    }
}

//! In-memory cache implementation using moka

use std::collections::BTreeSet;
use std::ops::Bound;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache as MokaCache;
use tokio::sync::Mutex;

use crate::domain::DomainError;
use crate::domain::cache::{glob_to_regex, Cache};

/// Configuration for in-memory cache
#[derive(Debug, Clone)]
pub struct InMemoryCacheConfig {
    /// Maximum number of entries
    pub max_capacity: u64,
    /// Upper bound on any entry's lifetime
    pub default_ttl: Duration,
}

impl Default for InMemoryCacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: 10_000,
            default_ttl: Duration::from_secs(3600), // 1 hour
        }
    }
}

impl InMemoryCacheConfig {
    /// Creates a new configuration with specified max capacity
    pub fn with_max_capacity(mut self, capacity: u64) -> Self {
        self.max_capacity = capacity;
        self
    }

    /// Sets the default TTL
    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }
}

/// Cache entry stored in moka
#[derive(Debug, Clone)]
struct CacheEntry {
    /// Serialized JSON value
    data: String,
    /// Expiration timestamp (millis since epoch)
    expires_at: u64,
}

/// Thread-safe in-memory cache implementation using moka
///
/// moka cannot enumerate keys by pattern, so the cache keeps an ordered
/// secondary index of keys it has written. The index is always a superset of
/// the live keys: writes and deletes update it under the same lock that
/// guards the moka call, and keys evicted by moka are pruned lazily.
#[derive(Debug)]
pub struct InMemoryCache {
    cache: MokaCache<String, CacheEntry>,
    index: Mutex<BTreeSet<String>>,
    config: InMemoryCacheConfig,
}

impl InMemoryCache {
    /// Creates a new in-memory cache with default configuration
    pub fn new() -> Self {
        Self::with_config(InMemoryCacheConfig::default())
    }

    /// Creates a new in-memory cache with the given configuration
    pub fn with_config(config: InMemoryCacheConfig) -> Self {
        let cache = MokaCache::builder()
            .max_capacity(config.max_capacity)
            .time_to_live(config.default_ttl)
            .build();

        Self {
            cache,
            index: Mutex::new(BTreeSet::new()),
            config,
        }
    }

    fn current_time_millis() -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }

    fn is_expired(entry: &CacheEntry) -> bool {
        Self::current_time_millis() >= entry.expires_at
    }

    fn prune_threshold(&self) -> usize {
        (self.config.max_capacity as usize).saturating_mul(2).max(1024)
    }

    /// Drops index entries whose cache entry is gone
    fn prune(&self, index: &mut BTreeSet<String>) {
        index.retain(|key| self.cache.contains_key(key));
    }

    /// Keys in the index matching a glob
    ///
    /// A trailing `*` as the only wildcard becomes a range scan.
    fn matching_keys(index: &BTreeSet<String>, pattern: &str) -> Result<Vec<String>, DomainError> {
        match pattern.strip_suffix('*') {
            Some(prefix) if !prefix.contains('*') => {
                let start = Bound::Included(prefix.to_string());
                Ok(index
                    .range((start, Bound::Unbounded))
                    .take_while(|k| k.starts_with(prefix))
                    .cloned()
                    .collect())
            }
            _ => {
                let regex = regex::Regex::new(&glob_to_regex(pattern))
                    .map_err(|e| DomainError::cache_degraded(format!("Invalid pattern: {}", e)))?;

                Ok(index.iter().filter(|k| regex.is_match(k)).cloned().collect())
            }
        }
    }
}

impl Default for InMemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Cache for InMemoryCache {
    async fn get_raw(&self, key: &str) -> Result<Option<String>, DomainError> {
        match self.cache.get(key).await {
            Some(entry) => {
                if Self::is_expired(&entry) {
                    self.cache.remove(key).await;
                    return Ok(None);
                }

                Ok(Some(entry.data))
            }
            None => Ok(None),
        }
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> Result<(), DomainError> {
        let expires_at = Self::current_time_millis() + ttl.as_millis() as u64;
        let entry = CacheEntry {
            data: value.to_string(),
            expires_at,
        };

        let mut index = self.index.lock().await;
        index.insert(key.to_string());
        self.cache.insert(key.to_string(), entry).await;

        if index.len() > self.prune_threshold() {
            self.prune(&mut index);
        }

        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, DomainError> {
        let mut index = self.index.lock().await;
        index.remove(key);

        Ok(self
            .cache
            .remove(key)
            .await
            .is_some_and(|entry| !Self::is_expired(&entry)))
    }

    async fn delete_pattern(&self, pattern: &str) -> Result<usize, DomainError> {
        let mut index = self.index.lock().await;
        let keys = Self::matching_keys(&index, pattern)?;
        let mut deleted = 0;

        for key in keys {
            index.remove(&key);

            if let Some(entry) = self.cache.remove(&key).await {
                if !Self::is_expired(&entry) {
                    deleted += 1;
                }
            }
        }

        Ok(deleted)
    }

    async fn exists(&self, key: &str) -> Result<bool, DomainError> {
        Ok(self.get_raw(key).await?.is_some())
    }

    async fn ttl(&self, key: &str) -> Result<Option<Duration>, DomainError> {
        match self.cache.get(key).await {
            Some(entry) => {
                let now = Self::current_time_millis();

                if entry.expires_at <= now {
                    self.cache.remove(key).await;
                    Ok(None)
                } else {
                    let remaining = entry.expires_at - now;
                    Ok(Some(Duration::from_millis(remaining)))
                }
            }
            None => Ok(None),
        }
    }

    async fn clear(&self) -> Result<(), DomainError> {
        let mut index = self.index.lock().await;
        index.clear();
        self.cache.invalidate_all();
        self.cache.run_pending_tasks().await;
        Ok(())
    }

    async fn size(&self) -> Result<usize, DomainError> {
        self.cache.run_pending_tasks().await;
        Ok(self.cache.entry_count() as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cache::CacheExt;

    #[tokio::test]
    async fn test_set_and_get() {
        let cache = InMemoryCache::new();

        cache
            .set("key1", &"value1", Duration::from_secs(60))
            .await
            .unwrap();

        let result: Option<String> = cache.get("key1").await.unwrap();
        assert_eq!(result, Some("value1".to_string()));
    }

    #[tokio::test]
    async fn test_get_missing() {
        let cache = InMemoryCache::new();

        let result: Option<String> = cache.get("missing").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_delete() {
        let cache = InMemoryCache::new();

        cache
            .set("key1", &"value1", Duration::from_secs(60))
            .await
            .unwrap();

        let deleted = cache.delete("key1").await.unwrap();
        assert!(deleted);

        let result: Option<String> = cache.get("key1").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_delete_missing() {
        let cache = InMemoryCache::new();

        let deleted = cache.delete("missing").await.unwrap();
        assert!(!deleted);
    }

    #[tokio::test]
    async fn test_ttl_expiration() {
        let cache = InMemoryCache::new();

        // Set with very short TTL
        cache
            .set("key1", &"value1", Duration::from_millis(50))
            .await
            .unwrap();

        // Should exist immediately
        assert!(cache.exists("key1").await.unwrap());

        // Wait for expiration
        tokio::time::sleep(Duration::from_millis(100)).await;

        // Should be expired
        let result: Option<String> = cache.get("key1").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_ttl_remaining() {
        let cache = InMemoryCache::new();

        cache
            .set("key1", &"value1", Duration::from_secs(60))
            .await
            .unwrap();

        let remaining = cache.ttl("key1").await.unwrap().unwrap();
        assert!(remaining.as_secs() > 50 && remaining.as_secs() <= 60);
    }

    #[tokio::test]
    async fn test_clear() {
        let cache = InMemoryCache::new();

        cache
            .set("key1", &"value1", Duration::from_secs(60))
            .await
            .unwrap();
        cache
            .set("key2", &"value2", Duration::from_secs(60))
            .await
            .unwrap();

        cache.clear().await.unwrap();

        let size = cache.size().await.unwrap();
        assert_eq!(size, 0);
        assert!(cache.index.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_delete_pattern_prefix() {
        let cache = InMemoryCache::new();

        for key in ["workout:list:10:0", "workout:list:20:40", "workout:abc", "workout_exercise:list:10:0"] {
            cache.set(key, &"data", Duration::from_secs(60)).await.unwrap();
        }

        let deleted = cache.delete_pattern("workout:list:*").await.unwrap();
        assert_eq!(deleted, 2);

        assert!(cache.exists("workout:abc").await.unwrap());
        assert!(cache.exists("workout_exercise:list:10:0").await.unwrap());
        assert!(!cache.exists("workout:list:10:0").await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_pattern_inner_wildcard() {
        let cache = InMemoryCache::new();

        cache
            .set("user:1:profile", &"data1", Duration::from_secs(60))
            .await
            .unwrap();
        cache
            .set("user:2:profile", &"data2", Duration::from_secs(60))
            .await
            .unwrap();
        cache
            .set("other:key", &"data3", Duration::from_secs(60))
            .await
            .unwrap();

        let deleted = cache.delete_pattern("user:*:profile").await.unwrap();
        assert_eq!(deleted, 2);

        let size = cache.size().await.unwrap();
        assert_eq!(size, 1);
    }

    #[tokio::test]
    async fn test_delete_pattern_escapes_regex_characters() {
        let cache = InMemoryCache::new();

        cache.set("a.b:1", &"x", Duration::from_secs(60)).await.unwrap();
        cache.set("aXb:1", &"x", Duration::from_secs(60)).await.unwrap();

        let deleted = cache.delete_pattern("a.b:*").await.unwrap();
        assert_eq!(deleted, 1);
        assert!(cache.exists("aXb:1").await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_pattern_skips_expired_entries_in_count() {
        let cache = InMemoryCache::new();

        cache
            .set("program:list:10:0", &"old", Duration::from_millis(10))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(30)).await;

        let deleted = cache.delete_pattern("program:list:*").await.unwrap();
        assert_eq!(deleted, 0);
        assert!(cache.index.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_index_pruned_past_threshold() {
        let cache = InMemoryCache::with_config(InMemoryCacheConfig::default().with_max_capacity(10));

        for i in 0..1100 {
            cache
                .set(&format!("user:{}", i), &i, Duration::from_secs(60))
                .await
                .unwrap();
        }
        cache.cache.run_pending_tasks().await;
        cache.set("user:last", &0, Duration::from_secs(60)).await.unwrap();

        assert!(cache.index.lock().await.len() <= 1024);
    }

    #[tokio::test]
    async fn test_config() {
        let config = InMemoryCacheConfig::default()
            .with_max_capacity(100)
            .with_default_ttl(Duration::from_secs(300));

        let cache = InMemoryCache::with_config(config);

        assert_eq!(cache.config.max_capacity, 100);
        assert_eq!(cache.config.default_ttl, Duration::from_secs(300));
    }
}

//! Redis cache implementation

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};

use crate::domain::cache::Cache;
use crate::domain::DomainError;

const SCAN_BATCH: usize = 100;

/// Configuration for Redis cache
#[derive(Debug, Clone)]
pub struct RedisCacheConfig {
    /// Redis connection URL (e.g., "redis://127.0.0.1:6379")
    pub url: String,
    /// Key prefix for namespacing
    pub key_prefix: Option<String>,
    /// Connection timeout
    pub connection_timeout: Duration,
}

impl Default for RedisCacheConfig {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379".to_string(),
            key_prefix: None,
            connection_timeout: Duration::from_secs(5),
        }
    }
}

impl RedisCacheConfig {
    /// Creates a new configuration with the given URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Sets the key prefix
    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = Some(prefix.into());
        self
    }

    /// Sets the connection timeout
    pub fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }
}

/// Redis cache implementation
///
/// Pattern deletion walks the keyspace with `SCAN MATCH` and deletes each
/// batch, so it never blocks the server the way `KEYS` would.
#[derive(Clone)]
pub struct RedisCache {
    connection: ConnectionManager,
    config: RedisCacheConfig,
}

impl fmt::Debug for RedisCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisCache")
            .field("config", &self.config)
            .field("connection", &"<ConnectionManager>")
            .finish()
    }
}

impl RedisCache {
    /// Connects and verifies the server answers `PING`
    pub async fn new(config: RedisCacheConfig) -> Result<Self, DomainError> {
        let client = Client::open(config.url.as_str()).map_err(|e| {
            DomainError::cache_degraded(format!("Failed to create Redis client: {}", e))
        })?;

        let connection = tokio::time::timeout(config.connection_timeout, ConnectionManager::new(client))
            .await
            .map_err(|_| DomainError::cache_degraded("Timed out connecting to Redis"))?
            .map_err(|e| DomainError::cache_degraded(format!("Failed to connect to Redis: {}", e)))?;

        let cache = Self { connection, config };
        cache.ping().await?;

        Ok(cache)
    }

    fn prefix_key(&self, key: &str) -> String {
        match &self.config.key_prefix {
            Some(prefix) => format!("{}:{}", prefix, key),
            None => key.to_string(),
        }
    }

    /// Prefixed glob for `SCAN MATCH`
    ///
    /// Only `*` keeps its wildcard meaning; Redis glob metacharacters in the
    /// prefix or pattern are escaped.
    fn prefix_pattern(&self, pattern: &str) -> String {
        let escaped = escape_redis_glob(pattern);
        match &self.config.key_prefix {
            Some(prefix) => format!("{}:{}", escape_redis_glob(prefix), escaped),
            None => escaped,
        }
    }

    async fn scan_keys(&self, match_pattern: &str) -> Result<Vec<String>, DomainError> {
        let mut conn = self.connection.clone();
        let mut cursor = 0u64;
        let mut found = Vec::new();

        loop {
            let (next, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(match_pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn)
                .await
                .map_err(|e| {
                    DomainError::cache_degraded(format!(
                        "Failed to scan keys with pattern '{}': {}",
                        match_pattern, e
                    ))
                })?;

            found.extend(keys);
            cursor = next;

            if cursor == 0 {
                break;
            }
        }

        Ok(found)
    }
}

fn escape_redis_glob(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    for c in pattern.chars() {
        if matches!(c, '?' | '[' | ']' | '\\' | '^') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[async_trait]
impl Cache for RedisCache {
    async fn get_raw(&self, key: &str) -> Result<Option<String>, DomainError> {
        let prefixed_key = self.prefix_key(key);
        let mut conn = self.connection.clone();

        let result: Option<String> = conn.get(&prefixed_key).await.map_err(|e| {
            DomainError::cache_degraded(format!("Failed to get key '{}': {}", key, e))
        })?;

        Ok(result)
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> Result<(), DomainError> {
        let prefixed_key = self.prefix_key(key);
        let mut conn = self.connection.clone();

        // PX keeps sub-second TTLs meaningful
        let ttl_millis = ttl.as_millis().max(1) as u64;

        let _: () = conn
            .pset_ex(&prefixed_key, value, ttl_millis)
            .await
            .map_err(|e| {
                DomainError::cache_degraded(format!("Failed to set key '{}': {}", key, e))
            })?;

        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, DomainError> {
        let prefixed_key = self.prefix_key(key);
        let mut conn = self.connection.clone();

        let deleted: i32 = conn.del(&prefixed_key).await.map_err(|e| {
            DomainError::cache_degraded(format!("Failed to delete key '{}': {}", key, e))
        })?;

        Ok(deleted > 0)
    }

    async fn delete_pattern(&self, pattern: &str) -> Result<usize, DomainError> {
        let keys = self.scan_keys(&self.prefix_pattern(pattern)).await?;
        let mut conn = self.connection.clone();
        let mut total_deleted = 0usize;

        for batch in keys.chunks(SCAN_BATCH) {
            let deleted: i32 = conn.del(batch).await.map_err(|e| {
                DomainError::cache_degraded(format!("Failed to delete keys: {}", e))
            })?;
            total_deleted += deleted as usize;
        }

        Ok(total_deleted)
    }

    async fn exists(&self, key: &str) -> Result<bool, DomainError> {
        let prefixed_key = self.prefix_key(key);
        let mut conn = self.connection.clone();

        let exists: bool = conn.exists(&prefixed_key).await.map_err(|e| {
            DomainError::cache_degraded(format!(
                "Failed to check existence of key '{}': {}",
                key, e
            ))
        })?;

        Ok(exists)
    }

    async fn ttl(&self, key: &str) -> Result<Option<Duration>, DomainError> {
        let prefixed_key = self.prefix_key(key);
        let mut conn = self.connection.clone();

        let ttl_millis: i64 = conn.pttl(&prefixed_key).await.map_err(|e| {
            DomainError::cache_degraded(format!("Failed to get TTL for key '{}': {}", key, e))
        })?;

        // Redis returns -2 if key doesn't exist, -1 if no TTL
        if ttl_millis < 0 {
            Ok(None)
        } else {
            Ok(Some(Duration::from_millis(ttl_millis as u64)))
        }
    }

    async fn clear(&self) -> Result<(), DomainError> {
        // Without a prefix the whole database belongs to this service
        match &self.config.key_prefix {
            Some(_) => {
                self.delete_pattern("*").await?;
            }
            None => {
                let mut conn = self.connection.clone();
                redis::cmd("FLUSHDB")
                    .query_async::<()>(&mut conn)
                    .await
                    .map_err(|e| {
                        DomainError::cache_degraded(format!("Failed to flush database: {}", e))
                    })?;
            }
        }

        Ok(())
    }

    async fn size(&self) -> Result<usize, DomainError> {
        match &self.config.key_prefix {
            Some(_) => Ok(self.scan_keys(&self.prefix_pattern("*")).await?.len()),
            None => {
                let mut conn = self.connection.clone();
                let size: usize = redis::cmd("DBSIZE")
                    .query_async(&mut conn)
                    .await
                    .map_err(|e| {
                        DomainError::cache_degraded(format!("Failed to get database size: {}", e))
                    })?;
                Ok(size)
            }
        }
    }

    async fn ping(&self) -> Result<(), DomainError> {
        let mut conn = self.connection.clone();

        redis::cmd("PING")
            .query_async::<String>(&mut conn)
            .await
            .map(|_| ())
            .map_err(|e| DomainError::cache_degraded(format!("Redis ping failed: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cache::CacheExt;

    // These tests require a running Redis instance:
    // cargo test -- --ignored

    fn get_test_config() -> RedisCacheConfig {
        RedisCacheConfig::new("redis://127.0.0.1:6379").with_key_prefix("fitness-test")
    }

    #[tokio::test]
    #[ignore = "Requires running Redis instance"]
    async fn test_redis_set_and_get() {
        let cache = RedisCache::new(get_test_config()).await.unwrap();

        cache
            .set("key1", &"value1", Duration::from_secs(60))
            .await
            .unwrap();

        let result: Option<String> = cache.get("key1").await.unwrap();
        assert_eq!(result, Some("value1".to_string()));

        // Cleanup
        cache.delete("key1").await.unwrap();
    }

    #[tokio::test]
    #[ignore = "Requires running Redis instance"]
    async fn test_redis_delete() {
        let cache = RedisCache::new(get_test_config()).await.unwrap();

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
    #[ignore = "Requires running Redis instance"]
    async fn test_redis_delete_pattern() {
        let cache = RedisCache::new(get_test_config()).await.unwrap();
        let ttl = Duration::from_secs(60);

        cache.set("workout:list:10:0", &"a", ttl).await.unwrap();
        cache.set("workout:list:20:0", &"b", ttl).await.unwrap();
        cache.set("workout:1", &"c", ttl).await.unwrap();

        let deleted = cache.delete_pattern("workout:list:*").await.unwrap();
        assert_eq!(deleted, 2);
        assert!(cache.exists("workout:1").await.unwrap());

        // Cleanup
        cache.delete("workout:1").await.unwrap();
    }

    #[tokio::test]
    #[ignore = "Requires running Redis instance"]
    async fn test_redis_ttl() {
        let cache = RedisCache::new(get_test_config()).await.unwrap();

        cache
            .set("ttl_key", &"value1", Duration::from_secs(60))
            .await
            .unwrap();

        let ttl = cache.ttl("ttl_key").await.unwrap();
        assert!(ttl.is_some());
        assert!(ttl.unwrap().as_secs() > 50);

        // Cleanup
        cache.delete("ttl_key").await.unwrap();
    }

    #[test]
    fn test_key_prefix() {
        let config = RedisCacheConfig::new("redis://localhost").with_key_prefix("myapp");

        assert_eq!(config.key_prefix, Some("myapp".to_string()));
    }

    #[test]
    fn test_escape_redis_glob() {
        assert_eq!(escape_redis_glob("workout:list:*"), "workout:list:*");
        assert_eq!(escape_redis_glob("a?b[c]"), "a\\?b\\[c\\]");
    }
}

//! Cache factory for runtime selection

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::config::{CacheBackend, CacheSettings};
use crate::domain::cache::Cache;
use crate::domain::DomainError;

use super::in_memory::{InMemoryCache, InMemoryCacheConfig};
use super::redis::{RedisCache, RedisCacheConfig};

const REDIS_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Factory for creating cache instances
#[derive(Debug, Default)]
pub struct CacheFactory;

impl CacheFactory {
    /// Creates the backend selected by `cache.backend`
    pub async fn create(settings: &CacheSettings) -> Result<Arc<dyn Cache>, DomainError> {
        match settings.backend {
            CacheBackend::InMemory => {
                info!(max_capacity = settings.max_capacity, "Using in-memory cache");
                Ok(Self::in_memory(settings))
            }
            CacheBackend::Redis => {
                let url = settings.redis_url.clone().ok_or_else(|| {
                    DomainError::configuration("Redis URL is required for Redis cache type")
                })?;

                let mut redis_config =
                    RedisCacheConfig::new(url).with_connection_timeout(REDIS_CONNECT_TIMEOUT);

                if let Some(prefix) = &settings.key_prefix {
                    redis_config = redis_config.with_key_prefix(prefix.clone());
                }

                let cache = RedisCache::new(redis_config).await?;
                info!("Connected to Redis cache");
                Ok(Arc::new(cache))
            }
        }
    }

    /// In-memory cache whose moka-level lifetime never undercuts the entry TTL
    pub fn in_memory(settings: &CacheSettings) -> Arc<dyn Cache> {
        let config = InMemoryCacheConfig::default()
            .with_max_capacity(settings.max_capacity)
            .with_default_ttl(settings.ttl());

        Arc::new(InMemoryCache::with_config(config))
    }
}

//! Read-through, invalidate-on-write access to one resource kind
//!
//! Reads consult the cache first and fall back to the record store on any
//! miss. Writes commit to the store, then delete the point key and every
//! list key of the resource before returning. A delete also clears the kinds
//! its row cascades to in the schema. Cache failures never fail a
//! request; they are logged and counted.

use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use metrics::counter;
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::{CacheSettings, DatabaseConfig};
use crate::domain::cache::{Cache, CacheKey};
use crate::domain::pagination::Page;
use crate::domain::storage::{Record, RecordStore};
use crate::domain::DomainError;

/// Timing knobs for the cache-aside path
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CachePolicy {
    /// Lifetime of every cache entry written on a read miss
    pub ttl: Duration,
    /// Upper bound on one record store call
    pub store_timeout: Duration,
    /// Upper bound on one cache call
    pub cache_timeout: Duration,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(600),
            store_timeout: Duration::from_secs(5),
            cache_timeout: Duration::from_secs(1),
        }
    }
}

impl CachePolicy {
    pub fn from_config(cache: &CacheSettings, database: &DatabaseConfig) -> Self {
        Self {
            ttl: cache.ttl(),
            store_timeout: database.operation_timeout(),
            cache_timeout: cache.operation_timeout(),
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_store_timeout(mut self, timeout: Duration) -> Self {
        self.store_timeout = timeout;
        self
    }

    pub fn with_cache_timeout(mut self, timeout: Duration) -> Self {
        self.cache_timeout = timeout;
        self
    }
}

/// Parses a path id, naming the resource in the error
pub fn parse_id<E: Record>(id: &str) -> Result<Uuid, DomainError> {
    Uuid::parse_str(id).map_err(|_| {
        DomainError::invalid_id(format!(
            "'{}' is not a valid {} id",
            id,
            E::KIND.display_name().to_lowercase()
        ))
    })
}

/// Overwrites an optional field only when the patch carries a value
pub fn patch_optional<T>(field: &mut Option<T>, patch: Option<T>) {
    if patch.is_some() {
        *field = patch;
    }
}

/// Cache-aside wrapper around the record store of one resource kind
pub struct CachedRecords<E, S = dyn RecordStore<E>>
where
    E: Record,
    S: RecordStore<E> + ?Sized,
{
    store: Arc<S>,
    cache: Arc<dyn Cache>,
    policy: CachePolicy,
    keys: CacheKey,
    _record: PhantomData<fn() -> E>,
}

impl<E, S> std::fmt::Debug for CachedRecords<E, S>
where
    E: Record,
    S: RecordStore<E> + ?Sized,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedRecords")
            .field("resource", &E::KIND)
            .field("policy", &self.policy)
            .finish()
    }
}

impl<E, S> CachedRecords<E, S>
where
    E: Record,
    S: RecordStore<E> + ?Sized,
{
    pub fn new(store: Arc<S>, cache: Arc<dyn Cache>, policy: CachePolicy) -> Self {
        Self {
            store,
            cache,
            policy,
            keys: CacheKey::new(E::KIND),
            _record: PhantomData,
        }
    }

    /// The underlying store, for lookups that must bypass the cache
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    /// Point read through `{resource}:{id}`
    pub async fn get(&self, id: &Uuid) -> Result<E, DomainError> {
        let key = self.keys.point(id);

        if let Some(record) = self.read_cached::<E>(&key).await {
            return Ok(record);
        }

        let record = self
            .fetch_fresh(id)
            .await?
            .redacted();

        self.populate(&key, &record).await;
        Ok(record)
    }

    /// List read through `{resource}:list:{limit}:{offset}`
    pub async fn list(&self, page: Page) -> Result<Vec<E>, DomainError> {
        let key = self.keys.list(page);

        if let Some(records) = self.read_cached::<Vec<E>>(&key).await {
            return Ok(records);
        }

        let records: Vec<E> = self
            .store_call("list", self.store.list(page))
            .await?
            .iter()
            .map(Record::redacted)
            .collect();

        self.populate(&key, &records).await;
        Ok(records)
    }

    /// Reads straight from the store, `NotFound` if absent
    ///
    /// The record is returned unredacted, which makes it the right base for
    /// a patch.
    pub async fn fetch_fresh(&self, id: &Uuid) -> Result<E, DomainError> {
        self.store_call("get", self.store.get(id))
            .await?
            .ok_or_else(|| self.not_found(id))
    }

    pub async fn create(&self, record: E) -> Result<E, DomainError> {
        let created = self.store_call("create", self.store.create(record)).await?;
        self.invalidate(None).await;
        Ok(created.redacted())
    }

    pub async fn update(&self, record: E) -> Result<E, DomainError> {
        let id = record.id();
        let updated = self.store_call("update", self.store.update(record)).await?;
        self.invalidate(Some(&id)).await;
        Ok(updated.redacted())
    }

    /// Deletes a record, `NotFound` if the store had no such row
    ///
    /// The point key is cleared either way so a stale entry cannot outlive
    /// the row.
    pub async fn delete(&self, id: &Uuid) -> Result<(), DomainError> {
        let removed = self.store_call("delete", self.store.delete(id)).await?;
        self.invalidate(Some(id)).await;

        if removed {
            self.invalidate_cascaded().await;
            Ok(())
        } else {
            Err(self.not_found(id))
        }
    }

    fn not_found(&self, id: &Uuid) -> DomainError {
        DomainError::not_found(format!("{} '{}' not found", E::KIND.display_name(), id))
    }

    /// Runs one store call under the store timeout; elapsed is `StoreUnavailable`
    pub async fn store_call<T>(
        &self,
        op: &'static str,
        call: impl Future<Output = Result<T, DomainError>>,
    ) -> Result<T, DomainError> {
        match tokio::time::timeout(self.policy.store_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(DomainError::store_unavailable(format!(
                "{} {} timed out after {:?}",
                E::KIND,
                op,
                self.policy.store_timeout
            ))),
        }
    }

    /// Runs one cache call; failures and timeouts are recorded and become `None`
    async fn cache_call<T>(
        &self,
        op: &'static str,
        target: &str,
        call: impl Future<Output = Result<T, DomainError>>,
    ) -> Option<T> {
        let error = match tokio::time::timeout(self.policy.cache_timeout, call).await {
            Ok(Ok(value)) => return Some(value),
            Ok(Err(e)) => e,
            Err(_) => DomainError::cache_degraded(format!(
                "timed out after {:?}",
                self.policy.cache_timeout
            )),
        };

        self.degraded(op, target, &error);
        None
    }

    fn degraded(&self, op: &'static str, target: &str, error: &DomainError) {
        warn!(
            resource = %E::KIND,
            op,
            key = target,
            error = %error,
            "Cache degraded"
        );
        counter!("cache_degraded_total", "resource" => E::KIND.prefix(), "op" => op).increment(1);
    }

    async fn read_cached<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.cache_call("get", key, self.cache.get_raw(key)).await.flatten();

        let Some(raw) = raw else {
            debug!(resource = %E::KIND, key, "Cache miss");
            counter!("cache_misses_total", "resource" => E::KIND.prefix()).increment(1);
            return None;
        };

        match serde_json::from_str(&raw) {
            Ok(value) => {
                debug!(resource = %E::KIND, key, "Cache hit");
                counter!("cache_hits_total", "resource" => E::KIND.prefix()).increment(1);
                Some(value)
            }
            Err(e) => {
                self.degraded(
                    "decode",
                    key,
                    &DomainError::cache_degraded(format!("undecodable entry: {}", e)),
                );
                counter!("cache_misses_total", "resource" => E::KIND.prefix()).increment(1);
                None
            }
        }
    }

    async fn populate<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        let data = match serde_json::to_string(value) {
            Ok(data) => data,
            Err(e) => {
                self.degraded(
                    "encode",
                    key,
                    &DomainError::cache_degraded(format!("unencodable value: {}", e)),
                );
                return;
            }
        };

        self.cache_call("set", key, self.cache.set_raw(key, &data, self.policy.ttl))
            .await;
    }

    /// Drops the point key when given, then the whole list family
    async fn invalidate(&self, id: Option<&Uuid>) {
        if let Some(id) = id {
            let key = self.keys.point(id);
            self.cache_call("delete", &key, self.cache.delete(&key)).await;
        }

        let pattern = self.keys.list_pattern();
        if let Some(removed) = self
            .cache_call("delete_pattern", &pattern, self.cache.delete_pattern(&pattern))
            .await
        {
            debug!(resource = %E::KIND, pattern = %pattern, removed, "Invalidated list keys");
        }
    }

    /// Clears every key of the kinds whose rows the store deleted or
    /// rewrote along with the deleted row
    async fn invalidate_cascaded(&self) {
        for kind in E::KIND.cascades_to() {
            let pattern = CacheKey::new(*kind).all_pattern();
            if let Some(removed) = self
                .cache_call("delete_pattern", &pattern, self.cache.delete_pattern(&pattern))
                .await
            {
                debug!(resource = %E::KIND, dependent = %kind, removed, "Invalidated cascaded keys");
            }
        }
    }
}

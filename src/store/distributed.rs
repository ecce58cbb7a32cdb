use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use tokio::sync::RwLock;

use crate::error::MultiTenantError;
use crate::model::TenantRecord;
use crate::store::traits::{require_non_blank, validate_record, TenantStore};

/// String key/value backend shared between service instances. A Redis-backed
/// implementation plugs in here; `LocalDistributedCache` below covers tests
/// and single-node deployments.
#[async_trait::async_trait]
pub trait DistributedCache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: String, ttl: Option<Duration>) -> Result<()>;
    async fn remove(&self, key: &str) -> Result<bool>;
}

#[derive(Clone, Debug)]
struct CacheEntry {
    value: String,
    last_accessed: Instant,
    ttl: Option<Duration>,
}

/// In-process `DistributedCache` with sliding expiration.
#[derive(Default)]
pub struct LocalDistributedCache {
    entries: Arc<RwLock<HashMap<String, CacheEntry>>>,
}

impl LocalDistributedCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every entry whose TTL has lapsed.
    pub async fn purge_expired(&self) {
        let mut entries = self.entries.write().await;
        entries.retain(|_, entry| match entry.ttl {
            Some(ttl) => entry.last_accessed.elapsed() <= ttl,
            None => true,
        });
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }
}

#[async_trait::async_trait]
impl DistributedCache for LocalDistributedCache {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut entries = self.entries.write().await;
        if let Some(entry) = entries.get_mut(key) {
            if let Some(ttl) = entry.ttl {
                if entry.last_accessed.elapsed() > ttl {
                    entries.remove(key);
                    return Ok(None);
                }
            }
            // Sliding expiration: a hit refreshes the window.
            entry.last_accessed = Instant::now();
            return Ok(Some(entry.value.clone()));
        }
        Ok(None)
    }

    async fn set(&self, key: &str, value: String, ttl: Option<Duration>) -> Result<()> {
        let mut entries = self.entries.write().await;
        entries.insert(
            key.to_string(),
            CacheEntry {
                value,
                last_accessed: Instant::now(),
                ttl,
            },
        );
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<bool> {
        Ok(self.entries.write().await.remove(key).is_some())
    }
}

/// Tenant store over a `DistributedCache` backend.
///
/// Each record is serialized to JSON under two keys, one per lookup path:
/// `{prefix}id__{id}` and `{prefix}identifier__{identifier}`. Identifier
/// comparison is exact. `list` is `NotSupported`: a string KV backend cannot
/// enumerate. The dual-key writes are not transactional; under concurrent
/// `add` of the same keys the last writer wins.
pub struct DistributedCacheStore<C: DistributedCache> {
    cache: C,
    key_prefix: String,
    ttl: Option<Duration>,
}

impl<C: DistributedCache> DistributedCacheStore<C> {
    pub fn new(cache: C) -> Self {
        Self {
            cache,
            key_prefix: "tenant:".to_string(),
            ttl: None,
        }
    }

    pub fn with_key_prefix(mut self, key_prefix: impl Into<String>) -> Self {
        self.key_prefix = key_prefix.into();
        self
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    fn id_key(&self, id: &str) -> String {
        format!("{}id__{}", self.key_prefix, id)
    }

    fn identifier_key(&self, identifier: &str) -> String {
        format!("{}identifier__{}", self.key_prefix, identifier)
    }

    fn decode(&self, payload: &str) -> Result<TenantRecord, MultiTenantError> {
        serde_json::from_str(payload).map_err(|e| MultiTenantError::BackingStore(e.into()))
    }

    fn encode(&self, record: &TenantRecord) -> Result<String, MultiTenantError> {
        serde_json::to_string(record).map_err(|e| MultiTenantError::BackingStore(e.into()))
    }

    async fn write_record(&self, record: &TenantRecord) -> Result<(), MultiTenantError> {
        let payload = self.encode(record)?;
        self.cache
            .set(&self.id_key(&record.id), payload.clone(), self.ttl)
            .await?;
        self.cache
            .set(
                &self.identifier_key(&record.identifier),
                payload,
                self.ttl,
            )
            .await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl<C: DistributedCache> TenantStore for DistributedCacheStore<C> {
    fn name(&self) -> &str {
        "distributed_cache"
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<TenantRecord>, MultiTenantError> {
        require_non_blank(id, "tenant id must not be blank")?;
        match self.cache.get(&self.id_key(id)).await? {
            Some(payload) => Ok(Some(self.decode(&payload)?)),
            None => Ok(None),
        }
    }

    async fn get_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<TenantRecord>, MultiTenantError> {
        require_non_blank(identifier, "tenant identifier must not be blank")?;
        match self.cache.get(&self.identifier_key(identifier)).await? {
            Some(payload) => Ok(Some(self.decode(&payload)?)),
            None => Ok(None),
        }
    }

    async fn list(
        &self,
        _limit: Option<usize>,
        _offset: Option<usize>,
    ) -> Result<Vec<TenantRecord>, MultiTenantError> {
        Err(MultiTenantError::NotSupported("list"))
    }

    async fn add(&self, record: TenantRecord) -> Result<bool, MultiTenantError> {
        validate_record(&record)?;
        if self.cache.get(&self.id_key(&record.id)).await?.is_some() {
            return Ok(false);
        }
        if self
            .cache
            .get(&self.identifier_key(&record.identifier))
            .await?
            .is_some()
        {
            return Ok(false);
        }
        self.write_record(&record).await?;
        Ok(true)
    }

    async fn update(&self, record: TenantRecord) -> Result<bool, MultiTenantError> {
        validate_record(&record)?;
        let Some(existing) = self.get_by_id(&record.id).await? else {
            return Ok(false);
        };
        if existing.identifier != record.identifier {
            if let Some(holder) = self.get_by_identifier(&record.identifier).await? {
                if holder.id != record.id {
                    return Ok(false);
                }
            }
            self.cache
                .remove(&self.identifier_key(&existing.identifier))
                .await?;
        }
        let mut record = record;
        record.created_at = existing.created_at;
        record.updated_at = chrono::Utc::now();
        self.write_record(&record).await?;
        Ok(true)
    }

    async fn remove(&self, identifier: &str) -> Result<bool, MultiTenantError> {
        require_non_blank(identifier, "tenant identifier must not be blank")?;
        let Some(existing) = self.get_by_identifier(identifier).await? else {
            return Ok(false);
        };
        self.cache.remove(&self.id_key(&existing.id)).await?;
        self.cache
            .remove(&self.identifier_key(&existing.identifier))
            .await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, identifier: &str) -> TenantRecord {
        TenantRecord {
            id: id.to_string(),
            ..TenantRecord::new(identifier, identifier.to_uppercase())
        }
    }

    #[tokio::test]
    async fn test_round_trip_through_backend() {
        let store = DistributedCacheStore::new(LocalDistributedCache::new());
        let original = record("t1", "acme").with_setting("theme", serde_json::json!("dark"));
        assert!(store.add(original.clone()).await.unwrap());

        let by_id = store.get_by_id("t1").await.unwrap().unwrap();
        assert_eq!(by_id.identifier, "acme");
        assert_eq!(by_id.get_setting_str("theme"), Some("dark"));

        let by_identifier = store.get_by_identifier("acme").await.unwrap().unwrap();
        assert_eq!(by_identifier.id, "t1");
    }

    #[tokio::test]
    async fn test_add_duplicate_is_false() {
        let store = DistributedCacheStore::new(LocalDistributedCache::new());
        assert!(store.add(record("t1", "acme")).await.unwrap());
        assert!(!store.add(record("t1", "other")).await.unwrap());
        assert!(!store.add(record("t2", "acme")).await.unwrap());
    }

    #[tokio::test]
    async fn test_update_reindexes_identifier() {
        let store = DistributedCacheStore::new(LocalDistributedCache::new());
        store.add(record("t1", "acme")).await.unwrap();
        store.add(record("t2", "initech")).await.unwrap();

        assert!(!store.update(record("ghost", "ghost")).await.unwrap());
        assert!(!store.update(record("t1", "initech")).await.unwrap());

        assert!(store.update(record("t1", "acme-emea")).await.unwrap());
        assert!(store.get_by_identifier("acme").await.unwrap().is_none());
        assert_eq!(
            store
                .get_by_identifier("acme-emea")
                .await
                .unwrap()
                .unwrap()
                .id,
            "t1"
        );
    }

    #[tokio::test]
    async fn test_remove_clears_both_keys() {
        let store = DistributedCacheStore::new(LocalDistributedCache::new());
        store.add(record("t1", "acme")).await.unwrap();
        assert!(store.remove("acme").await.unwrap());
        assert!(!store.remove("acme").await.unwrap());
        assert!(store.get_by_id("t1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_is_not_supported() {
        let store = DistributedCacheStore::new(LocalDistributedCache::new());
        assert!(matches!(
            store.list(None, None).await,
            Err(MultiTenantError::NotSupported("list"))
        ));
    }

    #[tokio::test]
    async fn test_entries_expire_after_ttl() {
        let store =
            DistributedCacheStore::new(LocalDistributedCache::new()).with_ttl(Duration::ZERO);
        store.add(record("t1", "acme")).await.unwrap();
        std::thread::sleep(Duration::from_millis(5));
        assert!(store.get_by_identifier("acme").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_purge_expired_retains_live_entries() {
        let cache = LocalDistributedCache::new();
        cache
            .set("live", "1".to_string(), None)
            .await
            .unwrap();
        cache
            .set("dead", "2".to_string(), Some(Duration::ZERO))
            .await
            .unwrap();
        std::thread::sleep(Duration::from_millis(5));
        cache.purge_expired().await;
        assert_eq!(cache.get("live").await.unwrap().as_deref(), Some("1"));
        assert_eq!(cache.get("dead").await.unwrap(), None);
    }
}

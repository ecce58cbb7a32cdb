use log::warn;

use crate::error::MultiTenantError;
use crate::model::TenantRecord;
use crate::store::traits::{require_non_blank, validate_record, TenantStore};

/// Shields the resolution pipeline from a flaky backing store.
///
/// Environmental failures (network, storage) are logged and converted into
/// the negative outcome of the operation, so the pipeline moves on to the
/// next store instead of failing the unit of work. Blank-argument
/// preconditions are re-validated here and still raised: programmer errors
/// stay visible while the environment degrades gracefully.
pub struct ResilientStore<S: TenantStore> {
    inner: S,
}

impl<S: TenantStore> ResilientStore<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    fn swallow<T>(
        &self,
        operation: &str,
        fallback: T,
        result: Result<T, MultiTenantError>,
    ) -> Result<T, MultiTenantError> {
        match result {
            Ok(value) => Ok(value),
            Err(e) => {
                warn!(
                    "tenant store `{}` failed during {}: {}",
                    self.inner.name(),
                    operation,
                    e
                );
                Ok(fallback)
            }
        }
    }
}

#[async_trait::async_trait]
impl<S: TenantStore> TenantStore for ResilientStore<S> {
    /// Reports the inner store's name so resolution provenance names the
    /// real store, not the shield.
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<TenantRecord>, MultiTenantError> {
        require_non_blank(id, "tenant id must not be blank")?;
        let result = self.inner.get_by_id(id).await;
        self.swallow("get_by_id", None, result)
    }

    async fn get_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<TenantRecord>, MultiTenantError> {
        require_non_blank(identifier, "tenant identifier must not be blank")?;
        let result = self.inner.get_by_identifier(identifier).await;
        self.swallow("get_by_identifier", None, result)
    }

    async fn list(
        &self,
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> Result<Vec<TenantRecord>, MultiTenantError> {
        let result = self.inner.list(limit, offset).await;
        self.swallow("list", Vec::new(), result)
    }

    async fn add(&self, record: TenantRecord) -> Result<bool, MultiTenantError> {
        validate_record(&record)?;
        let result = self.inner.add(record).await;
        self.swallow("add", false, result)
    }

    async fn update(&self, record: TenantRecord) -> Result<bool, MultiTenantError> {
        validate_record(&record)?;
        let result = self.inner.update(record).await;
        self.swallow("update", false, result)
    }

    async fn remove(&self, identifier: &str) -> Result<bool, MultiTenantError> {
        require_non_blank(identifier, "tenant identifier must not be blank")?;
        let result = self.inner.remove(identifier).await;
        self.swallow("remove", false, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::InMemoryStore;

    /// Fails every operation the way a dead network dependency would.
    struct FailingStore;

    #[async_trait::async_trait]
    impl TenantStore for FailingStore {
        fn name(&self) -> &str {
            "failing"
        }

        async fn get_by_id(&self, _id: &str) -> Result<Option<TenantRecord>, MultiTenantError> {
            Err(MultiTenantError::BackingStore(anyhow::anyhow!(
                "connection refused"
            )))
        }

        async fn get_by_identifier(
            &self,
            _identifier: &str,
        ) -> Result<Option<TenantRecord>, MultiTenantError> {
            Err(MultiTenantError::BackingStore(anyhow::anyhow!(
                "connection refused"
            )))
        }

        async fn list(
            &self,
            _limit: Option<usize>,
            _offset: Option<usize>,
        ) -> Result<Vec<TenantRecord>, MultiTenantError> {
            Err(MultiTenantError::BackingStore(anyhow::anyhow!(
                "connection refused"
            )))
        }

        async fn add(&self, _record: TenantRecord) -> Result<bool, MultiTenantError> {
            Err(MultiTenantError::BackingStore(anyhow::anyhow!(
                "connection refused"
            )))
        }

        async fn update(&self, _record: TenantRecord) -> Result<bool, MultiTenantError> {
            Err(MultiTenantError::BackingStore(anyhow::anyhow!(
                "connection refused"
            )))
        }

        async fn remove(&self, _identifier: &str) -> Result<bool, MultiTenantError> {
            Err(MultiTenantError::BackingStore(anyhow::anyhow!(
                "connection refused"
            )))
        }
    }

    #[tokio::test]
    async fn test_environmental_failures_become_negative_outcomes() {
        let store = ResilientStore::new(FailingStore);
        assert!(store.get_by_id("t1").await.unwrap().is_none());
        assert!(store.get_by_identifier("acme").await.unwrap().is_none());
        assert!(store.list(None, None).await.unwrap().is_empty());
        assert!(!store.add(TenantRecord::new("acme", "Acme")).await.unwrap());
        assert!(!store
            .update(TenantRecord::new("acme", "Acme"))
            .await
            .unwrap());
        assert!(!store.remove("acme").await.unwrap());
    }

    #[tokio::test]
    async fn test_precondition_violations_still_raise() {
        let store = ResilientStore::new(FailingStore);
        assert!(matches!(
            store.get_by_identifier("").await,
            Err(MultiTenantError::InvalidArgument(_))
        ));
        let mut blank = TenantRecord::new("acme", "Acme");
        blank.identifier = String::new();
        assert!(matches!(
            store.add(blank).await,
            Err(MultiTenantError::InvalidArgument(_))
        ));
    }

    #[tokio::test]
    async fn test_healthy_inner_store_passes_through() {
        let store = ResilientStore::new(InMemoryStore::new());
        assert!(store.add(TenantRecord::new("acme", "Acme")).await.unwrap());
        let fetched = store.get_by_identifier("acme").await.unwrap().unwrap();
        assert_eq!(fetched.name, "Acme");
        assert_eq!(store.name(), "in_memory");
    }
}

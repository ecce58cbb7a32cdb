use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::current;
use crate::model::TenantRecord;
use crate::options::partition::derived_key;

/// Tenant customization applied to a configuration object after generic
/// construction. Arbitrary application code; never called under a lock.
pub type TenantConfigure<T> = dyn Fn(&mut T, &TenantRecord) + Send + Sync;

/// Generic name-keyed object cache: the process-wide singleton registry the
/// per-tenant decorator partitions.
///
/// `get_or_add` runs the factory outside any lock; under a race the first
/// inserted value wins and the losing build is dropped.
pub struct OptionsCache<T> {
    entries: RwLock<HashMap<String, Arc<T>>>,
}

impl<T> OptionsCache<T> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn get_or_add(&self, name: &str, factory: impl FnOnce() -> T) -> Arc<T> {
        if let Some(existing) = self.entries.read().get(name) {
            return existing.clone();
        }
        let built = Arc::new(factory());
        let mut entries = self.entries.write();
        entries.entry(name.to_string()).or_insert(built).clone()
    }

    pub fn try_add(&self, name: &str, value: T) -> bool {
        let mut entries = self.entries.write();
        match entries.entry(name.to_string()) {
            Entry::Vacant(vacant) => {
                vacant.insert(Arc::new(value));
                true
            }
            Entry::Occupied(_) => false,
        }
    }

    pub fn try_remove(&self, name: &str) -> bool {
        self.entries.write().remove(name).is_some()
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }
}

impl<T> Default for OptionsCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Makes an `OptionsCache` transparently tenant-aware.
///
/// Callers keep using logical names; the decorator reads the ambient
/// resolved tenant, derives a partition key, and customizes newly built
/// values with the tenant customization closure. A reverse index records
/// every derived key ever created for a logical name, so `try_remove`
/// invalidates the name for every tenant that ever triggered its creation,
/// not just the currently resolved one.
pub struct PerTenantOptionsCache<T> {
    inner: OptionsCache<T>,
    derived_keys: RwLock<HashMap<String, HashSet<String>>>,
    configure_tenant: Arc<TenantConfigure<T>>,
}

impl<T> PerTenantOptionsCache<T> {
    pub fn new(
        inner: OptionsCache<T>,
        configure_tenant: impl Fn(&mut T, &TenantRecord) + Send + Sync + 'static,
    ) -> Self {
        Self::with_shared_configurer(inner, Arc::new(configure_tenant))
    }

    pub fn with_shared_configurer(
        inner: OptionsCache<T>,
        configure_tenant: Arc<TenantConfigure<T>>,
    ) -> Self {
        Self {
            inner,
            derived_keys: RwLock::new(HashMap::new()),
            configure_tenant,
        }
    }

    /// Resolve-then-get against the ambient tenant.
    pub fn get_or_add(&self, name: &str, factory: impl FnOnce() -> T) -> Arc<T> {
        let tenant = current::current_tenant_record();
        self.get_or_add_for(tenant.as_deref(), name, factory)
    }

    pub fn get_or_add_for(
        &self,
        tenant: Option<&TenantRecord>,
        name: &str,
        factory: impl FnOnce() -> T,
    ) -> Arc<T> {
        let key = derived_key(tenant.map(|t| t.id.as_str()), name);
        let value = self.inner.get_or_add(&key, || {
            let mut value = factory();
            if let Some(tenant) = tenant {
                (self.configure_tenant)(&mut value, tenant);
            }
            value
        });
        self.record_key(name, &key);
        value
    }

    pub fn try_add(&self, name: &str, value: T) -> bool {
        let tenant = current::current_tenant_record();
        self.try_add_for(tenant.as_deref(), name, value)
    }

    pub fn try_add_for(&self, tenant: Option<&TenantRecord>, name: &str, mut value: T) -> bool {
        if let Some(tenant) = tenant {
            (self.configure_tenant)(&mut value, tenant);
        }
        let key = derived_key(tenant.map(|t| t.id.as_str()), name);
        let added = self.inner.try_add(&key, value);
        if added {
            self.record_key(name, &key);
        }
        added
    }

    /// Remove `name` for every tenant that ever triggered its creation.
    /// True when at least one cached instance was evicted.
    pub fn try_remove(&self, name: &str) -> bool {
        let keys: Vec<String> = match self.derived_keys.write().remove(name) {
            Some(keys) => keys.into_iter().collect(),
            None => return false,
        };
        let mut removed = false;
        for key in &keys {
            removed |= self.inner.try_remove(key);
        }
        removed
    }

    pub fn clear(&self) {
        self.inner.clear();
        self.derived_keys.write().clear();
    }

    fn record_key(&self, name: &str, key: &str) {
        let mut index = self.derived_keys.write();
        index
            .entry(name.to_string())
            .or_default()
            .insert(key.to_string());
    }
}

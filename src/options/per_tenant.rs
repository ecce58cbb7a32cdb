use std::sync::Arc;

use crate::model::TenantRecord;
use crate::options::cache::{OptionsCache, PerTenantOptionsCache};
use crate::options::factory::PerTenantOptionsFactory;
use crate::options::partition::DEFAULT_NAME;

/// Factory and cache wired together: configuration objects are built through
/// the generic pipeline, customized for the resolved tenant once, and cached
/// per tenant so they are not rebuilt on every unit of work.
pub struct PerTenantOptions<T> {
    factory: PerTenantOptionsFactory<T>,
    cache: PerTenantOptionsCache<T>,
}

impl<T> PerTenantOptions<T> {
    pub fn new(factory: PerTenantOptionsFactory<T>) -> Self {
        // The cache layer owns the tenant customization step; the factory
        // contributes only its generic pipeline, so the closure runs once.
        let cache = PerTenantOptionsCache::with_shared_configurer(
            OptionsCache::new(),
            factory.tenant_configurer(),
        );
        Self { factory, cache }
    }

    /// The named configuration object for the ambient tenant, built on first
    /// use.
    pub fn get(&self, name: &str) -> Arc<T> {
        self.cache
            .get_or_add(name, || self.factory.create_base(name))
    }

    pub fn get_default(&self) -> Arc<T> {
        self.get(DEFAULT_NAME)
    }

    pub fn get_for(&self, tenant: Option<&TenantRecord>, name: &str) -> Arc<T> {
        self.cache
            .get_or_add_for(tenant, name, || self.factory.create_base(name))
    }

    /// Drop the named object for every tenant; the next `get` rebuilds it.
    pub fn invalidate(&self, name: &str) -> bool {
        self.cache.try_remove(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::current::with_tenant;
    use crate::model::ResolvedTenant;

    #[derive(Debug, Default)]
    struct BrandingOptions {
        application_name: String,
        theme: String,
    }

    fn options() -> PerTenantOptions<BrandingOptions> {
        PerTenantOptions::new(
            PerTenantOptionsFactory::new(BrandingOptions::default, |options, tenant| {
                options.application_name = tenant.name.clone();
                if let Some(theme) = tenant.get_setting_str("theme") {
                    options.theme = theme.to_string();
                }
            })
            .configure(|options| options.theme = "light".to_string()),
        )
    }

    fn tenant(id: &str, theme: Option<&str>) -> TenantRecord {
        let mut record = TenantRecord {
            id: id.to_string(),
            ..TenantRecord::new(id, id.to_uppercase())
        };
        if let Some(theme) = theme {
            record = record.with_setting("theme", serde_json::json!(theme));
        }
        record
    }

    #[test]
    fn test_customizes_once_and_caches_per_tenant() {
        let options = options();
        let acme = tenant("acme", Some("dark"));
        let initech = tenant("initech", None);

        let a = options.get_for(Some(&acme), DEFAULT_NAME);
        assert_eq!(a.application_name, "ACME");
        assert_eq!(a.theme, "dark");

        let b = options.get_for(Some(&initech), DEFAULT_NAME);
        assert_eq!(b.application_name, "INITECH");
        assert_eq!(b.theme, "light", "generic configurator value survives");

        let again = options.get_for(Some(&acme), DEFAULT_NAME);
        assert!(Arc::ptr_eq(&a, &again));

        let shared = options.get_for(None, DEFAULT_NAME);
        assert_eq!(shared.application_name, "");
    }

    #[test]
    fn test_invalidate_rebuilds_all_partitions() {
        let options = options();
        let acme = tenant("acme", Some("dark"));
        let first = options.get_for(Some(&acme), DEFAULT_NAME);
        assert!(options.invalidate(DEFAULT_NAME));
        let rebuilt = options.get_for(Some(&acme), DEFAULT_NAME);
        assert!(!Arc::ptr_eq(&first, &rebuilt));
        assert_eq!(rebuilt.theme, "dark");
    }

    #[tokio::test]
    async fn test_get_reads_ambient_tenant() {
        let options = options();
        let resolved = ResolvedTenant::resolved(
            tenant("acme", Some("dark")),
            "header",
            "in_memory",
        );
        let branding = with_tenant(resolved, async { options.get_default() }).await;
        assert_eq!(branding.application_name, "ACME");

        let ambient_free = options.get_default();
        assert_eq!(ambient_free.application_name, "");
    }
}

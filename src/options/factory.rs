use std::sync::Arc;

use crate::current;
use crate::model::TenantRecord;
use crate::options::cache::TenantConfigure;

/// Builds configuration objects through the generic construction pipeline,
/// then specializes them for the resolved tenant.
///
/// `create` runs the base constructor, every generic configurator in
/// registration order, every generic post-configurator in registration
/// order, and finally the tenant customization closure iff a tenant is
/// ambiently resolved. Without a resolved tenant the object leaves the
/// factory untouched by tenant logic.
pub struct PerTenantOptionsFactory<T> {
    base: Box<dyn Fn() -> T + Send + Sync>,
    configure: Vec<Box<dyn Fn(&mut T) + Send + Sync>>,
    post_configure: Vec<Box<dyn Fn(&mut T) + Send + Sync>>,
    configure_tenant: Arc<TenantConfigure<T>>,
}

impl<T> PerTenantOptionsFactory<T> {
    pub fn new(
        base: impl Fn() -> T + Send + Sync + 'static,
        configure_tenant: impl Fn(&mut T, &TenantRecord) + Send + Sync + 'static,
    ) -> Self {
        Self {
            base: Box::new(base),
            configure: Vec::new(),
            post_configure: Vec::new(),
            configure_tenant: Arc::new(configure_tenant),
        }
    }

    pub fn configure(mut self, action: impl Fn(&mut T) + Send + Sync + 'static) -> Self {
        self.configure.push(Box::new(action));
        self
    }

    pub fn post_configure(mut self, action: impl Fn(&mut T) + Send + Sync + 'static) -> Self {
        self.post_configure.push(Box::new(action));
        self
    }

    /// The tenant customization closure, shared with the cache layer so a
    /// combined setup customizes exactly once.
    pub fn tenant_configurer(&self) -> Arc<TenantConfigure<T>> {
        self.configure_tenant.clone()
    }

    /// Generic pipeline only: base, configurators, post-configurators.
    pub fn create_base(&self, _name: &str) -> T {
        let mut value = (self.base)();
        for action in &self.configure {
            action(&mut value);
        }
        for action in &self.post_configure {
            action(&mut value);
        }
        value
    }

    /// Full standalone pipeline against the ambient tenant.
    pub fn create(&self, name: &str) -> T {
        let tenant = current::current_tenant_record();
        self.create_for(tenant.as_deref(), name)
    }

    pub fn create_for(&self, tenant: Option<&TenantRecord>, name: &str) -> T {
        let mut value = self.create_base(name);
        if let Some(tenant) = tenant {
            (self.configure_tenant)(&mut value, tenant);
        }
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::current::with_tenant;
    use crate::model::ResolvedTenant;

    #[derive(Debug, Default)]
    struct AuthOptions {
        steps: Vec<String>,
        issuer: String,
    }

    fn factory() -> PerTenantOptionsFactory<AuthOptions> {
        PerTenantOptionsFactory::new(AuthOptions::default, |options, tenant| {
            options.steps.push("tenant".to_string());
            options.issuer = format!("https://{}.example.com", tenant.identifier);
        })
        .configure(|options| options.steps.push("configure-1".to_string()))
        .configure(|options| options.steps.push("configure-2".to_string()))
        .post_configure(|options| options.steps.push("post".to_string()))
    }

    #[test]
    fn test_generic_steps_run_in_registration_order() {
        let options = factory().create_base("auth");
        assert_eq!(options.steps, vec!["configure-1", "configure-2", "post"]);
        assert_eq!(options.issuer, "");
    }

    #[test]
    fn test_tenant_customization_runs_after_post_configure() {
        let tenant = TenantRecord::new("acme", "Acme Corp");
        let options = factory().create_for(Some(&tenant), "auth");
        assert_eq!(
            options.steps,
            vec!["configure-1", "configure-2", "post", "tenant"]
        );
        assert_eq!(options.issuer, "https://acme.example.com");
    }

    #[tokio::test]
    async fn test_create_is_inert_without_an_ambient_tenant() {
        let options = factory().create("auth");
        assert_eq!(options.steps, vec!["configure-1", "configure-2", "post"]);

        let resolved = ResolvedTenant::resolved(
            TenantRecord::new("acme", "Acme Corp"),
            "header",
            "in_memory",
        );
        let options = with_tenant(resolved, async { factory().create("auth") }).await;
        assert_eq!(options.steps.last().map(String::as_str), Some("tenant"));
    }
}

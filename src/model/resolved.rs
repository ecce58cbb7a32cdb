use std::sync::Arc;

use crate::model::TenantRecord;

/// Outcome of running the resolution pipeline once for one unit of work.
///
/// Immutable after creation. Carries provenance: the name of the strategy
/// that produced the winning identifier and the name of the store that
/// recognized it. Cloning is cheap; the record is shared behind an `Arc`.
#[derive(Debug, Clone)]
pub struct ResolvedTenant {
    pub tenant: Option<Arc<TenantRecord>>,
    pub strategy: Option<String>,
    pub store: Option<String>,
}

impl ResolvedTenant {
    pub fn resolved(tenant: TenantRecord, strategy: &str, store: &str) -> Self {
        Self {
            tenant: Some(Arc::new(tenant)),
            strategy: Some(strategy.to_string()),
            store: Some(store.to_string()),
        }
    }

    pub fn unresolved() -> Self {
        Self {
            tenant: None,
            strategy: None,
            store: None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.tenant.is_some()
    }

    pub fn tenant_id(&self) -> Option<&str> {
        self.tenant.as_deref().map(|t| t.id.as_str())
    }

    pub fn identifier(&self) -> Option<&str> {
        self.tenant.as_deref().map(|t| t.identifier.as_str())
    }
}

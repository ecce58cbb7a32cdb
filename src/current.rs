//! Ambient, unit-of-work-scoped holder for the resolved tenant.
//!
//! The slot is a tokio task-local, never a process-wide variable, so
//! concurrent units of work cannot observe each other's tenant. Code that
//! runs outside a `with_tenant` scope simply sees no tenant.

use std::future::Future;
use std::sync::Arc;

use crate::model::{ResolvedTenant, TenantRecord};

tokio::task_local! {
    static CURRENT_TENANT: ResolvedTenant;
}

/// Run `fut` with `resolved` as the ambient tenant for the duration of the
/// future. Scopes nest; the innermost scope wins.
pub async fn with_tenant<F>(resolved: ResolvedTenant, fut: F) -> F::Output
where
    F: Future,
{
    CURRENT_TENANT.scope(resolved, fut).await
}

/// The ambient resolution outcome, or `None` outside any scope.
pub fn current_tenant() -> Option<ResolvedTenant> {
    CURRENT_TENANT.try_with(|resolved| resolved.clone()).ok()
}

/// The ambient tenant record, or `None` when unresolved or out of scope.
pub fn current_tenant_record() -> Option<Arc<TenantRecord>> {
    CURRENT_TENANT
        .try_with(|resolved| resolved.tenant.clone())
        .ok()
        .flatten()
}

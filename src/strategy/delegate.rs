use std::sync::Arc;

use crate::error::MultiTenantError;
use crate::model::WorkContext;
use crate::strategy::traits::{priority, TenantStrategy};

type DelegateFn = dyn Fn(&dyn WorkContext) -> Option<String> + Send + Sync;

/// Wraps an application-supplied closure. Runs before every built-in
/// strategy, so it serves as the explicit override hook.
pub struct DelegateStrategy {
    delegate: Arc<DelegateFn>,
}

impl DelegateStrategy {
    pub fn new(
        delegate: impl Fn(&dyn WorkContext) -> Option<String> + Send + Sync + 'static,
    ) -> Self {
        Self {
            delegate: Arc::new(delegate),
        }
    }
}

#[async_trait::async_trait]
impl TenantStrategy for DelegateStrategy {
    fn name(&self) -> &str {
        "delegate"
    }

    fn priority(&self) -> u8 {
        priority::DELEGATE
    }

    async fn try_get_identifier(
        &self,
        ctx: &dyn WorkContext,
    ) -> Result<Option<String>, MultiTenantError> {
        Ok((self.delegate)(ctx))
    }
}

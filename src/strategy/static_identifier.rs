use crate::error::MultiTenantError;
use crate::model::WorkContext;
use crate::strategy::traits::{priority, TenantStrategy};

/// Always produces the same identifier, regardless of the work context.
/// Sorts after every other strategy, so it acts as the fallback tenant for
/// work nothing else could attribute.
pub struct StaticStrategy {
    identifier: String,
}

impl StaticStrategy {
    pub fn new(identifier: impl Into<String>) -> Result<Self, MultiTenantError> {
        let identifier = identifier.into();
        if identifier.trim().is_empty() {
            return Err(MultiTenantError::InvalidArgument(
                "static tenant identifier must not be blank",
            ));
        }
        Ok(Self { identifier })
    }
}

#[async_trait::async_trait]
impl TenantStrategy for StaticStrategy {
    fn name(&self) -> &str {
        "static"
    }

    fn priority(&self) -> u8 {
        priority::STATIC
    }

    async fn try_get_identifier(
        &self,
        _ctx: &dyn WorkContext,
    ) -> Result<Option<String>, MultiTenantError> {
        Ok(Some(self.identifier.clone()))
    }
}

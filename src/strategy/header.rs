use crate::error::MultiTenantError;
use crate::model::{HttpWorkContext, WorkContext};
use crate::strategy::traits::{priority, TenantStrategy};

pub const DEFAULT_TENANT_HEADER: &str = "x-tenant-identifier";

/// Reads the tenant identifier from a request header.
pub struct HeaderStrategy {
    header: String,
}

impl HeaderStrategy {
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into().to_ascii_lowercase(),
        }
    }
}

impl Default for HeaderStrategy {
    fn default() -> Self {
        Self::new(DEFAULT_TENANT_HEADER)
    }
}

#[async_trait::async_trait]
impl TenantStrategy for HeaderStrategy {
    fn name(&self) -> &str {
        "header"
    }

    fn priority(&self) -> u8 {
        priority::HEADER
    }

    async fn try_get_identifier(
        &self,
        ctx: &dyn WorkContext,
    ) -> Result<Option<String>, MultiTenantError> {
        let Some(http) = ctx.as_any().downcast_ref::<HttpWorkContext>() else {
            return Ok(None);
        };
        Ok(http
            .header(&self.header)
            .filter(|value| !value.is_empty())
            .map(str::to_string))
    }
}

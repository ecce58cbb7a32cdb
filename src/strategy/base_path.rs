use crate::error::MultiTenantError;
use crate::model::{HttpWorkContext, WorkContext};
use crate::strategy::traits::{priority, TenantStrategy};

/// Treats the first path segment as the tenant identifier
/// (`/acme/dashboard` -> `acme`).
#[derive(Default)]
pub struct BasePathStrategy;

impl BasePathStrategy {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl TenantStrategy for BasePathStrategy {
    fn name(&self) -> &str {
        "base_path"
    }

    fn priority(&self) -> u8 {
        priority::BASE_PATH
    }

    async fn try_get_identifier(
        &self,
        ctx: &dyn WorkContext,
    ) -> Result<Option<String>, MultiTenantError> {
        let Some(http) = ctx.as_any().downcast_ref::<HttpWorkContext>() else {
            return Ok(None);
        };
        Ok(http.first_path_segment().map(str::to_string))
    }
}

use crate::error::MultiTenantError;
use crate::model::{HttpWorkContext, WorkContext};
use crate::strategy::traits::{priority, TenantStrategy};

/// Reads the tenant identifier from a session value placed into the work
/// context by the host integration layer.
pub struct SessionStrategy {
    key: String,
}

impl SessionStrategy {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into().to_ascii_lowercase(),
        }
    }
}

#[async_trait::async_trait]
impl TenantStrategy for SessionStrategy {
    fn name(&self) -> &str {
        "session"
    }

    fn priority(&self) -> u8 {
        priority::SESSION
    }

    async fn try_get_identifier(
        &self,
        ctx: &dyn WorkContext,
    ) -> Result<Option<String>, MultiTenantError> {
        let Some(http) = ctx.as_any().downcast_ref::<HttpWorkContext>() else {
            return Ok(None);
        };
        Ok(http
            .session_value(&self.key)
            .filter(|value| !value.is_empty())
            .map(str::to_string))
    }
}

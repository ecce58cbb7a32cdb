use crate::error::MultiTenantError;
use crate::model::{HttpWorkContext, WorkContext};
use crate::strategy::traits::{priority, TenantStrategy};

/// Reads the tenant identifier from a claim on the authenticated principal.
/// The host integration layer is responsible for copying validated claims
/// into the work context.
pub struct ClaimStrategy {
    claim: String,
}

impl ClaimStrategy {
    pub fn new(claim: impl Into<String>) -> Self {
        Self {
            claim: claim.into().to_ascii_lowercase(),
        }
    }
}

#[async_trait::async_trait]
impl TenantStrategy for ClaimStrategy {
    fn name(&self) -> &str {
        "claim"
    }

    fn priority(&self) -> u8 {
        priority::CLAIM
    }

    async fn try_get_identifier(
        &self,
        ctx: &dyn WorkContext,
    ) -> Result<Option<String>, MultiTenantError> {
        let Some(http) = ctx.as_any().downcast_ref::<HttpWorkContext>() else {
            return Ok(None);
        };
        Ok(http
            .claim(&self.claim)
            .filter(|value| !value.is_empty())
            .map(str::to_string))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reads_claim() {
        let strategy = ClaimStrategy::new("tenant_identifier");
        let ctx = HttpWorkContext::new().with_claim("tenant_identifier", "initech");
        assert_eq!(
            strategy.try_get_identifier(&ctx).await.unwrap(),
            Some("initech".to_string())
        );

        let ctx = HttpWorkContext::new();
        assert_eq!(strategy.try_get_identifier(&ctx).await.unwrap(), None);
    }
}

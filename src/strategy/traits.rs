use crate::error::MultiTenantError;
use crate::model::WorkContext;

/// Relative ordering of the built-in strategies. Lower runs first; more
/// explicit mechanisms come before catch-all ones, and the static strategy
/// is always last. Ties are broken by registration order.
pub mod priority {
    pub const DELEGATE: u8 = 0;
    pub const BASE_PATH: u8 = 10;
    pub const HEADER: u8 = 20;
    pub const CLAIM: u8 = 30;
    pub const SESSION: u8 = 40;
    pub const HOST: u8 = 50;
    pub const STATIC: u8 = 100;
}

/// A pluggable mechanism that extracts a candidate tenant identifier from a
/// unit of work.
///
/// "Not applicable" (wrong context shape, missing value, no match) is
/// `Ok(None)`, never an error. Misconfiguration is rejected by constructors,
/// not reported at call time. Implementations are read-only with respect to
/// the context and safe for concurrent use.
#[async_trait::async_trait]
pub trait TenantStrategy: Send + Sync {
    fn name(&self) -> &str;
    fn priority(&self) -> u8;
    async fn try_get_identifier(
        &self,
        ctx: &dyn WorkContext,
    ) -> Result<Option<String>, MultiTenantError>;
}

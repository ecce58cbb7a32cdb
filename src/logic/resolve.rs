use std::collections::HashSet;
use std::sync::Arc;

use log::debug;

use crate::error::MultiTenantError;
use crate::model::{ResolvedTenant, WorkContext};
use crate::store::TenantStore;
use crate::strategy::TenantStrategy;

/// The tenant resolution pipeline: an ordered strategy list searched against
/// an ordered store list, first success wins.
///
/// Strategies are sorted once at construction by `(priority, registration
/// order)`; stores are tried in registration order. The search is strictly
/// sequential, which keeps resolution deterministic and avoids hitting slow
/// stores for candidates an earlier pair already settled. A candidate
/// identifier that no store recognizes does not end the search; the next
/// strategy still runs, so overlapping strategies layer safely.
///
/// The resolver is stateless and safe to share across concurrent units of
/// work. It swallows nothing: strategy and store errors propagate to the
/// caller unless the store is wrapped in a `ResilientStore`.
pub struct TenantResolver {
    strategies: Vec<Arc<dyn TenantStrategy>>,
    stores: Vec<Arc<dyn TenantStore>>,
    ignored_identifiers: HashSet<String>,
}

impl TenantResolver {
    pub fn new(
        mut strategies: Vec<Arc<dyn TenantStrategy>>,
        stores: Vec<Arc<dyn TenantStore>>,
    ) -> Self {
        // Stable sort: registration order breaks priority ties.
        strategies.sort_by_key(|strategy| strategy.priority());
        Self {
            strategies,
            stores,
            ignored_identifiers: HashSet::new(),
        }
    }

    /// Identifiers that behave as if no strategy had produced them
    /// (e.g. `www`, `api`). Compared exactly.
    pub fn with_ignored_identifiers<I>(mut self, identifiers: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.ignored_identifiers = identifiers.into_iter().map(Into::into).collect();
        self
    }

    pub async fn resolve(
        &self,
        ctx: &dyn WorkContext,
    ) -> Result<ResolvedTenant, MultiTenantError> {
        for strategy in &self.strategies {
            let Some(identifier) = strategy.try_get_identifier(ctx).await? else {
                continue;
            };
            if self.ignored_identifiers.contains(&identifier) {
                debug!(
                    "strategy `{}` produced ignored identifier `{}`",
                    strategy.name(),
                    identifier
                );
                continue;
            }
            for store in &self.stores {
                if let Some(record) = store.get_by_identifier(&identifier).await? {
                    debug!(
                        "resolved tenant `{}` via strategy `{}` and store `{}`",
                        record.identifier,
                        strategy.name(),
                        store.name()
                    );
                    return Ok(ResolvedTenant::resolved(
                        record,
                        strategy.name(),
                        store.name(),
                    ));
                }
            }
            debug!(
                "no store recognized identifier `{}` from strategy `{}`",
                identifier,
                strategy.name()
            );
        }
        debug!("no strategy produced a recognized tenant identifier");
        Ok(ResolvedTenant::unresolved())
    }
}

use thiserror::Error;

/// Error taxonomy for tenant resolution and storage.
///
/// An unresolved tenant is never an error; it is an ordinary outcome carried
/// by `ResolvedTenant::unresolved()`. Likewise "already exists" on `add` is
/// reported as `Ok(false)` by stores, not as an error.
#[derive(Debug, Error)]
pub enum MultiTenantError {
    /// A host template could not be compiled. Raised at construction time,
    /// never while matching.
    #[error("invalid host template `{template}`: {reason}")]
    MisconfiguredTemplate { template: String, reason: String },

    /// A required argument was blank or otherwise unusable. Caller bug.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// The store cannot perform this operation (read-mostly adapters).
    #[error("operation `{0}` is not supported by this tenant store")]
    NotSupported(&'static str),

    /// Environmental failure in a backing store (network, storage). Propagates
    /// unless the store is wrapped in a `ResilientStore`.
    #[error("backing store failure: {0}")]
    BackingStore(#[from] anyhow::Error),
}

impl MultiTenantError {
    pub(crate) fn misconfigured_template(template: &str, reason: &str) -> Self {
        Self::MisconfiguredTemplate {
            template: template.to_string(),
            reason: reason.to_string(),
        }
    }
}

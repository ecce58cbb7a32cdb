use crate::error::MultiTenantError;
use crate::model::{TenantRecord, MAX_ID_LENGTH};

/// Backing lookup from identifier/id to a full tenant record.
///
/// Blank `id`/`identifier` arguments are a caller bug and fail with
/// `InvalidArgument`; they are never treated as "not found". `add` reports a
/// duplicate `id` or `identifier` as `Ok(false)` since "already exists" is an
/// expected outcome. Read-mostly adapters return `NotSupported` from the
/// operations they cannot perform and document which ones.
///
/// Implementations must support concurrent outstanding calls.
#[async_trait::async_trait]
pub trait TenantStore: Send + Sync {
    fn name(&self) -> &str;

    async fn get_by_id(&self, id: &str) -> Result<Option<TenantRecord>, MultiTenantError>;

    async fn get_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<TenantRecord>, MultiTenantError>;

    async fn list(
        &self,
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> Result<Vec<TenantRecord>, MultiTenantError>;

    /// Returns `Ok(false)` when the record's `id` or `identifier` is already
    /// taken.
    async fn add(&self, record: TenantRecord) -> Result<bool, MultiTenantError>;

    /// Updates the record addressed by its immutable `id`. Returns
    /// `Ok(false)` when the id is unknown or the new identifier collides
    /// with a different record.
    async fn update(&self, record: TenantRecord) -> Result<bool, MultiTenantError>;

    /// Removes the record addressed by its `identifier`.
    async fn remove(&self, identifier: &str) -> Result<bool, MultiTenantError>;
}

pub(crate) fn require_non_blank(
    value: &str,
    what: &'static str,
) -> Result<(), MultiTenantError> {
    if value.trim().is_empty() {
        return Err(MultiTenantError::InvalidArgument(what));
    }
    Ok(())
}

pub(crate) fn validate_record(record: &TenantRecord) -> Result<(), MultiTenantError> {
    require_non_blank(&record.id, "tenant id must not be blank")?;
    require_non_blank(&record.identifier, "tenant identifier must not be blank")?;
    if record.id.len() > MAX_ID_LENGTH {
        return Err(MultiTenantError::InvalidArgument(
            "tenant id exceeds the 64 character bound",
        ));
    }
    Ok(())
}

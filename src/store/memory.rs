use std::collections::HashMap;

use chrono::Utc;
use parking_lot::RwLock;

use crate::error::MultiTenantError;
use crate::model::{Id, TenantRecord};
use crate::store::traits::{require_non_blank, validate_record, TenantStore};

#[derive(Default)]
struct Indexes {
    by_id: HashMap<Id, TenantRecord>,
    id_by_identifier: HashMap<String, Id>,
}

/// In-process tenant store with a dual index over `id` and `identifier`.
///
/// Identifier comparison is case-insensitive by default; `case_sensitive()`
/// builds a store that compares identifiers exactly.
pub struct InMemoryStore {
    inner: RwLock<Indexes>,
    case_insensitive: bool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Indexes::default()),
            case_insensitive: true,
        }
    }

    pub fn case_sensitive() -> Self {
        Self {
            inner: RwLock::new(Indexes::default()),
            case_insensitive: false,
        }
    }

    fn normalize(&self, identifier: &str) -> String {
        if self.case_insensitive {
            identifier.to_ascii_lowercase()
        } else {
            identifier.to_string()
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl TenantStore for InMemoryStore {
    fn name(&self) -> &str {
        "in_memory"
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<TenantRecord>, MultiTenantError> {
        require_non_blank(id, "tenant id must not be blank")?;
        Ok(self.inner.read().by_id.get(id).cloned())
    }

    async fn get_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<TenantRecord>, MultiTenantError> {
        require_non_blank(identifier, "tenant identifier must not be blank")?;
        let key = self.normalize(identifier);
        let inner = self.inner.read();
        Ok(inner
            .id_by_identifier
            .get(&key)
            .and_then(|id| inner.by_id.get(id))
            .cloned())
    }

    async fn list(
        &self,
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> Result<Vec<TenantRecord>, MultiTenantError> {
        let mut records: Vec<TenantRecord> = self.inner.read().by_id.values().cloned().collect();
        records.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(records
            .into_iter()
            .skip(offset.unwrap_or(0))
            .take(limit.unwrap_or(usize::MAX))
            .collect())
    }

    async fn add(&self, record: TenantRecord) -> Result<bool, MultiTenantError> {
        validate_record(&record)?;
        let identifier_key = self.normalize(&record.identifier);
        let mut inner = self.inner.write();
        if inner.by_id.contains_key(&record.id)
            || inner.id_by_identifier.contains_key(&identifier_key)
        {
            return Ok(false);
        }
        inner
            .id_by_identifier
            .insert(identifier_key, record.id.clone());
        inner.by_id.insert(record.id.clone(), record);
        Ok(true)
    }

    async fn update(&self, record: TenantRecord) -> Result<bool, MultiTenantError> {
        validate_record(&record)?;
        let identifier_key = self.normalize(&record.identifier);
        let mut inner = self.inner.write();
        let Some(existing) = inner.by_id.get(&record.id) else {
            return Ok(false);
        };
        if let Some(other_id) = inner.id_by_identifier.get(&identifier_key) {
            if other_id != &record.id {
                return Ok(false);
            }
        }
        let old_identifier_key = self.normalize(&existing.identifier);
        let mut record = record;
        record.created_at = existing.created_at;
        record.updated_at = Utc::now();
        inner.id_by_identifier.remove(&old_identifier_key);
        inner
            .id_by_identifier
            .insert(identifier_key, record.id.clone());
        inner.by_id.insert(record.id.clone(), record);
        Ok(true)
    }

    async fn remove(&self, identifier: &str) -> Result<bool, MultiTenantError> {
        require_non_blank(identifier, "tenant identifier must not be blank")?;
        let key = self.normalize(identifier);
        let mut inner = self.inner.write();
        match inner.id_by_identifier.remove(&key) {
            Some(id) => {
                inner.by_id.remove(&id);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

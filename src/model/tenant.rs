use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::model::common::{generate_id, Id};

/// Descriptive record for one tenant.
///
/// `id` is the stable internal identity and is immutable once stored.
/// `identifier` is the human-facing slug that detection strategies produce
/// (a subdomain label, a header value, a path segment); it is unique within
/// a store. The `settings` bag carries adapter-specific values that the
/// application reads through `get_setting_str`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenantRecord {
    pub id: Id,
    pub identifier: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection_string: Option<String>,
    #[serde(default)]
    pub settings: HashMap<String, serde_json::Value>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl TenantRecord {
    /// Create a new record with a generated id and empty settings.
    pub fn new(identifier: impl Into<String>, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: generate_id(),
            identifier: identifier.into(),
            name: name.into(),
            connection_string: None,
            settings: HashMap::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_connection_string(mut self, connection_string: impl Into<String>) -> Self {
        self.connection_string = Some(connection_string.into());
        self
    }

    pub fn with_setting(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.settings.insert(key.into(), value);
        self
    }

    /// Get a setting value as a string reference (for String values only)
    pub fn get_setting_str(&self, key: &str) -> Option<&str> {
        self.settings.get(key).and_then(|v| v.as_str())
    }
}

use anyhow::Result;
use serde_json::json;

use crate::model::TenantRecord;
use crate::store::TenantStore;

/// Load demonstration tenants into a store. Existing tenants are left alone,
/// so reloading against a populated store is harmless.
pub async fn load_seed_data(store: &dyn TenantStore) -> Result<()> {
    for record in demo_tenants() {
        if !store.add(record.clone()).await? {
            log::warn!(
                "seed tenant `{}` already present, skipping",
                record.identifier
            );
        }
    }
    Ok(())
}

fn demo_tenants() -> Vec<TenantRecord> {
    vec![
        TenantRecord::new("acme", "Acme Corp")
            .with_connection_string("postgres://acme-db.internal:5432/acme")
            .with_setting("theme", json!("dark"))
            .with_setting("max_users", json!(250)),
        TenantRecord::new("initech", "Initech").with_setting("theme", json!("light")),
        TenantRecord::new("megacorp", "MegaCorp Industries"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let store = InMemoryStore::new();
        load_seed_data(&store).await.unwrap();
        load_seed_data(&store).await.unwrap();

        let tenants = store.list(None, None).await.unwrap();
        assert_eq!(tenants.len(), 3);

        let acme = store.get_by_identifier("acme").await.unwrap().unwrap();
        assert_eq!(acme.get_setting_str("theme"), Some("dark"));
        assert!(acme.connection_string.is_some());
    }
}

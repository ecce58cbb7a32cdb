use sha2::{Digest, Sha256};

/// Name an ordinary, non-tenant-aware caller uses when it asks for "the"
/// configuration object of a type.
pub const DEFAULT_NAME: &str = "";

/// Fixed-length cache-key prefix for a tenant id; empty when no tenant is
/// resolved, so unresolved work shares one partition.
///
/// Hashing rather than concatenating the raw id keeps the derivation
/// injective over the `(tenant, name)` pair: the prefix length never depends
/// on the id's length or content, so no crafted id/name combination can
/// shift the boundary between the two components.
pub fn partition_prefix(tenant_id: Option<&str>) -> String {
    match tenant_id {
        Some(id) if !id.is_empty() => {
            let mut hasher = Sha256::new();
            hasher.update(id.as_bytes());
            hex::encode(hasher.finalize())
        }
        _ => String::new(),
    }
}

/// Cache key for configuration object `name` in tenant `tenant_id`'s
/// partition.
pub fn derived_key(tenant_id: Option<&str>, name: &str) -> String {
    format!("{}{}", partition_prefix(tenant_id), name)
}

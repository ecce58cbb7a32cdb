use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};

use crate::model::ResolvedTenant;

/// Axum extractor for the resolution outcome.
///
/// The `resolve_tenant` middleware places a `ResolvedTenant` into the
/// request extensions; handlers declare it as a parameter to read it. A
/// route mounted without the middleware sees the unresolved context rather
/// than an error, since an absent tenant is a normal outcome.
#[async_trait]
impl<S> FromRequestParts<S> for ResolvedTenant
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<ResolvedTenant>()
            .cloned()
            .unwrap_or_else(ResolvedTenant::unresolved))
    }
}

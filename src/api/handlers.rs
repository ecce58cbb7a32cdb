use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    Json as RequestJson,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::MultiTenantError;
use crate::logic::TenantResolver;
use crate::model::{ResolvedTenant, TenantRecord};
use crate::options::PerTenantOptions;
use crate::store::TenantStore;

pub struct AppState {
    pub resolver: Arc<TenantResolver>,
    pub store: Arc<dyn TenantStore>,
    pub branding: PerTenantOptions<BrandingOptions>,
}

pub type SharedState = Arc<AppState>;

/// Simple health check endpoint
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    pub total: usize,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

pub(crate) fn error_response(e: MultiTenantError) -> (StatusCode, Json<ErrorResponse>) {
    let status = match &e {
        MultiTenantError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
        MultiTenantError::NotSupported(_) => StatusCode::NOT_IMPLEMENTED,
        MultiTenantError::MisconfiguredTemplate { .. } | MultiTenantError::BackingStore(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, Json(ErrorResponse { error: e.to_string() }))
}

/// Per-tenant branding, the server's demonstration configuration object:
/// built once per tenant through the options pipeline and then served from
/// the partitioned cache.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BrandingOptions {
    pub application_name: String,
    pub theme: String,
}

#[derive(Debug, Serialize)]
pub struct TenantResolutionResponse {
    pub resolved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant: Option<TenantRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store: Option<String>,
}

/// How the current request resolved, including provenance.
pub async fn get_current_tenant(resolved: ResolvedTenant) -> Json<TenantResolutionResponse> {
    Json(TenantResolutionResponse {
        resolved: resolved.is_resolved(),
        tenant: resolved.tenant.as_deref().cloned(),
        strategy: resolved.strategy,
        store: resolved.store,
    })
}

/// Branding for the current tenant, served from the per-tenant options cache.
pub async fn get_branding(State(state): State<SharedState>) -> Json<BrandingOptions> {
    let branding = state.branding.get_default();
    Json((*branding).clone())
}

pub async fn list_tenants(
    State(state): State<SharedState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ListResponse<TenantRecord>>, (StatusCode, Json<ErrorResponse>)> {
    let items = state
        .store
        .list(query.limit, query.offset)
        .await
        .map_err(error_response)?;
    Ok(Json(ListResponse {
        total: items.len(),
        items,
    }))
}

#[derive(Debug, Deserialize)]
pub struct NewTenantRequest {
    pub identifier: String,
    pub name: String,
    pub connection_string: Option<String>,
    #[serde(default)]
    pub settings: HashMap<String, serde_json::Value>,
}

pub async fn create_tenant(
    State(state): State<SharedState>,
    RequestJson(request): RequestJson<NewTenantRequest>,
) -> Result<(StatusCode, Json<TenantRecord>), (StatusCode, Json<ErrorResponse>)> {
    let mut record = TenantRecord::new(request.identifier, request.name);
    record.connection_string = request.connection_string;
    record.settings = request.settings;

    if state
        .store
        .add(record.clone())
        .await
        .map_err(error_response)?
    {
        Ok((StatusCode::CREATED, Json(record)))
    } else {
        Err((
            StatusCode::CONFLICT,
            Json(ErrorResponse {
                error: format!("tenant identifier `{}` already exists", record.identifier),
            }),
        ))
    }
}

pub async fn get_tenant(
    State(state): State<SharedState>,
    Path(tenant_id): Path<String>,
) -> Result<Json<TenantRecord>, (StatusCode, Json<ErrorResponse>)> {
    match state
        .store
        .get_by_id(&tenant_id)
        .await
        .map_err(error_response)?
    {
        Some(record) => Ok(Json(record)),
        None => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("tenant `{}` not found", tenant_id),
            }),
        )),
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateTenantRequest {
    pub identifier: String,
    pub name: String,
    pub connection_string: Option<String>,
    #[serde(default)]
    pub settings: HashMap<String, serde_json::Value>,
}

pub async fn update_tenant(
    State(state): State<SharedState>,
    Path(tenant_id): Path<String>,
    RequestJson(request): RequestJson<UpdateTenantRequest>,
) -> Result<Json<TenantRecord>, (StatusCode, Json<ErrorResponse>)> {
    let Some(existing) = state
        .store
        .get_by_id(&tenant_id)
        .await
        .map_err(error_response)?
    else {
        return Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("tenant `{}` not found", tenant_id),
            }),
        ));
    };

    let mut record = existing;
    record.identifier = request.identifier;
    record.name = request.name;
    record.connection_string = request.connection_string;
    record.settings = request.settings;

    if !state
        .store
        .update(record.clone())
        .await
        .map_err(error_response)?
    {
        return Err((
            StatusCode::CONFLICT,
            Json(ErrorResponse {
                error: format!(
                    "tenant identifier `{}` is taken by another tenant",
                    record.identifier
                ),
            }),
        ));
    }

    match state
        .store
        .get_by_id(&tenant_id)
        .await
        .map_err(error_response)?
    {
        Some(updated) => Ok(Json(updated)),
        None => Ok(Json(record)),
    }
}

/// Removal is identifier-keyed, matching the store contract.
pub async fn delete_tenant(
    State(state): State<SharedState>,
    Path(identifier): Path<String>,
) -> Result<StatusCode, (StatusCode, Json<ErrorResponse>)> {
    if state
        .store
        .remove(&identifier)
        .await
        .map_err(error_response)?
    {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("tenant `{}` not found", identifier),
            }),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_statuses() {
        let (status, _) = error_response(MultiTenantError::InvalidArgument("x"));
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = error_response(MultiTenantError::NotSupported("list"));
        assert_eq!(status, StatusCode::NOT_IMPLEMENTED);

        let (status, _) =
            error_response(MultiTenantError::BackingStore(anyhow::anyhow!("down")));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}

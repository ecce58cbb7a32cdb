use axum::{middleware::from_fn_with_state, routing::get, Router};

use crate::api::handlers::{self, SharedState};
use crate::api::middleware::resolve_tenant;

pub fn create_router(state: SharedState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Current resolution (with provenance) and the per-tenant demo object
        .route("/tenant", get(handlers::get_current_tenant))
        .route("/branding", get(handlers::get_branding))
        // Tenant management over the primary store
        .route(
            "/tenants",
            get(handlers::list_tenants).post(handlers::create_tenant),
        )
        // `:key` is the tenant id for GET/PUT and the identifier for DELETE;
        // removal is identifier-keyed in the store contract.
        .route(
            "/tenants/:key",
            get(handlers::get_tenant)
                .put(handlers::update_tenant)
                .delete(handlers::delete_tenant),
        )
        .layer(from_fn_with_state(state.clone(), resolve_tenant))
        .with_state(state)
}

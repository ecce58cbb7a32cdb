pub mod api;
pub mod config;
pub mod current;
pub mod error;
pub mod logic;
pub mod model;
pub mod options;
pub mod seed;
pub mod store;
pub mod strategy;

// Export API types
pub use api::handlers;
pub use api::routes;

pub use config::AppConfig;
pub use error::MultiTenantError;
pub use logic::TenantResolver;

// Export all model types
pub use model::*;

// Export options types
pub use options::{
    derived_key, partition_prefix, OptionsCache, PerTenantOptions, PerTenantOptionsCache,
    PerTenantOptionsFactory, DEFAULT_NAME,
};

// Export store types
pub use store::{
    DistributedCache, DistributedCacheStore, InMemoryStore, LocalDistributedCache, ResilientStore,
    TenantStore,
};

// Export strategy types
pub use strategy::{
    BasePathStrategy, ClaimStrategy, DelegateStrategy, HeaderStrategy, HostStrategy,
    SessionStrategy, StaticStrategy, TenantStrategy,
};

use std::sync::Arc;

use crate::api::handlers::{AppState, BrandingOptions, SharedState};

/// Assemble the resolver, primary store, and per-tenant options from
/// configuration. The strategy set and store ordering are fixed here, at
/// startup, and never reconfigured at runtime.
pub fn build_state(config: &AppConfig) -> anyhow::Result<SharedState> {
    let store: Arc<dyn TenantStore> = if config.tenancy.case_insensitive_identifiers {
        Arc::new(InMemoryStore::new())
    } else {
        Arc::new(InMemoryStore::case_sensitive())
    };

    let strategies = config.tenancy.build_strategies()?;
    let resolver = Arc::new(
        TenantResolver::new(strategies, vec![store.clone()])
            .with_ignored_identifiers(config.tenancy.ignored_identifiers.iter().cloned()),
    );

    let branding = PerTenantOptions::new(
        PerTenantOptionsFactory::new(
            BrandingOptions::default,
            |options: &mut BrandingOptions, tenant| {
                options.application_name = tenant.name.clone();
                if let Some(theme) = tenant.get_setting_str("theme") {
                    options.theme = theme.to_string();
                }
            },
        )
        .configure(|options| options.theme = "light".to_string()),
    );

    Ok(Arc::new(AppState {
        resolver,
        store,
        branding,
    }))
}

// Function for integration testing
pub async fn run_server() -> anyhow::Result<()> {
    use axum::serve;
    use tokio::net::TcpListener;

    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    // Initialize logging with INFO level only (suppress DEBUG logs)
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();

    // Load configuration
    let config = AppConfig::load()?;

    let state = build_state(&config)?;

    // Load seed data for demonstration (optional)
    if std::env::var("LOAD_SEED_DATA").unwrap_or_default() == "true" {
        seed::load_seed_data(state.store.as_ref()).await?;
    }

    let app = routes::create_router(state);

    let bind_address = config.server_address();
    let listener = TcpListener::bind(&bind_address).await?;

    serve(listener, app).await?;

    Ok(())
}

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::MultiTenantError;
use crate::strategy::{HeaderStrategy, HostStrategy, StaticStrategy, TenantStrategy};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub tenancy: TenancyConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Which detection strategies the server assembles and how stores compare
/// identifiers. A `None` entry leaves that strategy out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenancyConfig {
    pub host_template: Option<String>,
    pub header: Option<String>,
    pub static_identifier: Option<String>,
    pub ignored_identifiers: Vec<String>,
    pub case_insensitive_identifiers: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            tenancy: TenancyConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3100,
        }
    }
}

impl Default for TenancyConfig {
    fn default() -> Self {
        Self {
            host_template: Some(crate::strategy::DEFAULT_TEMPLATE.to_string()),
            header: Some(crate::strategy::DEFAULT_TENANT_HEADER.to_string()),
            static_identifier: None,
            ignored_identifiers: Vec::new(),
            case_insensitive_identifiers: true,
        }
    }
}

impl TenancyConfig {
    /// Instantiate the configured strategies. A malformed host template is a
    /// startup failure, not something to discover per request.
    pub fn build_strategies(&self) -> Result<Vec<Arc<dyn TenantStrategy>>, MultiTenantError> {
        let mut strategies: Vec<Arc<dyn TenantStrategy>> = Vec::new();
        if let Some(header) = &self.header {
            strategies.push(Arc::new(HeaderStrategy::new(header.clone())));
        }
        if let Some(template) = &self.host_template {
            strategies.push(Arc::new(HostStrategy::new(template)?));
        }
        if let Some(identifier) = &self.static_identifier {
            strategies.push(Arc::new(StaticStrategy::new(identifier.clone())?));
        }
        Ok(strategies)
    }
}

impl AppConfig {
    /// Load configuration from environment variables and config file
    pub fn load() -> anyhow::Result<Self> {
        let mut config = config::Config::builder();

        // Add default configuration
        config = config.add_source(config::Config::try_from(&AppConfig::default())?);

        // Add config file if it exists
        config = config.add_source(config::File::with_name("config").required(false));

        // Add environment variables with prefix "MT_"
        config = config.add_source(
            config::Environment::with_prefix("MT")
                .separator("_")
                .prefix_separator("_"),
        );

        let config = config.build()?;
        let app_config: AppConfig = config.try_deserialize()?;

        Ok(app_config)
    }

    /// Get the server bind address
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

//! Growthfy Serve Library
//!
//! The HTTP proxy in front of the social-data vendor. Search requests are
//! compiled and normalized here; trends, user and timeline routes pass the
//! vendor's JSON through unchanged.

use growthfy_core::config::VendorConfig;
use growthfy_core::GrowthfyConfig;

pub mod error;
pub mod handlers;
pub mod server;

pub use error::{ApiError, ErrorResponse};
pub use handlers::AppState;
pub use server::*;

/// Server version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_enabled: bool,
    pub max_request_size: usize,
    /// Page size used when a search has no `limit`
    pub default_limit: u32,
    pub vendor: VendorConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::from(&GrowthfyConfig::default())
    }
}

impl From<&GrowthfyConfig> for ServerConfig {
    fn from(config: &GrowthfyConfig) -> Self {
        Self {
            host: config.server.host.clone(),
            port: config.server.port,
            cors_enabled: config.server.cors_enabled,
            max_request_size: config.server.max_request_size,
            default_limit: config.server.default_limit,
            vendor: config.vendor.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.default_limit, 100);
        assert!(config.cors_enabled);
        assert!(config.vendor.api_key.is_none());
    }

    #[test]
    fn test_from_growthfy_config() {
        let mut config = GrowthfyConfig::default();
        config.server.port = 8080;
        config.vendor.api_key = Some("key".to_string());

        let server = ServerConfig::from(&config);
        assert_eq!(server.port, 8080);
        assert_eq!(server.vendor.api_key(), Some("key"));
    }
}

//! Configuration types for Growthfy
//!
//! Sources are layered by [`GrowthfyConfig::load`]: built-in defaults, an
//! optional config file, then `GROWTHFY__SECTION__KEY` environment
//! variables. The vendor key may also come from `SOCIALDATA_API_KEY`.

use crate::{GrowthfyError, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use url::Url;

/// Prefix of environment overrides
pub const ENV_PREFIX: &str = "GROWTHFY";

/// Environment variable holding the vendor API key
pub const API_KEY_ENV: &str = "SOCIALDATA_API_KEY";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GrowthfyConfig {
    /// Proxy server settings
    #[serde(default)]
    pub server: ServerSection,
    /// Upstream social-data API
    #[serde(default)]
    pub vendor: VendorConfig,
    /// Settings for clients of the proxy
    #[serde(default)]
    pub client: ClientConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Proxy server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_true")]
    pub cors_enabled: bool,
    /// Maximum request body size in bytes
    #[serde(default = "default_max_request_size")]
    pub max_request_size: usize,
    /// Page size used when a search request has no `limit`
    #[serde(default = "default_proxy_limit")]
    pub default_limit: u32,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_enabled: true,
            max_request_size: default_max_request_size(),
            default_limit: default_proxy_limit(),
        }
    }
}

/// Upstream social-data API settings
#[derive(Clone, Serialize, Deserialize)]
pub struct VendorConfig {
    #[serde(default = "default_vendor_url")]
    pub base_url: Url,
    /// Bearer token. Never written back to disk.
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for VendorConfig {
    fn default() -> Self {
        Self {
            base_url: default_vendor_url(),
            api_key: None,
            timeout_seconds: default_timeout(),
        }
    }
}

impl std::fmt::Debug for VendorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VendorConfig")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

impl VendorConfig {
    /// The API key, if one is set and not blank
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.trim().is_empty())
    }
}

/// Settings for talking to a running proxy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_proxy_url")]
    pub proxy_url: Url,
    /// Page size requested by the paginated client
    #[serde(default = "default_client_limit")]
    pub default_limit: u32,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            proxy_url: default_proxy_url(),
            default_limit: default_client_limit(),
            timeout_seconds: default_timeout(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default)]
    pub file_info: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file_info: false,
        }
    }
}

impl GrowthfyConfig {
    /// Load configuration from defaults, an optional file and the process
    /// environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, None)
    }

    /// Like [`load`](Self::load), but reads environment overrides from
    /// `env` instead of the process when it is given
    pub fn load_with_env(path: Option<&Path>, env: Option<HashMap<String, String>>) -> Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        if let Some(path) = path {
            if !path.exists() {
                return Err(GrowthfyError::configuration(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            builder = builder.add_source(File::from(path));
        }

        let fallback_key = match &env {
            Some(vars) => vars.get(API_KEY_ENV).cloned(),
            None => std::env::var(API_KEY_ENV).ok(),
        };

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true)
                .source(env),
        );

        let mut config: Self = builder.build()?.try_deserialize()?;
        if config.vendor.api_key().is_none() {
            config.vendor.api_key = fallback_key.filter(|k| !k.trim().is_empty());
        }
        Ok(config)
    }

    /// Load configuration from a YAML or JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;

        match serde_yaml::from_str(&content) {
            Ok(config) => Ok(config),
            Err(_) => Ok(serde_json::from_str(&content)?),
        }
    }

    /// Save configuration as YAML
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        for (name, url) in [
            ("vendor.base_url", &self.vendor.base_url),
            ("client.proxy_url", &self.client.proxy_url),
        ] {
            if url.scheme() != "http" && url.scheme() != "https" {
                return Err(GrowthfyError::validation(format!(
                    "{} must use http or https scheme",
                    name
                )));
            }
        }

        if self.server.host.trim().is_empty() {
            return Err(GrowthfyError::validation("server.host cannot be empty"));
        }
        if self.server.max_request_size == 0 {
            return Err(GrowthfyError::validation(
                "server.max_request_size must be greater than 0",
            ));
        }
        if self.server.default_limit == 0 || self.client.default_limit == 0 {
            return Err(GrowthfyError::validation(
                "default_limit must be greater than 0",
            ));
        }
        if self.vendor.timeout_seconds == 0 || self.client.timeout_seconds == 0 {
            return Err(GrowthfyError::validation(
                "timeout_seconds must be greater than 0",
            ));
        }
        if !["json", "pretty", "compact"].contains(&self.logging.format.as_str()) {
            return Err(GrowthfyError::validation(format!(
                "Unknown log format: {}",
                self.logging.format
            )));
        }

        Ok(())
    }
}

// Default value functions
fn default_true() -> bool {
    true
}
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    3000
}
fn default_max_request_size() -> usize {
    1024 * 1024
}
fn default_proxy_limit() -> u32 {
    100
}
fn default_client_limit() -> u32 {
    30
}
fn default_timeout() -> u64 {
    30
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_vendor_url() -> Url {
    Url::parse("https://api.socialdata.tools/twitter").expect("valid default vendor URL")
}

fn default_proxy_url() -> Url {
    Url::parse("http://localhost:3000").expect("valid default proxy URL")
}

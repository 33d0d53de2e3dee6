//! Validate command implementation

use clap::Args;
use growthfy_core::{GrowthfyConfig, GrowthfyError, Result};
use serde_json::json;
use std::path::PathBuf;

use crate::commands::{CliCommand, CommandContext};
use crate::output::OutputFormat;

/// Check a configuration file
#[derive(Debug, Clone, Args)]
pub struct ValidateArgs {
    /// Configuration file to validate
    pub path: PathBuf,
}

impl CliCommand for ValidateArgs {
    async fn execute(&self, ctx: &CommandContext) -> Result<()> {
        let mut out = ctx.output();

        let result = GrowthfyConfig::load(Some(&self.path)).and_then(|config| {
            config.validate()?;
            Ok(config)
        });

        match (&result, ctx.format) {
            (Ok(config), OutputFormat::Json) => out.json(&json!({
                "valid": true,
                "vendor_url": config.vendor.base_url,
                "api_key_set": config.vendor.api_key().is_some(),
                "proxy_url": config.client.proxy_url,
            }))?,
            (Ok(config), OutputFormat::Pretty) => {
                out.success("Configuration is valid")?;
                out.message(&format!(
                    "  proxy: {}:{}",
                    config.server.host, config.server.port
                ))?;
                out.message(&format!("  vendor: {}", config.vendor.base_url))?;
                let key = if config.vendor.api_key().is_some() {
                    "set"
                } else {
                    "not set"
                };
                out.message(&format!("  api key: {}", key))?;
            }
            (Err(e), OutputFormat::Json) => out.json(&json!({
                "valid": false,
                "error": e.to_string(),
            }))?,
            (Err(e), OutputFormat::Pretty) => {
                out.message(&format!("✗ Configuration is invalid: {}", e))?;
            }
        }

        result.map(|_| ())
    }

    fn name(&self) -> &'static str {
        "validate"
    }

    fn validate(&self) -> Result<()> {
        if !self.path.exists() {
            return Err(GrowthfyError::configuration(format!(
                "Configuration file not found: {}",
                self.path.display()
            )));
        }
        Ok(())
    }
}

//! Serve command implementation

use clap::Args;
use growthfy_core::{GrowthfyError, Result};
use growthfy_serve::{ServerBuilder, ServerConfig};

use crate::commands::{CliCommand, CommandContext};

/// Run the search proxy
#[derive(Debug, Clone, Args)]
pub struct ServeArgs {
    /// Host address to bind to
    ///
    /// Overrides `server.host` from the configuration file.
    #[arg(short = 'H', long)]
    pub host: Option<String>,

    /// Port to bind to
    ///
    /// Overrides `server.port` from the configuration file.
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Disable CORS headers
    #[arg(long)]
    pub no_cors: bool,

    /// Maximum request body size in bytes
    ///
    /// Larger POST bodies are rejected before they reach a handler.
    #[arg(long)]
    pub max_body_size: Option<usize>,
}

impl ServeArgs {
    /// Server settings after applying command-line overrides
    pub fn server_config(&self, ctx: &CommandContext) -> ServerConfig {
        let mut config = ServerConfig::from(&ctx.config);
        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(size) = self.max_body_size {
            config.max_request_size = size;
        }
        if self.no_cors {
            config.cors_enabled = false;
        }
        config
    }
}

impl CliCommand for ServeArgs {
    async fn execute(&self, ctx: &CommandContext) -> Result<()> {
        let config = self.server_config(ctx);

        tracing::info!("Vendor API: {}", config.vendor.base_url);
        if config.vendor.api_key().is_none() {
            tracing::warn!("SOCIALDATA_API_KEY is not set; vendor routes will answer 500");
        }

        let server = ServerBuilder::from_config(config).build()?;
        server.start().await
    }

    fn name(&self) -> &'static str {
        "serve"
    }

    fn validate(&self) -> Result<()> {
        if self.port == Some(0) {
            return Err(GrowthfyError::validation("Port cannot be 0"));
        }
        if self.max_body_size == Some(0) {
            return Err(GrowthfyError::validation("Max body size cannot be 0"));
        }
        Ok(())
    }
}

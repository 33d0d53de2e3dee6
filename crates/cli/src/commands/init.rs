//! Init command implementation

use clap::Args;
use growthfy_core::{GrowthfyConfig, GrowthfyError, Result};
use serde_json::json;
use std::path::PathBuf;

use crate::commands::{CliCommand, CommandContext};

/// Write a default configuration file
#[derive(Debug, Clone, Args)]
pub struct InitArgs {
    /// Where to write the configuration
    #[arg(default_value = "growthfy.yaml")]
    pub path: PathBuf,

    /// Overwrite an existing file
    #[arg(short, long)]
    pub force: bool,
}

impl CliCommand for InitArgs {
    async fn execute(&self, ctx: &CommandContext) -> Result<()> {
        if self.path.exists() && !self.force {
            return Err(GrowthfyError::validation(format!(
                "Configuration file already exists: {}. Use --force to overwrite.",
                self.path.display()
            )));
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        GrowthfyConfig::default().to_file(&self.path)?;
        tracing::info!("Wrote default configuration to {}", self.path.display());

        let mut out = ctx.output();
        if ctx.format == crate::OutputFormat::Json {
            return out.json(&json!({ "path": self.path, "created": true }));
        }

        out.success(&format!("Configuration initialized at {}", self.path.display()))?;
        out.message("")?;
        out.message("Next steps:")?;
        out.message("1. Export SOCIALDATA_API_KEY (the key is never stored in the file)")?;
        out.message(&format!(
            "2. Run 'growthfy validate {}' to check the configuration",
            self.path.display()
        ))?;
        out.message(&format!(
            "3. Run 'growthfy --config {} serve' to start the proxy",
            self.path.display()
        ))?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "init"
    }

    fn validate(&self) -> Result<()> {
        if self.path.is_dir() {
            return Err(GrowthfyError::validation(format!(
                "{} is a directory",
                self.path.display()
            )));
        }
        Ok(())
    }
}

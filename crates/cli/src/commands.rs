//! CLI commands module

use crate::output::{OutputFormat, OutputFormatter};
use growthfy_core::{GrowthfyConfig, Result};

pub mod init;
pub mod search;
pub mod serve;
pub mod timeline;
pub mod trends;
pub mod user;
pub mod validate;

pub use init::InitArgs;
pub use search::SearchArgs;
pub use serve::ServeArgs;
pub use timeline::TimelineArgs;
pub use trends::TrendsArgs;
pub use user::UserArgs;
pub use validate::ValidateArgs;

/// Everything a command needs besides its own arguments
#[derive(Debug, Clone, Default)]
pub struct CommandContext {
    pub config: GrowthfyConfig,
    pub format: OutputFormat,
}

impl CommandContext {
    pub fn new(config: GrowthfyConfig, format: OutputFormat) -> Self {
        Self { config, format }
    }

    /// Formatter writing to stdout in the selected format
    pub fn output(&self) -> OutputFormatter<'static> {
        OutputFormatter::stdout(self.format)
    }
}

/// Base trait for CLI commands
#[allow(async_fn_in_trait)]
pub trait CliCommand {
    /// Execute the command
    async fn execute(&self, ctx: &CommandContext) -> Result<()>;

    /// Get command name for logging
    fn name(&self) -> &'static str;

    /// Validate command arguments
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

/// Common command execution wrapper
pub async fn execute_command<T: CliCommand>(command: &T, ctx: &CommandContext) -> Result<()> {
    tracing::debug!("Executing command: {}", command.name());

    command.validate()?;
    command.execute(ctx).await?;

    tracing::debug!("Command {} completed successfully", command.name());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use growthfy_core::GrowthfyError;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct TestCommand {
        valid: bool,
        ran: AtomicBool,
    }

    impl CliCommand for TestCommand {
        async fn execute(&self, _ctx: &CommandContext) -> Result<()> {
            self.ran.store(true, Ordering::SeqCst);
            Ok(())
        }

        fn name(&self) -> &'static str {
            "test"
        }

        fn validate(&self) -> Result<()> {
            if self.valid {
                Ok(())
            } else {
                Err(GrowthfyError::validation("invalid"))
            }
        }
    }

    #[tokio::test]
    async fn test_execute_command() {
        let cmd = TestCommand {
            valid: true,
            ran: AtomicBool::new(false),
        };
        assert!(execute_command(&cmd, &CommandContext::default()).await.is_ok());
        assert!(cmd.ran.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_validation_stops_execution() {
        let cmd = TestCommand {
            valid: false,
            ran: AtomicBool::new(false),
        };
        assert!(execute_command(&cmd, &CommandContext::default()).await.is_err());
        assert!(!cmd.ran.load(Ordering::SeqCst));
    }
}

//! User command implementation

use clap::Args;
use growthfy_core::{Result, UserLookup};
use url::Url;

use crate::commands::trends::proxy_client;
use crate::commands::{CliCommand, CommandContext};

/// Show a user profile
#[derive(Debug, Clone, Args)]
pub struct UserArgs {
    /// Handle or numeric user id
    ///
    /// A leading @ on a handle is dropped. Pass --id to look the value up
    /// as a user id instead.
    pub user: String,

    /// Treat USER as a user id
    #[arg(long)]
    pub id: bool,

    /// Proxy base URL
    ///
    /// Overrides `client.proxy_url` from the configuration file.
    #[arg(long)]
    pub proxy: Option<Url>,
}

impl UserArgs {
    pub fn lookup(&self) -> UserLookup {
        lookup_for(&self.user, self.id)
    }
}

/// Build a lookup from a handle (an optional leading @ is dropped) or id
pub(crate) fn lookup_for(user: &str, by_id: bool) -> UserLookup {
    if by_id {
        UserLookup::by_id(user.trim())
    } else {
        UserLookup::by_handle(user.trim().trim_start_matches('@'))
    }
}

impl CliCommand for UserArgs {
    async fn execute(&self, ctx: &CommandContext) -> Result<()> {
        let client = proxy_client(ctx, self.proxy.as_ref())?;
        let profile = client.user(&self.lookup()).await?;
        ctx.output().profile(&profile)
    }

    fn name(&self) -> &'static str {
        "user"
    }

    fn validate(&self) -> Result<()> {
        self.lookup().validate()
    }
}

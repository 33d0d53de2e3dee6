//! Timeline command implementation

use clap::Args;
use growthfy_core::{GrowthfyError, Result, TimelineQuery};
use url::Url;

use crate::commands::trends::proxy_client;
use crate::commands::user::lookup_for;
use crate::commands::{CliCommand, CommandContext};

/// Show the recent posts of a user
#[derive(Debug, Clone, Args)]
pub struct TimelineArgs {
    /// Handle or numeric user id
    ///
    /// A leading @ on a handle is dropped. Pass --id to look the value up
    /// as a user id instead.
    pub user: String,

    /// Treat USER as a user id
    #[arg(long)]
    pub id: bool,

    /// Number of posts
    ///
    /// The vendor may return fewer, especially with the filters below.
    #[arg(short = 'n', long, default_value = "20")]
    pub count: u32,

    /// Leave out reposts
    ///
    /// Reposts still count towards --count on the vendor side.
    #[arg(long)]
    pub no_retweets: bool,

    /// Leave out replies
    #[arg(long)]
    pub exclude_replies: bool,

    /// Proxy base URL
    ///
    /// Overrides `client.proxy_url` from the configuration file.
    #[arg(long)]
    pub proxy: Option<Url>,
}

impl TimelineArgs {
    pub fn query(&self) -> TimelineQuery {
        TimelineQuery {
            count: self.count,
            include_rts: !self.no_retweets,
            exclude_replies: self.exclude_replies,
            ..TimelineQuery::new(lookup_for(&self.user, self.id))
        }
    }
}

impl CliCommand for TimelineArgs {
    async fn execute(&self, ctx: &CommandContext) -> Result<()> {
        let client = proxy_client(ctx, self.proxy.as_ref())?;
        let posts = client.timeline(&self.query()).await?;
        ctx.output().posts(&posts)
    }

    fn name(&self) -> &'static str {
        "timeline"
    }

    fn validate(&self) -> Result<()> {
        if self.count == 0 {
            return Err(GrowthfyError::validation("--count must be at least 1"));
        }
        self.query().user.validate()
    }
}

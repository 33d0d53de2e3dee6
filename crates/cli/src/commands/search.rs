//! Search command
//!
//! Runs one paginated search session against the proxy and prints every
//! post collected.

use crate::commands::{CliCommand, CommandContext};
use crate::output::OutputFormat;
use clap::Args;
use growthfy_core::{
    FetchOutcome, GrowthfyError, MediaType, Result, SearchClient, SearchParams, SessionPhase,
    SortBy,
};
use growthfy_infra::ProxyClient;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

/// Search posts through the proxy
///
/// The filters are sent to the proxy as structured fields and compiled
/// there into the vendor's advanced search syntax. With `--pages` the
/// command keeps following the continuation cursor until it has the
/// requested number of pages, the results run out, or a page fails.
///
/// # Examples
///
/// ```bash
/// # Latest posts mentioning rust, English only, three pages
/// growthfy search rust --lang en --pages 3
///
/// # Popular image posts from a date range
/// growthfy search "rust conf" --media images --sort relevance --since 2024-09-01
///
/// # Advanced operators are passed through untouched
/// growthfy search "from:rustlang -filter:replies"
/// ```
#[derive(Debug, Clone, Args)]
pub struct SearchArgs {
    /// Search text
    ///
    /// May contain operators such as `from:` or `lang:`. A query that
    /// already uses operators is sent as-is and the filter flags below
    /// are ignored.
    #[arg(value_name = "QUERY")]
    pub query: String,

    /// Posts per page
    ///
    /// Defaults to the `client.default_limit` setting (30).
    #[arg(short = 'n', long)]
    pub limit: Option<u32>,

    /// Number of pages to fetch
    ///
    /// Paging stops early when the vendor reports no further page or a
    /// page fails. A failed page is never requested twice.
    #[arg(long, default_value = "1")]
    pub pages: u32,

    /// Only posts on or after this date (YYYY-MM-DD)
    #[arg(long)]
    pub since: Option<String>,

    /// Only posts before this date (YYYY-MM-DD)
    #[arg(long)]
    pub until: Option<String>,

    /// Include (true) or exclude (false) reposts
    ///
    /// Leaving the flag out applies no repost filter at all.
    #[arg(long)]
    pub retweets: Option<bool>,

    /// Include (true) or exclude (false) replies
    ///
    /// Only `false` changes the query; replies are included by default.
    #[arg(long)]
    pub replies: Option<bool>,

    /// Only posts from verified accounts
    #[arg(long)]
    pub verified: bool,

    /// Media filter: images, videos, links or all
    ///
    /// `all` matches any post carrying media.
    #[arg(long)]
    pub media: Option<String>,

    /// Language code, e.g. en
    #[arg(long)]
    pub lang: Option<String>,

    /// Ordering: recency or relevance
    ///
    /// Recency asks the vendor for its "Latest" feed, relevance for "Top".
    #[arg(long)]
    pub sort: Option<String>,

    /// Minimum number of reposts
    ///
    /// Zero means no threshold.
    #[arg(long)]
    pub min_retweets: Option<u32>,

    /// Minimum number of likes
    ///
    /// Zero means no threshold.
    #[arg(long)]
    pub min_faves: Option<u32>,

    /// Minimum number of replies
    ///
    /// Zero means no threshold.
    #[arg(long)]
    pub min_replies: Option<u32>,

    /// Place name for a geo filter
    ///
    /// Free text such as "San Francisco"; the vendor resolves it.
    #[arg(long)]
    pub near: Option<String>,

    /// Radius for --near, e.g. 15km or 10mi
    #[arg(long, requires = "near")]
    pub within: Option<String>,

    /// Proxy base URL
    ///
    /// Overrides `client.proxy_url` from the configuration file.
    #[arg(long)]
    pub proxy: Option<Url>,
}

impl SearchArgs {
    /// Convert the arguments into search parameters
    pub fn to_params(&self) -> Result<SearchParams> {
        let media_type = self
            .media
            .as_deref()
            .map(str::parse::<MediaType>)
            .transpose()?;
        let sort_by = self
            .sort
            .as_deref()
            .map(str::parse::<SortBy>)
            .transpose()?;

        Ok(SearchParams {
            limit: self.limit,
            from_date: self.since.clone(),
            to_date: self.until.clone(),
            include_retweets: self.retweets,
            include_replies: self.replies,
            filter_verified: self.verified.then_some(true),
            media_type,
            language: self.lang.clone(),
            sort_by,
            min_retweets: self.min_retweets,
            min_faves: self.min_faves,
            min_replies: self.min_replies,
            near_location: self.near.clone(),
            within_distance: self.within.clone(),
            ..SearchParams::new(self.query.clone())
        })
    }
}

impl CliCommand for SearchArgs {
    async fn execute(&self, ctx: &CommandContext) -> Result<()> {
        let params = self.to_params()?;

        let mut client_config = ctx.config.client.clone();
        if let Some(proxy) = &self.proxy {
            client_config.proxy_url = proxy.clone();
        }
        let client = SearchClient::new(Arc::new(ProxyClient::new(&client_config)?));

        info!("Searching for '{}' via {}", params.query, client_config.proxy_url);
        let mut outcome = client.search(params).await;
        for page in 2..=self.pages {
            if outcome == FetchOutcome::Failed || !client.has_more() {
                break;
            }
            debug!("Fetching page {}", page);
            outcome = client.load_more().await;
        }

        let session = client.snapshot();
        let mut out = ctx.output();
        match ctx.format {
            OutputFormat::Json => out.json(&json!({
                "statuses": session.items,
                "search_metadata": session.metadata,
                "has_more": session.has_more,
                "next_token": session.cursor,
            }))?,
            OutputFormat::Pretty => {
                out.posts(&session.items)?;
                out.message("")?;
                let more = if session.has_more {
                    format!(
                        " (more available, next_token {})",
                        session.cursor.as_deref().unwrap_or("")
                    )
                } else {
                    String::new()
                };
                out.message(&format!("{} posts{}", session.items.len(), more))?;
            }
        }

        match (session.phase, session.last_error) {
            (SessionPhase::Error, Some(error)) => {
                warn!("Search failed after {} posts: {}", session.items.len(), error);
                Err(error.detach())
            }
            _ => Ok(()),
        }
    }

    fn name(&self) -> &'static str {
        "search"
    }

    fn validate(&self) -> Result<()> {
        if self.query.trim().is_empty() {
            return Err(GrowthfyError::validation("Missing required parameter: query"));
        }
        if self.pages == 0 {
            return Err(GrowthfyError::validation("--pages must be at least 1"));
        }
        self.to_params().map(|_| ())
    }
}

//! Trends command implementation

use clap::Args;
use growthfy_core::Result;
use growthfy_infra::ProxyClient;
use url::Url;

use crate::commands::{CliCommand, CommandContext};

/// Show trending topics
///
/// ```bash
/// # Worldwide trends
/// growthfy trends
///
/// # Trends for the United States
/// growthfy trends --woeid 23424977
/// ```
#[derive(Debug, Clone, Args)]
pub struct TrendsArgs {
    /// Where On Earth ID of the location
    ///
    /// 1 is worldwide. Run with --available to list the ids that have
    /// trends.
    #[arg(short, long, default_value = "1")]
    pub woeid: u64,

    /// List the locations that have trends instead
    #[arg(long)]
    pub available: bool,

    /// Proxy base URL
    ///
    /// Overrides `client.proxy_url` from the configuration file.
    #[arg(long)]
    pub proxy: Option<Url>,
}

impl CliCommand for TrendsArgs {
    async fn execute(&self, ctx: &CommandContext) -> Result<()> {
        let client = proxy_client(ctx, self.proxy.as_ref())?;
        let mut out = ctx.output();

        if self.available {
            let locations = client.available_locations().await?;
            tracing::debug!("{} trend locations", locations.len());
            out.locations(&locations)
        } else {
            let trends = client.trends(self.woeid).await?;
            out.trends(&trends)
        }
    }

    fn name(&self) -> &'static str {
        "trends"
    }
}

/// Proxy client from config, with an optional base URL override
pub(crate) fn proxy_client(ctx: &CommandContext, proxy: Option<&Url>) -> Result<ProxyClient> {
    let mut config = ctx.config.client.clone();
    if let Some(url) = proxy {
        config.proxy_url = url.clone();
    }
    ProxyClient::new(&config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use growthfy_core::GrowthfyConfig;
    use mockito::{Matcher, Server};

    #[tokio::test]
    async fn test_trends_for_location() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/twitter/trends")
            .match_query(Matcher::UrlEncoded("woeid".into(), "23424977".into()))
            .with_body(r##"[{"trends": [{"name": "#rustlang"}]}]"##)
            .create_async()
            .await;

        let args = TrendsArgs {
            woeid: 23424977,
            available: false,
            proxy: Some(Url::parse(&server.url()).unwrap()),
        };
        let ctx = CommandContext::new(GrowthfyConfig::default(), OutputFormat::Json);
        args.execute(&ctx).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_available_locations() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/twitter/trends/available")
            .with_body(r#"[{"woeid": 1, "name": "Worldwide"}]"#)
            .create_async()
            .await;

        let args = TrendsArgs {
            woeid: 1,
            available: true,
            proxy: Some(Url::parse(&server.url()).unwrap()),
        };
        let ctx = CommandContext::new(GrowthfyConfig::default(), OutputFormat::Json);
        args.execute(&ctx).await.unwrap();
        mock.assert_async().await;
    }
}

//! HTTP client for a running Growthfy proxy

use crate::{error_details, send_error};
use async_trait::async_trait;
use growthfy_core::config::ClientConfig;
use growthfy_core::{
    normalize_posts, normalize_profile, GrowthfyError, Post, Profile, Result, SearchParams,
    SearchResponse, SearchTransport, TimelineQuery, Trend, TrendLocation, UserLookup,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Client for the proxy's `/api/twitter/*` routes
#[derive(Debug, Clone)]
pub struct ProxyClient {
    base_url: Url,
    default_limit: u32,
    client: reqwest::Client,
}

impl ProxyClient {
    /// Create a client from the `client` config section
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| GrowthfyError::network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: config.proxy_url.clone(),
            default_limit: config.default_limit,
            client,
        })
    }

    /// Fetch one search page. A missing `limit` uses the configured default.
    pub async fn search(&self, params: &SearchParams) -> Result<SearchResponse> {
        let params = SearchParams {
            limit: params.limit.or(Some(self.default_limit)),
            ..params.clone()
        };
        self.get("api/twitter/search", &params).await
    }

    pub async fn user(&self, lookup: &UserLookup) -> Result<Profile> {
        lookup.validate()?;
        let payload: Value = self.get("api/twitter/user", lookup).await?;
        normalize_profile(payload)
    }

    pub async fn timeline(&self, query: &TimelineQuery) -> Result<Vec<Post>> {
        query.user.validate()?;
        let payload: Value = self
            .get("api/twitter/user/timeline", &TimelineParams::from(query))
            .await?;
        normalize_posts(payload)
    }

    /// Trends for a location: the `trends` list of the first entry
    pub async fn trends(&self, woeid: u64) -> Result<Vec<Trend>> {
        let places: Vec<TrendPlace> = self
            .get("api/twitter/trends", &[("woeid", woeid)])
            .await?;
        Ok(places
            .into_iter()
            .next()
            .map(|place| place.trends)
            .unwrap_or_default())
    }

    pub async fn available_locations(&self) -> Result<Vec<TrendLocation>> {
        self.get("api/twitter/trends/available", &[] as &[(&str, &str)])
            .await
    }

    async fn get<Q, T>(&self, path: &str, query: &Q) -> Result<T>
    where
        Q: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}/{}", self.base_url.as_str().trim_end_matches('/'), path);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| send_error(path, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = error_details(response).await;
            let ProxyError { error, details } =
                serde_json::from_value(body.clone()).unwrap_or_else(|_| ProxyError {
                    error: status.to_string(),
                    details: Some(body),
                });
            return Err(GrowthfyError::upstream(status.as_u16(), error, details));
        }

        response
            .json()
            .await
            .map_err(|e| GrowthfyError::network(format!("Failed to parse proxy response: {}", e)))
    }
}

#[async_trait]
impl SearchTransport for ProxyClient {
    async fn fetch(&self, params: &SearchParams) -> Result<SearchResponse> {
        self.search(params).await
    }
}

/// Error body returned by the proxy
#[derive(Debug, Deserialize)]
struct ProxyError {
    error: String,
    #[serde(default, alias = "message")]
    details: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct TrendPlace {
    #[serde(default)]
    trends: Vec<Trend>,
}

/// Timeline query in the proxy's flat query-string form
#[derive(Debug, Serialize)]
struct TimelineParams<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    screen_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_id: Option<&'a str>,
    count: u32,
    include_rts: bool,
    exclude_replies: bool,
}

impl<'a> From<&'a TimelineQuery> for TimelineParams<'a> {
    fn from(query: &'a TimelineQuery) -> Self {
        Self {
            screen_name: query.user.screen_name.as_deref(),
            user_id: query.user.user_id.as_deref(),
            count: query.count,
            include_rts: query.include_rts,
            exclude_replies: query.exclude_replies,
        }
    }
}

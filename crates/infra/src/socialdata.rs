//! Client for the upstream social-data API
//!
//! Every request carries the bearer key. A non-success status becomes
//! [`GrowthfyError::Upstream`] with the vendor's body attached as
//! `details`, and a transport failure becomes a network or timeout error.

use crate::{error_details, send_error};
use growthfy_core::config::VendorConfig;
use growthfy_core::{
    compile, normalize_search, GrowthfyError, Result, SearchParams, SearchResponse,
    TimelineQuery, UserLookup,
};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Message attached to every vendor error status
pub const VENDOR_ERROR: &str = "Error from socialdata API";

/// Client for the social-data vendor API
#[derive(Clone)]
pub struct VendorClient {
    base_url: Url,
    api_key: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for VendorClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VendorClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl VendorClient {
    /// Create a client from the `vendor` config section.
    ///
    /// Fails with a configuration error when no API key is set.
    pub fn new(config: &VendorConfig) -> Result<Self> {
        let api_key = config
            .api_key()
            .ok_or_else(|| GrowthfyError::configuration("API key not configured"))?
            .to_string();

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| GrowthfyError::network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: config.base_url.clone(),
            api_key,
            client,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Run one search page and normalize the result.
    ///
    /// `limit` is echoed as the page count in the metadata.
    pub async fn search(&self, params: &SearchParams, limit: u32) -> Result<SearchResponse> {
        let compiled = compile(params);
        let sort = params.sort_by.unwrap_or_default();
        info!("Vendor search: '{}' ({})", compiled, sort);

        let mut query = vec![
            ("query", compiled),
            ("type", sort.vendor_type().to_string()),
        ];
        if let Some(cursor) = params.cursor.as_deref().filter(|c| !c.is_empty()) {
            query.push(("max_id", cursor.to_string()));
        }

        let payload = self.get_json("search", &query).await?;
        normalize_search(payload, &params.query, limit)
    }

    /// Look up a user profile. The payload is returned as sent by the vendor.
    pub async fn user(&self, lookup: &UserLookup) -> Result<Value> {
        lookup.validate()?;
        self.get_json("users/show", &lookup.query_pairs()).await
    }

    /// Recent posts of a user, as sent by the vendor
    pub async fn user_timeline(&self, query: &TimelineQuery) -> Result<Value> {
        query.user.validate()?;
        self.get_json("statuses/user_timeline", &query.query_pairs())
            .await
    }

    /// Trends for a location
    pub async fn trends(&self, woeid: u64) -> Result<Value> {
        self.get_json("trends/place", &[("id", woeid.to_string())])
            .await
    }

    /// Locations for which trends are available
    pub async fn available_trends(&self) -> Result<Value> {
        self.get_json("trends/available", &[]).await
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.as_str().trim_end_matches('/'), path)
    }

    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value> {
        let url = self.endpoint(path);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .query(query)
            .send()
            .await
            .map_err(|e| send_error(path, e))?;

        let status = response.status();
        if !status.is_success() {
            let details = error_details(response).await;
            warn!("Vendor returned {} for {}", status, path);
            return Err(GrowthfyError::upstream(
                status.as_u16(),
                VENDOR_ERROR,
                Some(details),
            ));
        }

        response.json().await.map_err(|e| {
            GrowthfyError::network(format!("Failed to parse vendor response: {}", e))
        })
    }
}

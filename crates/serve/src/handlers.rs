//! HTTP handlers for the Growthfy proxy

use crate::error::ApiError;
use crate::ServerConfig;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    response::Json,
};
use growthfy_core::{
    GrowthfyError, Result, SearchParams, SearchResponse, TimelineQuery, UserLookup,
};
use growthfy_infra::VendorClient;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

/// Trends location used when `woeid` is absent (worldwide)
pub const DEFAULT_WOEID: u64 = 1;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// `None` when no API key is configured
    pub vendor: Option<Arc<VendorClient>>,
    /// Page size used when a search has no `limit`
    pub default_limit: u32,
}

impl AppState {
    /// Build the state from server configuration.
    ///
    /// A missing API key is not fatal: the proxy starts and answers every
    /// vendor route with a configuration error.
    pub fn new(config: &ServerConfig) -> Result<Self> {
        let vendor = match config.vendor.api_key() {
            Some(_) => Some(Arc::new(VendorClient::new(&config.vendor)?)),
            None => {
                warn!("No vendor API key configured; vendor routes will fail");
                None
            }
        };

        Ok(Self {
            vendor,
            default_limit: config.default_limit,
        })
    }

    fn vendor(&self) -> Result<&VendorClient> {
        self.vendor
            .as_deref()
            .ok_or_else(|| GrowthfyError::configuration("API key not configured"))
    }
}

/// `GET /api/twitter/search`
pub async fn handle_search(
    State(state): State<AppState>,
    params: std::result::Result<Query<SearchParams>, QueryRejection>,
) -> std::result::Result<Json<SearchResponse>, ApiError> {
    let Query(params) = params.map_err(|e| GrowthfyError::validation(e.body_text()))?;
    run_search(&state, params).await
}

/// `POST /api/twitter/search`, same fields as a JSON body
pub async fn handle_search_post(
    State(state): State<AppState>,
    params: std::result::Result<Json<SearchParams>, JsonRejection>,
) -> std::result::Result<Json<SearchResponse>, ApiError> {
    let Json(params) = params.map_err(|e| GrowthfyError::validation(e.body_text()))?;
    run_search(&state, params).await
}

async fn run_search(
    state: &AppState,
    params: SearchParams,
) -> std::result::Result<Json<SearchResponse>, ApiError> {
    if params.query.trim().is_empty() {
        return Err(GrowthfyError::validation("Missing required parameter: query").into());
    }
    let vendor = state.vendor()?;

    let limit = params
        .limit
        .filter(|limit| *limit > 0)
        .unwrap_or(state.default_limit);
    info!(
        "Search '{}' (limit {}, cursor {:?})",
        params.query, limit, params.cursor
    );

    Ok(Json(vendor.search(&params, limit).await?))
}

#[derive(Debug, Deserialize)]
pub struct TrendsParams {
    pub woeid: Option<u64>,
}

/// `GET /api/twitter/trends`
pub async fn handle_trends(
    State(state): State<AppState>,
    params: std::result::Result<Query<TrendsParams>, QueryRejection>,
) -> std::result::Result<Json<Value>, ApiError> {
    let Query(params) = params.map_err(|e| GrowthfyError::validation(e.body_text()))?;
    let vendor = state.vendor()?;
    Ok(Json(
        vendor
            .trends(params.woeid.unwrap_or(DEFAULT_WOEID))
            .await?,
    ))
}

/// `GET /api/twitter/trends/available`
pub async fn handle_trends_available(
    State(state): State<AppState>,
) -> std::result::Result<Json<Value>, ApiError> {
    let vendor = state.vendor()?;
    Ok(Json(vendor.available_trends().await?))
}

/// `GET /api/twitter/user`
pub async fn handle_user(
    State(state): State<AppState>,
    Query(lookup): Query<UserLookup>,
) -> std::result::Result<Json<Value>, ApiError> {
    lookup.validate()?;
    let vendor = state.vendor()?;
    Ok(Json(vendor.user(&lookup).await?))
}

/// Query string of the timeline route
#[derive(Debug, Deserialize)]
pub struct TimelineParams {
    pub screen_name: Option<String>,
    pub user_id: Option<String>,
    pub count: Option<u32>,
    pub include_rts: Option<bool>,
    pub exclude_replies: Option<bool>,
}

impl From<TimelineParams> for TimelineQuery {
    fn from(params: TimelineParams) -> Self {
        let defaults = TimelineQuery::new(UserLookup {
            screen_name: params.screen_name,
            user_id: params.user_id,
        });
        Self {
            count: params.count.unwrap_or(defaults.count),
            include_rts: params.include_rts.unwrap_or(defaults.include_rts),
            exclude_replies: params.exclude_replies.unwrap_or(defaults.exclude_replies),
            ..defaults
        }
    }
}

/// `GET /api/twitter/user/timeline`
pub async fn handle_user_timeline(
    State(state): State<AppState>,
    params: std::result::Result<Query<TimelineParams>, QueryRejection>,
) -> std::result::Result<Json<Value>, ApiError> {
    let Query(params) = params.map_err(|e| GrowthfyError::validation(e.body_text()))?;
    let query = TimelineQuery::from(params);
    query.user.validate()?;
    let vendor = state.vendor()?;
    Ok(Json(vendor.user_timeline(&query).await?))
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub vendor_configured: bool,
}

/// `GET /health`
pub async fn handle_health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: crate::VERSION.to_string(),
        timestamp: chrono::Utc::now(),
        vendor_configured: state.vendor.is_some(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeline_defaults() {
        let params = TimelineParams {
            screen_name: Some("rustlang".to_string()),
            user_id: None,
            count: None,
            include_rts: None,
            exclude_replies: Some(true),
        };
        let query = TimelineQuery::from(params);
        assert_eq!(query.count, 20);
        assert!(query.include_rts);
        assert!(query.exclude_replies);
        assert_eq!(query.user.screen_name.as_deref(), Some("rustlang"));
    }

    #[test]
    fn test_state_without_key() {
        let state = AppState::new(&ServerConfig::default()).unwrap();
        assert!(state.vendor.is_none());
        assert!(matches!(
            state.vendor(),
            Err(GrowthfyError::Configuration { .. })
        ));
    }

    #[test]
    fn test_state_with_key() {
        let mut config = ServerConfig::default();
        config.vendor.api_key = Some("key".to_string());
        let state = AppState::new(&config).unwrap();
        assert!(state.vendor.is_some());
        assert_eq!(state.default_limit, 100);
    }
}

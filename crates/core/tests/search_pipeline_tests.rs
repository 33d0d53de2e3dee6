//! Integration tests for the compile, normalize and paginate pipeline
//!
//! A fixture transport stands in for the vendor: it compiles the request the
//! way the proxy does, serves vendor-shaped pages keyed by cursor and runs
//! them through the normalizer.

mod common;

use async_trait::async_trait;
use common::{vendor_page, vendor_tweet};
use growthfy_core::{
    compile, normalize_search, FetchOutcome, GrowthfyError, MediaType, Result, SearchClient,
    SearchParams, SearchResponse, SearchTransport, SessionPhase, SortBy,
};
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Default)]
struct FixtureTransport {
    /// Pages keyed by cursor; `None` is the first page
    pages: HashMap<Option<String>, Value>,
    /// Compiled queries in request order
    compiled: Mutex<Vec<String>>,
}

impl FixtureTransport {
    fn with_page(mut self, cursor: Option<&str>, page: Value) -> Self {
        self.pages.insert(cursor.map(str::to_string), page);
        self
    }
}

#[async_trait]
impl SearchTransport for FixtureTransport {
    async fn fetch(&self, params: &SearchParams) -> Result<SearchResponse> {
        self.compiled.lock().push(compile(params));
        let page = self
            .pages
            .get(&params.cursor)
            .cloned()
            .ok_or_else(|| GrowthfyError::upstream(404, "unknown cursor", None))?;
        normalize_search(page, &params.query, params.limit.unwrap_or(100))
    }
}

fn ids(client: &SearchClient) -> Vec<String> {
    client.items().into_iter().map(|post| post.id).collect()
}

#[tokio::test]
async fn test_pages_accumulate_across_vendor_shapes() {
    let transport = Arc::new(
        FixtureTransport::default()
            .with_page(
                None,
                vendor_page(
                    "tweets",
                    vec![vendor_tweet(3, "a", "three"), vendor_tweet(2, "b", "two")],
                    Some("1"),
                ),
            )
            .with_page(
                Some("1"),
                vendor_page("statuses", vec![vendor_tweet(1, "c", "one")], None),
            ),
    );
    let client = SearchClient::new(transport.clone());

    let params = SearchParams {
        language: Some("en".to_string()),
        sort_by: Some(SortBy::Recency),
        limit: Some(2),
        ..SearchParams::new("rust")
    };

    assert_eq!(client.search(params).await, FetchOutcome::Applied);
    assert!(client.has_more());
    assert_eq!(client.load_more().await, FetchOutcome::Applied);
    assert!(!client.has_more());
    assert_eq!(client.load_more().await, FetchOutcome::Skipped);

    assert_eq!(ids(&client), vec!["3", "2", "1"]);
    assert_eq!(
        *transport.compiled.lock(),
        vec!["rust lang:en".to_string(), "rust lang:en".to_string()]
    );

    let session = client.snapshot();
    assert_eq!(session.phase, SessionPhase::Ready);
    let metadata = session.metadata.unwrap();
    assert_eq!(metadata.query, "rust");
    assert_eq!(metadata.count, 2);
}

#[tokio::test]
async fn test_advanced_query_passes_through_filters() {
    let transport = Arc::new(FixtureTransport::default().with_page(
        None,
        vendor_page("results", vec![vendor_tweet(7, "rustlang", "hi")], None),
    ));
    let client = SearchClient::new(transport.clone());

    let params = SearchParams {
        media_type: Some(MediaType::Images),
        min_faves: Some(10),
        ..SearchParams::new("from:rustlang")
    };
    client.search(params).await;

    assert_eq!(*transport.compiled.lock(), vec!["from:rustlang".to_string()]);
    assert_eq!(ids(&client), vec!["7"]);
    assert_eq!(client.items()[0].author.handle, "rustlang");
}

#[tokio::test]
async fn test_failed_page_keeps_collected_posts() {
    let transport = Arc::new(FixtureTransport::default().with_page(
        None,
        vendor_page("tweets", vec![vendor_tweet(5, "a", "five")], Some("4")),
    ));
    let client = SearchClient::new(transport);

    client.search(SearchParams::new("rust")).await;
    assert_eq!(client.load_more().await, FetchOutcome::Failed);

    assert_eq!(ids(&client), vec!["5"]);
    assert_eq!(client.snapshot().phase, SessionPhase::Error);
    assert!(matches!(
        client.last_error().as_deref(),
        Some(GrowthfyError::Upstream { status: 404, .. })
    ));
}

//! Canonical data model shared by the proxy, the proxy client and the CLI

use crate::{GrowthfyError, Result};
use serde::{Deserialize, Serialize};

/// Author of a post
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Author {
    pub id: String,
    pub handle: String,
    pub display_name: String,
    #[serde(default)]
    pub verified: bool,
    pub avatar_url: Option<String>,
}

/// Engagement counters of a post
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostCounts {
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub reposts: u64,
    #[serde(default)]
    pub replies: u64,
    #[serde(default)]
    pub quotes: u64,
}

/// A mentioned account
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mention {
    pub id: String,
    pub handle: String,
    pub name: String,
}

/// A link inside the post body
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkEntity {
    pub url: String,
    pub expanded_url: String,
    pub display_url: String,
}

/// Kind of an attached media item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    #[default]
    Photo,
    Video,
    AnimatedGif,
}

/// A playable rendition of a video
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoVariant {
    pub content_type: String,
    pub url: String,
    pub bitrate: Option<u64>,
}

/// Media attached to a post
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaItem {
    pub id: String,
    pub kind: MediaKind,
    pub url: String,
    pub expanded_url: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variants: Vec<VideoVariant>,
}

/// Entities extracted from a post body
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entities {
    #[serde(default)]
    pub hashtags: Vec<String>,
    #[serde(default)]
    pub mentions: Vec<Mention>,
    #[serde(default)]
    pub urls: Vec<LinkEntity>,
    #[serde(default)]
    pub media: Vec<MediaItem>,
}

/// A normalized post.
///
/// `repost_of` and `quote_of` hold the referenced post. The vendor never
/// nests a repost inside a repost, so the structure is a shallow tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Post {
    pub id: String,
    pub author: Author,
    pub text: String,
    pub created_at: String,
    #[serde(default)]
    pub counts: PostCounts,
    #[serde(default)]
    pub entities: Entities,
    pub lang: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repost_of: Option<Box<Post>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote_of: Option<Box<Post>>,
}

impl Post {
    /// Whether this post only reposts another one
    pub fn is_repost(&self) -> bool {
        self.repost_of.is_some()
    }

    /// The post whose content should be displayed
    pub fn display_post(&self) -> &Post {
        self.repost_of.as_deref().unwrap_or(self)
    }
}

/// Metadata of one search page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchMetadata {
    /// Vendor-reported processing time
    #[serde(default)]
    pub completed_in: f64,
    #[serde(default)]
    pub max_id: u64,
    #[serde(default = "zero_id")]
    pub max_id_str: String,
    /// URL-encoded query string pointing at the next page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_results: Option<String>,
    /// The caller's raw query
    #[serde(default)]
    pub query: String,
    /// Requested page size
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub since_id: u64,
    #[serde(default = "zero_id")]
    pub since_id_str: String,
}

impl SearchMetadata {
    /// Continuation cursor carried by `next_results`.
    ///
    /// `next_results` looks like `?max_id=123&q=rust&include_entities=1`;
    /// the cursor is the `max_id` value. No field, or no `max_id` in it,
    /// means there is no next page.
    pub fn next_cursor(&self) -> Option<String> {
        let raw = self.next_results.as_deref()?;
        let query = raw.trim().trim_start_matches('?');
        url::form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == "max_id")
            .map(|(_, value)| value.into_owned())
            .filter(|value| !value.is_empty())
    }
}

pub(crate) fn zero_id() -> String {
    "0".to_string()
}

/// Canonical search page, serialized as `{ statuses, search_metadata }`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(rename = "statuses", default)]
    pub items: Vec<Post>,
    #[serde(rename = "search_metadata", default)]
    pub metadata: SearchMetadata,
}

impl SearchResponse {
    /// Cursor for the page after this one
    pub fn next_cursor(&self) -> Option<String> {
        self.metadata.next_cursor()
    }
}

/// A normalized user profile
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub handle: String,
    pub display_name: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub url: Option<String>,
    #[serde(default)]
    pub followers: u64,
    #[serde(default)]
    pub following: u64,
    #[serde(default)]
    pub posts: u64,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub protected: bool,
    pub avatar_url: Option<String>,
    pub banner_url: Option<String>,
    pub created_at: Option<String>,
}

/// A trending topic
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trend {
    pub name: String,
    #[serde(default)]
    pub url: String,
    pub promoted_content: Option<String>,
    #[serde(default)]
    pub query: String,
    pub tweet_volume: Option<u64>,
}

/// Place category of a trend location
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceType {
    pub code: u32,
    pub name: String,
}

/// A location for which trends are available
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendLocation {
    pub woeid: u64,
    pub name: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub place_type: PlaceType,
}

/// Identifies a user either by handle or by id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserLookup {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screen_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl UserLookup {
    pub fn by_handle<S: Into<String>>(handle: S) -> Self {
        Self {
            screen_name: Some(handle.into()),
            user_id: None,
        }
    }

    pub fn by_id<S: Into<String>>(id: S) -> Self {
        Self {
            screen_name: None,
            user_id: Some(id.into()),
        }
    }

    /// Require at least one of `screen_name` or `user_id`
    pub fn validate(&self) -> Result<()> {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        if present(&self.screen_name) || present(&self.user_id) {
            Ok(())
        } else {
            Err(GrowthfyError::validation(
                "Missing required parameter: screen_name or user_id",
            ))
        }
    }

    /// Query pairs for the non-empty identifiers
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(name) = self.screen_name.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("screen_name", name.to_string()));
        }
        if let Some(id) = self.user_id.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("user_id", id.to_string()));
        }
        pairs
    }
}

/// Parameters of a user timeline request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineQuery {
    #[serde(flatten)]
    pub user: UserLookup,
    #[serde(default = "default_timeline_count")]
    pub count: u32,
    #[serde(default = "default_true")]
    pub include_rts: bool,
    #[serde(default)]
    pub exclude_replies: bool,
}

impl TimelineQuery {
    pub fn new(user: UserLookup) -> Self {
        Self {
            user,
            count: default_timeline_count(),
            include_rts: true,
            exclude_replies: false,
        }
    }

    /// Query pairs in the vendor's format
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = self.user.query_pairs();
        pairs.push(("count", self.count.to_string()));
        pairs.push(("include_rts", self.include_rts.to_string()));
        pairs.push(("exclude_replies", self.exclude_replies.to_string()));
        pairs
    }
}

fn default_timeline_count() -> u32 {
    20
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata_with(next_results: Option<&str>) -> SearchMetadata {
        SearchMetadata {
            next_results: next_results.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_next_cursor_extraction() {
        let meta = metadata_with(Some("?max_id=1780000000000000000&q=rust&include_entities=1"));
        assert_eq!(meta.next_cursor().as_deref(), Some("1780000000000000000"));

        let meta = metadata_with(Some("q=rust%20lang&max_id=99"));
        assert_eq!(meta.next_cursor().as_deref(), Some("99"));
    }

    #[test]
    fn test_next_cursor_absent() {
        assert_eq!(metadata_with(None).next_cursor(), None);
        assert_eq!(metadata_with(Some("?q=rust")).next_cursor(), None);
        assert_eq!(metadata_with(Some("?max_id=")).next_cursor(), None);
    }

    #[test]
    fn test_search_response_wire_names() {
        let response = SearchResponse {
            items: vec![Post {
                id: "1".to_string(),
                ..Default::default()
            }],
            metadata: SearchMetadata {
                query: "rust".to_string(),
                count: 30,
                max_id_str: "0".to_string(),
                since_id_str: "0".to_string(),
                ..Default::default()
            },
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["statuses"][0]["id"], "1");
        assert_eq!(json["search_metadata"]["query"], "rust");
        assert!(json["search_metadata"].get("next_results").is_none());

        let back: SearchResponse = serde_json::from_value(json).unwrap();
        assert_eq!(back, response);
    }

    #[test]
    fn test_metadata_defaults() {
        let meta: SearchMetadata = serde_json::from_str("{}").unwrap();
        assert_eq!(meta.max_id, 0);
        assert_eq!(meta.max_id_str, "0");
        assert_eq!(meta.since_id_str, "0");
        assert_eq!(meta.completed_in, 0.0);
    }

    #[test]
    fn test_user_lookup_validation() {
        assert!(UserLookup::by_handle("nasa").validate().is_ok());
        assert!(UserLookup::by_id("11348282").validate().is_ok());

        let err = UserLookup::default().validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation error: Missing required parameter: screen_name or user_id"
        );

        let blank = UserLookup {
            screen_name: Some("  ".to_string()),
            user_id: None,
        };
        assert!(blank.validate().is_err());
    }

    #[test]
    fn test_timeline_query_pairs() {
        let query = TimelineQuery::new(UserLookup::by_handle("nasa"));
        assert_eq!(
            query.query_pairs(),
            vec![
                ("screen_name", "nasa".to_string()),
                ("count", "20".to_string()),
                ("include_rts", "true".to_string()),
                ("exclude_replies", "false".to_string()),
            ]
        );
    }

    #[test]
    fn test_display_post_follows_repost() {
        let original = Post {
            id: "1".to_string(),
            text: "original".to_string(),
            ..Default::default()
        };
        let repost = Post {
            id: "2".to_string(),
            repost_of: Some(Box::new(original)),
            ..Default::default()
        };
        assert!(repost.is_repost());
        assert_eq!(repost.display_post().text, "original");
    }

    #[test]
    fn test_trend_location_wire_names() {
        let location: TrendLocation = serde_json::from_value(serde_json::json!({
            "woeid": 1,
            "name": "Worldwide",
            "country": "",
            "countryCode": null,
            "placeType": { "code": 19, "name": "Supername" }
        }))
        .unwrap();
        assert_eq!(location.woeid, 1);
        assert_eq!(location.place_type.code, 19);
    }
}

//! Vendor payload normalization
//!
//! The social-data vendor is inconsistent about where it puts results: the
//! list may arrive under `tweets`, `results` or `statuses`, and timeline
//! endpoints return a bare array. Post fields vary too (`full_text` vs
//! `text`, `tweet_created_at` vs `created_at`, numeric vs string ids).
//!
//! Everything vendor-shaped is decoded here, once, into the canonical types
//! from [`crate::types`]. Code outside this module never looks at vendor
//! field names.

use crate::types::{
    zero_id, Author, Entities, LinkEntity, MediaItem, MediaKind, Mention, Post, PostCounts,
    Profile, SearchMetadata, SearchResponse, VideoVariant,
};
use crate::Result;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

/// Where the vendor put the result list
#[derive(Debug)]
enum VendorItems {
    Tweets(Vec<RawPost>),
    Results(Vec<RawPost>),
    Statuses(Vec<RawPost>),
    Array(Vec<RawPost>),
    Missing,
}

impl VendorItems {
    /// Decode a payload, picking the first non-empty of `tweets`, `results`
    /// and `statuses`
    fn decode(payload: Value) -> Result<(Self, Option<RawMetadata>)> {
        if payload.is_array() {
            let posts: Vec<RawPost> = serde_json::from_value(payload)?;
            return Ok((Self::Array(posts), None));
        }

        let RawEnvelope {
            tweets,
            results,
            statuses,
            search_metadata,
        } = serde_json::from_value(payload)?;

        let non_empty = |list: Option<Vec<RawPost>>| list.filter(|posts| !posts.is_empty());
        let items = if let Some(posts) = non_empty(tweets) {
            Self::Tweets(posts)
        } else if let Some(posts) = non_empty(results) {
            Self::Results(posts)
        } else if let Some(posts) = non_empty(statuses) {
            Self::Statuses(posts)
        } else {
            Self::Missing
        };

        Ok((items, search_metadata))
    }

    fn source(&self) -> &'static str {
        match self {
            Self::Tweets(_) => "tweets",
            Self::Results(_) => "results",
            Self::Statuses(_) => "statuses",
            Self::Array(_) => "array",
            Self::Missing => "none",
        }
    }

    fn into_posts(self) -> Vec<Post> {
        let raw = match self {
            Self::Tweets(posts)
            | Self::Results(posts)
            | Self::Statuses(posts)
            | Self::Array(posts) => posts,
            Self::Missing => Vec::new(),
        };
        raw.into_iter().map(RawPost::into_post).collect()
    }
}

/// Normalize a vendor search payload.
///
/// `query` is the caller's raw query and `requested_count` the page size the
/// caller asked for; both are echoed in the metadata.
pub fn normalize_search(
    payload: Value,
    query: &str,
    requested_count: u32,
) -> Result<SearchResponse> {
    let (items, raw_meta) = VendorItems::decode(payload)?;
    let raw_meta = raw_meta.unwrap_or_default();
    debug!("Vendor results found under '{}'", items.source());

    let max_id_str = id_string(raw_meta.max_id_str, raw_meta.max_id);
    let since_id_str = id_string(raw_meta.since_id_str, raw_meta.since_id);

    let metadata = SearchMetadata {
        completed_in: raw_meta.completed_in.unwrap_or(0.0),
        max_id: max_id_str.parse().unwrap_or(0),
        max_id_str,
        next_results: raw_meta.next_results.filter(|s| !s.is_empty()),
        query: query.to_string(),
        count: requested_count,
        since_id: since_id_str.parse().unwrap_or(0),
        since_id_str,
    };

    Ok(SearchResponse {
        items: items.into_posts(),
        metadata,
    })
}

/// Normalize any payload that carries a list of posts, such as a timeline
pub fn normalize_posts(payload: Value) -> Result<Vec<Post>> {
    let (items, _) = VendorItems::decode(payload)?;
    Ok(items.into_posts())
}

/// Normalize a vendor user object
pub fn normalize_profile(payload: Value) -> Result<Profile> {
    let user: RawUser = serde_json::from_value(payload)?;
    Ok(user.into_profile())
}

fn id_string(id_str: Option<String>, id: Option<Value>) -> String {
    id_str
        .filter(|s| !s.is_empty())
        .or_else(|| match id {
            Some(Value::Number(n)) => Some(n.to_string()),
            Some(Value::String(s)) if !s.is_empty() => Some(s),
            _ => None,
        })
        .unwrap_or_else(zero_id)
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawEnvelope {
    tweets: Option<Vec<RawPost>>,
    results: Option<Vec<RawPost>>,
    statuses: Option<Vec<RawPost>>,
    search_metadata: Option<RawMetadata>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawMetadata {
    completed_in: Option<f64>,
    max_id: Option<Value>,
    max_id_str: Option<String>,
    next_results: Option<String>,
    since_id: Option<Value>,
    since_id_str: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawPost {
    id: Option<Value>,
    id_str: Option<String>,
    full_text: Option<String>,
    text: Option<String>,
    created_at: Option<String>,
    tweet_created_at: Option<String>,
    user: Option<RawUser>,
    favorite_count: Option<u64>,
    retweet_count: Option<u64>,
    reply_count: Option<u64>,
    quote_count: Option<u64>,
    entities: Option<RawEntities>,
    extended_entities: Option<RawMediaList>,
    extended_tweet: Option<RawExtendedTweet>,
    retweeted_status: Option<Box<RawPost>>,
    quoted_status: Option<Box<RawPost>>,
    lang: Option<String>,
}

impl RawPost {
    fn into_post(self) -> Post {
        let RawPost {
            id,
            id_str,
            full_text,
            text,
            created_at,
            tweet_created_at,
            user,
            favorite_count,
            retweet_count,
            reply_count,
            quote_count,
            entities,
            extended_entities,
            extended_tweet,
            retweeted_status,
            quoted_status,
            lang,
        } = self;

        let (extended_text, extended_entities_body, extended_media) = match extended_tweet {
            Some(ext) => (ext.full_text, ext.entities, ext.extended_entities),
            None => (None, None, None),
        };

        let body = full_text.or(extended_text).or(text).unwrap_or_default();
        let base_entities = extended_entities_body.or(entities).unwrap_or_default();

        let media = extended_entities
            .and_then(|list| list.media)
            .or_else(|| extended_media.and_then(|list| list.media))
            .or(base_entities.media)
            .unwrap_or_default();

        Post {
            id: id_string(id_str, id),
            author: user.map(RawUser::into_author).unwrap_or_default(),
            text: body,
            created_at: tweet_created_at.or(created_at).unwrap_or_default(),
            counts: PostCounts {
                likes: favorite_count.unwrap_or(0),
                reposts: retweet_count.unwrap_or(0),
                replies: reply_count.unwrap_or(0),
                quotes: quote_count.unwrap_or(0),
            },
            entities: Entities {
                hashtags: base_entities
                    .hashtags
                    .unwrap_or_default()
                    .into_iter()
                    .map(|tag| tag.text)
                    .collect(),
                mentions: base_entities
                    .user_mentions
                    .unwrap_or_default()
                    .into_iter()
                    .map(RawMention::into_mention)
                    .collect(),
                urls: base_entities
                    .urls
                    .unwrap_or_default()
                    .into_iter()
                    .map(RawUrl::into_link)
                    .collect(),
                media: media.into_iter().map(RawMedia::into_media).collect(),
            },
            lang,
            repost_of: retweeted_status.map(|raw| Box::new(raw.into_post())),
            quote_of: quoted_status.map(|raw| Box::new(raw.into_post())),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawExtendedTweet {
    full_text: Option<String>,
    entities: Option<RawEntities>,
    extended_entities: Option<RawMediaList>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawUser {
    id: Option<Value>,
    id_str: Option<String>,
    name: Option<String>,
    screen_name: Option<String>,
    description: Option<String>,
    location: Option<String>,
    url: Option<String>,
    followers_count: Option<u64>,
    friends_count: Option<u64>,
    statuses_count: Option<u64>,
    verified: Option<bool>,
    is_blue_verified: Option<bool>,
    protected: Option<bool>,
    profile_image_url_https: Option<String>,
    profile_banner_url: Option<String>,
    created_at: Option<String>,
}

impl RawUser {
    fn is_verified(&self) -> bool {
        self.verified.unwrap_or(false) || self.is_blue_verified.unwrap_or(false)
    }

    fn into_author(self) -> Author {
        let verified = self.is_verified();
        Author {
            id: id_string(self.id_str, self.id),
            handle: self.screen_name.unwrap_or_default(),
            display_name: self.name.unwrap_or_default(),
            verified,
            avatar_url: self.profile_image_url_https,
        }
    }

    fn into_profile(self) -> Profile {
        let verified = self.is_verified();
        Profile {
            id: id_string(self.id_str, self.id),
            handle: self.screen_name.unwrap_or_default(),
            display_name: self.name.unwrap_or_default(),
            description: self.description.filter(|s| !s.is_empty()),
            location: self.location.filter(|s| !s.is_empty()),
            url: self.url,
            followers: self.followers_count.unwrap_or(0),
            following: self.friends_count.unwrap_or(0),
            posts: self.statuses_count.unwrap_or(0),
            verified,
            protected: self.protected.unwrap_or(false),
            avatar_url: self.profile_image_url_https,
            banner_url: self.profile_banner_url,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawEntities {
    hashtags: Option<Vec<RawHashtag>>,
    user_mentions: Option<Vec<RawMention>>,
    urls: Option<Vec<RawUrl>>,
    media: Option<Vec<RawMedia>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawMediaList {
    media: Option<Vec<RawMedia>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawHashtag {
    text: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawMention {
    id: Option<Value>,
    id_str: Option<String>,
    screen_name: Option<String>,
    name: Option<String>,
}

impl RawMention {
    fn into_mention(self) -> Mention {
        Mention {
            id: id_string(self.id_str, self.id),
            handle: self.screen_name.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawUrl {
    url: Option<String>,
    expanded_url: Option<String>,
    display_url: Option<String>,
}

impl RawUrl {
    fn into_link(self) -> LinkEntity {
        let url = self.url.unwrap_or_default();
        LinkEntity {
            expanded_url: self.expanded_url.unwrap_or_else(|| url.clone()),
            display_url: self.display_url.unwrap_or_else(|| url.clone()),
            url,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawMedia {
    id: Option<Value>,
    id_str: Option<String>,
    media_url_https: Option<String>,
    media_url: Option<String>,
    expanded_url: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    video_info: Option<RawVideoInfo>,
}

impl RawMedia {
    fn into_media(self) -> MediaItem {
        let kind = match self.kind.as_deref() {
            Some("video") => MediaKind::Video,
            Some("animated_gif") => MediaKind::AnimatedGif,
            _ => MediaKind::Photo,
        };
        MediaItem {
            id: id_string(self.id_str, self.id),
            kind,
            url: self.media_url_https.or(self.media_url).unwrap_or_default(),
            expanded_url: self.expanded_url.unwrap_or_default(),
            variants: self
                .video_info
                .and_then(|info| info.variants)
                .unwrap_or_default()
                .into_iter()
                .map(|v| VideoVariant {
                    content_type: v.content_type.unwrap_or_default(),
                    url: v.url.unwrap_or_default(),
                    bitrate: v.bitrate,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawVideoInfo {
    variants: Option<Vec<RawVariant>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawVariant {
    bitrate: Option<u64>,
    content_type: Option<String>,
    url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn vendor_tweet(id: &str, text: &str) -> Value {
        json!({
            "id": id.parse::<u64>().unwrap(),
            "id_str": id,
            "full_text": text,
            "tweet_created_at": "2024-05-01T12:00:00.000000Z",
            "user": {
                "id_str": "11348282",
                "name": "NASA",
                "screen_name": "NASA",
                "verified": true,
                "profile_image_url_https": "https://pbs.twimg.com/nasa.jpg"
            },
            "favorite_count": 10,
            "retweet_count": 2,
            "reply_count": 1,
            "quote_count": null,
            "lang": "en",
            "entities": {
                "hashtags": [{ "text": "space", "indices": [0, 6] }],
                "user_mentions": [{ "id_str": "44196397", "screen_name": "elonmusk", "name": "Elon" }],
                "urls": [{ "url": "https://t.co/x", "expanded_url": "https://nasa.gov", "display_url": "nasa.gov" }]
            }
        })
    }

    #[test]
    fn test_results_field_is_used_when_alone() {
        let payload = json!({
            "results": [vendor_tweet("1", "a"), vendor_tweet("2", "b")],
            "search_metadata": { "max_id_str": "2" }
        });

        let response = normalize_search(payload, "space", 30).unwrap();
        let ids: Vec<_> = response.items.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn test_field_priority() {
        let payload = json!({
            "tweets": [vendor_tweet("1", "from tweets")],
            "results": [vendor_tweet("2", "from results")],
            "statuses": [vendor_tweet("3", "from statuses")]
        });
        let response = normalize_search(payload, "q", 10).unwrap();
        assert_eq!(response.items.len(), 1);
        assert_eq!(response.items[0].text, "from tweets");
    }

    #[test]
    fn test_empty_field_falls_through() {
        let payload = json!({
            "tweets": [],
            "results": null,
            "statuses": [vendor_tweet("3", "from statuses")]
        });
        let response = normalize_search(payload, "q", 10).unwrap();
        assert_eq!(response.items.len(), 1);
        assert_eq!(response.items[0].id, "3");
    }

    #[test]
    fn test_missing_results_and_metadata() {
        let response = normalize_search(json!({}), "ai", 100).unwrap();
        assert!(response.items.is_empty());
        assert_eq!(response.metadata.max_id, 0);
        assert_eq!(response.metadata.max_id_str, "0");
        assert_eq!(response.metadata.since_id, 0);
        assert_eq!(response.metadata.since_id_str, "0");
        assert_eq!(response.metadata.completed_in, 0.0);
        assert_eq!(response.metadata.next_results, None);
        assert_eq!(response.metadata.query, "ai");
        assert_eq!(response.metadata.count, 100);
    }

    #[test]
    fn test_metadata_is_carried() {
        let payload = json!({
            "statuses": [vendor_tweet("5", "x")],
            "search_metadata": {
                "completed_in": 0.035,
                "max_id_str": "1780000000000000005",
                "since_id": 12,
                "next_results": "?max_id=1780000000000000004&q=ai"
            }
        });
        let response = normalize_search(payload, "ai", 30).unwrap();
        let meta = &response.metadata;
        assert_eq!(meta.completed_in, 0.035);
        assert_eq!(meta.max_id, 1780000000000000005);
        assert_eq!(meta.since_id_str, "12");
        assert_eq!(meta.since_id, 12);
        assert_eq!(
            response.next_cursor().as_deref(),
            Some("1780000000000000004")
        );
    }

    #[test]
    fn test_post_fields() {
        let post = normalize_posts(json!([vendor_tweet("7", "hello #space")]))
            .unwrap()
            .remove(0);

        assert_eq!(post.id, "7");
        assert_eq!(post.text, "hello #space");
        assert_eq!(post.created_at, "2024-05-01T12:00:00.000000Z");
        assert_eq!(post.author.handle, "NASA");
        assert!(post.author.verified);
        assert_eq!(post.counts.likes, 10);
        assert_eq!(post.counts.reposts, 2);
        assert_eq!(post.counts.replies, 1);
        assert_eq!(post.counts.quotes, 0);
        assert_eq!(post.entities.hashtags, vec!["space".to_string()]);
        assert_eq!(post.entities.mentions[0].handle, "elonmusk");
        assert_eq!(post.entities.urls[0].display_url, "nasa.gov");
        assert_eq!(post.lang.as_deref(), Some("en"));
    }

    #[test]
    fn test_numeric_only_ids_and_plain_text() {
        let payload = json!([{ "id": 42, "text": "short", "created_at": "Wed Oct 10 20:19:24 +0000 2018" }]);
        let post = normalize_posts(payload).unwrap().remove(0);
        assert_eq!(post.id, "42");
        assert_eq!(post.text, "short");
        assert_eq!(post.author.id, "0");
        assert_eq!(post.created_at, "Wed Oct 10 20:19:24 +0000 2018");
    }

    #[test]
    fn test_extended_tweet_text_and_media() {
        let payload = json!([{
            "id_str": "9",
            "text": "truncated…",
            "extended_tweet": {
                "full_text": "the whole thing",
                "extended_entities": {
                    "media": [{
                        "id_str": "m1",
                        "type": "video",
                        "media_url_https": "https://pbs.twimg.com/v.jpg",
                        "video_info": { "variants": [{ "content_type": "video/mp4", "url": "https://video.twimg.com/v.mp4", "bitrate": 832000 }] }
                    }]
                }
            },
            "entities": { "media": [{ "id_str": "ignored", "type": "photo" }] }
        }]);
        let post = normalize_posts(payload).unwrap().remove(0);
        assert_eq!(post.text, "the whole thing");
        assert_eq!(post.entities.media.len(), 1);
        assert_eq!(post.entities.media[0].id, "m1");
        assert_eq!(post.entities.media[0].kind, MediaKind::Video);
        assert_eq!(post.entities.media[0].variants[0].bitrate, Some(832000));
    }

    #[test]
    fn test_repost_and_quote_references() {
        let mut outer = vendor_tweet("100", "RT @NASA: launch");
        outer["retweeted_status"] = vendor_tweet("99", "launch");
        outer["quoted_status"] = vendor_tweet("98", "quoted");

        let post = normalize_posts(json!({ "tweets": [outer] }))
            .unwrap()
            .remove(0);
        assert_eq!(post.repost_of.as_ref().unwrap().id, "99");
        assert_eq!(post.quote_of.as_ref().unwrap().text, "quoted");
        assert_eq!(post.display_post().id, "99");
    }

    #[test]
    fn test_profile_normalization() {
        let profile = normalize_profile(json!({
            "id": 11348282,
            "name": "NASA",
            "screen_name": "NASA",
            "description": "",
            "followers_count": 80000000,
            "friends_count": 170,
            "statuses_count": 70000,
            "is_blue_verified": true,
            "protected": false,
            "profile_image_url_https": "https://pbs.twimg.com/nasa.jpg"
        }))
        .unwrap();

        assert_eq!(profile.id, "11348282");
        assert_eq!(profile.handle, "NASA");
        assert_eq!(profile.description, None);
        assert_eq!(profile.followers, 80000000);
        assert!(profile.verified);
    }

    #[test]
    fn test_malformed_payload_is_an_error() {
        assert!(normalize_search(json!({ "tweets": "nope" }), "q", 1).is_err());
    }
}

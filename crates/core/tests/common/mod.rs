//! Vendor-shaped payload builders shared by integration tests

use serde_json::{json, Value};

/// A vendor tweet with the fields the normalizer reads most often
pub fn vendor_tweet(id: u64, handle: &str, text: &str) -> Value {
    json!({
        "id": id,
        "id_str": id.to_string(),
        "full_text": text,
        "tweet_created_at": "2024-09-10T12:00:00.000000Z",
        "user": {
            "id_str": "99",
            "screen_name": handle,
            "name": handle.to_uppercase(),
            "verified": false,
        },
        "favorite_count": 1,
        "retweet_count": 0,
        "reply_count": 0,
        "quote_count": 0,
        "lang": "en",
    })
}

/// A vendor search page. `next_max_id` becomes the `next_results` cursor.
pub fn vendor_page(list_key: &str, tweets: Vec<Value>, next_max_id: Option<&str>) -> Value {
    let mut metadata = json!({ "completed_in": 0.05, "max_id_str": "0" });
    if let Some(max_id) = next_max_id {
        metadata["next_results"] = json!(format!("?max_id={}&q=rust&include_entities=1", max_id));
    }
    let mut page = json!({ "search_metadata": metadata });
    page[list_key] = Value::Array(tweets);
    page
}

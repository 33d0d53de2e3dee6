//! Search parameters and the vendor query compiler
//!
//! A [`SearchParams`] value describes what the caller wants to find. The
//! vendor only understands a single query string with inline operators
//! (`since:`, `filter:`, `min_faves:` ...), so [`compile`] folds the
//! structured fields into that string.
//!
//! # Clause order
//!
//! Clauses are appended in a fixed order so the output is stable:
//!
//! 1. `since:<fromDate>` then `until:<toDate>`
//! 2. `-filter:replies` when replies are excluded
//! 3. `-filter:nativeretweets` / `include:nativeretweets`
//! 4. `filter:blue_verified`
//! 5. media filter
//! 6. `lang:<code>`
//! 7. `min_retweets:`, `min_faves:`, `min_replies:`
//! 8. `near:"<place>"` then `within:<distance>`
//!
//! If the raw query already carries an advanced operator, nothing is
//! appended and the trimmed query is returned as-is.
//!
//! # Examples
//!
//! ```
//! use growthfy_core::query::{compile, SearchParams};
//!
//! let params = SearchParams {
//!     from_date: Some("2024-01-01".to_string()),
//!     to_date: Some("2024-02-01".to_string()),
//!     ..SearchParams::new("ai")
//! };
//! assert_eq!(compile(&params), "ai since:2024-01-01 until:2024-02-01");
//!
//! assert_eq!(compile(&SearchParams::new("from:nasa #space")), "from:nasa #space");
//! ```

use once_cell::sync::Lazy;
use regex::Regex;
use crate::GrowthfyError;
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Matches the operators a caller may type directly into the query box.
static ADVANCED_OPERATORS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:from|to|filter|lang|url|near|since|until):\S|\bmin_[a-z]+:|(?:^|[^\w@])@\w")
        .expect("advanced operator pattern is valid")
});

/// Media restriction for a search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Images,
    Videos,
    Links,
    All,
}

impl MediaType {
    /// Vendor filter operator for this media type
    pub fn operator(&self) -> &'static str {
        match self {
            Self::Images => "filter:images",
            Self::Videos => "filter:videos",
            Self::Links => "filter:links",
            Self::All => "filter:media",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Images => write!(f, "images"),
            Self::Videos => write!(f, "videos"),
            Self::Links => write!(f, "links"),
            Self::All => write!(f, "all"),
        }
    }
}

impl FromStr for MediaType {
    type Err = GrowthfyError;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_lowercase().as_str() {
            "images" => Ok(Self::Images),
            "videos" => Ok(Self::Videos),
            "links" => Ok(Self::Links),
            "all" => Ok(Self::All),
            _ => Err(GrowthfyError::validation(format!(
                "Invalid media type: {}",
                s
            ))),
        }
    }
}

/// Result ordering requested from the vendor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    Relevance,
    #[default]
    Recency,
}

impl SortBy {
    /// Value of the vendor's `type` parameter
    pub fn vendor_type(&self) -> &'static str {
        match self {
            Self::Relevance => "Top",
            Self::Recency => "Latest",
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Relevance => write!(f, "relevance"),
            Self::Recency => write!(f, "recency"),
        }
    }
}

impl FromStr for SortBy {
    type Err = GrowthfyError;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_lowercase().as_str() {
            "relevance" | "top" => Ok(Self::Relevance),
            "recency" | "latest" => Ok(Self::Recency),
            _ => Err(GrowthfyError::validation(format!(
                "Invalid sort order: {}",
                s
            ))),
        }
    }
}

/// Caller intent for one search.
///
/// Field names follow the proxy's wire format. The engagement and geo
/// fields also accept their snake_case spellings.
///
/// Decoding is lenient the way a query string is: blank values count as
/// absent, and numbers and booleans may arrive as text (`"100"`, `"true"`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    /// Free text, possibly containing advanced operators
    #[serde(default)]
    pub query: String,

    /// Requested page size
    #[serde(
        default,
        deserialize_with = "de_opt_u32",
        skip_serializing_if = "Option::is_none"
    )]
    pub limit: Option<u32>,

    /// Lower date bound, `YYYY-MM-DD`
    #[serde(
        default,
        deserialize_with = "de_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub from_date: Option<String>,

    /// Upper date bound, `YYYY-MM-DD`
    #[serde(
        default,
        deserialize_with = "de_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub to_date: Option<String>,

    #[serde(
        default,
        deserialize_with = "de_opt_bool",
        skip_serializing_if = "Option::is_none"
    )]
    pub include_retweets: Option<bool>,

    #[serde(
        default,
        deserialize_with = "de_opt_bool",
        skip_serializing_if = "Option::is_none"
    )]
    pub include_replies: Option<bool>,

    #[serde(
        default,
        deserialize_with = "de_opt_bool",
        skip_serializing_if = "Option::is_none"
    )]
    pub filter_verified: Option<bool>,

    #[serde(
        default,
        deserialize_with = "de_opt_parsed",
        skip_serializing_if = "Option::is_none"
    )]
    pub media_type: Option<MediaType>,

    /// ISO language code
    #[serde(
        default,
        deserialize_with = "de_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub language: Option<String>,

    #[serde(
        default,
        deserialize_with = "de_opt_parsed",
        skip_serializing_if = "Option::is_none"
    )]
    pub sort_by: Option<SortBy>,

    #[serde(
        default,
        alias = "min_retweets",
        deserialize_with = "de_opt_u32",
        skip_serializing_if = "Option::is_none"
    )]
    pub min_retweets: Option<u32>,

    #[serde(
        default,
        alias = "min_faves",
        deserialize_with = "de_opt_u32",
        skip_serializing_if = "Option::is_none"
    )]
    pub min_faves: Option<u32>,

    #[serde(
        default,
        alias = "min_replies",
        deserialize_with = "de_opt_u32",
        skip_serializing_if = "Option::is_none"
    )]
    pub min_replies: Option<u32>,

    /// Free text place name
    #[serde(
        default,
        alias = "near_location",
        deserialize_with = "de_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub near_location: Option<String>,

    /// Distance such as `15km`; ignored without `near_location`
    #[serde(
        default,
        alias = "within_distance",
        deserialize_with = "de_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub within_distance: Option<String>,

    /// Continuation token from a previous page
    #[serde(
        default,
        rename = "next_token",
        alias = "cursor",
        deserialize_with = "de_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub cursor: Option<String>,
}

/// Present, non-blank value of an optional field. `null` and blank text
/// are absent.
fn present_value<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Value>, D::Error> {
    Ok(Option::<Value>::deserialize(d)?.filter(|value| match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        _ => true,
    }))
}

fn de_opt_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    match present_value(d)? {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(de::Error::custom(format!("expected a string, got {}", other))),
    }
}

/// Numbers read like `parseInt`: leading digits count, and text without
/// any digits is absent
fn de_opt_u32<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u32>, D::Error> {
    match present_value(d)? {
        None => Ok(None),
        Some(Value::Number(n)) => Ok(n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f.trunc() as u64))
            .and_then(|n| u32::try_from(n).ok())),
        Some(Value::String(s)) => Ok(leading_u32(&s)),
        Some(other) => Err(de::Error::custom(format!("expected a number, got {}", other))),
    }
}

fn leading_u32(text: &str) -> Option<u32> {
    let digits: String = text
        .trim_start()
        .trim_start_matches('+')
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}

fn de_opt_bool<'de, D: Deserializer<'de>>(d: D) -> Result<Option<bool>, D::Error> {
    match present_value(d)? {
        None => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(b)),
        Some(Value::String(s)) => match s.trim().to_lowercase().as_str() {
            "true" | "1" => Ok(Some(true)),
            "false" | "0" => Ok(Some(false)),
            _ => Err(de::Error::custom(format!("expected true or false, got '{}'", s))),
        },
        Some(Value::Number(n)) => match n.as_u64() {
            Some(1) => Ok(Some(true)),
            Some(0) => Ok(Some(false)),
            _ => Err(de::Error::custom(format!("expected true or false, got {}", n))),
        },
        Some(other) => Err(de::Error::custom(format!(
            "expected true or false, got {}",
            other
        ))),
    }
}

/// Enum fields go through their `FromStr`, so `"Top"` and `"top"` agree
fn de_opt_parsed<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr<Err = GrowthfyError>,
{
    match present_value(d)? {
        None => Ok(None),
        Some(Value::String(s)) => s.trim().parse().map(Some).map_err(de::Error::custom),
        Some(other) => Err(de::Error::custom(format!("expected a string, got {}", other))),
    }
}

impl SearchParams {
    /// Create parameters for a plain text query
    pub fn new<S: Into<String>>(query: S) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    /// Copy of these parameters positioned at `cursor`
    pub fn with_cursor<S: Into<String>>(&self, cursor: S) -> Self {
        Self {
            cursor: Some(cursor.into()),
            ..self.clone()
        }
    }

    /// Copy of these parameters without a cursor
    pub fn first_page(&self) -> Self {
        Self {
            cursor: None,
            ..self.clone()
        }
    }

    /// Whether the raw query already uses advanced operators
    pub fn has_advanced_operators(&self) -> bool {
        has_advanced_operators(&self.query)
    }
}

/// Check a raw query for advanced operators
pub fn has_advanced_operators(query: &str) -> bool {
    ADVANCED_OPERATORS.is_match(query)
}

/// Compile search parameters into a single vendor query string.
///
/// Never fails. An empty query with no clauses compiles to an empty string;
/// rejecting that is up to the caller.
pub fn compile(params: &SearchParams) -> String {
    let query = params.query.trim();
    if has_advanced_operators(query) {
        return query.to_string();
    }

    let mut clauses: Vec<String> = Vec::new();

    if let Some(from) = non_empty(&params.from_date) {
        clauses.push(format!("since:{}", from));
    }
    if let Some(to) = non_empty(&params.to_date) {
        clauses.push(format!("until:{}", to));
    }

    if params.include_replies == Some(false) {
        clauses.push("-filter:replies".to_string());
    }

    match params.include_retweets {
        Some(false) => clauses.push("-filter:nativeretweets".to_string()),
        Some(true) => clauses.push("include:nativeretweets".to_string()),
        None => {}
    }

    if params.filter_verified == Some(true) {
        clauses.push("filter:blue_verified".to_string());
    }

    if let Some(media) = params.media_type {
        clauses.push(media.operator().to_string());
    }

    if let Some(language) = non_empty(&params.language) {
        clauses.push(format!("lang:{}", language));
    }

    let thresholds = [
        ("min_retweets", params.min_retweets),
        ("min_faves", params.min_faves),
        ("min_replies", params.min_replies),
    ];
    for (operator, value) in thresholds {
        if let Some(n) = value.filter(|n| *n > 0) {
            clauses.push(format!("{}:{}", operator, n));
        }
    }

    if let Some(place) = non_empty(&params.near_location) {
        clauses.push(format!("near:\"{}\"", place));
        if let Some(distance) = non_empty(&params.within_distance) {
            clauses.push(format!("within:{}", distance));
        }
    }

    std::iter::once(query.to_string())
        .chain(clauses)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

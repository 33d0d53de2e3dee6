//! Growthfy Core Library
//!
//! Domain logic for the Growthfy social-search proxy: the search parameter
//! model and its query compiler, the canonical post and profile types, the
//! normalizer that turns vendor payloads into them, and the paginated search
//! client. Nothing in this crate performs HTTP I/O directly; the search
//! client reaches the network through [`SearchTransport`].

pub mod config;
pub mod error;
pub mod normalize;
pub mod query;
pub mod session;
pub mod types;

// Re-export commonly used types
pub use config::GrowthfyConfig;
pub use error::{ErrorCategory, GrowthfyError, Result};
pub use normalize::{normalize_posts, normalize_profile, normalize_search};
pub use query::{compile, has_advanced_operators, MediaType, SearchParams, SortBy};
pub use session::{
    FetchOutcome, LoadKind, SearchClient, SearchSession, SearchTransport, SessionPhase,
};
pub use types::{
    Author, Entities, MediaItem, MediaKind, Post, PostCounts, Profile, SearchMetadata,
    SearchResponse, TimelineQuery, Trend, TrendLocation, UserLookup,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Get version info as a formatted string
pub fn version_info() -> String {
    format!("{} v{} - {}", NAME, VERSION, DESCRIPTION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let _: Result<()> = Ok(());
        let params = SearchParams::new("rust");
        assert_eq!(compile(&params), "rust");
        let _ = SearchResponse::default();
    }

    #[test]
    fn test_version_info() {
        let info = version_info();
        assert!(info.contains("growthfy-core"));
        assert!(info.contains('v'));
    }
}

//! Paginated search client
//!
//! [`SearchClient`] owns one [`SearchSession`]: the parameters of the
//! current search, the posts accumulated so far and the cursor for the next
//! page. [`SearchClient::search`] starts a new session and
//! [`SearchClient::load_more`] extends it.
//!
//! # State machine
//!
//! ```text
//! Idle ──search──▶ Loading(First) ──ok──▶ Ready ──load_more──▶ Loading(More) ──ok──▶ Ready
//!                        │                                          │
//!                        └────────────err───────▶ Error ◀────err────┘
//! ```
//!
//! A failed fetch keeps the posts already collected. Nothing is retried;
//! the caller decides whether to call `search` or `load_more` again.
//!
//! # Concurrency
//!
//! The client is cheap to clone and every clone shares the same session.
//! The `loading` flag is checked and set under the session lock, so at most
//! one `load_more` runs at a time. Every fetch carries a sequence number;
//! `search` takes a fresh one, and a response whose number is no longer the
//! latest is dropped. A slow first search therefore can never overwrite the
//! results of a newer one.

use crate::query::SearchParams;
use crate::types::{Post, SearchMetadata, SearchResponse};
use crate::{GrowthfyError, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Fetches one page of search results
#[async_trait]
pub trait SearchTransport: Send + Sync {
    /// Fetch the page described by `params`, including its cursor
    async fn fetch(&self, params: &SearchParams) -> Result<SearchResponse>;
}

/// Which fetch is in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadKind {
    First,
    More,
}

/// Lifecycle phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    #[default]
    Idle,
    Loading(LoadKind),
    Ready,
    Error,
}

/// What happened to a `search` or `load_more` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The page was stored in the session
    Applied,
    /// The fetch failed; see [`SearchSession::last_error`]
    Failed,
    /// A newer search started while this fetch was in flight
    Stale,
    /// Nothing was fetched
    Skipped,
}

/// Snapshot of a search session
#[derive(Debug, Clone, Default)]
pub struct SearchSession {
    pub params: Option<SearchParams>,
    pub items: Vec<Post>,
    pub metadata: Option<SearchMetadata>,
    pub cursor: Option<String>,
    pub has_more: bool,
    pub loading: bool,
    pub phase: SessionPhase,
    pub last_error: Option<Arc<GrowthfyError>>,
}

impl SearchSession {
    fn apply_cursor(&mut self, metadata: &SearchMetadata) {
        self.cursor = metadata.next_cursor();
        self.has_more = self.cursor.is_some();
    }

    fn fail(&mut self, error: GrowthfyError) {
        self.phase = SessionPhase::Error;
        self.last_error = Some(Arc::new(error));
    }
}

#[derive(Debug, Default)]
struct SessionState {
    session: SearchSession,
    /// Sequence number of the latest `search`
    generation: u64,
}

/// Client that pages through search results
#[derive(Clone)]
pub struct SearchClient {
    transport: Arc<dyn SearchTransport>,
    state: Arc<Mutex<SessionState>>,
}

impl std::fmt::Debug for SearchClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchClient")
            .field("session", &self.state.lock().session)
            .finish()
    }
}

impl SearchClient {
    /// Create a client with an empty session
    pub fn new(transport: Arc<dyn SearchTransport>) -> Self {
        Self {
            transport,
            state: Arc::new(Mutex::new(SessionState::default())),
        }
    }

    /// Current session state
    pub fn snapshot(&self) -> SearchSession {
        self.state.lock().session.clone()
    }

    pub fn items(&self) -> Vec<Post> {
        self.state.lock().session.items.clone()
    }

    pub fn has_more(&self) -> bool {
        self.state.lock().session.has_more
    }

    pub fn is_loading(&self) -> bool {
        self.state.lock().session.loading
    }

    pub fn last_error(&self) -> Option<Arc<GrowthfyError>> {
        self.state.lock().session.last_error.clone()
    }

    /// Start a new search, replacing the previous results once the first
    /// page arrives.
    ///
    /// Any cursor of the previous session is discarded immediately.
    pub async fn search(&self, params: SearchParams) -> FetchOutcome {
        let params = params.first_page();

        let generation = {
            let mut state = self.state.lock();
            state.generation += 1;
            let previous = std::mem::take(&mut state.session);
            state.session = SearchSession {
                params: Some(params.clone()),
                items: previous.items,
                metadata: previous.metadata,
                loading: true,
                phase: SessionPhase::Loading(LoadKind::First),
                ..Default::default()
            };
            state.generation
        };

        info!("Starting search #{}: '{}'", generation, params.query);
        let result = self.transport.fetch(&params).await;

        let mut state = self.state.lock();
        if state.generation != generation {
            debug!(
                "Dropping response of search #{} (latest is #{})",
                generation, state.generation
            );
            return FetchOutcome::Stale;
        }

        let session = &mut state.session;
        session.loading = false;
        match result {
            Ok(page) => {
                session.apply_cursor(&page.metadata);
                debug!(
                    "Search #{} returned {} posts, has_more={}",
                    generation,
                    page.items.len(),
                    session.has_more
                );
                session.items = page.items;
                session.metadata = Some(page.metadata);
                session.phase = SessionPhase::Ready;
                FetchOutcome::Applied
            }
            Err(e) => {
                warn!("Search #{} failed: {}", generation, e);
                session.fail(e);
                FetchOutcome::Failed
            }
        }
    }

    /// Fetch the next page and append it to the session.
    ///
    /// Does nothing when there is no next page or a fetch is already in
    /// flight.
    pub async fn load_more(&self) -> FetchOutcome {
        let (generation, params) = {
            let mut state = self.state.lock();
            let generation = state.generation;
            let session = &mut state.session;

            if session.loading || !session.has_more {
                return FetchOutcome::Skipped;
            }
            let (Some(params), Some(cursor)) = (&session.params, &session.cursor) else {
                return FetchOutcome::Skipped;
            };
            let params = params.with_cursor(cursor.clone());

            session.loading = true;
            session.phase = SessionPhase::Loading(LoadKind::More);
            session.last_error = None;
            (generation, params)
        };

        debug!(
            "Loading more for search #{} at cursor {:?}",
            generation, params.cursor
        );
        let result = self.transport.fetch(&params).await;

        let mut state = self.state.lock();
        if state.generation != generation {
            debug!("Dropping page of superseded search #{}", generation);
            return FetchOutcome::Stale;
        }

        let session = &mut state.session;
        session.loading = false;
        match result {
            Ok(page) => {
                session.apply_cursor(&page.metadata);
                session.items.extend(page.items);
                session.metadata = Some(page.metadata);
                session.phase = SessionPhase::Ready;
                FetchOutcome::Applied
            }
            Err(e) => {
                warn!("Loading more for search #{} failed: {}", generation, e);
                session.fail(e);
                FetchOutcome::Failed
            }
        }
    }
}

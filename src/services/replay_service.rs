//! Domain service for browsing and searching replays.

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::{InvalidModeError, ReplayId, SearchMode};
use crate::models::Replay;

/// Errors a replay search or lookup can end in.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error(transparent)]
    InvalidMode(#[from] InvalidModeError),

    #[error("The search query must not be empty")]
    EmptyQuery,

    #[error("The page must be zero or greater, got {0}")]
    NegativePage(i64),

    #[error("The profile you are trying to search for is private")]
    PrivateProfile,

    #[error("Replay not found: {0}")]
    NotFound(ReplayId),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl SearchError {
    /// True for errors caused by the request itself rather than the server.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidMode(_) | Self::EmptyQuery | Self::NegativePage(_)
        )
    }
}

impl From<sea_orm::DbErr> for SearchError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for SearchError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// An unvalidated search as it arrives from a caller.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub mode: String,
    pub query: String,
    /// Already authenticated upstream, if present.
    pub viewer: Option<Uuid>,
    pub page: i64,
}

/// One page of search results as seen by one viewer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub replays: Vec<Replay>,
    pub page_count: u64,
    pub current_page: u64,
    pub total_replays: u64,
    pub is_cache: bool,
    pub search_mode: SearchMode,
    pub query: String,
}

/// Domain service trait for replay browsing.
///
/// # Examples
///
/// ```rust,ignore
/// use replay_browser::services::{ReplayService, SearchError, SearchRequest};
/// use std::sync::Arc;
///
/// async fn example(service: Arc<dyn ReplayService>) -> Result<(), SearchError> {
///     let result = service
///         .search(SearchRequest {
///             mode: "map".to_string(),
///             query: "box".to_string(),
///             viewer: None,
///             page: 0,
///         })
///         .await?;
///     println!("{} matches", result.total_replays);
///     Ok(())
/// }
/// ```
#[async_trait::async_trait]
pub trait ReplayService: Send + Sync {
    /// Runs a paginated search and filters the page for the requesting viewer.
    ///
    /// # Errors
    ///
    /// - [`SearchError::InvalidMode`], [`SearchError::EmptyQuery`] and
    ///   [`SearchError::NegativePage`] before any store access
    /// - [`SearchError::PrivateProfile`] when searching a private player by identity
    /// - [`SearchError::Database`] / [`SearchError::Internal`] on store failures
    async fn search(&self, request: SearchRequest) -> Result<SearchResult, SearchError>;

    /// Fetches one replay, filtered for the viewer.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::NotFound`] if the replay does not exist.
    async fn get_replay(&self, id: ReplayId, viewer: Option<Uuid>)
    -> Result<Replay, SearchError>;

    /// Newest replays for the landing page, filtered for the viewer.
    async fn most_recent(&self, viewer: Option<Uuid>) -> Result<Vec<Replay>, SearchError>;

    /// Ids of every stored replay.
    async fn list_replay_ids(&self) -> Result<Vec<ReplayId>, SearchError>;
}

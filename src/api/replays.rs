//! Replay browsing endpoints.

use axum::{
    Json,
    extract::{FromRequestParts, Path, Query, State},
    http::request::Parts,
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use super::{ApiError, ApiResponse, AppState, SearchModeDto};
use crate::domain::{ReplayId, SearchMode};
use crate::models::Replay;
use crate::services::{SearchRequest, SearchResult};

/// Header carrying the already authenticated viewer's account GUID.
pub const ACCOUNT_GUID_HEADER: &str = "accountguid";

/// The viewer named by the request, if any.
#[derive(Debug, Clone, Copy)]
pub struct RequestViewer(pub Option<Uuid>);

impl<S> FromRequestParts<S> for RequestViewer
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(ACCOUNT_GUID_HEADER) else {
            return Ok(Self(None));
        };

        let raw = value
            .to_str()
            .map_err(|_| ApiError::validation("accountGuid header is not valid text"))?;

        Uuid::parse_str(raw.trim())
            .map(|guid| Self(Some(guid)))
            .map_err(|_| ApiError::validation(format!("Invalid accountGuid: {raw}")))
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub mode: String,
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub page: i64,
}

/// `GET /api/search?mode=&query=&page=`
pub async fn search(
    State(state): State<Arc<AppState>>,
    RequestViewer(viewer): RequestViewer,
    Query(params): Query<SearchParams>,
) -> Result<Json<ApiResponse<SearchResult>>, ApiError> {
    let result = state
        .replay_service()
        .search(SearchRequest {
            mode: params.mode,
            query: params.query,
            viewer,
            page: params.page,
        })
        .await?;

    Ok(Json(ApiResponse::success(result)))
}

/// `GET /api/search/modes`
pub async fn list_modes() -> Json<ApiResponse<Vec<SearchModeDto>>> {
    Json(ApiResponse::success(
        SearchMode::ALL.into_iter().map(SearchModeDto::from).collect(),
    ))
}

/// `GET /api/replays`
pub async fn list_replay_ids(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<ReplayId>>>, ApiError> {
    let ids = state.replay_service().list_replay_ids().await?;
    Ok(Json(ApiResponse::success(ids)))
}

/// `GET /api/replays/most-recent`
pub async fn most_recent(
    State(state): State<Arc<AppState>>,
    RequestViewer(viewer): RequestViewer,
) -> Result<Json<ApiResponse<Vec<Replay>>>, ApiError> {
    let replays = state.replay_service().most_recent(viewer).await?;
    Ok(Json(ApiResponse::success(replays)))
}

/// `GET /api/replay/{id}`
pub async fn get_replay(
    State(state): State<Arc<AppState>>,
    RequestViewer(viewer): RequestViewer,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Replay>>, ApiError> {
    let replay = state
        .replay_service()
        .get_replay(ReplayId::new(id), viewer)
        .await?;

    Ok(Json(ApiResponse::success(replay)))
}

//! `SeaORM` implementation of the `ReplayService` trait.

use async_trait::async_trait;
use std::time::{Duration, Instant};
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::SearchConfig;
use crate::db::Store;
use crate::domain::{Action, ReplayId, SearchMode, Viewer, requester_kind};
use crate::models::Replay;
use crate::services::history::HistoryRecorder;
use crate::services::paginator;
use crate::services::privacy::{PlayerAccounts, PrivacyFilter};
use crate::services::replay_service::{ReplayService, SearchError, SearchRequest, SearchResult};
use crate::services::result_cache::{ResultCache, SearchCacheKey};

pub struct SeaOrmReplayService {
    store: Store,
    settings: SearchConfig,
    results: ResultCache<Replay>,
    history: HistoryRecorder,
}

impl SeaOrmReplayService {
    #[must_use]
    pub fn new(store: Store, settings: SearchConfig) -> Self {
        Self {
            results: ResultCache::new(Duration::from_secs(settings.cache_ttl_seconds)),
            history: HistoryRecorder::new(store.clone()),
            store,
            settings,
        }
    }

    /// An unknown GUID is an ordinary, non-admin viewer.
    async fn resolve_viewer(&self, guid: Option<Uuid>) -> Result<Viewer, SearchError> {
        let Some(guid) = guid else {
            return Ok(Viewer::anonymous());
        };

        let is_admin = self
            .store
            .get_account(guid)
            .await?
            .is_some_and(|account| account.is_admin);

        Ok(Viewer {
            guid: Some(guid),
            is_admin,
        })
    }

    /// Refuses identity searches that target a private account, unless the
    /// viewer owns that account or is an admin.
    async fn ensure_target_visible(
        &self,
        mode: SearchMode,
        query: &str,
        viewer: &Viewer,
    ) -> Result<(), SearchError> {
        let target = match mode {
            SearchMode::Guid => self.store.find_account_by_guid_fragment(query).await?,
            SearchMode::PlayerOocName => {
                self.store.find_account_by_username_fragment(query).await?
            }
            _ => return Ok(()),
        };

        match target {
            Some(account) if account.redact_information && !viewer.can_see(&account.guid) => {
                debug!(mode = %mode, account_id = account.id, "Identity search hit a private profile");
                Err(SearchError::PrivateProfile)
            }
            _ => Ok(()),
        }
    }

    async fn filter_for(
        &self,
        replays: Vec<Replay>,
        viewer: &Viewer,
    ) -> Result<Vec<Replay>, SearchError> {
        let guids = PlayerAccounts::guids_of(&replays);
        let accounts = PlayerAccounts::new(self.store.get_accounts_by_guids(&guids).await?);

        Ok(PrivacyFilter::apply_all(replays, viewer, &accounts))
    }
}

#[async_trait]
impl ReplayService for SeaOrmReplayService {
    async fn search(&self, request: SearchRequest) -> Result<SearchResult, SearchError> {
        let started = Instant::now();

        let mode = SearchMode::resolve(&request.mode)?;
        let query = request.query.trim().to_string();
        if query.is_empty() {
            return Err(SearchError::EmptyQuery);
        }
        let page = u64::try_from(request.page).map_err(|_| SearchError::NegativePage(request.page))?;

        let viewer = self.resolve_viewer(request.viewer).await?;

        self.history
            .record(
                request.viewer,
                Action::SearchPerformed,
                Some(format!("Mode: {mode}, Query: {query}")),
            )
            .await;

        if mode.is_identity_keyed() {
            self.ensure_target_visible(mode, &query, &viewer).await?;
        }

        let page_size = self.settings.page_size;
        let key = SearchCacheKey::new(mode, &query, page_size);
        let store = &self.store;
        let limit = self.settings.search_limit;
        let search_query = query.clone();

        let lookup = self
            .results
            .get_or_compute(
                key,
                usize::try_from(page).unwrap_or(usize::MAX),
                move || async move {
                    let compute_started = Instant::now();
                    let matches = store.search_replays(mode, &search_query, limit).await?;

                    metrics::histogram!("replay_search_compute_seconds", "mode" => mode.name())
                        .record(compute_started.elapsed().as_secs_f64());
                    info!(
                        event = "replay_search_computed",
                        mode = %mode,
                        query = %search_query,
                        total = matches.total,
                        loaded = matches.replays.len(),
                        duration_ms = u64::try_from(compute_started.elapsed().as_millis())
                            .unwrap_or(u64::MAX),
                        "Computed replay search"
                    );

                    Ok::<_, SearchError>((matches.replays, matches.total))
                },
            )
            .await?;

        let replays = self.filter_for(lookup.items, &viewer).await?;
        let page_count = paginator::page_count(lookup.total_count, page_size as u64);

        let cache_label = if lookup.was_cache_hit { "hit" } else { "miss" };
        let elapsed = started.elapsed();
        metrics::counter!("replay_searches_total", "mode" => mode.name(), "cache" => cache_label)
            .increment(1);
        metrics::histogram!("replay_search_duration_seconds", "mode" => mode.name())
            .record(elapsed.as_secs_f64());

        info!(
            event = "replay_search_finished",
            mode = %mode,
            query = %query,
            page,
            page_count,
            total = lookup.total_count,
            returned = replays.len(),
            cache_hit = lookup.was_cache_hit,
            viewer = requester_kind(request.viewer),
            duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            "Replay search finished"
        );

        Ok(SearchResult {
            replays,
            page_count,
            current_page: page,
            total_replays: lookup.total_count,
            is_cache: lookup.was_cache_hit,
            search_mode: mode,
            query,
        })
    }

    async fn get_replay(
        &self,
        id: ReplayId,
        viewer: Option<Uuid>,
    ) -> Result<Replay, SearchError> {
        let viewer = self.resolve_viewer(viewer).await?;
        let replay = self
            .store
            .get_replay(id)
            .await?
            .ok_or(SearchError::NotFound(id))?;

        let mut filtered = self.filter_for(vec![replay], &viewer).await?;
        filtered.pop().ok_or(SearchError::NotFound(id))
    }

    async fn most_recent(&self, viewer: Option<Uuid>) -> Result<Vec<Replay>, SearchError> {
        let resolved = self.resolve_viewer(viewer).await?;
        let replays = self
            .store
            .most_recent_replays(self.settings.most_recent_limit)
            .await?;

        self.history.record(viewer, Action::MainPageViewed, None).await;

        self.filter_for(replays, &resolved).await
    }

    async fn list_replay_ids(&self) -> Result<Vec<ReplayId>, SearchError> {
        Ok(self.store.list_replay_ids().await?)
    }
}

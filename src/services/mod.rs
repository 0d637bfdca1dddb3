pub mod history;
pub use history::HistoryRecorder;

pub mod paginator;

pub mod privacy;
pub use privacy::{PlayerAccounts, PrivacyFilter};

pub mod result_cache;
pub use result_cache::{PageLookup, ResultCache, SearchCacheKey};

pub mod replay_service;
pub mod replay_service_impl;
pub use replay_service::{ReplayService, SearchError, SearchRequest, SearchResult};
pub use replay_service_impl::SeaOrmReplayService;

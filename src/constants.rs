pub mod search {
    use std::time::Duration;

    /// Replays per result page.
    pub const PAGE_SIZE: usize = 32;

    /// Maximum replays loaded for one search, before pagination.
    pub const SEARCH_LIMIT: u64 = 500;

    pub const CACHE_TTL: Duration = Duration::from_secs(5 * 60);

    /// Replays shown on the landing page.
    pub const MOST_RECENT_LIMIT: u64 = 32;
}

pub mod history {

    pub const DEFAULT_LIST_LIMIT: u64 = 20;
}

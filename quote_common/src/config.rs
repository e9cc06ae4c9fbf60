//! Shared constants and the sync configuration used by the library and the client.
use std::time::Duration;

use crate::merge::MergePolicy;

/// Durable storage key holding the serialized quote sequence.
pub const QUOTES_KEY: &str = "quotes";
/// Durable storage key holding the last selected category filter.
pub const FILTER_KEY: &str = "selectedCategoryFilter";
/// Session storage key holding the last randomly picked quote.
pub const LAST_VIEWED_KEY: &str = "lastViewedQuote";

/// Collection endpoint used when no other endpoint is configured.
pub const DEFAULT_ENDPOINT: &str = "https://jsonplaceholder.typicode.com/posts";
/// Number of remote records projected into quotes on every fetch.
pub const REMOTE_QUOTE_LIMIT: usize = 3;
/// Category assigned to every quote that comes from the remote source.
pub const SERVER_CATEGORY: &str = "Server";
/// File name used by export when no output path is given.
pub const EXPORT_FILE_NAME: &str = "quotes.json";

/// Seconds between two scheduled syncs.
pub const SYNC_INTERVAL_SECS: u64 = 30;
/// Seconds a notice stays visible before it clears itself.
pub const NOTICE_DURATION_SECS: u64 = 5;

/// Tunables for the reconciler and its scheduler.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Delay between two timer-driven syncs.
    pub interval: Duration,
    /// How long a notice stays visible.
    pub notice_duration: Duration,
    /// Conflict resolution rule applied to every fetched snapshot.
    pub policy: MergePolicy,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(SYNC_INTERVAL_SECS),
            notice_duration: Duration::from_secs(NOTICE_DURATION_SECS),
            policy: MergePolicy::default(),
        }
    }
}

//! Reconciliation of the local quote store with the remote source.
//!
//! `Reconciler::sync` walks a fixed state machine:
//!
//! ```text
//! Idle -> Fetching -> Merging -> Persisting -> Notifying -> Idle
//!                  \-> FetchFailed -> Idle
//! ```
//!
//! A sync that finds another one in flight returns [`SyncOutcome::Skipped`] without
//! touching anything. Failed syncs are not retried; the next timer tick or manual
//! trigger is the retry.
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use log::{debug, error, info, warn};

use crate::merge::{MergePolicy, merge};
use crate::notify::Notifier;
use crate::quote::Quote;
use crate::remote::{RemoteSource, project};
use crate::result::Result;
use crate::store::QuoteStore;

/// Notice shown after the remote snapshot changed the local sequence.
pub const SYNCED_MESSAGE: &str =
    "Data synced with server. Server data took precedence over local changes.";
/// Notice shown when the remote snapshot changed nothing.
pub const UP_TO_DATE_MESSAGE: &str = "Data is already up-to-date with the server.";

/// Phase of the reconciler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// Waiting for the next trigger.
    Idle,
    /// Waiting for the remote snapshot.
    Fetching,
    /// Applying the merge policy.
    Merging,
    /// Writing the merged sequence.
    Persisting,
    /// Reporting the result.
    Notifying,
    /// The fetch failed; the store was not touched.
    FetchFailed,
}

/// What a single `sync` call did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The local sequence was changed by the remote snapshot.
    Updated {
        /// Quotes stored after the merge.
        total: usize,
    },
    /// The remote snapshot matched the local sequence.
    UpToDate,
    /// Fetching, merging or persisting failed; carries the reason.
    Failed(String),
    /// Another sync was already running.
    Skipped,
}

/// Fetches remote snapshots and merges them into the shared store.
pub struct Reconciler {
    store: Arc<Mutex<QuoteStore>>,
    remote: Arc<dyn RemoteSource>,
    notifier: Arc<dyn Notifier>,
    policy: MergePolicy,
    in_flight: AtomicBool,
    state: Mutex<SyncState>,
}

/// Clears the in-flight flag when a sync ends, however it ends.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Reconciler {
    /// Creates a reconciler over `store` using `policy` for every merge.
    pub fn new(
        store: Arc<Mutex<QuoteStore>>,
        remote: Arc<dyn RemoteSource>,
        notifier: Arc<dyn Notifier>,
        policy: MergePolicy,
    ) -> Self {
        Self {
            store,
            remote,
            notifier,
            policy,
            in_flight: AtomicBool::new(false),
            state: Mutex::new(SyncState::Idle),
        }
    }

    /// Merge policy in use.
    pub fn policy(&self) -> MergePolicy {
        self.policy
    }

    /// Current phase.
    pub fn state(&self) -> SyncState {
        self.state.lock().map(|s| *s).unwrap_or(SyncState::Idle)
    }

    /// Returns `true` while a sync is running.
    pub fn is_syncing(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Shows `message` through the configured notifier.
    pub fn notify(&self, message: &str) {
        self.notifier.notify(message);
    }

    /// Fetches the remote collection and projects it into quotes.
    pub fn fetch_remote(&self) -> Result<Vec<Quote>> {
        let posts = self.remote.fetch()?;
        debug!("Fetched {} remote records", posts.len());
        Ok(project(&posts))
    }

    /// Runs fetch, merge, persist and notify once.
    pub fn sync(&self) -> SyncOutcome {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Sync already in flight; skipping");
            return SyncOutcome::Skipped;
        }
        let _guard = InFlight(&self.in_flight);

        self.set_state(SyncState::Fetching);
        let remote = match self.fetch_remote() {
            Ok(remote) => remote,
            Err(e) => {
                self.set_state(SyncState::FetchFailed);
                error!("Error syncing with server: {}", e);
                self.notify(&format!("Error syncing with server: {}", e));
                self.set_state(SyncState::Idle);
                return SyncOutcome::Failed(e.to_string());
            }
        };

        let outcome = match self.apply(remote) {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("Could not store synced quotes: {}", e);
                SyncOutcome::Failed(e.to_string())
            }
        };

        self.set_state(SyncState::Notifying);
        match &outcome {
            SyncOutcome::Updated { total } => {
                info!("Synced with server, {} quotes stored", total);
                self.notify(SYNCED_MESSAGE);
            }
            SyncOutcome::UpToDate => {
                info!("Local quotes already match the server");
                self.notify(UP_TO_DATE_MESSAGE);
            }
            SyncOutcome::Failed(reason) => {
                self.notify(&format!("Error syncing with server: {}", reason));
            }
            SyncOutcome::Skipped => {}
        }
        self.set_state(SyncState::Idle);
        outcome
    }

    fn apply(&self, remote: Vec<Quote>) -> Result<SyncOutcome> {
        let mut store = self.store.lock()?;

        self.set_state(SyncState::Merging);
        let merged = merge(store.quotes(), remote, self.policy);
        if !merged.changed {
            return Ok(SyncOutcome::UpToDate);
        }

        self.set_state(SyncState::Persisting);
        store.replace_all(merged.quotes)?;
        Ok(SyncOutcome::Updated { total: store.len() })
    }

    /// Posts `quote` to the remote source on a background thread.
    ///
    /// Failures are logged and dropped. The handle can be joined by callers that are
    /// about to exit.
    pub fn publish(&self, quote: Quote) -> JoinHandle<()> {
        let remote = Arc::clone(&self.remote);
        thread::spawn(move || match remote.post(&quote) {
            Ok(()) => debug!("Published quote to server"),
            Err(e) => warn!("Failed to publish quote: {}", e),
        })
    }

    fn set_state(&self, next: SyncState) {
        if let Ok(mut state) = self.state.lock() {
            debug!("Sync state {:?} -> {:?}", *state, next);
            *state = next;
        }
    }
}

//! Explicit wiring of the store, the reconciler and the session store.
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::JoinHandle;

use crate::config::SyncConfig;
use crate::notify::Notifier;
use crate::quote::{CategoryFilter, Quote, pick_random};
use crate::remote::RemoteSource;
use crate::result::Result;
use crate::scheduler::{SyncHandle, SyncScheduler};
use crate::storage::KeyValueStore;
use crate::store::{QuoteStore, last_viewed, remember_last_viewed};
use crate::sync::Reconciler;

/// A fully wired quote book. Each call to [`QuoteApp::init`] builds fresh state.
pub struct QuoteApp {
    store: Arc<Mutex<QuoteStore>>,
    reconciler: Arc<Reconciler>,
    session: Arc<dyn KeyValueStore>,
    config: SyncConfig,
}

impl QuoteApp {
    /// Loads the store from `durable` and builds the reconciler around it.
    pub fn init(
        durable: Arc<dyn KeyValueStore>,
        session: Arc<dyn KeyValueStore>,
        remote: Arc<dyn RemoteSource>,
        notifier: Arc<dyn Notifier>,
        config: SyncConfig,
    ) -> Result<Self> {
        let store = Arc::new(Mutex::new(QuoteStore::load(durable)?));
        let reconciler = Arc::new(Reconciler::new(
            Arc::clone(&store),
            remote,
            notifier,
            config.policy,
        ));
        Ok(Self {
            store,
            reconciler,
            session,
            config,
        })
    }

    /// Shared store.
    pub fn store(&self) -> &Arc<Mutex<QuoteStore>> {
        &self.store
    }

    /// Locks the store for direct use.
    pub fn lock_store(&self) -> Result<MutexGuard<'_, QuoteStore>> {
        Ok(self.store.lock()?)
    }

    /// Shared reconciler.
    pub fn reconciler(&self) -> &Arc<Reconciler> {
        &self.reconciler
    }

    /// Starts the periodic sync with the configured interval.
    pub fn start_sync(&self) -> SyncHandle {
        SyncScheduler::start(Arc::clone(&self.reconciler), self.config.interval)
    }

    /// Adds a quote locally and, when `publish` is set, posts it to the remote in the
    /// background. The publish thread is returned so short-lived callers can join it.
    pub fn add_quote(
        &self,
        text: &str,
        category: &str,
        publish: bool,
    ) -> Result<(Quote, Option<JoinHandle<()>>)> {
        let quote = self.lock_store()?.add(text, category)?.clone();
        let handle = publish.then(|| self.reconciler.publish(quote.clone()));
        Ok((quote, handle))
    }

    /// Picks a random quote passing `filter` and records it in the session store.
    pub fn random_quote(&self, filter: &CategoryFilter) -> Result<Quote> {
        let store = self.lock_store()?;
        let candidates = store.filtered_view(filter);
        let quote = pick_random(&candidates)?.clone();
        remember_last_viewed(self.session.as_ref(), &quote)?;
        Ok(quote)
    }

    /// Quote picked last in this session.
    pub fn last_viewed(&self) -> Option<Quote> {
        last_viewed(self.session.as_ref())
    }
}

//! Periodic sync driver.
//!
//! `SyncScheduler::start` spawns one worker thread that syncs immediately and then
//! multiplexes three channels with crossbeam `select!`:
//! - a `tick` timer firing every `interval`,
//! - manual triggers sent through [`SyncHandle::trigger`],
//! - the shutdown signal.
//!
//! Manual triggers reuse the same worker, so there is only ever one timer per
//! scheduler. Dropping the handle stops the timer and joins the worker.
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, select, tick, unbounded};
use log::{debug, info, warn};

use crate::sync::{Reconciler, SyncOutcome};

/// Entry point for starting the periodic sync.
pub struct SyncScheduler;

/// Control handle of a running scheduler.
pub struct SyncHandle {
    trigger_tx: Sender<()>,
    stop_tx: Sender<()>,
    outcomes_rx: Receiver<SyncOutcome>,
    worker: Option<JoinHandle<()>>,
}

impl SyncScheduler {
    /// Starts the worker; the first sync runs right away.
    pub fn start(reconciler: Arc<Reconciler>, interval: Duration) -> SyncHandle {
        let (trigger_tx, trigger_rx) = unbounded::<()>();
        let (stop_tx, stop_rx) = unbounded::<()>();
        let (outcomes_tx, outcomes_rx) = unbounded::<SyncOutcome>();

        let worker = thread::spawn(move || {
            info!("Sync scheduler started, interval {:?}", interval);
            let ticker = tick(interval);
            run_once(&reconciler, &outcomes_tx);

            loop {
                select! {
                    recv(stop_rx) -> _ => break,
                    recv(ticker) -> _ => run_once(&reconciler, &outcomes_tx),
                    recv(trigger_rx) -> msg => match msg {
                        Ok(()) => {
                            debug!("Manual sync requested");
                            run_once(&reconciler, &outcomes_tx);
                        }
                        Err(_) => break,
                    },
                }
            }
            info!("Sync scheduler stopped");
        });

        SyncHandle {
            trigger_tx,
            stop_tx,
            outcomes_rx,
            worker: Some(worker),
        }
    }
}

fn run_once(reconciler: &Reconciler, outcomes_tx: &Sender<SyncOutcome>) {
    let outcome = reconciler.sync();
    debug!("Sync finished: {:?}", outcome);
    // Nobody listening is fine.
    let _ = outcomes_tx.send(outcome);
}

impl SyncHandle {
    /// Asks the worker to sync now, outside the timer.
    pub fn trigger(&self) {
        if self.trigger_tx.send(()).is_err() {
            warn!("Sync scheduler is not running; manual trigger ignored");
        }
    }

    /// Outcomes of every sync the worker ran, in order.
    pub fn outcomes(&self) -> &Receiver<SyncOutcome> {
        &self.outcomes_rx
    }

    /// Stops the timer and waits for the worker to exit.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        let _ = self.stop_tx.send(());
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("Sync worker panicked");
            }
        }
    }
}

impl Drop for SyncHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::MergePolicy;
    use crate::notify::NotificationBoard;
    use crate::quote::Quote;
    use crate::remote::{RemoteSource, ServerPost};
    use crate::result::Result;
    use crate::storage::MemoryStorage;
    use crate::store::QuoteStore;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingRemote(AtomicUsize);

    impl RemoteSource for CountingRemote {
        fn fetch(&self) -> Result<Vec<ServerPost>> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(vec![ServerPost {
                id: 1,
                title: "remote".to_string(),
            }])
        }

        fn post(&self, _quote: &Quote) -> Result<()> {
            Ok(())
        }
    }

    fn reconciler(remote: Arc<CountingRemote>) -> Arc<Reconciler> {
        let store = QuoteStore::load(Arc::new(MemoryStorage::new())).unwrap();
        Arc::new(Reconciler::new(
            Arc::new(Mutex::new(store)),
            remote,
            Arc::new(NotificationBoard::new(Duration::from_millis(10))),
            MergePolicy::Replace,
        ))
    }

    #[test]
    fn first_sync_runs_immediately() {
        let remote = Arc::new(CountingRemote::default());
        let handle = SyncScheduler::start(reconciler(remote.clone()), Duration::from_secs(3600));

        let outcome = handle.outcomes().recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(outcome, SyncOutcome::Updated { total: 1 });
        handle.shutdown();
        assert_eq!(remote.0.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn manual_trigger_reuses_worker() {
        let remote = Arc::new(CountingRemote::default());
        let handle = SyncScheduler::start(reconciler(remote.clone()), Duration::from_secs(3600));
        handle.outcomes().recv_timeout(Duration::from_secs(5)).unwrap();

        handle.trigger();
        let outcome = handle.outcomes().recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(outcome, SyncOutcome::UpToDate);
        drop(handle);
        assert_eq!(remote.0.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn timer_keeps_syncing_until_shutdown() {
        let remote = Arc::new(CountingRemote::default());
        let handle = SyncScheduler::start(reconciler(remote.clone()), Duration::from_millis(20));
        for _ in 0..3 {
            handle.outcomes().recv_timeout(Duration::from_secs(5)).unwrap();
        }
        handle.shutdown();

        let after_shutdown = remote.0.load(Ordering::SeqCst);
        thread::sleep(Duration::from_millis(100));
        assert_eq!(remote.0.load(Ordering::SeqCst), after_shutdown);
        assert!(after_shutdown >= 3);
    }
}

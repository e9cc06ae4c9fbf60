use quote_common::config::{QUOTES_KEY, SyncConfig};
use quote_common::merge::MergePolicy;
use quote_common::notify::NotificationBoard;
use quote_common::remote::{RemoteSource, ServerPost};
use quote_common::storage::{KeyValueStore, MemoryStorage};
use quote_common::sync::{SyncOutcome, SyncState, UP_TO_DATE_MESSAGE};
use quote_common::{CategoryFilter, Quote, QuoteApp, QuoteError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Default)]
struct FakeRemote {
    posts: Vec<ServerPost>,
    posted: Mutex<Vec<Quote>>,
    fetches: AtomicUsize,
}

impl RemoteSource for FakeRemote {
    fn fetch(&self) -> quote_common::Result<Vec<ServerPost>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.posts.clone())
    }

    fn post(&self, quote: &Quote) -> quote_common::Result<()> {
        self.posted.lock().unwrap().push(quote.clone());
        Ok(())
    }
}

fn server_posts() -> Vec<ServerPost> {
    vec![
        ServerPost {
            id: 1,
            title: "sunt aut facere".to_string(),
        },
        ServerPost {
            id: 2,
            title: "qui est esse".to_string(),
        },
    ]
}

struct Fixture {
    app: QuoteApp,
    durable: Arc<MemoryStorage>,
    remote: Arc<FakeRemote>,
    board: Arc<NotificationBoard>,
}

fn fixture(policy: MergePolicy) -> Fixture {
    let durable = Arc::new(MemoryStorage::new());
    let remote = Arc::new(FakeRemote {
        posts: server_posts(),
        ..FakeRemote::default()
    });
    let board = Arc::new(NotificationBoard::new(Duration::from_secs(5)));
    let config = SyncConfig {
        interval: Duration::from_secs(3600),
        policy,
        ..SyncConfig::default()
    };
    let app = QuoteApp::init(
        durable.clone(),
        Arc::new(MemoryStorage::new()),
        remote.clone(),
        board.clone(),
        config,
    )
    .unwrap();
    Fixture {
        app,
        durable,
        remote,
        board,
    }
}

fn durable_quotes(durable: &MemoryStorage) -> Vec<Quote> {
    serde_json::from_str(&durable.get(QUOTES_KEY).unwrap().unwrap()).unwrap()
}

#[test]
fn replace_policy_overwrites_durable_storage() {
    let f = fixture(MergePolicy::Replace);
    assert_eq!(f.app.reconciler().sync(), SyncOutcome::Updated { total: 2 });

    let stored = durable_quotes(&f.durable);
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[0], Quote::new("sunt aut facere", "Server").with_id(1u64));
    assert_eq!(f.app.reconciler().state(), SyncState::Idle);
}

#[test]
fn union_policy_keeps_local_quotes_first() {
    let f = fixture(MergePolicy::Union);
    f.app.add_quote("Hello", "Wisdom", false).unwrap();
    f.app.reconciler().sync();

    let stored = durable_quotes(&f.durable);
    assert_eq!(stored.len(), 6);
    assert_eq!(stored[3], Quote::new("Hello", "Wisdom"));
    assert_eq!(stored[5].text, "qui est esse");

    assert_eq!(f.app.reconciler().sync(), SyncOutcome::UpToDate);
    assert_eq!(
        f.board.current().map(|n| n.message).as_deref(),
        Some(UP_TO_DATE_MESSAGE)
    );
}

#[test]
fn added_quote_is_published() {
    let f = fixture(MergePolicy::Replace);
    let (quote, publish) = f.app.add_quote(" Hello ", " Wisdom ", true).unwrap();
    publish.unwrap().join().unwrap();

    assert_eq!(quote, Quote::new("Hello", "Wisdom"));
    assert_eq!(f.remote.posted.lock().unwrap().as_slice(), [quote]);
}

#[test]
fn invalid_add_is_not_published() {
    let f = fixture(MergePolicy::Replace);
    let err = f.app.add_quote("", "Wisdom", true).unwrap_err();
    assert!(matches!(err, QuoteError::Validation(_)));
    assert!(f.remote.posted.lock().unwrap().is_empty());
    assert_eq!(f.app.lock_store().unwrap().len(), 3);
}

#[test]
fn random_pick_is_remembered_for_the_session() {
    let f = fixture(MergePolicy::Replace);
    assert_eq!(f.app.last_viewed(), None);

    let philosophy = CategoryFilter::Category("Philosophy".to_string());
    let quote = f.app.random_quote(&philosophy).unwrap();
    assert_eq!(quote.text, "I think, therefore I am.");
    assert_eq!(f.app.last_viewed(), Some(quote));

    let missing = CategoryFilter::Category("Nope".to_string());
    assert!(matches!(
        f.app.random_quote(&missing),
        Err(QuoteError::NoQuotes)
    ));
}

#[test]
fn scheduled_sync_runs_on_start() {
    let f = fixture(MergePolicy::Replace);
    let handle = f.app.start_sync();
    let outcome = handle
        .outcomes()
        .recv_timeout(Duration::from_secs(5))
        .unwrap();
    handle.shutdown();

    assert_eq!(outcome, SyncOutcome::Updated { total: 2 });
    assert_eq!(f.remote.fetches.load(Ordering::SeqCst), 1);
}

#[test]
fn fresh_init_does_not_share_state() {
    let first = fixture(MergePolicy::Replace);
    first.app.add_quote("Only here", "Local", false).unwrap();
    let second = fixture(MergePolicy::Replace);
    assert_eq!(first.app.lock_store().unwrap().len(), 4);
    assert_eq!(second.app.lock_store().unwrap().len(), 3);
}

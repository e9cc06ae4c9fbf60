//! Quote Client — a command-line quote book. Quotes live in a data directory, can be
//! listed and filtered by category, added, picked at random, exported and imported as
//! JSON, and reconciled with a remote collection endpoint.
//!
//! Usage example (CLI):
//! ```bash
//! quote_client --data-dir ./quote-data add "Stay hungry, stay foolish." Motivation
//! quote_client list --category Motivation
//! quote_client --policy union watch
//! ```
//!
//! `watch` runs a sync right away and then every `--interval-secs` seconds, while
//! reading `sync`, `list`, `random`, `categories`, `add <text> | <category>` and
//! `quit` from stdin. Ctrl+C stops it.
#![warn(missing_docs)]
mod args;
mod http_remote;
mod render;

use crate::args::{Args, Command, normalize_path};
use crate::http_remote::HttpRemote;
use clap::Parser;
use crossbeam_channel::{Receiver, select, unbounded};
use log::{error, info, warn};
use quote_common::config::{NOTICE_DURATION_SECS, SyncConfig};
use quote_common::notify::NotificationBoard;
use quote_common::scheduler::SyncHandle;
use quote_common::storage::{FileStorage, MemoryStorage};
use quote_common::sync::SyncOutcome;
use quote_common::{CategoryFilter, QuoteApp, QuoteError, Result};
use std::fs;
use std::io::BufRead;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn main() -> Result<(), QuoteError> {
    init_logger();
    let args = Args::parse();

    let durable = Arc::new(FileStorage::open(normalize_path(&args.data_dir))?);
    let session = Arc::new(MemoryStorage::new());
    let remote = Arc::new(HttpRemote::new(&args.endpoint)?);
    let board = Arc::new(render::ConsoleNotifier::new(NotificationBoard::new(
        Duration::from_secs(NOTICE_DURATION_SECS),
    )));
    let config = SyncConfig {
        interval: Duration::from_secs(args.interval_secs.max(1)),
        policy: args.policy,
        ..SyncConfig::default()
    };
    info!(
        "Using data directory {} and endpoint {}",
        durable.dir().display(),
        args.endpoint
    );

    let app = QuoteApp::init(durable, session, remote, board, config)?;
    let publish = !args.offline;

    match args.command {
        Command::List { category } => {
            let filter = resolve_filter(&app, category)?;
            let store = app.lock_store()?;
            render::print_quotes(&store.filtered_view(&filter));
        }
        Command::Categories => {
            let store = app.lock_store()?;
            render::print_categories(&store.categories(), &store.selected_filter());
        }
        Command::Random { category } => {
            let filter = resolve_filter(&app, category)?;
            report(app.random_quote(&filter).map(|q| render::print_quote(&q)));
        }
        Command::Add { text, category } => match app.add_quote(&text, &category, publish) {
            Ok((quote, handle)) => {
                println!("Added {}", quote);
                if let Some(handle) = handle {
                    let _ = handle.join();
                }
            }
            Err(e) => report::<()>(Err(e)),
        },
        Command::Export { out } => {
            let path = normalize_path(&out);
            let json = app.lock_store()?.export_json()?;
            fs::write(&path, json)?;
            println!("Exported quotes to {}", path.display());
        }
        Command::Import { path } => {
            let path = normalize_path(&path);
            let content = fs::read_to_string(&path)?;
            let imported = app.lock_store()?.import_json(&content);
            report(imported.map(|count| println!("Imported {} quotes successfully!", count)));
        }
        Command::Sync => {
            let outcome = app.reconciler().sync();
            if let SyncOutcome::Failed(reason) = outcome {
                warn!("Sync failed: {}", reason);
            }
        }
        Command::Watch => watch(&app, publish)?,
    }
    Ok(())
}

/// Uses the explicit `--category` when given (and remembers it), otherwise the saved one.
fn resolve_filter(app: &QuoteApp, category: Option<String>) -> Result<CategoryFilter> {
    let store = app.lock_store()?;
    match category {
        Some(raw) => {
            let filter = CategoryFilter::from_name(&raw);
            store.select_filter(&filter)?;
            Ok(filter)
        }
        None => Ok(store.selected_filter()),
    }
}

/// Prints user-facing errors instead of failing the process.
fn report<T>(result: Result<T>) {
    if let Err(e) = result {
        match e {
            QuoteError::Validation(_) | QuoteError::ImportFormat(_) | QuoteError::NoQuotes => {
                eprintln!("{}", e)
            }
            other => error!("{}", other),
        }
    }
}

fn watch(app: &QuoteApp, publish: bool) -> Result<()> {
    let (shutdown_tx, shutdown_rx) = unbounded::<()>();
    ctrlc::set_handler(move || {
        info!("Ctrl+C received. Shutting down client...");
        let _ = shutdown_tx.send(());
    })
    .map_err(|e| QuoteError::Io(std::io::Error::other(e.to_string())))?;

    let handle = app.start_sync();
    let lines = spawn_stdin_reader();
    info!("Client is running. Type `quit` or press Ctrl+C to exit.");

    loop {
        select! {
            recv(shutdown_rx) -> _ => break,
            recv(lines) -> line => match line {
                Ok(line) => {
                    if !handle_line(app, &handle, line.trim(), publish) {
                        break;
                    }
                }
                Err(_) => break,
            },
        }
    }

    handle.shutdown();
    Ok(())
}

fn spawn_stdin_reader() -> Receiver<String> {
    let (tx, rx) = unbounded::<String>();
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    error!("Failed to read stdin: {}", e);
                    break;
                }
            }
        }
    });
    rx
}

/// Runs one interactive command. Returns `false` when the loop should stop.
fn handle_line(
    app: &QuoteApp,
    handle: &SyncHandle,
    line: &str,
    publish: bool,
) -> bool {
    let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
    match command {
        "" => {}
        "quit" | "exit" => return false,
        "sync" => handle.trigger(),
        "list" => report(resolve_filter(app, non_empty(rest)).and_then(|filter| {
            let store = app.lock_store()?;
            render::print_quotes(&store.filtered_view(&filter));
            Ok(())
        })),
        "random" => report(
            resolve_filter(app, non_empty(rest))
                .and_then(|filter| app.random_quote(&filter))
                .map(|q| render::print_quote(&q)),
        ),
        "categories" => report(app.lock_store().map(|store| {
            render::print_categories(&store.categories(), &store.selected_filter())
        })),
        "add" => {
            let (text, category) = rest.split_once('|').unwrap_or((rest, ""));
            report(
                app.add_quote(text, category, publish)
                    .map(|(quote, _)| println!("Added {}", quote)),
            );
        }
        other => warn!("Unknown command `{}`", other),
    }
    true
}

fn non_empty(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}

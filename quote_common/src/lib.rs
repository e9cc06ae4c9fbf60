//!
//! Quote book core shared by the command-line client.
//!
//! This crate aggregates:
//! - `error` — unified error type `QuoteError` used across the workspace.
//! - `result` — handy `Result<T, QuoteError>` alias.
//! - `config` — storage keys, endpoint and timing constants, `SyncConfig`.
//! - `quote` — the `Quote` record, category filters and random picks.
//! - `storage` — key-value store abstraction with memory and file backends.
//! - `store` — `QuoteStore`, the quote sequence mirrored to durable storage.
//! - `remote` — remote source trait and projection of server records.
//! - `merge` — remote-wins merge policies.
//! - `notify` — transient notices.
//! - `sync` — the `Reconciler` and its state machine.
//! - `scheduler` — periodic sync worker with a cancellable handle.
//! - `app` — explicit initialization of the whole quote book.
#![warn(missing_docs)]
pub mod app;
pub mod config;
pub mod error;
pub mod merge;
pub mod notify;
pub mod quote;
pub mod remote;
pub mod result;
pub mod scheduler;
pub mod storage;
pub mod store;
pub mod sync;

pub use app::QuoteApp;
pub use error::QuoteError;
pub use quote::{CategoryFilter, Quote};
pub use result::Result;
pub use store::QuoteStore;

//! Error types shared by the quote store, the reconciler and the client.
//!
//! The `QuoteError` enum unifies storage, validation, import and network failures so
//! that every layer can propagate a single error type. None of these are fatal for a
//! running session: callers recover at the boundary where they occur.
use std::io;
use std::sync::PoisonError;

use thiserror::Error;

/// Unified error type shared by the library and the client.
#[derive(Error, Debug)]
pub enum QuoteError {
    /// I/O error originating from files or directories backing the durable store.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Failure while encoding/decoding JSON via serde_json.
    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// The key-value backend refused a read or write.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Stored quote data could not be parsed.
    #[error("Stored quotes are malformed: {0}")]
    StorageParse(String),

    /// A new quote was rejected because a required field was empty.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Fetching from or posting to the remote source failed.
    #[error("Network error: {0}")]
    Network(String),

    /// Imported content is not a sequence of quotes.
    #[error("Invalid file format: {0}")]
    ImportFormat(String),

    /// A random pick was requested from an empty candidate list.
    #[error("No quotes available")]
    NoQuotes,

    /// Error indicating a poisoned mutex/lock was encountered.
    #[error("Mutex Lock Poisoned: {0}")]
    MutexLock(String),
}

impl<T> From<PoisonError<T>> for QuoteError {
    fn from(err: PoisonError<T>) -> Self {
        QuoteError::MutexLock(err.to_string())
    }
}

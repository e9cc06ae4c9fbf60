//! Command-line arguments for the quote client.
//!
//! This module defines the CLI interface using `clap`. See `main` for end-to-end usage.
use clap::{Parser, Subcommand};
use quote_common::config::{DEFAULT_ENDPOINT, EXPORT_FILE_NAME, SYNC_INTERVAL_SECS};
use quote_common::merge::MergePolicy;
use std::path::PathBuf;

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Directory holding the durable quote storage.
    #[clap(long, default_value = "./quote-data")]
    pub data_dir: String,

    /// Remote collection endpoint used for sync and publishing.
    #[clap(long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// How a fetched server snapshot is merged into local quotes.
    #[clap(long, value_enum, default_value_t = MergePolicy::Replace)]
    pub policy: MergePolicy,

    /// Seconds between periodic syncs in `watch` mode.
    #[clap(long, default_value_t = SYNC_INTERVAL_SECS)]
    pub interval_secs: u64,

    /// Never talk to the remote endpoint when adding quotes.
    #[clap(long)]
    pub offline: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Client actions.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print quotes, optionally restricted to one category.
    List {
        /// Category name, or `all`. Defaults to the last selected filter.
        #[clap(long)]
        category: Option<String>,
    },
    /// Print the distinct categories.
    Categories,
    /// Print one random quote.
    Random {
        /// Category name, or `all`. Defaults to the last selected filter.
        #[clap(long)]
        category: Option<String>,
    },
    /// Add a quote.
    Add {
        /// Quote text.
        text: String,
        /// Quote category.
        category: String,
    },
    /// Write all quotes to a JSON file.
    Export {
        /// Output path.
        #[clap(long, default_value = EXPORT_FILE_NAME)]
        out: String,
    },
    /// Append quotes from a JSON file.
    Import {
        /// Path to a JSON array of quotes.
        path: String,
    },
    /// Sync with the server once.
    Sync,
    /// Sync periodically and accept interactive commands on stdin.
    Watch,
}

/// Normalize a CLI-provided path string by trimming whitespace and matching quotes.
///
/// This allows passing Windows paths in quotes without breaking parsing.
pub fn normalize_path(raw: &str) -> PathBuf {
    let trimmed = raw.trim();
    let no_quotes = trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(trimmed);
    PathBuf::from(no_quotes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_add_with_policy() {
        let args = Args::try_parse_from([
            "quote_client",
            "--policy",
            "union",
            "add",
            "Hello",
            "Wisdom",
        ])
        .unwrap();
        assert_eq!(args.policy, MergePolicy::Union);
        assert!(matches!(args.command, Command::Add { ref text, .. } if text == "Hello"));
    }

    #[test]
    fn defaults_apply() {
        let args = Args::try_parse_from(["quote_client", "sync"]).unwrap();
        assert_eq!(args.policy, MergePolicy::Replace);
        assert_eq!(args.interval_secs, 30);
        assert_eq!(args.endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn normalize_strips_quotes() {
        assert_eq!(normalize_path(" \"a b.json\" "), PathBuf::from("a b.json"));
        assert_eq!(normalize_path("plain.json"), PathBuf::from("plain.json"));
    }
}

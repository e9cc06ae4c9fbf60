//! Remote-wins conflict resolution between the local sequence and a remote snapshot.
//!
//! Two policies are available:
//! - `Replace` — the local sequence is discarded in favour of the remote one.
//! - `Union` — remote records not already present locally are appended; local
//!   records keep their order and content.
//!
//! Presence is decided by `id` when the remote record carries one, and by
//! whole-record equality otherwise. There is no field-level merge.
use std::collections::HashSet;

use clap::ValueEnum;
use strum_macros::{Display, EnumString};

use crate::quote::{Quote, QuoteId};

/// Conflict resolution rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Display, EnumString)]
#[clap(rename_all = "lower")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum MergePolicy {
    /// Remote snapshot replaces the local sequence.
    #[default]
    Replace,
    /// Remote records missing locally are appended.
    Union,
}

/// Result of a merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Sequence to store.
    pub quotes: Vec<Quote>,
    /// `false` when the merged sequence equals the local one.
    pub changed: bool,
}

/// Merges `remote` into `local` under `policy`.
pub fn merge(local: &[Quote], remote: Vec<Quote>, policy: MergePolicy) -> MergeOutcome {
    match policy {
        MergePolicy::Replace => {
            let changed = local != remote.as_slice();
            MergeOutcome {
                quotes: remote,
                changed,
            }
        }
        MergePolicy::Union => union(local, remote),
    }
}

fn union(local: &[Quote], remote: Vec<Quote>) -> MergeOutcome {
    let mut known_ids: HashSet<QuoteId> = local.iter().filter_map(|q| q.id.clone()).collect();
    let mut quotes = local.to_vec();

    for candidate in remote {
        let present = match &candidate.id {
            Some(id) => !known_ids.insert(id.clone()),
            None => quotes.contains(&candidate),
        };
        if !present {
            quotes.push(candidate);
        }
    }

    let changed = quotes.len() != local.len();
    MergeOutcome { quotes, changed }
}

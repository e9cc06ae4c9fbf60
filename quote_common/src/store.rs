//! The quote store: an ordered quote sequence mirrored to durable storage.
//!
//! Every mutation (add, import, reconciliation) writes the candidate sequence to the
//! `quotes` key first and only then commits it in memory. A failed write leaves both
//! sides as they were.
//!
//! Loading never fails because of bad stored data: absent, unreadable, malformed or
//! empty content is replaced with [`default_quotes`] which are persisted right away.
use std::collections::BTreeSet;
use std::sync::Arc;

use log::{debug, info, warn};

use crate::config::{FILTER_KEY, LAST_VIEWED_KEY, QUOTES_KEY};
use crate::error::QuoteError;
use crate::quote::{CategoryFilter, Quote, default_quotes};
use crate::result::Result;
use crate::storage::KeyValueStore;

/// Quote sequence backed by an injected key-value store.
pub struct QuoteStore {
    storage: Arc<dyn KeyValueStore>,
    quotes: Vec<Quote>,
}

impl QuoteStore {
    /// Loads the sequence from `storage`, seeding and persisting defaults when needed.
    ///
    /// Only a failure to write the defaults back is returned as an error.
    pub fn load(storage: Arc<dyn KeyValueStore>) -> Result<Self> {
        let stored = match read_quotes(storage.as_ref()) {
            Ok(quotes) => quotes,
            Err(e) => {
                warn!("Falling back to default quotes: {}", e);
                None
            }
        };

        match stored {
            Some(quotes) if !quotes.is_empty() => {
                debug!("Loaded {} quotes from storage", quotes.len());
                Ok(Self { storage, quotes })
            }
            _ => {
                let store = Self {
                    storage,
                    quotes: default_quotes(),
                };
                store.persist()?;
                info!("Seeded storage with {} default quotes", store.quotes.len());
                Ok(store)
            }
        }
    }

    /// Current sequence in insertion order.
    pub fn quotes(&self) -> &[Quote] {
        &self.quotes
    }

    /// Number of quotes.
    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    /// Returns `true` if the store holds no quotes.
    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    /// Appends a new quote after trimming both fields, then persists.
    pub fn add(&mut self, text: &str, category: &str) -> Result<&Quote> {
        let text = text.trim();
        let category = category.trim();
        if text.is_empty() || category.is_empty() {
            return Err(QuoteError::Validation(
                "Please fill in both the quote text and its category.".to_string(),
            ));
        }

        let mut next = self.quotes.clone();
        next.push(Quote::new(text, category));
        self.commit(next)?;
        info!("Added quote in category `{}`", category);
        Ok(&self.quotes[self.quotes.len() - 1])
    }

    /// Writes the full sequence to durable storage.
    pub fn persist(&self) -> Result<()> {
        write_quotes(self.storage.as_ref(), &self.quotes)
    }

    fn commit(&mut self, next: Vec<Quote>) -> Result<()> {
        write_quotes(self.storage.as_ref(), &next)?;
        self.quotes = next;
        Ok(())
    }

    /// Distinct categories of the current sequence.
    pub fn categories(&self) -> BTreeSet<String> {
        self.quotes.iter().map(|q| q.category.clone()).collect()
    }

    /// Quotes passing `filter`, in their original relative order.
    pub fn filtered_view(&self, filter: &CategoryFilter) -> Vec<&Quote> {
        self.quotes.iter().filter(|q| filter.matches(q)).collect()
    }

    /// Replaces the whole sequence and persists.
    pub fn replace_all(&mut self, quotes: Vec<Quote>) -> Result<()> {
        self.commit(quotes)
    }

    /// Appends `quotes` and persists.
    pub fn extend(&mut self, quotes: Vec<Quote>) -> Result<()> {
        let mut next = self.quotes.clone();
        next.extend(quotes);
        self.commit(next)
    }

    /// Pretty-printed JSON of the whole sequence, as written by export.
    pub fn export_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.quotes)?)
    }

    /// Appends every quote from a JSON array and returns how many were added.
    ///
    /// The import is all-or-nothing: a top-level value that is not an array, or an
    /// entry that is not a quote record with a non-blank text and category, leaves
    /// the store untouched.
    pub fn import_json(&mut self, content: &str) -> Result<usize> {
        let value: serde_json::Value = serde_json::from_str(content)
            .map_err(|e| QuoteError::ImportFormat(e.to_string()))?;
        if !value.is_array() {
            return Err(QuoteError::ImportFormat(
                "expected an array of quotes".to_string(),
            ));
        }
        let imported: Vec<Quote> = serde_json::from_value(value)
            .map_err(|e| QuoteError::ImportFormat(e.to_string()))?;
        if let Some(pos) = imported.iter().position(|q| !q.is_complete()) {
            return Err(QuoteError::ImportFormat(format!(
                "entry {} has an empty text or category",
                pos
            )));
        }

        let count = imported.len();
        self.extend(imported)?;
        info!("Imported {} quotes", count);
        Ok(count)
    }

    /// Last saved category filter; a category that no longer exists reads as `All`.
    pub fn selected_filter(&self) -> CategoryFilter {
        let saved = match self.storage.get(FILTER_KEY) {
            Ok(Some(saved)) => saved,
            Ok(None) => return CategoryFilter::All,
            Err(e) => {
                warn!("Could not read saved filter: {}", e);
                return CategoryFilter::All;
            }
        };

        match CategoryFilter::from_name(&saved) {
            CategoryFilter::Category(name) if !self.categories().contains(&name) => {
                debug!("Saved filter `{}` no longer matches any quote", name);
                CategoryFilter::All
            }
            filter => filter,
        }
    }

    /// Saves `filter` as the last selected filter.
    pub fn select_filter(&self, filter: &CategoryFilter) -> Result<()> {
        self.storage.set(FILTER_KEY, &filter.to_string())
    }
}

fn write_quotes(storage: &dyn KeyValueStore, quotes: &[Quote]) -> Result<()> {
    let json = serde_json::to_string(quotes)?;
    storage.set(QUOTES_KEY, &json)
}

fn read_quotes(storage: &dyn KeyValueStore) -> Result<Option<Vec<Quote>>> {
    match storage.get(QUOTES_KEY)? {
        Some(raw) => {
            let quotes = serde_json::from_str(&raw)
                .map_err(|e| QuoteError::StorageParse(e.to_string()))?;
            Ok(Some(quotes))
        }
        None => Ok(None),
    }
}

/// Records `quote` as the last viewed one in the session store.
pub fn remember_last_viewed(session: &dyn KeyValueStore, quote: &Quote) -> Result<()> {
    let json = serde_json::to_string(quote)?;
    session.set(LAST_VIEWED_KEY, &json)
}

/// Last viewed quote of this session, if any was recorded and is readable.
pub fn last_viewed(session: &dyn KeyValueStore) -> Option<Quote> {
    let raw = session.get(LAST_VIEWED_KEY).ok().flatten()?;
    serde_json::from_str(&raw).ok()
}

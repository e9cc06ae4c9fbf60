//! Quote record, category filter and random selection.
//!
//! A `Quote` is the only persisted entity. It is stored as JSON in the durable
//! key-value store as an ordered array of `{text, category[, id]}` objects.
use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::QuoteError;

/// Opaque quote identifier, kept in whatever form it arrived (number or string).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuoteId {
    /// Numeric identifier, as handed out by the remote collection.
    Number(u64),
    /// Any other identifier.
    Text(String),
}

impl fmt::Display for QuoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuoteId::Number(n) => write!(f, "{}", n),
            QuoteId::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for QuoteId {
    fn from(value: u64) -> Self {
        QuoteId::Number(value)
    }
}

/// A single quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    /// Quote body.
    pub text: String,
    /// Free-form label.
    pub category: String,
    /// Identifier used only to detect records already present during a union merge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<QuoteId>,
}

impl Quote {
    /// Creates a quote without an identifier.
    pub fn new(text: impl Into<String>, category: impl Into<String>) -> Self {
        Quote {
            text: text.into(),
            category: category.into(),
            id: None,
        }
    }

    /// Returns `true` when both text and category are non-blank.
    pub fn is_complete(&self) -> bool {
        !self.text.trim().is_empty() && !self.category.trim().is_empty()
    }

    /// Attaches an identifier.
    pub fn with_id(mut self, id: impl Into<QuoteId>) -> Self {
        self.id = Some(id.into());
        self
    }
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\" (Category: {})", self.text, self.category)
    }
}

/// The three quotes seeded into an empty store.
pub fn default_quotes() -> Vec<Quote> {
    vec![
        Quote::new(
            "The journey of a thousand miles begins with one step.",
            "Motivation",
        ),
        Quote::new(
            "To be yourself in a world that is constantly trying to make you something else is the greatest accomplishment.",
            "Inspiration",
        ),
        Quote::new("I think, therefore I am.", "Philosophy"),
    ]
}

/// Textual form of [`CategoryFilter::All`].
pub const ALL_CATEGORIES: &str = "all";

/// Category selection applied to the quote list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    /// Every quote.
    #[default]
    All,
    /// Only quotes whose category equals the name exactly.
    Category(String),
}

impl CategoryFilter {
    /// Reads a filter from its textual form; blank input and `all` mean every quote.
    pub fn from_name(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed == ALL_CATEGORIES {
            CategoryFilter::All
        } else {
            CategoryFilter::Category(trimmed.to_string())
        }
    }

    /// Returns `true` if `quote` passes the filter.
    pub fn matches(&self, quote: &Quote) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Category(name) => quote.category == *name,
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(CategoryFilter::from_name(s))
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str(ALL_CATEGORIES),
            CategoryFilter::Category(name) => f.write_str(name),
        }
    }
}

/// Picks a uniformly random candidate using the thread-local generator.
pub fn pick_random<'a>(candidates: &[&'a Quote]) -> Result<&'a Quote, QuoteError> {
    pick_random_with(&mut rand::rng(), candidates)
}

/// Picks a uniformly random candidate by drawing an index over `[0, len)`.
pub fn pick_random_with<'a, R: Rng + ?Sized>(
    rng: &mut R,
    candidates: &[&'a Quote],
) -> Result<&'a Quote, QuoteError> {
    if candidates.is_empty() {
        return Err(QuoteError::NoQuotes);
    }
    let index = rng.random_range(0..candidates.len());
    Ok(candidates[index])
}

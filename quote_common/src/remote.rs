//! Remote quote source and the projection of server records into quotes.
//!
//! The remote collection hands out records shaped like blog posts. Only `id` and
//! `title` are read; [`project`] turns the first few of them into `Server` quotes.
use serde::{Deserialize, Serialize};

use crate::config::{REMOTE_QUOTE_LIMIT, SERVER_CATEGORY};
use crate::quote::Quote;
use crate::result::Result;

/// Record returned by the remote collection endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerPost {
    /// Server-side identifier.
    pub id: u64,
    /// Short text used as the quote body.
    pub title: String,
}

/// Outbound payload for publishing a locally added quote.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPost<'a> {
    /// Quote text.
    pub title: &'a str,
    /// Quote category.
    pub body: &'a str,
    /// Fixed author id expected by the collection.
    pub user_id: u64,
}

impl<'a> From<&'a Quote> for NewPost<'a> {
    fn from(quote: &'a Quote) -> Self {
        NewPost {
            title: &quote.text,
            body: &quote.category,
            user_id: 1,
        }
    }
}

/// Source of remote snapshots.
///
/// Implementations report transport, status and decoding failures as
/// `QuoteError::Network`.
pub trait RemoteSource: Send + Sync {
    /// Fetches the full remote collection.
    fn fetch(&self) -> Result<Vec<ServerPost>>;

    /// Publishes a new quote. The response body is ignored.
    fn post(&self, quote: &Quote) -> Result<()>;
}

/// Maps the first [`REMOTE_QUOTE_LIMIT`] posts with a non-blank title to quotes in the
/// `Server` category.
pub fn project(posts: &[ServerPost]) -> Vec<Quote> {
    posts
        .iter()
        .filter(|post| !post.title.trim().is_empty())
        .take(REMOTE_QUOTE_LIMIT)
        .map(|post| Quote::new(post.title.clone(), SERVER_CATEGORY).with_id(post.id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quote::QuoteId;

    #[test]
    fn project_takes_first_three_posts() {
        let posts: Vec<ServerPost> = serde_json::from_str(
            r#"[
                {"userId":1,"id":1,"title":"t1","body":"b1"},
                {"userId":1,"id":2,"title":"t2","body":"b2"},
                {"userId":1,"id":3,"title":"t3","body":"b3"},
                {"userId":1,"id":4,"title":"t4","body":"b4"}
            ]"#,
        )
        .unwrap();

        let quotes = project(&posts);
        assert_eq!(quotes.len(), 3);
        assert_eq!(quotes[0].text, "t1");
        assert_eq!(quotes[2].id, Some(QuoteId::Number(3)));
        assert!(quotes.iter().all(|q| q.category == "Server"));
    }

    #[test]
    fn project_of_short_list_keeps_everything() {
        let posts = vec![ServerPost {
            id: 9,
            title: "lone".to_string(),
        }];
        assert_eq!(project(&posts), vec![Quote::new("lone", "Server").with_id(9u64)]);
        assert!(project(&[]).is_empty());
    }

    #[test]
    fn project_skips_blank_titles() {
        let post = |id: u64, title: &str| ServerPost {
            id,
            title: title.to_string(),
        };
        let posts = vec![post(1, "  "), post(2, "a"), post(3, ""), post(4, "b"), post(5, "c"), post(6, "d")];

        let quotes = project(&posts);
        let ids: Vec<Option<QuoteId>> = quotes.into_iter().map(|q| q.id).collect();
        assert_eq!(ids, vec![Some(QuoteId::Number(2)), Some(QuoteId::Number(4)), Some(QuoteId::Number(5))]);
    }

    #[test]
    fn new_post_uses_camel_case() {
        let quote = Quote::new("Hello", "Wisdom");
        let json = serde_json::to_string(&NewPost::from(&quote)).unwrap();
        assert_eq!(json, r#"{"title":"Hello","body":"Wisdom","userId":1}"#);
    }
}

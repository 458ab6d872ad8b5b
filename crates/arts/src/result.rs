// ABOUTME: Article struct: the extraction engine's output record.
// ABOUTME: Ports arts/core.go's Article shape (urls/headline/authors/content/dates/publication/keywords/section).

use serde::{Deserialize, Serialize};

pub use crate::extractors::author::Author;
pub use crate::extractors::keywords::Keyword;
pub use crate::extractors::publication::Publication;

/// The extraction engine's single output record.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Article {
    pub canonical_url: Option<String>,
    pub urls: Vec<String>,
    pub headline: Option<String>,
    pub authors: Vec<Author>,
    pub content: String,
    pub published: Option<String>,
    pub updated: Option<String>,
    pub publication: Publication,
    pub keywords: Vec<Keyword>,
    pub section: Option<String>,
}

impl Article {
    /// The canonical URL if one was found, else the first URL discovered
    /// on the page, else `None`.
    pub fn best_url(&self) -> Option<&str> {
        self.canonical_url
            .as_deref()
            .or_else(|| self.urls.first().map(|s| s.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.headline.is_none() && self.content.is_empty()
    }
}

pub type Result = crate::error::Result<Article>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn best_url_prefers_canonical() {
        let article = Article {
            canonical_url: Some("https://example.com/canon".to_string()),
            urls: vec!["https://example.com/alt".to_string()],
            ..Default::default()
        };
        assert_eq!(article.best_url(), Some("https://example.com/canon"));
    }

    #[test]
    fn best_url_falls_back_to_first_alternate() {
        let article = Article {
            urls: vec!["https://example.com/alt".to_string()],
            ..Default::default()
        };
        assert_eq!(article.best_url(), Some("https://example.com/alt"));
    }

    #[test]
    fn is_empty_when_no_headline_or_content() {
        assert!(Article::default().is_empty());
    }
}

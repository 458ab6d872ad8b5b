// ABOUTME: Main library entry point for the article field-extraction engine.
// ABOUTME: Re-exports the public API: extract, extract_from_bytes, Article, Config, ParseError.

//! A field-extraction engine for article/blog HTML: given a parsed document
//! (or raw bytes plus a source URL), produces an [`Article`] carrying the
//! headline, authors, publish/update dates, keywords, section, publication,
//! and cleaned content HTML.
//!
//! # Example
//!
//! ```no_run
//! use digests_arts::{extract_from_bytes, Config};
//!
//! # fn main() -> Result<(), digests_arts::ParseError> {
//! let html = b"<html><body><h1>Hello</h1></body></html>";
//! let config = Config::default();
//! let article = extract_from_bytes(html, None, "https://example.com/a", &config)?;
//! println!("{:?}", article.headline);
//! # Ok(())
//! # }
//! ```

pub mod candidate;
pub mod config;
pub mod dom;
pub mod error;
pub mod extract;
pub mod extractors;
pub mod formats;
pub mod fuzzydate;
pub mod logger;
pub mod node;
pub mod resource;
pub mod result;

pub use crate::config::{Config, ConfigBuilder};
pub use crate::error::{ErrorCode, ParseError};
pub use crate::extract::{extract, extract_from_bytes};
pub use crate::extractors::author::Author;
pub use crate::extractors::keywords::Keyword;
pub use crate::extractors::publication::Publication;
pub use crate::result::{Article, Result};

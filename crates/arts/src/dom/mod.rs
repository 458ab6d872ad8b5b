// ABOUTME: DOM manipulation and traversal utilities for HTML parsing.
// ABOUTME: Preparation, cruft detection, Readability-derived scoring, conditional cleaning, and sanitization.

//! DOM utilities for HTML document manipulation: script stripping and cruft
//! detection (prepare, cruft), the content extractor's phases A-E
//! (scoring, cleaners, sanitize).

pub mod cleaners;
pub mod cruft;
pub mod prepare;
pub mod sanitize;
pub mod scoring;

pub use cleaners::{remove_cruft, remove_cruft_blocks};
pub use cruft::find_cruft;
pub use prepare::{body, prepare};
pub use sanitize::sanitize_html;
pub use scoring::{gather_siblings, link_density, score_paragraphs, scale_by_link_density, top_candidate, ContentScores};

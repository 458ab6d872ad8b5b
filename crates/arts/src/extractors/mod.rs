// ABOUTME: The per-field extractors that make up the extraction pipeline.
// ABOUTME: Each submodule ports one [MODULE] of the spec's component design (§4.3-§4.11).

pub mod author;
pub mod content;
pub mod dates;
pub mod fields;
pub mod headline;
pub mod keywords;
pub mod publication;
pub mod section;
pub mod urls;

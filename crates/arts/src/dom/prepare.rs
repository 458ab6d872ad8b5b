// ABOUTME: DOM preparation step: strip <script> nodes before extraction, keeping them
// ABOUTME: aside for the date extractor's per-host script-scraping fallback.

use dom_query::{Document, Selection};

/// Text content of every `<script>` node found in the document, collected
/// before the nodes are stripped out of the tree the other extractors walk.
pub fn collect_scripts(doc: &Document) -> Vec<String> {
    doc.select("script")
        .iter()
        .map(|s| s.html().to_string())
        .collect()
}

/// Remove every `<script>` node from the tree in place.
pub fn strip_scripts(doc: &Document) {
    let scripts = doc.select("script");
    scripts.remove();
}

/// Convenience: strip scripts and return their raw markup for later use.
pub fn prepare(doc: &Document) -> Vec<String> {
    let scripts = collect_scripts(doc);
    strip_scripts(doc);
    scripts
}

pub fn body(doc: &Document) -> Selection {
    let body = doc.select("body");
    if body.is_empty() {
        doc.select("html")
    } else {
        body
    }
}

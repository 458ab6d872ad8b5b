// ABOUTME: Content extractor orchestrator: phases A-C produce the article body node set.
// ABOUTME: Phase D (conditional cleaning) and E (sanitization) run later, during output assembly.

use dom_query::{Document, Selection};

use crate::dom::scoring::{gather_siblings, scale_by_link_density, score_paragraphs, top_candidate, ContentScores};

pub struct ContentResult<'a> {
    pub nodes: Vec<Selection<'a>>,
    pub scores: ContentScores<'a>,
}

/// Run phases A-C: score every paragraph-bearing node, scale by link
/// density, pick the top candidate, and gather its qualifying siblings.
pub fn extract_content<'a>(doc: &'a Document) -> Option<ContentResult<'a>> {
    let mut scores = score_paragraphs(doc);
    scale_by_link_density(&mut scores);
    let top = top_candidate(&scores)?;
    let nodes = gather_siblings(&top, &scores);
    Some(ContentResult { nodes, scores })
}

/// Render the gathered content nodes back to HTML: a lone node's own outer
/// HTML, or multiple siblings wrapped in a `<div>` to preserve order.
pub fn render_content_html(nodes: &[Selection]) -> String {
    match nodes {
        [] => String::new(),
        [single] => single.html().to_string(),
        many => {
            let mut out = String::from("<div>");
            for n in many {
                out.push_str(&n.html());
            }
            out.push_str("</div>");
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_content_in_longest_paragraph_block() {
        let html = format!(
            "<html><body><div id=\"article\"><p>{}</p></div><div id=\"nav\"><p>x</p></div></body></html>",
            "word ".repeat(40)
        );
        let doc = Document::from(html.as_str());
        let result = extract_content(&doc).expect("content found");
        assert!(!result.nodes.is_empty());
    }

    #[test]
    fn no_long_paragraphs_yields_none() {
        let doc = Document::from("<html><body><p>hi</p></body></html>");
        assert!(extract_content(&doc).is_none());
    }
}

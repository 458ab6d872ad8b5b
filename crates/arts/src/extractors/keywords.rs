// ABOUTME: Keyword extractor: comma-split meta keyword lists plus repeated article:tag metas.
// ABOUTME: Ports arts/keywords.go.

use dom_query::Document;
use serde::{Deserialize, Serialize};

/// A single extracted keyword/tag, with an optional tag-page URL when the
/// source element carried one (e.g. a linked tag chip).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keyword {
    pub name: String,
    pub url: Option<String>,
}

/// Extract every keyword, deduplicated by name while preserving first-seen
/// order. `meta[name=keywords|news_keywords]` contents are comma-split;
/// repeated `article:tag` metas each contribute one keyword; `a[rel=tag]`
/// links contribute a keyword with its `href` as the url.
pub fn extract_keywords(doc: &Document) -> Vec<Keyword> {
    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::new();

    for sel in &["meta[name=\"keywords\"]", "meta[name=\"news_keywords\"]"] {
        for el in doc.select(sel).iter() {
            let content = el.attr("content").map(|c| c.to_string()).unwrap_or_default();
            for part in content.split(',') {
                push_unique(&mut out, &mut seen, part.trim(), None);
            }
        }
    }

    for el in doc.select("meta[property=\"article:tag\"]").iter() {
        let content = el.attr("content").map(|c| c.to_string()).unwrap_or_default();
        push_unique(&mut out, &mut seen, content.trim(), None);
    }

    for el in doc.select("a[rel~=\"tag\"]").iter() {
        let name = el.text().trim().to_string();
        let url = el.attr("href").map(|h| h.to_string());
        push_unique(&mut out, &mut seen, &name, url);
    }

    out
}

fn push_unique(
    out: &mut Vec<Keyword>,
    seen: &mut std::collections::HashSet<String>,
    name: &str,
    url: Option<String>,
) {
    if name.is_empty() {
        return;
    }
    let key = name.to_lowercase();
    if seen.insert(key) {
        out.push(Keyword {
            name: name.to_string(),
            url,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_comma_separated_keywords() {
        let doc = Document::from(r#"<meta name="keywords" content="rust, async, web">"#);
        let kws = extract_keywords(&doc);
        assert_eq!(
            kws,
            vec![
                Keyword { name: "rust".into(), url: None },
                Keyword { name: "async".into(), url: None },
                Keyword { name: "web".into(), url: None },
            ]
        );
    }

    #[test]
    fn dedupes_case_insensitively() {
        let doc = Document::from(
            r#"<meta name="keywords" content="Rust, rust"><meta property="article:tag" content="rust">"#,
        );
        assert_eq!(extract_keywords(&doc).len(), 1);
    }

    #[test]
    fn tag_links_carry_url() {
        let doc = Document::from(r#"<a rel="tag" href="/tags/rust">Rust</a>"#);
        let kws = extract_keywords(&doc);
        assert_eq!(
            kws,
            vec![Keyword { name: "Rust".into(), url: Some("/tags/rust".into()) }]
        );
    }
}

// ABOUTME: Headline extractor: scores h1-h6/div/span/th/td candidates against itemprop, class,
// ABOUTME: <title>, meta-title, and URL-slug signals. Ports arts/headline.go verbatim.

use once_cell::sync::Lazy;
use regex::Regex;

use dom_query::{Document, Selection};

use crate::candidate::{Candidate, CandidateList};
use crate::extractors::dates::{DATE_GENERIC_CLASS_RE, DATE_PUBLISHED_CLASS_RE, DATE_UPDATED_CLASS_RE};
use crate::node::{
    compress_space, describe_node, get_attr, get_slug, jaccard_word_compare, normalise_text,
    tag_name, to_alphanumeric, word_count,
};

const CONSIDER_SELECTOR: &str = "h1,h2,h3,h4,h5,h6,div,span,th,td";
const META_TITLE_SELECTORS: &[&str] = &[
    "meta[property=\"og:title\"]",
    "meta[name=\"wp_twitter-title\"]",
];

static INDICATIVE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)entry-title|headline|title").unwrap());
static UNINDICATIVE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)feed-title").unwrap());
static DASH_UNDERSCORE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[-_]+").unwrap());

/// The headline extractor's result: the winning node is kept alongside the
/// text so the author/date extractors can use it as a document-order anchor
/// (the "betwixt headline and content" bonus).
pub struct HeadlineResult<'a> {
    pub text: Option<String>,
    pub node: Option<Selection<'a>>,
}

/// Score every heading-ish element against `<title>`, meta-title tags, and
/// the URL slug, then return the highest scorer's text (with any nested
/// inline timestamp stripped out) — or fall back to the reference text if
/// nothing scores above zero.
pub fn extract_headline<'a>(doc: &'a Document, url: &str) -> HeadlineResult<'a> {
    let title_tag_text = doc
        .select("title")
        .iter()
        .next()
        .map(|t| t.text().to_string());
    let cooked_title = title_tag_text
        .as_deref()
        .map(normalise_text)
        .unwrap_or_default();

    let mut meta_titles: Vec<(String, Selection<'a>)> = Vec::new();
    for sel in META_TITLE_SELECTORS {
        for m in doc.select(sel).iter() {
            let content = get_attr(&m, "content");
            if content.is_empty() {
                continue;
            }
            let cooked = normalise_text(&content);
            if !cooked.is_empty() {
                meta_titles.push((cooked, m.clone()));
            }
        }
    }

    let raw_slug = get_slug(url);
    let cooked_slug = to_alphanumeric(&DASH_UNDERSCORE_RE.replace_all(&raw_slug, " "));

    let mut candidates: CandidateList = CandidateList::new();
    for el in doc.select(CONSIDER_SELECTOR).iter() {
        let txt = compress_space(&el.text());
        if txt.len() >= 500 || txt.len() < 3 {
            continue;
        }
        let cooked_txt = normalise_text(&txt);
        let tag = tag_name(&el);
        let class = get_attr(&el, "class");
        let id = get_attr(&el, "id");

        let mut c = Candidate::new(el.clone(), txt.clone());

        if el.is("[itemprop=\"headline\"]") {
            c.add_points(2.0, "itemprop=headline");
        }
        match tag.as_str() {
            "h1" | "h2" | "h3" | "h4" => {
                c.add_points(2.0, "headliney");
            }
            "span" | "td" => {
                c.add_points(-2.0, "not headliney");
            }
            _ => {}
        }
        if INDICATIVE_RE.is_match(&class) {
            c.add_points(2.0, "indicative class");
        }
        if INDICATIVE_RE.is_match(&id) {
            c.add_points(2.0, "indicative id");
        }
        if UNINDICATIVE_RE.is_match(&class) {
            c.add_points(-1.0, "unindicative class");
        }
        if UNINDICATIVE_RE.is_match(&id) {
            c.add_points(-1.0, "unindicative id");
        }

        if !cooked_txt.is_empty() && !cooked_title.is_empty() && cooked_title.starts_with(&cooked_txt) {
            c.add_points(2.0, "appears at start of <title>");
        }

        if word_count(&cooked_txt) >= 3 {
            if !cooked_title.is_empty() {
                let score = jaccard_word_compare(&cooked_txt, &cooked_title) * 4.0 - 1.0;
                c.add_points(score, "score against <title>");
            }
            if !cooked_slug.is_empty() {
                let alphanumeric_txt = to_alphanumeric(&txt);
                if !alphanumeric_txt.is_empty() {
                    let score = jaccard_word_compare(&alphanumeric_txt, &cooked_slug) * 4.0 - 1.0;
                    c.add_points(score, "score against slug");
                }
            }
        }

        for (meta_cooked, meta_node) in &meta_titles {
            let score = jaccard_word_compare(&cooked_txt, meta_cooked) * 6.0 - 1.0;
            c.add_points(score, &format!("score against {}", describe_node(meta_node)));
        }

        if c.total() > 0.0 {
            candidates.push(c);
        }
    }
    candidates.sort();

    if let Some(best) = candidates.first() {
        let text = compress_space(&headline_text(best.node()));
        return HeadlineResult {
            text: Some(text),
            node: Some(best.node().clone()),
        };
    }

    let fallback = meta_titles
        .into_iter()
        .next()
        .map(|(_, node)| compress_space(&get_attr(&node, "content")))
        .or(title_tag_text.map(|t| compress_space(&t)))
        .filter(|t| !t.is_empty());
    HeadlineResult { text: fallback, node: None }
}

/// Recursively concatenate `sel`'s text, excluding any descendant subtree
/// whose class/id looks like an inline published/updated timestamp (so a
/// `<h1>Some story <span class="date">Jan 1</span></h1>` reports just "Some
/// story"). Operates via element-level class/id matching rather than a raw
/// text-node walk, since only `Selection`-level APIs are exercised
/// elsewhere in this crate.
fn headline_text(sel: &Selection) -> String {
    let class = get_attr(sel, "class");
    let id = get_attr(sel, "id");
    if is_date_like(&class, &id) {
        return String::new();
    }

    let mut excluded: Vec<Selection> = Vec::new();
    for descendant in sel.select("*").iter() {
        let d_class = get_attr(&descendant, "class");
        let d_id = get_attr(&descendant, "id");
        if is_date_like(&d_class, &d_id) {
            excluded.push(descendant);
        }
    }

    // Keep only the outermost excluded nodes: dropping an ancestor already
    // drops its descendants' text, so re-stripping a nested match could eat
    // an unrelated later occurrence of the same words.
    let outermost: Vec<&Selection> = excluded
        .iter()
        .enumerate()
        .filter(|(i, c)| {
            !excluded
                .iter()
                .enumerate()
                .any(|(j, c2)| *i != j && crate::node::contains(c2, c))
        })
        .map(|(_, c)| c)
        .collect();

    let mut text = sel.text().to_string();
    for d in outermost {
        let excerpt = d.text().to_string();
        if !excerpt.is_empty() {
            text = text.replacen(excerpt.as_str(), "", 1);
        }
    }
    text
}

fn is_date_like(class: &str, id: &str) -> bool {
    let combined = format!("{} {}", class, id);
    DATE_GENERIC_CLASS_RE.is_match(&combined)
        || DATE_PUBLISHED_CLASS_RE.is_match(&combined)
        || DATE_UPDATED_CLASS_RE.is_match(&combined)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn h1_matching_meta_title_wins() {
        let doc = Document::from(
            r#"<html><head><meta property="og:title" content="Rust crate teaches idioms">
               <title>Different title entirely</title></head>
               <body><h1>Rust crate teaches idioms</h1></body></html>"#,
        );
        let result = extract_headline(&doc, "https://example.com/rust-crate-teaches-idioms");
        assert_eq!(result.text.as_deref(), Some("Rust crate teaches idioms"));
        assert!(result.node.is_some());
    }

    #[test]
    fn falls_back_to_meta_title_without_h1() {
        let doc = Document::from(
            r#"<html><head><meta property="og:title" content="Only meta title"></head></html>"#,
        );
        let result = extract_headline(&doc, "https://example.com/x");
        assert_eq!(result.text.as_deref(), Some("Only meta title"));
        assert!(result.node.is_none());
    }

    #[test]
    fn falls_back_to_title_tag_when_no_meta() {
        let doc = Document::from("<html><head><title>Plain Title</title></head></html>");
        let result = extract_headline(&doc, "https://example.com/x");
        assert_eq!(result.text.as_deref(), Some("Plain Title"));
    }

    #[test]
    fn strips_inline_date_span_from_headline_text() {
        let doc = Document::from(
            r#"<html><head><title>Market update today</title></head>
               <body><h1 class="entry-title">Market update today <span class="timestamp date">Jan 1, 2024</span></h1></body></html>"#,
        );
        let result = extract_headline(&doc, "https://example.com/market-update-today");
        assert_eq!(result.text.as_deref(), Some("Market update today"));
    }

    #[test]
    fn rejects_overlong_candidate_text() {
        let long_text = "a".repeat(600);
        let html = format!(
            r#"<html><head><title>{t}</title></head><body><h1>{t}</h1></body></html>"#,
            t = long_text
        );
        let doc = Document::from(html.as_str());
        let result = extract_headline(&doc, "https://example.com/x");
        // the h1 is rejected outright for being too long; falls back to title text.
        assert_eq!(result.node.is_none(), true);
        assert_eq!(result.text.as_deref(), Some(long_text.as_str()));
    }

    #[test]
    fn scores_against_url_slug() {
        let doc = Document::from(
            r#"<html><body><h1>Strip the suffix right here today</h1></body></html>"#,
        );
        let result = extract_headline(&doc, "http://example.com/strip-the-suffix-right-here-today.html");
        assert_eq!(result.text.as_deref(), Some("Strip the suffix right here today"));
    }
}

// ABOUTME: Author extractor: two-phase author/byline-container candidate scoring.
// ABOUTME: Ports arts/author.go's grabAuthors — cullNestedAuthors, container selection, conflict abort.

pub mod byline;
pub mod names;

use once_cell::sync::Lazy;
use regex::Regex;

use dom_query::{Document, Selection};
use serde::{Deserialize, Serialize};

use crate::candidate::{Candidate, CandidateList};
use crate::extractors::fields::extract_meta_content;
use crate::logger::Logger;
use crate::node::{
    closest, compress_space, contains, get_attr, intervening_node_ids, node_id, parent_nodes, tag_name,
};

const LIKELY_ELEMENT_SELECTOR: &str = "a,p,span,div,li,h3,h4,h5,h6,td,strong";

static AUTHOR_LIKELY_CLASS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)name|byline|by-line|by_line|author|writer|credits|storycredit|firma").unwrap());

static CONTAINER_LIKELY_CLASS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)byline|by-line|by_line|author|writer|credits|storycredit|firma|entry-details").unwrap()
});

static STANDFIRST_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)stand-first|standfirst|kicker|dek|articleTagline|tagline").unwrap());

static COMMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:comment|disqus|livefyre|remark|conversation)\b").unwrap());

static CRUFT_INDICATIVE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:combx|comment|community|disqus|livefyre|menu|remark|rss|shoutbox|sidebar|sponsor|ad-break|agegate|pagination|pager|popup|promo|shopping|tweet|twitter|facebook)\b",
    )
    .unwrap()
});

static INDICATIVE_START_TEXT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(by|text by|posted by|written by|exclusive by|reviewed by|published by|von)\b[:]?\s*")
        .unwrap()
});

static GOOD_URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(^mailto:)|([/](columnistarchive|biography|profile|about|author[s]?|writer|i-author|authorinfo)[/])")
        .unwrap()
});

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    pub rellink: Option<String>,
    pub email: Option<String>,
    pub twitter: Option<String>,
}

/// Extract every author the page names: a two-phase scan rates each element
/// in `LIKELY_ELEMENT_SELECTOR` both as a potential author (a name) and as a
/// potential byline container (a wrapper around one or more authors), then
/// authors are attributed to whichever byline container(s) score highest —
/// aborting (returning nothing) if multiple top-scoring containers disagree
/// on who's named.
pub fn extract_authors<'a>(
    doc: &'a Document,
    content_nodes: &[Selection<'a>],
    headline_node: Option<&Selection<'a>>,
    cruft_blocks: &[Selection<'a>],
    dbug: &Logger,
) -> Vec<Author> {
    let intervening = match (headline_node, content_nodes.first()) {
        (Some(h), Some(c)) => intervening_node_ids(doc, h, c),
        _ => Default::default(),
    };

    let mut author_candidates: Vec<Candidate<'a>> = Vec::new();
    let mut byline_candidates: Vec<Candidate<'a>> = Vec::new();

    for el in doc.select(LIKELY_ELEMENT_SELECTOR).iter() {
        let txt = compress_space(&el.text());

        let mut early_out = false;
        let verbose = txt.len() >= 150;
        if !verbose && txt.len() < 3 {
            early_out = true;
        } else if !verbose {
            for ancestor in parent_nodes(&el) {
                let class = get_attr(&ancestor, "class");
                let id = get_attr(&ancestor, "id");
                if COMMENT_RE.is_match(&class) || COMMENT_RE.is_match(&id) {
                    early_out = true;
                    break;
                }
            }
        }
        if early_out {
            continue;
        }

        let mut author_c = Candidate::new(el.clone(), txt.clone());
        let mut container_c = Candidate::new(el.clone(), txt.clone());

        if verbose {
            author_c.add_points(-3.0, "very verbose");
        }

        if let Some(nid) = node_id(&el) {
            if intervening.contains(&nid) {
                author_c.add_points(1.0, "between headline and content");
                container_c.add_points(1.0, "between headline and content");
            }
        }

        rate_author_node(&mut author_c, &el, &txt, cruft_blocks);
        if author_c.total() > 1.0 {
            author_candidates.push(author_c);
        }

        rate_byline_container_node(&mut container_c, &el, cruft_blocks);
        if container_c.total() > 0.0 {
            byline_candidates.push(container_c);
        }
    }

    let author_candidates = cull_nested_authors(author_candidates);

    let mut byline_candidates = byline_candidates;
    for byline in byline_candidates.iter_mut() {
        let cnt = author_candidates
            .iter()
            .filter(|a| node_id(a.node()) != node_id(byline.node()) && contains(byline.node(), a.node()))
            .count();
        if cnt > 0 {
            byline.add_points(1.0, "contains likely-looking author(s)");
        }
    }

    let mut author_list: CandidateList = CandidateList::new();
    for c in author_candidates {
        author_list.push(c);
    }
    author_list.sort();

    let mut byline_list: CandidateList = CandidateList::new();
    for c in byline_candidates {
        byline_list.push(c);
    }
    byline_list.sort();

    for c in author_list.iter().chain(byline_list.iter()) {
        dbug.write_line(&c.dump_string());
    }

    let top_bylines = byline_list.best();
    let mut out = if top_bylines.is_empty() {
        Vec::new()
    } else {
        let mut out = extract_from_candidates(author_list.contained_by(top_bylines[0].node()));
        let mut conflicted = false;
        for other in &top_bylines[1..] {
            let other_authors = extract_from_candidates(author_list.contained_by(other.node()));
            if !author_lists_match(&out, &other_authors) {
                conflicted = true;
                break;
            }
        }
        if conflicted {
            Vec::new()
        } else {
            if out.is_empty() && top_bylines.len() == 1 && top_bylines[0].total() >= 2.0 {
                out = extract_from_candidates(vec![top_bylines[0]]);
            }
            out
        }
    };

    if out.is_empty() {
        if let Some(meta) = extract_meta_content(doc, "meta[name=\"author\"]") {
            for name in byline::parse_byline(&meta) {
                out.push(Author { name, rellink: None, email: None, twitter: None });
            }
        }
    }

    out
}

fn rate_author_node(c: &mut Candidate, el: &Selection, txt: &str, cruft_blocks: &[Selection]) {
    if el.is(".vcard") {
        c.add_points(2.0, "hcard");
    }
    if el.is(".vcard.author") {
        c.add_points(2.0, "hatom author");
        if closest(el, ".hentry").is_some() {
            c.add_points(2.0, "inside hentry");
        }
    }

    let rel = get_attr(el, "rel");
    if rel == "author" {
        c.add_points(2.0, "rel-author");
    } else if rel == "tag" {
        c.add_points(-2.0, "rel-tag");
    } else if rel == "category" {
        c.add_points(-2.0, "rel-category");
    }

    if get_attr(el, "itemprop") == "author" {
        c.add_points(2.0, "itemprop=author");
    }

    let class = get_attr(el, "class");
    let id = get_attr(el, "id");
    if AUTHOR_LIKELY_CLASS_RE.is_match(&class) {
        c.add_points(1.0, "likely class");
    }
    if AUTHOR_LIKELY_CLASS_RE.is_match(&id) {
        c.add_points(1.0, "likely id");
    }

    let name_score = names::rate_name(txt);
    if name_score != 0.0 {
        c.add_points(name_score, "looks-like-a-name score");
    }

    if INDICATIVE_START_TEXT_RE.is_match(txt) {
        c.add_points(1.0, "indicative text");
    }

    if tag_name(el) == "a" {
        let href = get_attr(el, "href");
        if GOOD_URL_RE.is_match(&href) {
            c.add_points(2.0, "likely-looking link");
        }
    }

    for block in cruft_blocks {
        if contains(block, el) {
            c.add_points(-1.0, "inside social/share block");
        }
    }
}

fn rate_byline_container_node(c: &mut Candidate, el: &Selection, cruft_blocks: &[Selection]) {
    let class = get_attr(el, "class");
    let id = get_attr(el, "id");

    if CRUFT_INDICATIVE_RE.is_match(&class) || CRUFT_INDICATIVE_RE.is_match(&id) {
        c.add_points(-3.0, "looks like cruft");
    }
    if cruft_blocks
        .iter()
        .any(|b| node_id(b) == node_id(el) || contains(b, el))
    {
        c.add_points(-3.0, "looks like cruft");
    }
    if STANDFIRST_RE.is_match(&class) || STANDFIRST_RE.is_match(&id) {
        c.add_points(-3.0, "looks like a standfirst");
    }
    if CONTAINER_LIKELY_CLASS_RE.is_match(&class) {
        c.add_points(1.0, "likely class");
    }
    if CONTAINER_LIKELY_CLASS_RE.is_match(&id) {
        c.add_points(1.0, "likely id");
    }
}

/// Discard any author candidate that strictly contains another surviving
/// candidate (an ancestor wrapper around an already-found author), keeping
/// only the innermost leaves.
fn cull_nested_authors<'a>(authors: Vec<Candidate<'a>>) -> Vec<Candidate<'a>> {
    let n = authors.len();
    let mut keep = vec![true; n];
    for i in 0..n {
        for j in 0..n {
            if i != j && contains(authors[i].node(), authors[j].node()) {
                keep[i] = false;
                break;
            }
        }
    }
    authors.into_iter().zip(keep).filter_map(|(c, k)| k.then_some(c)).collect()
}

fn extract_from_candidates(cands: Vec<&Candidate>) -> Vec<Author> {
    let mut out = Vec::new();
    for c in cands {
        for name in byline::parse_byline(c.txt()) {
            out.push(build_author(c.node(), name));
        }
    }
    out
}

fn author_lists_match(a: &[Author], b: &[Author]) -> bool {
    a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.name == y.name)
}

fn build_author(container: &Selection, name: String) -> Author {
    let mut author = Author { name, rellink: None, email: None, twitter: None };

    for link in container.select("a").iter() {
        let href = get_attr(&link, "href");
        if href.is_empty() {
            continue;
        }
        if let Some(addr) = href.strip_prefix("mailto:") {
            author.email = Some(addr.to_string());
        } else if href.contains("twitter.com/") || href.contains("x.com/") {
            if let Some(handle) = href.rsplit('/').next() {
                author.twitter = Some(handle.trim_start_matches('@').to_string());
            }
        } else if get_attr(&link, "rel") == "author" {
            author.rellink = Some(href);
        }
    }

    author
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_single_author_from_byline_span() {
        let doc = Document::from(r#"<span class="byline">By Jane Doe</span>"#);
        let authors = extract_authors(&doc, &[], None, &[], &Logger::null());
        assert_eq!(authors.len(), 1);
        assert_eq!(authors[0].name, "Jane Doe");
    }

    #[test]
    fn extracts_two_authors_with_locations() {
        let doc = Document::from(
            r#"<p class="byline">By Matthew Garrahan in Los Angeles and Tim Bradshaw in San Francisco</p>"#,
        );
        let authors = extract_authors(&doc, &[], None, &[], &Logger::null());
        assert_eq!(authors.len(), 2);
        assert_eq!(authors[0].name, "Matthew Garrahan");
        assert_eq!(authors[1].name, "Tim Bradshaw");
    }

    #[test]
    fn picks_up_mailto_and_twitter_links() {
        let doc = Document::from(
            r#"<div class="author-card">By Jane Doe <a href="mailto:jane@example.com">email</a>
               <a href="https://twitter.com/janedoe">twitter</a></div>"#,
        );
        let authors = extract_authors(&doc, &[], None, &[], &Logger::null());
        assert_eq!(authors.len(), 1);
        assert_eq!(authors[0].email.as_deref(), Some("jane@example.com"));
        assert_eq!(authors[0].twitter.as_deref(), Some("janedoe"));
    }

    #[test]
    fn falls_back_to_meta_author() {
        let doc = Document::from(r#"<meta name="author" content="Jane Doe">"#);
        let authors = extract_authors(&doc, &[], None, &[], &Logger::null());
        assert_eq!(authors.len(), 1);
        assert_eq!(authors[0].name, "Jane Doe");
    }

    #[test]
    fn rel_author_link_wins_over_plain_text() {
        let doc = Document::from(
            r#"<div class="byline">By <a rel="author" href="/author/jane-doe/">Jane Doe</a></div>"#,
        );
        let authors = extract_authors(&doc, &[], None, &[], &Logger::null());
        assert_eq!(authors.len(), 1);
        assert_eq!(authors[0].name, "Jane Doe");
        assert_eq!(authors[0].rellink.as_deref(), Some("/author/jane-doe/"));
    }

    #[test]
    fn social_share_block_is_excluded_via_cruft() {
        let doc = Document::from(
            r#"<div class="share-tools"><span class="byline">By Jane Doe</span></div>"#,
        );
        let cruft = doc.select(".share-tools");
        let cruft_blocks: Vec<Selection> = cruft.iter().collect();
        let authors = extract_authors(&doc, &[], None, &cruft_blocks, &Logger::null());
        assert!(authors.is_empty());
    }
}

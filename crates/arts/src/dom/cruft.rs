// ABOUTME: Cruft-block detector: ads, sidebars, related-article rails, social-share widgets.
// ABOUTME: Ports cruft.go/social.go's generic and social-media candidate passes.

use dom_query::{Document, NodeId};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::candidate::{Candidate, CandidateList};
use crate::logger::Logger;
use crate::node::{contains, get_attr};

static CRUFT_INDICATIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:combx|comment|community|departments|disqus|livefyre|remark|rss|shoutbox|sidebar|sponsor|ad-break|agegate|pagination|pager|popup|promo|rhs|sidebar|sponsor|shopping|tweet|twitter|facebook|trending)\b",
    )
    .unwrap()
});

static LIKELY_SHARE_CONTAINER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)social|share|sharing|sharetools").unwrap());

const SHARE_LINK_INDICATIVE: &[&str] = &[
    "plus.google.com",
    "facebook.com",
    "twitter.com",
    "pinterest.com",
    "linkedin.com",
    "mailto:",
    "whatsapp:",
];

/// All cruft-block node ids found in the document: the generic indicative-class
/// pass unioned with the social-share pass, with no cross-detector dedup.
pub fn find_cruft(doc: &Document, dbug: &Logger) -> Vec<NodeId> {
    let containers = doc.select("ul,div");
    let mut candidates: CandidateList = CandidateList::new();

    for el in containers.iter() {
        let class = get_attr(&el, "class");
        let id = get_attr(&el, "id");
        if CRUFT_INDICATIVE.is_match(&class) || CRUFT_INDICATIVE.is_match(&id) {
            let mut c = Candidate::from_node(el);
            c.add_points(3.0, "cruft indicative");
            candidates.push(c);
        }
    }
    candidates.sort();

    dbug.write_line(&format!("cruft blocks: {} candidates", candidates.len()));
    for c in candidates.iter() {
        dbug.write_line(&c.dump_string());
    }

    let mut cruft: Vec<NodeId> = candidates
        .iter()
        .filter_map(|c| crate::node::node_id(c.node()))
        .collect();

    let social = find_social_media_share_blocks(doc, dbug);
    dbug.write_line(&format!("social blocks: {} candidates", social.len()));
    for c in social.iter() {
        dbug.write_line(&c.dump_string());
    }
    for c in social.iter() {
        if let Some(id) = crate::node::node_id(c.node()) {
            cruft.push(id);
        }
    }

    cruft
}

fn find_social_media_share_blocks<'a>(doc: &'a Document, _dbug: &Logger) -> CandidateList<'a> {
    let containers = doc.select("ul,div");
    let mut candidates: CandidateList = CandidateList::new();

    for el in containers.iter() {
        let class = get_attr(&el, "class");
        let id = get_attr(&el, "id");
        if LIKELY_SHARE_CONTAINER.is_match(&class) || LIKELY_SHARE_CONTAINER.is_match(&id) {
            let mut c = Candidate::from_node(el);
            c.add_points(1.0, "likely share container");
            candidates.push(c);
        }
    }

    for c in candidates.iter_mut() {
        let links = c.node().select("a");
        for a in links.iter() {
            let href = get_attr(&a, "href").to_lowercase();
            for frag in SHARE_LINK_INDICATIVE {
                if href.contains(frag) {
                    c.add_points(2.0, "contains share link");
                }
            }
        }
    }

    let survivors: Vec<Candidate> = candidates
        .into_vec()
        .into_iter()
        .filter(|c| c.total() >= 4.0)
        .collect();

    // remove outermost container if nested inside another surviving candidate
    let kept: Vec<Candidate> = survivors
        .iter()
        .enumerate()
        .filter(|(i, c)| {
            !survivors
                .iter()
                .enumerate()
                .any(|(j, c2)| *i != j && contains(c.node(), c2.node()))
        })
        .map(|(_, c)| c.clone())
        .collect();

    let mut candidates = CandidateList::new();
    for c in kept {
        candidates.push(c);
    }
    candidates.sort();
    candidates
}

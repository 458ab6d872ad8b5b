// ABOUTME: Content extraction phases A-C: paragraph scoring, link-density scaling, top-candidate
// ABOUTME: selection and sibling gathering. Ports arts/content.go's Readability-derived algorithm.

use std::collections::HashMap;

use dom_query::{Document, NodeId, Selection};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::candidate::{Candidate, CandidateList};
use crate::node::{get_attr, get_text_content, node_id, parent, tag_name};

static POSITIVE_CLASS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)article|body|content|entry|hentry|main|page|pagination|post|text|blog|story").unwrap()
});
static NEGATIVE_CLASS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)combx|comment|com-|contact|foot|footer|footnote|masthead|media|meta|outbrain|promo|related|scroll|shoutbox|sidebar|sponsor|shopping|tags|tool|widget",
    )
    .unwrap()
});

/// `getClassWeight`: +25/-25 per matching class/id attribute, independently.
pub(crate) fn class_weight(sel: &Selection) -> f64 {
    let mut weight = 0.0;
    for attr_name in ["class", "id"] {
        let val = get_attr(sel, attr_name);
        if val.is_empty() {
            continue;
        }
        if NEGATIVE_CLASS_RE.is_match(&val) {
            weight -= 25.0;
        }
        if POSITIVE_CLASS_RE.is_match(&val) {
            weight += 25.0;
        }
    }
    weight
}

/// `initializeNode`'s per-tag base score.
fn tag_score(tag: &str) -> f64 {
    match tag {
        "article" => 8.0,
        "div" => 5.0,
        "pre" | "td" | "blockquote" => 3.0,
        "address" | "ol" | "ul" | "dl" | "dd" | "li" | "form" => -3.0,
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "th" => -5.0,
        _ => 0.0,
    }
}

/// Per-node scoring state, keyed by node identity so a node touched by
/// multiple paragraphs (as parent of one, grandparent of another)
/// accumulates a single running total, matching the Go original's
/// `map[*html.Node]*candidate`.
pub struct ContentScores<'a> {
    map: HashMap<NodeId, Candidate<'a>>,
}

impl<'a> ContentScores<'a> {
    fn new() -> Self {
        Self { map: HashMap::new() }
    }

    fn get_or_init(&mut self, sel: &Selection<'a>) -> &mut Candidate<'a> {
        let id = node_id(sel).expect("element node");
        self.map.entry(id).or_insert_with(|| {
            let tag = tag_name(sel);
            let mut c = Candidate::from_node(sel.clone());
            c.add_points(tag_score(&tag), &format!("initial score for <{}>", tag));
            let cw = class_weight(sel);
            if cw != 0.0 {
                c.add_points(cw, "class/id weight");
            }
            c
        })
    }

    pub fn get(&self, id: &NodeId) -> Option<&Candidate<'a>> {
        self.map.get(id)
    }

    pub fn into_candidate_list(self) -> CandidateList<'a> {
        let mut list = CandidateList::new();
        for (_, c) in self.map {
            list.push(c);
        }
        list.sort();
        list
    }
}

/// Phase A: score every `p`/`td`/`pre` with at least 25 characters of text,
/// propagating the full score to its parent and half to its grandparent.
pub fn score_paragraphs<'a>(doc: &'a Document) -> ContentScores<'a> {
    let mut scores = ContentScores::new();

    for p in doc.select("p,td,pre").iter() {
        let text = get_text_content(&p);
        let trimmed = text.trim();
        if trimmed.chars().count() < 25 {
            continue;
        }

        let commas = trimmed.matches(',').count() as f64;
        let content_score = 1.0 + commas + (trimmed.chars().count() as f64 / 100.0).min(3.0);

        let grandparent = parent(&p).and_then(|par| {
            {
                let c = scores.get_or_init(&par);
                c.add_points(content_score, "paragraph score");
            }
            parent(&par)
        });
        if let Some(grand) = grandparent {
            let c = scores.get_or_init(&grand);
            c.add_points(content_score / 2.0, "paragraph score (grandparent)");
        }
    }

    scores
}

/// Ratio of anchor text length to total text length within `sel`.
pub fn link_density(sel: &Selection) -> f64 {
    let total_len = get_text_content(sel).trim().chars().count();
    if total_len == 0 {
        return 0.0;
    }
    let link_len: usize = sel
        .select("a")
        .iter()
        .map(|a| get_text_content(&a).trim().chars().count())
        .sum();
    link_len as f64 / total_len as f64
}

/// Phase B: scale every scored node's total by `1 - link_density`.
pub fn scale_by_link_density(scores: &mut ContentScores) {
    for c in scores.map.values_mut() {
        let density = link_density(c.node());
        c.scale_points(1.0 - density, "link density");
    }
}

/// Phase C (part 1): the single highest-scoring node, after B's scaling.
pub fn top_candidate<'a>(scores: &ContentScores<'a>) -> Option<Candidate<'a>> {
    scores
        .map
        .values()
        .cloned()
        .fold(None, |best: Option<Candidate<'a>>, c| match best {
            Some(b) if b.total() >= c.total() => Some(b),
            _ => Some(c),
        })
}

/// Phase C (part 2): gather the top candidate's siblings that are
/// plausibly part of the same article, per `max(10, 0.2*top.total())`.
/// A sibling already scored at or above threshold is always kept; an
/// unscored `p` sibling is kept on the same long-text/low-density or
/// short-text/no-link/sentence-terminated heuristics as the scored pass.
pub fn gather_siblings<'a>(top: &Candidate<'a>, scores: &ContentScores<'a>) -> Vec<Selection<'a>> {
    let mut out = vec![top.node().clone()];
    let top_id = match node_id(top.node()) {
        Some(id) => id,
        None => return out,
    };
    let threshold = (10.0_f64).max(0.2 * top.total());

    let parent_sel = match parent(top.node()) {
        Some(p) => p,
        None => return out,
    };

    for sib in parent_sel.children().iter() {
        let sib_id = match node_id(&sib) {
            Some(id) => id,
            None => continue,
        };
        if sib_id == top_id {
            continue;
        }
        let tag = tag_name(&sib);
        if tag != "p" && tag != "div" {
            continue;
        }

        if let Some(c) = scores.get(&sib_id) {
            if c.total() >= threshold {
                out.push(sib);
                continue;
            }
        }

        if tag == "p" {
            let text = get_text_content(&sib);
            let trimmed = text.trim();
            let len = trimmed.chars().count();
            let density = link_density(&sib);
            if len > 80 && density < 0.25 {
                out.push(sib);
            } else if len > 0 && len <= 80 && density == 0.0 && trimmed.contains('.') {
                out.push(sib);
            }
        }
    }

    out
}

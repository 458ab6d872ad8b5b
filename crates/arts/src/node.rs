// ABOUTME: Node-identity and text-normalization helpers shared by every extractor.
// ABOUTME: Ports util.go's string normalization, ancestor-walking, and node-description helpers.

use dom_query::{NodeId, NodeRef, Selection};
use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static NON_ALPHANUMERIC_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-zA-Z0-9 ]+").unwrap());
static SLUG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)((?:[a-z0-9]+[-_])+(?:[a-z0-9]+?))(?:[.][a-z0-9]{3,5})?$").unwrap()
});

/// Collapse runs of whitespace to a single space and trim the ends.
pub fn compress_space(s: &str) -> String {
    WHITESPACE_RE.replace_all(s.trim(), " ").to_string()
}

/// NFKD-normalize, lowercase, then collapse whitespace.
pub fn normalise_text(s: &str) -> String {
    let folded: String = s.nfkd().collect();
    compress_space(&folded.to_lowercase())
}

/// NFKD-normalize, drop everything outside ASCII, strip non-alphanumeric (keeping
/// spaces), collapse whitespace, lowercase. Used for slug comparisons.
pub fn to_alphanumeric(s: &str) -> String {
    let folded: String = s.nfkd().collect();
    let ascii_only: String = folded.chars().filter(|c| (*c as u32) < 128).collect();
    let stripped = NON_ALPHANUMERIC_RE.replace_all(&ascii_only, "");
    compress_space(&stripped).to_lowercase()
}

/// Extract the dash/underscore-joined slug segment from a URL's last path
/// component, stripping a trailing file extension if present. Hyphens and
/// underscores are returned verbatim; cooking them into spaces is a
/// headline-specific step, not part of slug extraction itself.
pub fn get_slug(url: &str) -> String {
    let path = url::Url::parse(url)
        .ok()
        .map(|u| u.path().to_string())
        .unwrap_or_else(|| url.to_string());
    let last = path.rsplit('/').find(|s| !s.is_empty()).unwrap_or("");
    match SLUG_RE.captures(last) {
        Some(caps) => caps.get(1).map(|m| m.as_str().to_string()).unwrap_or_default(),
        None => String::new(),
    }
}

pub fn word_count(s: &str) -> usize {
    s.split_whitespace().count()
}

/// Go's (deliberately quirky) jaccard word comparison: the intersection count
/// is computed via membership in a lookup set built from `a`'s words, but `b`'s
/// words are *also* added to that same lookup set as they're scanned, so a
/// repeated word in `b` that matches `a` can inflate the intersection beyond a
/// true set intersection. Preserved as-is rather than corrected.
pub fn jaccard_word_compare(a: &str, b: &str) -> f64 {
    let a_words: Vec<&str> = a.split_whitespace().collect();
    let b_words: Vec<&str> = b.split_whitespace().collect();

    let mut lookup: std::collections::HashSet<&str> = a_words.iter().copied().collect();
    let mut intersect = 0usize;
    let mut union = a_words.len();

    for w in &b_words {
        if lookup.contains(w) {
            intersect += 1;
        } else {
            union += 1;
        }
        lookup.insert(w);
    }

    if union == 0 {
        return 1.0;
    }
    intersect as f64 / union as f64
}

pub fn get_attr(sel: &Selection, name: &str) -> String {
    sel.attr(name).map(|v| v.to_string()).unwrap_or_default()
}

pub fn get_text_content(sel: &Selection) -> String {
    sel.text().to_string()
}

pub fn tag_name(sel: &Selection) -> String {
    sel.nodes()
        .first()
        .and_then(|n| n.node_name())
        .map(|n| n.to_lowercase())
        .unwrap_or_default()
}

/// Get the parent element as a Selection, if any.
pub fn parent<'a>(sel: &Selection<'a>) -> Option<Selection<'a>> {
    let node = sel.nodes().first()?;
    let p = node.parent()?;
    Some(Selection::from(p))
}

/// Walk up from `sel` (starting at its parent, excluding itself) and return
/// every ancestor node.
pub fn parent_nodes<'a>(sel: &Selection<'a>) -> Vec<Selection<'a>> {
    let mut out = Vec::new();
    let mut cur = parent(sel);
    while let Some(p) = cur {
        let next = parent(&p);
        out.push(p);
        cur = next;
    }
    out
}

/// True if `ancestor` is a (non-self, possibly indirect) ancestor of `node`.
pub fn contains(ancestor: &Selection, node: &Selection) -> bool {
    let ancestor_id = match node_id(ancestor) {
        Some(id) => id,
        None => return false,
    };
    let mut cur = node.nodes().first().and_then(|n| n.parent());
    while let Some(n) = cur {
        if n.id == ancestor_id {
            return true;
        }
        cur = n.parent();
    }
    false
}

pub fn node_id(sel: &Selection) -> Option<NodeId> {
    sel.nodes().first().map(|n| n.id)
}

/// Recover a `Selection` for a previously-recorded `NodeId`. Used wherever a
/// node identity was stashed earlier in the pipeline (cruft blocks, score
/// maps) and needs to be turned back into something selectable/mutable.
pub fn select_by_id<'a>(doc: &'a dom_query::Document, id: NodeId) -> Option<Selection<'a>> {
    doc.select("*").iter().find(|s| node_id(s) == Some(id))
}

/// Walk ancestors (starting at `sel` itself) looking for the first one
/// matching `selector`.
pub fn closest<'a>(sel: &Selection<'a>, selector: &str) -> Option<Selection<'a>> {
    if sel.is(selector) {
        return Some(sel.clone());
    }
    let mut cur = parent(sel);
    while let Some(p) = cur {
        if p.is(selector) {
            return Some(p);
        }
        cur = parent(&p);
    }
    None
}

/// Document-order element IDs strictly between `from` and `to` (exclusive),
/// approximated via index position in a `doc.select("*")` linear scan —
/// the only document-order proxy available without raw `NodeRef`
/// first-child/next-sibling traversal. Shared by the author and date
/// extractors' "between headline and first content node" bonus.
pub fn intervening_node_ids(
    doc: &dom_query::Document,
    from: &Selection,
    to: &Selection,
) -> std::collections::HashSet<NodeId> {
    let (from_id, to_id) = match (node_id(from), node_id(to)) {
        (Some(a), Some(b)) => (a, b),
        _ => return std::collections::HashSet::new(),
    };
    let all: Vec<Selection> = doc.select("*").iter().collect();
    let from_idx = all.iter().position(|s| node_id(s) == Some(from_id));
    let to_idx = all.iter().position(|s| node_id(s) == Some(to_id));
    match (from_idx, to_idx) {
        (Some(fi), Some(ti)) if fi < ti => all[fi + 1..ti].iter().filter_map(node_id).collect(),
        _ => std::collections::HashSet::new(),
    }
}

/// Render a Go-style node descriptor: `<tag#id.class1.class2>` for elements
/// (with special meta[name=]/[property=] handling), `{TextNode} "quoted"` for
/// text, `{Comment}`/`{DocumentNode}` otherwise.
pub fn describe_node(sel: &Selection) -> String {
    let node = match sel.nodes().first() {
        Some(n) => n,
        None => return "{DocumentNode}".to_string(),
    };

    if node.is_text() {
        let snippet = snip(&node.text(), 40);
        return format!("{{TextNode}} \"{}\"", snippet);
    }
    if !node.is_element() {
        return "{Comment}".to_string();
    }

    let tag = tag_name(sel);
    if tag.is_empty() {
        return "{DocumentNode}".to_string();
    }

    if tag == "meta" {
        if let Some(name) = sel.attr("name") {
            if !name.is_empty() {
                return format!("<meta[name=\"{}\"]>", name);
            }
        }
        if let Some(prop) = sel.attr("property") {
            if !prop.is_empty() {
                return format!("<meta[property=\"{}\"]>", prop);
            }
        }
    }

    let mut out = format!("<{}", tag);
    if let Some(id) = sel.attr("id") {
        if !id.is_empty() {
            out.push('#');
            out.push_str(&id);
        }
    }
    if let Some(class) = sel.attr("class") {
        for c in class.split_whitespace() {
            out.push('.');
            out.push_str(c);
        }
    }
    out.push('>');
    out
}

pub fn snip(s: &str, max: usize) -> String {
    let s = compress_space(s);
    if s.chars().count() <= max {
        s
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

/// Atoms rendered inline by `headline`/`tidy` text extraction (everything
/// except `<br>`, which is the one inline tag that breaks flow).
pub const INLINE_TAGS: &[&str] = &[
    "a", "em", "strong", "small", "s", "cite", "q", "dfn", "abbr", "time", "code", "var", "samp",
    "kbd", "sub", "sup", "i", "b", "u", "mark", "ruby", "rt", "rp", "bdi", "bdo", "span", "wbr",
    "ins", "del",
];

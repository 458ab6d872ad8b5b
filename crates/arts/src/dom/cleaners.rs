// ABOUTME: Content extraction phase D: conditional and unconditional cruft removal.
// ABOUTME: Ports arts/content.go's removeCruft, in its exact tag-by-tag order.

use dom_query::{Document, NodeId, Selection};

use crate::dom::scoring::{class_weight, link_density};
use crate::node::{get_text_content, select_by_id, tag_name, word_count};

/// Phase D: strip structural cruft from the working tree, in the literal
/// order `removeCruft` uses — later conditional passes see the descendant
/// counts left by earlier removals, so the order is load-bearing, not
/// cosmetic.
pub fn remove_cruft(doc: &Document) {
    zap_conditionally(doc, "form");
    zap_unconditional(doc, "object");
    zap_unconditional(doc, "h1");
    zap_lone_h2(doc);
    zap_unconditional(doc, "iframe");
    zap_conditionally(doc, "table");
    zap_conditionally(doc, "ul");
    zap_conditionally(doc, "div");
}

fn zap_unconditional(doc: &Document, tag: &str) {
    for el in doc.select(tag).iter() {
        el.remove();
    }
}

/// A single `h2` on the page is almost always a subheading worth dropping
/// from the body; more than one is treated as real content structure.
fn zap_lone_h2(doc: &Document) {
    let h2s = doc.select("h2");
    if h2s.length() == 1 {
        for el in h2s.iter() {
            el.remove();
        }
    }
}

fn zap_conditionally(doc: &Document, tag: &str) {
    for el in doc.select(tag).iter() {
        if should_zap_conditionally(&el) {
            el.remove();
        }
    }
}

/// The heuristic bundle `zapConditionally` runs per-candidate: a negative
/// class/id weight is an immediate kill; otherwise the node survives unless
/// its image/list/input/embed density or its link density relative to its
/// weight and content length marks it as boilerplate.
fn should_zap_conditionally(el: &Selection) -> bool {
    let weight = class_weight(el);
    if weight < 0.0 {
        return true;
    }

    let tag = tag_name(el);
    let p_count = el.select("p").length() as i64;
    let img_count = el.select("img").length() as i64;
    let li_count = el.select("li").length() as i64;
    let input_count = el.select("input").length() as i64;
    let embed_count = el.select("embed").length() as i64;
    let text = get_text_content(el);
    let content_length = word_count(text.trim()) as i64;
    let density = link_density(el);

    if img_count > p_count && li_count <= 0 {
        return true;
    }
    if li_count > p_count && tag != "ul" && tag != "ol" {
        return true;
    }
    if p_count > 0 && input_count as f64 > p_count as f64 / 3.0 {
        return true;
    }
    if content_length < 25 && (img_count == 0 || img_count > 2) {
        return true;
    }
    if weight < 25.0 && density > 0.2 {
        return true;
    }
    if weight >= 25.0 && density > 0.5 {
        return true;
    }
    if embed_count > 1 || (embed_count == 1 && content_length < 75) {
        return true;
    }
    false
}

/// Output-assembly step: remove every node the cruft detector flagged
/// (§4.2), by identity, from the final content tree.
pub fn remove_cruft_blocks(doc: &Document, cruft_ids: &[NodeId]) {
    for id in cruft_ids {
        if let Some(sel) = select_by_id(doc, *id) {
            sel.remove();
        }
    }
}

// ABOUTME: Content extraction phase E: sanitize the surviving content HTML to an allow-listed subset.
// ABOUTME: Ports arts/tidy.go's elementWhitelist via ammonia rather than a hand-rolled tree walk.

use std::collections::HashSet;

use ammonia::Builder;
use once_cell::sync::Lazy;

/// `arts/tidy.go`'s `elementWhitelist`: the elements a cleaned article body
/// is allowed to contain. Everything else is unwrapped (its children are
/// kept, the element itself is dropped) rather than deleted outright.
static ELEMENT_WHITELIST: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "a", "abbr", "address", "article", "aside", "b", "blockquote", "br", "caption", "cite",
        "code", "col", "colgroup", "dd", "del", "dfn", "div", "dl", "dt", "em", "figcaption",
        "figure", "footer", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "i", "img", "ins",
        "kbd", "li", "mark", "ol", "p", "pre", "q", "rp", "rt", "ruby", "s", "samp", "section",
        "small", "span", "strong", "sub", "sup", "table", "tbody", "td", "tfoot", "th", "thead",
        "time", "tr", "u", "ul", "var", "wbr",
    ]
    .into_iter()
    .collect()
});

fn builder() -> Builder<'static> {
    let mut b = Builder::default();
    b.tags(ELEMENT_WHITELIST.clone());
    b.add_generic_attributes(["href", "src", "alt", "title", "datetime"]);
    b.strip_comments(true);
    b.link_rel(None);
    b
}

/// Sanitize a content fragment's HTML down to the allow-listed elements,
/// stripping comments and unwrapping (not deleting) disallowed tags so their
/// text survives.
pub fn sanitize_html(html: &str) -> String {
    builder().clean(html).to_string()
}

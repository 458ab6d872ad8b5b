// ABOUTME: Generic meta/attribute/text extraction helpers shared across the candidate extractors.
// ABOUTME: Reimplemented against dom_query so the whole pipeline reads one tree representation.

use dom_query::Document;

use crate::node::compress_space;

/// First non-empty `attr` value from the first selector (tried in order)
/// that matches anything.
pub fn extract_first_attr(doc: &Document, selectors: &[&str], attr: &str) -> Option<String> {
    for sel_str in selectors {
        for el in doc.select(sel_str).iter() {
            if let Some(value) = el.attr(attr) {
                let trimmed = value.trim();
                if !trimmed.is_empty() {
                    return Some(trimmed.to_string());
                }
            }
        }
    }
    None
}

/// The `content` attribute of the first matching `<meta>` element.
pub fn extract_meta_content(doc: &Document, selector: &str) -> Option<String> {
    for el in doc.select(selector).iter() {
        if let Some(content) = el.attr("content") {
            let trimmed = content.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
    }
    None
}

/// First non-empty attribute value from the first matching element.
pub fn extract_attr_first(doc: &Document, selector: &str, attr: &str) -> Option<String> {
    extract_first_attr(doc, &[selector], attr)
}

/// First non-empty text/meta-content match across `selectors`, tried in
/// order. A `meta[...]` selector yields its `content` attribute; anything
/// else yields whitespace-normalized inner text.
pub fn extract_field_text_single(doc: &Document, selectors: &[&str]) -> Option<String> {
    for sel_str in selectors {
        if sel_str.starts_with("meta[") {
            if let Some(value) = extract_meta_content(doc, sel_str) {
                return Some(value);
            }
            continue;
        }
        for el in doc.select(sel_str).iter() {
            let normalized = compress_space(&el.text());
            if !normalized.is_empty() {
                return Some(normalized);
            }
        }
    }
    None
}

pub fn extract_first_text(doc: &Document, selectors: &[&str]) -> Option<String> {
    extract_field_text_single(doc, selectors)
}

/// Normalize a language/locale tag to its primary subtag: "en_US" -> "en".
pub fn normalize_lang(value: &str) -> String {
    value
        .trim()
        .to_lowercase()
        .split(|c| c == '-' || c == '_')
        .next()
        .unwrap_or("")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_HTML: &str = r#"
        <!DOCTYPE html>
        <html>
        <head>
            <meta name="author" content="  Jane Doe  ">
            <meta property="og:image" content="https://example.com/og.jpg">
            <meta name="twitter:image" content="https://example.com/tw.jpg">
            <meta property="article:published_time" content="2024-01-15T10:00:00Z">
        </head>
        <body>
            <span class="byline">By John Smith</span>
            <p class="author">Author: Alice</p>
            <time datetime="2023-12-01T12:00:00Z">December 1, 2023</time>
            <img src="/local.jpg" alt="Local Image">
        </body>
        </html>
    "#;

    fn parse_html() -> Document {
        Document::from(SAMPLE_HTML)
    }

    #[test]
    fn extract_meta_content_author() {
        let doc = parse_html();
        assert_eq!(
            extract_meta_content(&doc, "meta[name=author]"),
            Some("Jane Doe".to_string())
        );
    }

    #[test]
    fn extract_meta_content_not_found() {
        let doc = parse_html();
        assert!(extract_meta_content(&doc, "meta[name=nonexistent]").is_none());
    }

    #[test]
    fn extract_attr_first_datetime() {
        let doc = parse_html();
        assert_eq!(
            extract_attr_first(&doc, "time[datetime]", "datetime"),
            Some("2023-12-01T12:00:00Z".to_string())
        );
    }

    #[test]
    fn extract_attr_first_not_found() {
        let doc = parse_html();
        assert!(extract_attr_first(&doc, "video", "src").is_none());
    }

    #[test]
    fn extract_field_text_single_meta_wins_first() {
        let doc = parse_html();
        let selectors = &["meta[name=author]", ".byline"];
        assert_eq!(
            extract_field_text_single(&doc, selectors),
            Some("Jane Doe".to_string())
        );
    }

    #[test]
    fn extract_field_text_single_falls_back() {
        let doc = parse_html();
        let selectors = &[".nonexistent", ".author"];
        assert_eq!(
            extract_field_text_single(&doc, selectors),
            Some("Author: Alice".to_string())
        );
    }

    #[test]
    fn extract_field_text_single_no_match() {
        let doc = parse_html();
        let selectors = &[".foo", ".bar", ".baz"];
        assert!(extract_field_text_single(&doc, selectors).is_none());
    }

    #[test]
    fn extract_first_attr_fallback_order() {
        let doc = parse_html();
        let selectors = &["meta[name=nonexistent]", "meta[property='og:image']"];
        assert_eq!(
            extract_first_attr(&doc, selectors, "content"),
            Some("https://example.com/og.jpg".to_string())
        );
    }

    #[test]
    fn normalize_lang_underscore_and_hyphen() {
        assert_eq!(normalize_lang("en_US"), "en");
        assert_eq!(normalize_lang("EN-GB"), "en");
        assert_eq!(normalize_lang("  de_AT  "), "de");
        assert_eq!(normalize_lang(""), "");
    }
}

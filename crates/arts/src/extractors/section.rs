// ABOUTME: Section/category extractor: meta tags first, then a small per-host fallback table.
// ABOUTME: Ports arts/section.go, including its worked per-host script/selector fallbacks.

use once_cell::sync::Lazy;
use regex::Regex;

use dom_query::Document;

use crate::extractors::fields::extract_meta_content;
use crate::node::compress_space;

const META_SELECTORS: &[&str] = &[
    "meta[property=\"article:section\"]",
    "meta[name=\"article:section\"]",
    "meta[property=\"og:article:section\"]",
    "meta[name=\"section\"]",
    "meta[name=\"category\"]",
];

static FT_SECTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)"primarySection"\s*:\s*\{\s*"name"\s*:\s*"([^"]+)""#).unwrap()
});
static SKY_SECTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)"section"\s*:\s*"([^"]+)""#).unwrap());

/// A host-specific fallback: either scrape inline `<script>` text with a
/// regex, or pull text out of a DOM selector.
enum HostFallback {
    ScriptRegex(&'static Lazy<Regex>),
    Selector(&'static str),
}

const HOST_FALLBACKS: &[(&str, HostFallback)] = &[
    ("ft.com", HostFallback::ScriptRegex(&FT_SECTION_RE)),
    ("news.sky.com", HostFallback::ScriptRegex(&SKY_SECTION_RE)),
    ("itv.com", HostFallback::Selector("[data-section-name]")),
];

/// Extract the article's section/category, trying generic meta tags first
/// and falling back to a small set of known-host scrapes.
pub fn extract_section(doc: &Document, host: &str, scripts: &[String]) -> Option<String> {
    for sel in META_SELECTORS {
        if let Some(v) = extract_meta_content(doc, sel) {
            return Some(v);
        }
    }

    for (fallback_host, fallback) in HOST_FALLBACKS {
        if !host_matches(host, fallback_host) {
            continue;
        }
        match fallback {
            HostFallback::ScriptRegex(re) => {
                for script in scripts {
                    if let Some(caps) = re.captures(script) {
                        if let Some(m) = caps.get(1) {
                            return Some(compress_space(m.as_str()));
                        }
                    }
                }
            }
            HostFallback::Selector(selector) => {
                if let Some(el) = doc.select(selector).iter().next() {
                    let name = el.attr("data-section-name").map(|v| v.to_string());
                    if let Some(name) = name {
                        if !name.trim().is_empty() {
                            return Some(compress_space(&name));
                        }
                    }
                    let text = compress_space(&el.text());
                    if !text.is_empty() {
                        return Some(text);
                    }
                }
            }
        }
    }

    None
}

fn host_matches(host: &str, pattern: &str) -> bool {
    host == pattern || host.ends_with(&format!(".{}", pattern))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meta_section_wins() {
        let doc = Document::from(
            r#"<html><head><meta property="article:section" content="Politics"></head></html>"#,
        );
        assert_eq!(
            extract_section(&doc, "example.com", &[]),
            Some("Politics".to_string())
        );
    }

    #[test]
    fn ft_fallback_scrapes_inline_script() {
        let doc = Document::from("<html><head></head></html>");
        let scripts = vec![r#"window.__data = {"primarySection":{"name":"Markets"}};"#.to_string()];
        assert_eq!(
            extract_section(&doc, "www.ft.com", &scripts),
            Some("Markets".to_string())
        );
    }

    #[test]
    fn no_section_found() {
        let doc = Document::from("<html><head></head></html>");
        assert_eq!(extract_section(&doc, "example.com", &[]), None);
    }
}

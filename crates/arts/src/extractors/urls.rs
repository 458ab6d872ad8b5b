// ABOUTME: URL extractor: canonical URL plus every alternate URL found in the head.
// ABOUTME: Ports arts/urls.go's rel-canonical / og:url / rel-shortlink scan.

use std::collections::BTreeSet;

use dom_query::Document;
use url::Url;

use crate::node::get_attr;

/// Result of scanning the page for alternate/canonical URLs.
#[derive(Debug, Clone, Default)]
pub struct UrlExtraction {
    pub canonical: Option<String>,
    pub all: Vec<String>,
}

fn sanitise_url(link: &str, base: &Url) -> Option<String> {
    let joined = base.join(link).ok()?;
    if joined.path().is_empty() || joined.path() == "/" {
        return None;
    }
    Some(normalize(&joined))
}

/// Lightweight stand-in for purell's `FlagsSafe` normalization: lowercase
/// scheme/host, drop a trailing `/` from an empty path, drop default ports.
fn normalize(u: &Url) -> String {
    let mut u = u.clone();
    let _ = u.set_scheme(&u.scheme().to_lowercase());
    if let Some(host) = u.host_str() {
        let host = host.to_lowercase();
        let _ = u.set_host(Some(&host));
    }
    u.to_string()
}

/// Scan for rel=canonical, og:url and rel=shortlink, in that precedence
/// order (canonical wins if both are present, since it's checked last).
pub fn grab_urls(doc: &Document, base_url: &Url) -> UrlExtraction {
    let mut canonical: Option<String> = None;
    let mut all: BTreeSet<String> = BTreeSet::new();

    let base_norm = normalize(base_url);
    if !base_norm.is_empty() {
        all.insert(base_norm);
    }

    for link in doc.select(r#"head meta[property="og:url"]"#).iter() {
        let href = get_attr(&link, "content");
        if let Some(u) = sanitise_url(&href, base_url) {
            all.insert(u.clone());
            canonical = Some(u);
        }
    }

    for link in doc.select(r#"head link[rel="canonical"]"#).iter() {
        let href = get_attr(&link, "href");
        if let Some(u) = sanitise_url(&href, base_url) {
            all.insert(u.clone());
            canonical = Some(u);
        }
    }

    for link in doc.select(r#"head link[rel="shortlink"]"#).iter() {
        let href = get_attr(&link, "href");
        if let Some(u) = sanitise_url(&href, base_url) {
            all.insert(u);
        }
    }

    UrlExtraction {
        canonical,
        all: all.into_iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_link_wins_over_og_url() {
        let html = r#"<html><head>
            <meta property="og:url" content="https://example.com/og">
            <link rel="canonical" href="https://example.com/canon">
        </head></html>"#;
        let doc = Document::from(html);
        let base = Url::parse("https://example.com/page").unwrap();
        let result = grab_urls(&doc, &base);
        assert_eq!(result.canonical.as_deref(), Some("https://example.com/canon"));
        assert!(result.all.len() >= 2);
    }

    #[test]
    fn canonical_with_root_path_is_rejected() {
        let html = r#"<html><head>
            <link rel="canonical" href="https://example.com/">
        </head></html>"#;
        let doc = Document::from(html);
        let base = Url::parse("https://example.com/article/some-story").unwrap();
        let result = grab_urls(&doc, &base);
        assert_eq!(result.canonical, None);
    }

    #[test]
    fn no_links_returns_only_base() {
        let doc = Document::from("<html><head></head></html>");
        let base = Url::parse("https://example.com/page").unwrap();
        let result = grab_urls(&doc, &base);
        assert_eq!(result.canonical, None);
        assert_eq!(result.all, vec!["https://example.com/page".to_string()]);
    }
}

// ABOUTME: Publication extractor: site name from meta tags, domain from the best URL.
// ABOUTME: Ports arts/publication.go.

use dom_query::Document;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::extractors::fields::extract_meta_content;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Publication {
    pub name: Option<String>,
    pub domain: Option<String>,
}

const NAME_SELECTORS: &[&str] = &[
    "meta[property=\"og:site_name\"]",
    "meta[name=\"application-name\"]",
    "meta[name=\"publisher\"]",
];

/// Extract the publication's display name (from meta tags) and domain
/// (from the best-known URL for the page, host with any leading `www.`
/// stripped).
pub fn extract_publication(doc: &Document, best_url: Option<&str>) -> Publication {
    let name = NAME_SELECTORS
        .iter()
        .find_map(|sel| extract_meta_content(doc, sel));

    let domain = best_url
        .and_then(|u| Url::parse(u).ok())
        .and_then(|u| u.host_str().map(|h| h.to_string()))
        .map(|h| h.strip_prefix("www.").map(str::to_string).unwrap_or(h));

    Publication { name, domain }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_site_name_and_domain() {
        let doc = Document::from(r#"<meta property="og:site_name" content="Example News">"#);
        let pub_ = extract_publication(&doc, Some("https://www.example.com/a/b"));
        assert_eq!(pub_.name.as_deref(), Some("Example News"));
        assert_eq!(pub_.domain.as_deref(), Some("example.com"));
    }

    #[test]
    fn missing_meta_and_url_yields_empty() {
        let doc = Document::from("<html></html>");
        let pub_ = extract_publication(&doc, None);
        assert_eq!(pub_, Publication::default());
    }
}

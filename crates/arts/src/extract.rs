// ABOUTME: Top-level pipeline orchestrator: wires every extractor into one Article.
// ABOUTME: Ports arts/core.go's ExtractFromTree, in its reconciled step order (§2).

use dom_query::Document;
use url::Url;

use crate::config::Config;
use crate::dom;
use crate::error::ParseError;
use crate::extractors::{author, content, dates, headline, keywords, publication, section, urls};
use crate::node::select_by_id;
use crate::resource::decode_resource;
use crate::result::Article;

/// Run the full extraction pipeline against an already-parsed document.
///
/// `source_url` anchors relative links and feeds the host-specific
/// section/date fallback tables; it need not be fetchable (WARC/file input
/// both carry a URL for this purpose without requiring network access).
pub fn extract(doc: &Document, source_url: &str, config: &Config) -> Article {
    let base = Url::parse(source_url).ok();
    let host = base
        .as_ref()
        .and_then(|u| u.host_str())
        .unwrap_or_default()
        .to_string();

    // Step 1: strip scripts, keeping their markup for the date extractor's
    // per-host scraping fallback, then find cruft blocks before anything
    // else touches the tree so later extractors can use them as a negative
    // signal.
    let scripts = dom::prepare(doc);
    let cruft_ids = dom::find_cruft(doc, &config.debug.cruft);

    // Step 2: URLs.
    let url_extraction = base
        .as_ref()
        .map(|b| urls::grab_urls(doc, b))
        .unwrap_or_default();
    let best_url = url_extraction
        .canonical
        .clone()
        .or_else(|| url_extraction.all.first().cloned())
        .or_else(|| Some(source_url.to_string()))
        .filter(|s| !s.is_empty());

    // Step 3: section, honoring caller-supplied host overrides before the
    // built-in per-host fallback table.
    let section = config
        .section_host_overrides
        .get(&host)
        .cloned()
        .or_else(|| section::extract_section(doc, &host, &scripts));

    // Step 4: publication, depends on the best URL from step 2.
    let publication = publication::extract_publication(doc, best_url.as_deref());

    // Step 5: keywords.
    let keywords = keywords::extract_keywords(doc);

    // Step 6: headline. Keep the winning node around as the document-order
    // anchor for the authors/dates "betwixt headline and content" bonus.
    let headline_result = headline::extract_headline(doc, source_url);
    let headline = headline_result.text;

    // Step 7: content phases A-C (D/E deferred to step 10).
    let content_result = content::extract_content(doc);
    let content_nodes: Vec<_> = content_result
        .as_ref()
        .map(|r| r.nodes.clone())
        .unwrap_or_default();
    let cruft_blocks: Vec<_> = cruft_ids
        .iter()
        .filter_map(|&id| select_by_id(doc, id))
        .collect();

    // Step 8: authors, consuming the cruft blocks as a negative signal.
    let authors = author::extract_authors(
        doc,
        &content_nodes,
        headline_result.node.as_ref(),
        &cruft_blocks,
        &config.debug.authors,
    );

    // Step 9: dates, consuming the retained script side-list and cruft blocks.
    let dates_result = dates::extract_dates(
        doc,
        source_url,
        &host,
        &scripts,
        &content_nodes,
        headline_result.node.as_ref(),
        &cruft_blocks,
        &config.debug.dates,
    );

    // Step 10: output assembly. Remove cruft blocks from the tree, run
    // Phase D's conditional cleaning, sanitize, then re-serialize.
    dom::remove_cruft_blocks(doc, &cruft_ids);
    dom::remove_cruft(doc);
    let raw_html = content_result
        .as_ref()
        .map(|r| content::render_content_html(&r.nodes))
        .unwrap_or_default();
    let content_html = dom::sanitize_html(&raw_html);

    Article {
        canonical_url: url_extraction.canonical,
        urls: url_extraction.all,
        headline,
        authors,
        content: content_html,
        published: dates_result.published,
        updated: dates_result.updated,
        publication,
        keywords,
        section,
    }
}

/// Convenience wrapper: decode `raw_html` (following the encoding contract
/// in `resource::decode_resource`), parse it, and delegate to [`extract`].
pub fn extract_from_bytes(
    raw_html: &[u8],
    content_type: Option<&str>,
    source_url: &str,
    config: &Config,
) -> Result<Article, ParseError> {
    let html = decode_resource(raw_html, content_type);
    let doc = Document::from(html.as_str());
    Ok(extract(&doc, source_url, config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_headline_and_canonical_from_minimal_page() {
        let html = r#"
            <html><head>
              <link rel="canonical" href="https://example.com/a/article">
              <meta property="og:title" content="A Great Headline">
            </head><body>
              <h1>A Great Headline</h1>
              <p>This is the first paragraph of the article, long enough to score.</p>
              <p>This is the second paragraph, also long enough to score well here.</p>
            </body></html>
        "#;
        let doc = Document::from(html);
        let config = Config::default();
        let article = extract(&doc, "https://example.com/a/article", &config);

        assert_eq!(
            article.canonical_url.as_deref(),
            Some("https://example.com/a/article")
        );
        assert_eq!(article.headline.as_deref(), Some("A Great Headline"));
        assert!(!article.content.is_empty());
    }

    #[test]
    fn empty_document_yields_empty_article() {
        let doc = Document::from("<html><body></body></html>");
        let config = Config::default();
        let article = extract(&doc, "https://example.com/", &config);
        assert!(article.is_empty());
    }

    #[test]
    fn extract_from_bytes_decodes_then_extracts() {
        let html = b"<html><head><title>Hi</title></head><body><h1>Hi</h1><p>Some body copy that is long enough to be scored as real content here.</p></body></html>";
        let config = Config::default();
        let article = extract_from_bytes(html, Some("text/html; charset=utf-8"), "https://example.com/x", &config)
            .expect("should extract");
        assert!(!article.is_empty());
    }
}

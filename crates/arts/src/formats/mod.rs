// ABOUTME: Output serialization for a parsed Article: YAML front matter + `---` + content HTML.
// ABOUTME: Ports the CLI output format described in §6, grounded in the teacher's serde_yaml use.

use crate::result::Article;

/// Render an `Article` the way the CLI prints it: the metadata fields (every
/// field except `content`) as a YAML document, then a lone `---` line, then
/// the content HTML unchanged.
pub fn render_front_matter(article: &Article) -> Result<String, serde_yaml::Error> {
    let front = FrontMatter::from(article);
    let yaml = serde_yaml::to_string(&front)?;
    Ok(format!("{}---\n{}", yaml, article.content))
}

/// The metadata half of the output: every `Article` field except `content`,
/// which is emitted separately below the `---` marker.
#[derive(serde::Serialize)]
struct FrontMatter<'a> {
    canonical_url: &'a Option<String>,
    urls: &'a Vec<String>,
    headline: &'a Option<String>,
    authors: &'a Vec<crate::extractors::author::Author>,
    published: &'a Option<String>,
    updated: &'a Option<String>,
    publication: &'a crate::extractors::publication::Publication,
    keywords: &'a Vec<crate::extractors::keywords::Keyword>,
    section: &'a Option<String>,
}

impl<'a> From<&'a Article> for FrontMatter<'a> {
    fn from(a: &'a Article) -> Self {
        Self {
            canonical_url: &a.canonical_url,
            urls: &a.urls,
            headline: &a.headline,
            authors: &a.authors,
            published: &a.published,
            updated: &a.updated,
            publication: &a.publication,
            keywords: &a.keywords,
            section: &a.section,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_front_matter_then_separator_then_content() {
        let article = Article {
            headline: Some("Title".to_string()),
            content: "<p>Body</p>".to_string(),
            ..Default::default()
        };
        let rendered = render_front_matter(&article).expect("should render");
        assert!(rendered.contains("headline: Title"));
        assert!(rendered.contains("---\n<p>Body</p>"));
    }

    #[test]
    fn empty_article_still_renders_separator() {
        let article = Article::default();
        let rendered = render_front_matter(&article).expect("should render");
        assert!(rendered.ends_with("---\n"));
    }
}

// ABOUTME: Date extractor: published/updated candidate pools scored, reconciled, and merged.
// ABOUTME: Ports arts/dates.go's two-parallel-ranking (publishedC/updatedC) scoring and TopDate() selection.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use dom_query::{Document, Selection};

use crate::candidate::{Candidate, DateCandidate, DateCandidateList};
use crate::fuzzydate::{self, FuzzyDate, FuzzyDateTime};
use crate::logger::Logger;
use crate::node::{
    closest, compress_space, contains, get_attr, intervening_node_ids, node_id, parent, tag_name,
};

const META_PUBLISHED: &[&str] = &[
    "meta[property=\"article:published_time\"]",
    "meta[name=\"dashboard_published_date\"]",
    "meta[name=\"publishDate\"]",
    "meta[name=\"DC.date.issued\"]",
    "meta[name=\"DCSext.articleFirstPublished\"]",
    "meta[name=\"DCTERMS.created\"]",
    "meta[name=\"dcterms.created\"]",
    "meta[name=\"DCTERMS.date\"]",
    "meta[name=\"dcterms.date\"]",
];

const META_UPDATED: &[&str] = &[
    "meta[property=\"article:modified_time\"]",
    "meta[name=\"DCTERMS.modified\"]",
    "meta[name=\"dashboard_updated_date\"]",
    "meta[name=\"last-modified\"]",
];

const DATE_TAGS_SELECTOR: &str = "time,abbr,span,div,p,li,dl,dd";

/// `datePats.genericClasses`/`publishedClasses`/`updatedClasses` from
/// `dates.go`. Exposed `pub(crate)` so the headline extractor's inline
/// timestamp exclusion (§4.7) can reuse the same patterns.
pub(crate) static DATE_GENERIC_CLASS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)updated|date|time|fecha").unwrap());
pub(crate) static DATE_PUBLISHED_CLASS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)published").unwrap());
pub(crate) static DATE_UPDATED_CLASS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)modified|updated").unwrap());

static PUBLISHED_INDICATIVE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)published|posted|created").unwrap());
static UPDATED_INDICATIVE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)updated|last modified").unwrap());

static URL_DATE_FULL_SLASH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/(?P<year>\d{4})/(?P<month>\d{2})/(?P<day>\d{2})(?:/|$)").unwrap());
static URL_DATE_DASHED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/(?P<year>\d{4})-(?P<month>\d{2})-(?P<day>\d{2})(?:/|$)").unwrap());
static URL_DATE_YEAR_MONTH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/(?P<year>\d{4})/(?P<month>\d{2})(?:/|$)").unwrap());

static BUZZFEED_PUBLISHED_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"(?i)published:\s+"(.*?)""#).unwrap());

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatesResult {
    pub published: Option<String>,
    pub updated: Option<String>,
}

fn first_full_date_meta(doc: &Document, selectors: &[&str]) -> Option<FuzzyDateTime> {
    for sel in selectors {
        for el in doc.select(sel).iter() {
            let content = get_attr(&el, "content");
            if content.is_empty() {
                continue;
            }
            let (dt, _) = fuzzydate::extract(&content);
            if dt.has_full_date() {
                return Some(dt);
            }
        }
    }
    None
}

fn url_date(url: &str) -> Option<FuzzyDate> {
    for re in [&*URL_DATE_FULL_SLASH, &*URL_DATE_DASHED] {
        if let Some(caps) = re.captures(url) {
            return Some(FuzzyDate {
                year: caps.name("year").and_then(|m| m.as_str().parse().ok()),
                month: caps.name("month").and_then(|m| m.as_str().parse().ok()),
                day: caps.name("day").and_then(|m| m.as_str().parse().ok()),
            });
        }
    }
    URL_DATE_YEAR_MONTH.captures(url).map(|caps| FuzzyDate {
        year: caps.name("year").and_then(|m| m.as_str().parse().ok()),
        month: caps.name("month").and_then(|m| m.as_str().parse().ok()),
        day: None,
    })
}

/// `dates.go`'s evil-special-case hack: buzzfeed.com pages bury the
/// published date in an inline script's `published: "..."` field rather
/// than any meta tag.
fn buzzfeed_script_date(host: &str, scripts: &[String]) -> Option<FuzzyDateTime> {
    if !host.ends_with("buzzfeed.com") {
        return None;
    }
    for script in scripts {
        if let Some(caps) = BUZZFEED_PUBLISHED_RE.captures(script) {
            if let Some(m) = caps.get(1) {
                let (dt, _) = fuzzydate::extract(m.as_str());
                if !dt.empty() {
                    return Some(dt);
                }
            }
        }
    }
    None
}

/// All candidates tied for the top score must be pairwise non-conflicting
/// for the field to be usable; if they disagree, the field is left unset
/// rather than picking an arbitrary winner.
fn top_date(list: &DateCandidateList) -> Option<FuzzyDateTime> {
    let top = list.best();
    if top.is_empty() {
        return None;
    }
    for i in 0..top.len() {
        for j in (i + 1)..top.len() {
            if top[i].dt.conflicts(&top[j].dt) {
                return None;
            }
        }
    }
    let mut merged = top[0].dt;
    for c in &top[1..] {
        merged.date.merge(&c.dt.date);
    }
    Some(merged)
}

fn candidate_text(node: &Selection, tag: &str) -> Option<String> {
    let txt = match tag {
        "time" => {
            let dt_attr = get_attr(node, "datetime");
            if !dt_attr.is_empty() {
                dt_attr
            } else {
                compress_space(&node.text())
            }
        }
        "abbr" => {
            let title = get_attr(node, "title");
            if !title.is_empty() {
                title
            } else {
                compress_space(&node.text())
            }
        }
        _ => {
            let timestamp = get_attr(node, "data-timestamp");
            match timestamp.parse::<i64>().ok().and_then(fuzzydate::format_unix_seconds) {
                Some(formatted) => formatted,
                None => compress_space(&node.text()),
            }
        }
    };
    if txt.len() < 6 || txt.len() > 150 {
        None
    } else {
        Some(txt)
    }
}

/// Extract published/updated dates for a page: a shared DOM candidate pool
/// (`time,abbr,span,div,p,li,dl,dd`) scored independently into a
/// `publishedC`/`updatedC` pair per node, reconciled via [`top_date`], with
/// meta tags, the URL path, and a per-host script-scraping hack as
/// fallbacks.
#[allow(clippy::too_many_arguments)]
pub fn extract_dates<'a>(
    doc: &'a Document,
    url: &str,
    host: &str,
    scripts: &[String],
    content_nodes: &[Selection<'a>],
    headline_node: Option<&Selection<'a>>,
    cruft_blocks: &[Selection<'a>],
    dbug: &Logger,
) -> DatesResult {
    let meta_published = first_full_date_meta(doc, META_PUBLISHED);
    let meta_updated = first_full_date_meta(doc, META_UPDATED);

    // Step 3 early return: both meta dates are already unambiguous, so the
    // DOM candidate scan (and its betwixt bonus) is pure overhead.
    if meta_published.as_ref().is_some_and(|d| d.has_full_date())
        && meta_updated.as_ref().is_some_and(|d| d.has_full_date())
    {
        return DatesResult {
            published: meta_published.map(|d| d.iso_format()).filter(|s| !s.is_empty()),
            updated: meta_updated.map(|d| d.iso_format()).filter(|s| !s.is_empty()),
        };
    }

    let resolved_url_date = url_date(url);
    let evil_published = buzzfeed_script_date(host, scripts);

    let intervening = match (headline_node, content_nodes.first()) {
        (Some(h), Some(c)) => intervening_node_ids(doc, h, c),
        _ => HashSet::new(),
    };
    let mut betwixt_value = 1.0f64;

    let mut published_candidates: DateCandidateList = DateCandidateList::new();
    let mut updated_candidates: DateCandidateList = DateCandidateList::new();

    for node in doc.select(DATE_TAGS_SELECTOR).iter() {
        let tag = tag_name(&node);
        let txt = match candidate_text(&node, &tag) {
            Some(t) => t,
            None => continue,
        };
        let (dt, spans) = fuzzydate::extract(&txt);
        if dt.empty() {
            continue;
        }
        if tag == "p" {
            let covered: usize = spans.iter().map(|s| s.end.saturating_sub(s.start)).sum();
            let proportion = covered as f64 / txt.len() as f64;
            if proportion < 0.5 {
                continue;
            }
        }
        let mut dt = dt;

        let mut published_c = Candidate::new(node.clone(), txt.clone());
        let mut updated_c = Candidate::new(node.clone(), txt.clone());

        if dt.has_full_date() && dt.has_hour_minute() {
            published_c.add_points(0.75, "full date+time");
            updated_c.add_points(0.75, "full date+time");
        }
        if dt.date.empty() {
            published_c.add_points(-0.5, "no date");
            updated_c.add_points(-0.5, "no date");
        }
        if tag == "time" {
            published_c.add_points(1.0, "machine-readable <time>");
            updated_c.add_points(1.0, "machine-readable <time>");
        }
        if PUBLISHED_INDICATIVE_RE.is_match(&txt) {
            published_c.add_points(1.0, "indicative text");
        }
        if UPDATED_INDICATIVE_RE.is_match(&txt) {
            updated_c.add_points(1.0, "indicative text");
        }

        let in_hentry = closest(&node, ".hentry").is_some();
        if in_hentry && node.is(".published") {
            published_c.add_points(2.0, "hentry .published");
        }
        // Preserves dates.go's literal quirk: the hAtom .updated match also
        // scores publishedC, not updatedC (see DESIGN.md).
        if in_hentry && node.is(".updated") {
            published_c.add_points(2.0, "hentry .updated");
        }

        let class = get_attr(&node, "class");
        let id = get_attr(&node, "id");
        if DATE_GENERIC_CLASS_RE.is_match(&class) {
            published_c.add_points(1.0, "likely class");
            updated_c.add_points(1.0, "likely class");
        }
        if DATE_GENERIC_CLASS_RE.is_match(&id) {
            published_c.add_points(1.0, "likely id");
            updated_c.add_points(1.0, "likely id");
        }
        if DATE_PUBLISHED_CLASS_RE.is_match(&class) || DATE_PUBLISHED_CLASS_RE.is_match(&id) {
            published_c.add_points(1.0, "published class/id");
        }
        if DATE_UPDATED_CLASS_RE.is_match(&class) || DATE_UPDATED_CLASS_RE.is_match(&id) {
            updated_c.add_points(1.0, "updated class/id");
        }

        let property = get_attr(&node, "property");
        if property == "dc:issued" || property == "dc:created" {
            published_c.add_points(1.0, "rdfa");
        }
        if property == "dc:updated" {
            updated_c.add_points(1.0, "rdfa");
        }

        if content_nodes.iter().any(|cn| contains(cn, &node)) {
            published_c.add_points(1.0, "contained within content");
            updated_c.add_points(1.0, "contained within content");
        }
        let near_content = content_nodes.iter().any(|cn| match parent(cn) {
            Some(p) => contains(&p, &node) || node_id(&p) == node_id(&node),
            None => false,
        });
        if near_content {
            published_c.add_points(1.0, "near content");
            updated_c.add_points(1.0, "near content");
        }

        let in_cruft = cruft_blocks
            .iter()
            .any(|b| node_id(b) == node_id(&node) || contains(b, &node));
        if in_cruft {
            published_c.add_points(-3.0, "inside cruft");
            updated_c.add_points(-3.0, "inside cruft");
        }

        if let Some(nid) = node_id(&node) {
            if intervening.contains(&nid) {
                published_c.add_points(betwixt_value, "between headline and content");
                updated_c.add_points(betwixt_value, "between headline and content");
                betwixt_value *= 0.9;
            }
        }

        if let Some(u) = &resolved_url_date {
            if dt.date.conflicts(u) {
                published_c.add_points(-1.0, "clash with date in url");
                updated_c.add_points(-1.0, "clash with date in url");
            } else {
                dt.date.merge(u);
            }
        }

        if published_c.total() > 0.0 {
            published_candidates.push(DateCandidate { candidate: published_c, dt });
        }
        if updated_c.total() > 0.0 {
            updated_candidates.push(DateCandidate { candidate: updated_c, dt });
        }
    }
    published_candidates.sort();
    updated_candidates.sort();

    for c in published_candidates.iter().chain(updated_candidates.iter()) {
        dbug.write_line(&c.candidate.dump_string());
    }

    let mut published = top_date(&published_candidates);
    if published.is_none() {
        published = meta_published.filter(|d| d.has_full_date());
    }
    if published.is_none() {
        published = resolved_url_date.map(|date| FuzzyDateTime { date, time: Default::default() });
    }
    if published.is_none() {
        published = evil_published;
    }

    let mut updated = if meta_updated.as_ref().is_some_and(|d| d.has_full_date()) {
        meta_updated
    } else {
        top_date(&updated_candidates)
    };
    if let Some(u) = &mut updated {
        if u.has_hour_minute() && u.date.empty() {
            if let Some(p) = &published {
                u.date = p.date;
            }
        }
    }

    DatesResult {
        published: published.map(|d| d.iso_format()).filter(|s| !s.is_empty()),
        updated: updated.map(|d| d.iso_format()).filter(|s| !s.is_empty()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_published_time_meta() {
        let doc = Document::from(
            r#"<meta property="article:published_time" content="2024-01-15T10:00:00Z">"#,
        );
        let result = extract_dates(
            &doc,
            "https://example.com/a",
            "example.com",
            &[],
            &[],
            None,
            &[],
            &Logger::null(),
        );
        assert_eq!(result.published.as_deref(), Some("2024-01-15T10:00:00Z"));
    }

    #[test]
    fn time_tag_with_modified_class_is_updated() {
        // A bare <time class="updated"> scores positively in both pools (the
        // "likely class" bonus from a generic date-ish class is unconditional
        // in dates.go); with nothing else on the page to disambiguate, both
        // fields resolve to the same DOM candidate.
        let doc = Document::from(r#"<time class="updated" datetime="2024-02-01">Feb 1 today</time>"#);
        let result = extract_dates(
            &doc,
            "https://example.com/a",
            "example.com",
            &[],
            &[],
            None,
            &[],
            &Logger::null(),
        );
        assert_eq!(result.updated.as_deref(), Some("2024-02-01"));
        assert_eq!(result.published.as_deref(), Some("2024-02-01"));
    }

    #[test]
    fn falls_back_to_url_path_date() {
        let doc = Document::from("<html></html>");
        let result = extract_dates(
            &doc,
            "https://example.com/2023/11/05/some-story",
            "example.com",
            &[],
            &[],
            None,
            &[],
            &Logger::null(),
        );
        assert_eq!(result.published.as_deref(), Some("2023-11-05"));
    }

    #[test]
    fn url_date_year_month_only_has_no_day() {
        let doc = Document::from("<html></html>");
        let result = extract_dates(
            &doc,
            "https://example.com/2023/11/some-story",
            "example.com",
            &[],
            &[],
            None,
            &[],
            &Logger::null(),
        );
        assert_eq!(result.published.as_deref(), Some("2023-11"));
    }

    #[test]
    fn buzzfeed_script_fallback() {
        let doc = Document::from("<html></html>");
        let scripts = vec![r#"var x = {published: "2022-06-01T00:00:00Z"};"#.to_string()];
        let result = extract_dates(
            &doc,
            "https://www.buzzfeed.com/a",
            "www.buzzfeed.com",
            &scripts,
            &[],
            None,
            &[],
            &Logger::null(),
        );
        assert_eq!(result.published.as_deref(), Some("2022-06-01T00:00:00Z"));
    }

    #[test]
    fn both_meta_dates_full_short_circuits_dom_scan() {
        let doc = Document::from(
            r#"<meta property="article:published_time" content="2024-01-15T10:00:00Z">
               <meta property="article:modified_time" content="2024-02-20T11:00:00Z">"#,
        );
        let result = extract_dates(
            &doc,
            "https://example.com/a",
            "example.com",
            &[],
            &[],
            None,
            &[],
            &Logger::null(),
        );
        assert_eq!(result.published.as_deref(), Some("2024-01-15T10:00:00Z"));
        assert_eq!(result.updated.as_deref(), Some("2024-02-20T11:00:00Z"));
    }

    #[test]
    fn paragraph_without_dominant_date_text_is_rejected() {
        let doc = Document::from(
            r#"<p>This is a long paragraph of real article prose that merely happens to mention 2024-01-15 in passing near the end.</p>"#,
        );
        let result = extract_dates(
            &doc,
            "https://example.com/a",
            "example.com",
            &[],
            &[],
            None,
            &[],
            &Logger::null(),
        );
        assert_eq!(result.published, None);
    }
}

// ABOUTME: Byline-text parser: splits a byline into segments and classifies/cleans each into a name.
// ABOUTME: Ports arts/byline/byline.go's splitter regex and job-title/location/reject word bags.

use once_cell::sync::Lazy;
use regex::Regex;

use super::names::is_name_like;

const JOB_TITLE_WORDS: &[&str] = &[
    "reporter", "editor", "correspondent", "writer", "staff", "contributor", "columnist",
    "photographer", "bureau", "chief", "producer", "analyst",
];

const LOCATION_LEAD_WORDS: &[&str] = &["in"];

const REJECT_WORDS: &[&str] = &[
    "photo", "photograph", "photography", "getty", "press", "images", "illustration", "video",
    "graphic", "ap", "reuters", "afp",
];

static LEADING_BY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^\s*by\s+").unwrap());
static SPLIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\s*(?:,| and |&)\s*").unwrap());

/// Split a byline into candidate name segments, dropping any segment that
/// contains a reject word, trimming trailing job-title and
/// "in <location...>" clauses, and keeping only segments that pass the
/// name-likeness check.
pub fn parse_byline(text: &str) -> Vec<String> {
    let stripped = LEADING_BY_RE.replace(text, "");
    let mut names = Vec::new();

    for raw_segment in SPLIT_RE.split(&stripped) {
        let segment = raw_segment.trim();
        if segment.is_empty() {
            continue;
        }
        if contains_word(segment, REJECT_WORDS) {
            continue;
        }

        let cleaned = strip_location_clause(segment);
        let cleaned = strip_job_title_words(&cleaned);
        let cleaned = cleaned.trim();

        if is_name_like(cleaned) {
            names.push(cleaned.to_string());
        }
    }

    names
}

fn contains_word(segment: &str, words: &[&str]) -> bool {
    segment
        .split_whitespace()
        .any(|w| words.iter().any(|ban| w.trim_matches(|c: char| !c.is_alphanumeric()).eq_ignore_ascii_case(ban)))
}

/// Drop a trailing `in <location words...>` clause (e.g. "... in Los Angeles").
fn strip_location_clause(segment: &str) -> String {
    let words: Vec<&str> = segment.split_whitespace().collect();
    for (i, w) in words.iter().enumerate() {
        if LOCATION_LEAD_WORDS.iter().any(|l| w.eq_ignore_ascii_case(l)) {
            return words[..i].join(" ");
        }
    }
    segment.to_string()
}

fn strip_job_title_words(segment: &str) -> String {
    segment
        .split_whitespace()
        .filter(|w| !contains_word(w, JOB_TITLE_WORDS))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_two_authors_with_locations() {
        let names = parse_byline(
            "By Matthew Garrahan in Los Angeles and Tim Bradshaw in San Francisco",
        );
        assert_eq!(names, vec!["Matthew Garrahan", "Tim Bradshaw"]);
    }

    #[test]
    fn single_author_no_location() {
        assert_eq!(parse_byline("By Jane Doe"), vec!["Jane Doe"]);
    }

    #[test]
    fn rejects_segment_with_reject_word() {
        assert_eq!(parse_byline("By Jane Doe, Getty Images"), vec!["Jane Doe"]);
    }

    #[test]
    fn strips_job_title_suffix() {
        assert_eq!(parse_byline("By Jane Doe, Staff Writer"), vec!["Jane Doe"]);
    }

    #[test]
    fn empty_byline_yields_no_names() {
        assert!(parse_byline("").is_empty());
    }
}

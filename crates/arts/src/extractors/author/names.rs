// ABOUTME: Name-likeness scoring for byline segments.
// ABOUTME: Ports arts/names.go's "Firstname [Middle...] Surname" regex, including accented letters and surname prefixes.

use once_cell::sync::Lazy;
use regex::Regex;

/// A name part: an initial-capital word (accented letters allowed), or a
/// lowercase surname-prefix particle (`von`, `van`, `de`, ...) that only
/// makes sense glued to the word after it.
const SURNAME_PREFIXES: &[&str] = &[
    "von", "van", "de", "der", "den", "la", "le", "du", "da", "dos", "di", "al",
];

static WORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^[a-zà-öø-ÿ][a-zà-öø-ÿ'-]*\.?$").unwrap());

static CAPITALIZED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-ZÀ-ÖØ-Þ]").unwrap());

/// Does `text` look like a "Firstname [Middle...] Surname" personal name?
/// Requires at least two words, every word plausibly a name token, and the
/// first and last words capitalized (surname-prefix particles in the
/// middle may be lowercase).
pub fn is_name_like(text: &str) -> bool {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() < 2 || words.len() > 5 {
        return false;
    }

    for (i, w) in words.iter().enumerate() {
        if !WORD_RE.is_match(w) {
            return false;
        }
        let is_prefix = SURNAME_PREFIXES.iter().any(|p| p.eq_ignore_ascii_case(w));
        let is_edge = i == 0 || i == words.len() - 1;
        if is_edge && !CAPITALIZED_RE.is_match(w) {
            return false;
        }
        if !is_edge && !is_prefix && !CAPITALIZED_RE.is_match(w) {
            return false;
        }
    }

    true
}

/// `names.go`'s `rateName`: a numeric sibling to [`is_name_like`] used when
/// scoring author candidates, not when classifying byline segments. Empty
/// text scores -1, a name-like match scores +1, anything else scores 0 —
/// there is no blacklist or token-count penalty in the real source despite
/// a richer scheme being floated in comments there.
pub fn rate_name(text: &str) -> f64 {
    let trimmed = crate::node::compress_space(text);
    if trimmed.is_empty() {
        return -1.0;
    }
    if is_name_like(&trimmed) {
        return 1.0;
    }
    0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_simple_two_word_name() {
        assert!(is_name_like("Matthew Garrahan"));
    }

    #[test]
    fn accepts_surname_prefix() {
        assert!(is_name_like("Ludwig van Beethoven"));
    }

    #[test]
    fn accepts_accented_letters() {
        assert!(is_name_like("André Müller"));
    }

    #[test]
    fn rejects_single_word() {
        assert!(!is_name_like("Staff"));
    }

    #[test]
    fn rejects_lowercase_leading_word() {
        assert!(!is_name_like("by someone"));
    }

    #[test]
    fn rejects_overlong_phrase() {
        assert!(!is_name_like("This Is Clearly Not A Personal Name At All"));
    }

    #[test]
    fn rate_name_scores_empty_as_negative() {
        assert_eq!(rate_name(""), -1.0);
        assert_eq!(rate_name("   "), -1.0);
    }

    #[test]
    fn rate_name_scores_name_like_as_positive() {
        assert_eq!(rate_name("Matthew Garrahan"), 1.0);
    }

    #[test]
    fn rate_name_scores_other_text_as_zero() {
        assert_eq!(rate_name("Staff"), 0.0);
    }
}

// ABOUTME: Candidate & scoring framework shared by every heuristic extractor.
// ABOUTME: Ports scoring.go: additive points, multiplicative scale, and the human-readable trace log.

use std::fmt::Write as _;

use dom_query::Selection;

use crate::fuzzydate::FuzzyDateTime;
use crate::node::describe_node;

/// Trim trailing fractional zeros (and a bare trailing decimal point) off a
/// fixed-notation number string, Go `%g`-style.
fn trim_trailing_zeros(s: &str) -> String {
    if !s.contains('.') {
        return s.to_string();
    }
    let trimmed = s.trim_end_matches('0');
    trimmed.trim_end_matches('.').to_string()
}

/// Format `v` with `sig` significant figures, Go `%.<sig>g`-style: fixed
/// notation for normal magnitudes, scientific notation (`1.23e+04`) once the
/// exponent falls outside `[-4, sig)`, trailing zeros always stripped.
fn format_sig(v: f64, sig: i32) -> String {
    if v == 0.0 {
        return "0".to_string();
    }
    let neg = v.is_sign_negative();
    let av = v.abs();
    let exp = av.log10().floor() as i32;
    let use_sci = exp < -4 || exp >= sig;

    let body = if use_sci {
        let decimals = (sig - 1).max(0) as usize;
        let scale = 10f64.powi(exp);
        let mut mantissa = av / scale;
        let rounded = (mantissa * 10f64.powi(decimals as i32)).round() / 10f64.powi(decimals as i32);
        mantissa = rounded;
        let mut e = exp;
        if mantissa >= 10.0 {
            mantissa /= 10.0;
            e += 1;
        }
        let mant_str = trim_trailing_zeros(&format!("{:.*}", decimals, mantissa));
        format!("{}e{}{:02}", mant_str, if e < 0 { "-" } else { "+" }, e.abs())
    } else {
        let decimals = (sig - 1 - exp).max(0) as usize;
        trim_trailing_zeros(&format!("{:.*}", decimals, av))
    };

    if neg {
        format!("-{}", body)
    } else {
        body
    }
}

/// `format_sig` with a forced leading sign, Go `%+.<sig>g`-style.
fn format_sig_signed(v: f64, sig: i32) -> String {
    if v == 0.0 {
        return "+0".to_string();
    }
    let s = format_sig(v, sig);
    if v > 0.0 {
        format!("+{}", s)
    } else {
        s
    }
}

/// A scored guess about some node in the document: how much it looks like
/// the field being extracted for, plus a trace of every adjustment made.
#[derive(Clone)]
pub struct Candidate<'a> {
    node: Selection<'a>,
    text: String,
    points: f64,
    scale: f64,
    log: Vec<String>,
}

impl<'a> Candidate<'a> {
    pub fn new(node: Selection<'a>, text: impl Into<String>) -> Self {
        Self {
            node,
            text: text.into(),
            points: 0.0,
            scale: 1.0,
            log: Vec::new(),
        }
    }

    pub fn from_node(node: Selection<'a>) -> Self {
        let text = node.text().to_string();
        Self::new(node, text)
    }

    pub fn node(&self) -> &Selection<'a> {
        &self.node
    }

    pub fn txt(&self) -> &str {
        &self.text
    }

    pub fn add_points(&mut self, value: f64, reason: &str) -> &mut Self {
        self.points += value;
        let mut line = String::new();
        let _ = write!(line, "{} {}", format_sig_signed(value, 3), reason);
        self.log.push(line);
        self
    }

    pub fn scale_points(&mut self, factor: f64, reason: &str) -> &mut Self {
        self.scale *= factor;
        let mut line = String::new();
        let _ = write!(line, "*{} {}", format_sig(factor, 3), reason);
        self.log.push(line);
        self
    }

    pub fn total(&self) -> f64 {
        self.points * self.scale
    }

    pub fn dump(&self, out: &mut dyn std::fmt::Write) {
        let _ = writeln!(
            out,
            "{} {} \"{}\"",
            format_sig(self.total(), 3),
            describe_node(&self.node),
            crate::node::snip(&self.text, 60)
        );
        for line in &self.log {
            let _ = writeln!(out, "  {}", line);
        }
    }

    pub fn dump_string(&self) -> String {
        let mut s = String::new();
        self.dump(&mut s);
        s
    }
}

/// A date-extractor candidate: a plain `Candidate` plus the partial
/// date/time parsed out of its text. Mirrors `dates.go`'s `dateCandidate`
/// (`standardCandidate` embedding `fuzzytime.DateTime`) via composition
/// rather than inheritance.
#[derive(Clone)]
pub struct DateCandidate<'a> {
    pub candidate: Candidate<'a>,
    pub dt: FuzzyDateTime,
}

impl<'a> DateCandidate<'a> {
    pub fn new(node: Selection<'a>, text: impl Into<String>, dt: FuzzyDateTime) -> Self {
        Self {
            candidate: Candidate::new(node, text),
            dt,
        }
    }

    pub fn total(&self) -> f64 {
        self.candidate.total()
    }

    pub fn node(&self) -> &Selection<'a> {
        self.candidate.node()
    }
}

/// A collection of candidates, sortable descending by total score.
#[derive(Default)]
pub struct CandidateList<'a> {
    items: Vec<Candidate<'a>>,
}

impl<'a> CandidateList<'a> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn push(&mut self, c: Candidate<'a>) {
        self.items.push(c);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Candidate<'a>> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Candidate<'a>> {
        self.items.iter_mut()
    }

    pub fn into_vec(self) -> Vec<Candidate<'a>> {
        self.items
    }

    /// Sort descending by total score (stable, matching Go's `sort.Sort(Reverse{...})`).
    pub fn sort(&mut self) {
        self.items
            .sort_by(|a, b| b.total().partial_cmp(&a.total()).unwrap_or(std::cmp::Ordering::Equal));
    }

    pub fn filter(mut self, keep: impl Fn(&Candidate<'a>) -> bool) -> Self {
        self.items.retain(|c| keep(c));
        self
    }

    /// All candidates tied for the top score (matches Go's `Best()`).
    pub fn best(&self) -> Vec<&Candidate<'a>> {
        match self.items.first() {
            None => Vec::new(),
            Some(top) => {
                let top_total = top.total();
                self.items
                    .iter()
                    .take_while(|c| (c.total() - top_total).abs() < 1e-9)
                    .collect()
            }
        }
    }

    pub fn first(&self) -> Option<&Candidate<'a>> {
        self.items.first()
    }

    /// Candidates that are a (non-self) descendant of `node`.
    pub fn contained_by(&self, node: &Selection<'a>) -> Vec<&Candidate<'a>> {
        self.items
            .iter()
            .filter(|c| crate::node::contains(node, c.node()))
            .collect()
    }

    pub fn dump_all(&self) -> String {
        let mut out = String::new();
        for c in &self.items {
            c.dump(&mut out);
        }
        out
    }
}

/// A collection of date candidates, sortable descending by total score.
#[derive(Default)]
pub struct DateCandidateList<'a> {
    items: Vec<DateCandidate<'a>>,
}

impl<'a> DateCandidateList<'a> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn push(&mut self, c: DateCandidate<'a>) {
        self.items.push(c);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DateCandidate<'a>> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut DateCandidate<'a>> {
        self.items.iter_mut()
    }

    pub fn into_vec(self) -> Vec<DateCandidate<'a>> {
        self.items
    }

    pub fn sort(&mut self) {
        self.items
            .sort_by(|a, b| b.total().partial_cmp(&a.total()).unwrap_or(std::cmp::Ordering::Equal));
    }

    pub fn filter(mut self, keep: impl Fn(&DateCandidate<'a>) -> bool) -> Self {
        self.items.retain(|c| keep(c));
        self
    }

    pub fn best(&self) -> Vec<&DateCandidate<'a>> {
        match self.items.first() {
            None => Vec::new(),
            Some(top) => {
                let top_total = top.total();
                self.items
                    .iter()
                    .take_while(|c| (c.total() - top_total).abs() < 1e-9)
                    .collect()
            }
        }
    }

    pub fn first(&self) -> Option<&DateCandidate<'a>> {
        self.items.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dom_query::Document;

    #[test]
    fn total_is_points_times_scale() {
        let doc = Document::from("<div>hi</div>");
        let node = doc.select("div").first();
        let mut c = Candidate::new(node, "hi");
        c.add_points(3.0, "base").scale_points(0.5, "half");
        assert_eq!(c.total(), 1.5);
    }

    #[test]
    fn add_points_logs_three_sig_figs_not_fixed_decimals() {
        let doc = Document::from("<div>hi</div>");
        let node = doc.select("div").first();
        let mut c = Candidate::new(node, "hi");
        c.add_points(2.0, "hcard");
        c.scale_points(0.85, "link density");
        assert_eq!(c.log[0], "+2 hcard");
        assert_eq!(c.log[1], "*0.85 link density");
    }

    #[test]
    fn format_sig_rounds_to_three_significant_figures() {
        assert_eq!(format_sig(1.0 / 3.0, 3), "0.333");
        assert_eq!(format_sig(150.0, 3), "150");
        assert_eq!(format_sig_signed(-0.5, 3), "-0.5");
        assert_eq!(format_sig_signed(0.0, 3), "+0");
    }

    #[test]
    fn sort_orders_descending() {
        let doc = Document::from("<div><p>a</p><p>b</p></div>");
        let ps = doc.select("p");
        let mut list = CandidateList::new();
        for (i, p) in ps.iter().enumerate() {
            let mut c = Candidate::from_node(p);
            c.add_points(i as f64, "seed");
            list.push(c);
        }
        list.sort();
        let totals: Vec<f64> = list.iter().map(|c| c.total()).collect();
        assert!(totals.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn date_candidate_sorts_by_total() {
        let doc = Document::from("<div><time>a</time><time>b</time></div>");
        let times = doc.select("time");
        let mut list = DateCandidateList::new();
        for (i, t) in times.iter().enumerate() {
            let mut dc = DateCandidate::new(t, "x", FuzzyDateTime::default());
            dc.candidate.add_points(i as f64, "seed");
            list.push(dc);
        }
        list.sort();
        let totals: Vec<f64> = list.iter().map(|c| c.total()).collect();
        assert!(totals.windows(2).all(|w| w[0] >= w[1]));
    }
}

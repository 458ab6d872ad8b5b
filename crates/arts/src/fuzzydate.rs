// ABOUTME: Partial date/time value and fuzzy text extraction, standing in for the
// ABOUTME: Go original's bcampbell/fuzzytime library (no faithful crate exists on crates.io).

//! A fuzzy date/time is one where any of year, month, day, hour, minute,
//! second, and UTC offset may independently be absent. This module provides
//! the value type (`FuzzyDateTime`) and a best-effort text extractor used by
//! the date extractor (`extractors::dates`) to read timestamps out of loose
//! DOM text, `datetime`/`title` attributes, and URL path segments.
//!
//! Grounded in `dates.go`'s usage of `fuzzytime.DateTime`/`fuzzytime.Date`:
//! `HasFullDate`, `HasYear`/`HasMonth`/.../`HasHour`/`HasMinute`, `Empty`,
//! `Conflicts`, `Merge`, `ISOFormat`. Full, unambiguous datetimes are handed
//! to `dateparser` first (real ecosystem crate, per SPEC_FULL.md §1); the
//! partial-field regex path below exists because no published crate models
//! fields that are independently present-or-absent, which this engine's
//! scoring and merge logic (§4.10/4.11) requires.

use once_cell::sync::Lazy;
use regex::Regex;

/// A year/month/day value where each field may be independently absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FuzzyDate {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub day: Option<u32>,
}

impl FuzzyDate {
    pub fn empty(&self) -> bool {
        self.year.is_none() && self.month.is_none() && self.day.is_none()
    }

    pub fn has_full_date(&self) -> bool {
        self.year.is_some() && self.month.is_some() && self.day.is_some()
    }

    /// Two dates conflict if any shared field disagrees.
    pub fn conflicts(&self, other: &FuzzyDate) -> bool {
        field_conflicts(self.year, other.year)
            || field_conflicts(self.month, other.month)
            || field_conflicts(self.day, other.day)
    }

    /// Fill in missing fields from `other`; matching present fields must agree
    /// (callers should check `!conflicts()` first).
    pub fn merge(&mut self, other: &FuzzyDate) {
        if self.year.is_none() {
            self.year = other.year;
        }
        if self.month.is_none() {
            self.month = other.month;
        }
        if self.day.is_none() {
            self.day = other.day;
        }
    }
}

/// An hour/minute/second/offset value where each field may be independently absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FuzzyTime {
    pub hour: Option<u32>,
    pub minute: Option<u32>,
    pub second: Option<u32>,
    /// UTC offset in minutes.
    pub offset_minutes: Option<i32>,
}

impl FuzzyTime {
    pub fn empty(&self) -> bool {
        self.hour.is_none() && self.minute.is_none() && self.second.is_none()
    }

    pub fn conflicts(&self, other: &FuzzyTime) -> bool {
        field_conflicts(self.hour, other.hour)
            || field_conflicts(self.minute, other.minute)
            || field_conflicts(self.second, other.second)
            || field_conflicts(self.offset_minutes, other.offset_minutes)
    }
}

fn field_conflicts<T: PartialEq + Copy>(a: Option<T>, b: Option<T>) -> bool {
    matches!((a, b), (Some(x), Some(y)) if x != y)
}

/// A partial date/time: the unit the date extractor scores and reconciles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FuzzyDateTime {
    pub date: FuzzyDate,
    pub time: FuzzyTime,
}

impl FuzzyDateTime {
    pub fn empty(&self) -> bool {
        self.date.empty() && self.time.empty()
    }

    pub fn has_full_date(&self) -> bool {
        self.date.has_full_date()
    }

    pub fn has_hour_minute(&self) -> bool {
        self.time.hour.is_some() && self.time.minute.is_some()
    }

    pub fn conflicts(&self, other: &FuzzyDateTime) -> bool {
        self.date.conflicts(&other.date) || self.time.conflicts(&other.time)
    }

    /// Render as an ISO 8601 string at whatever precision is present:
    /// `YYYY`, `YYYY-MM`, `YYYY-MM-DD`, or a full timestamp with an offset
    /// suffix (`Z` for UTC, `+HH:MM`/`-HH:MM` otherwise) when time is known.
    pub fn iso_format(&self) -> String {
        let mut out = match (self.date.year, self.date.month, self.date.day) {
            (Some(y), Some(m), Some(d)) => format!("{:04}-{:02}-{:02}", y, m, d),
            (Some(y), Some(m), None) => format!("{:04}-{:02}", y, m),
            (Some(y), None, None) => format!("{:04}", y),
            _ => return String::new(),
        };
        if let (Some(h), Some(mi)) = (self.time.hour, self.time.minute) {
            out.push('T');
            out.push_str(&format!("{:02}:{:02}", h, mi));
            if let Some(s) = self.time.second {
                out.push_str(&format!(":{:02}", s));
            }
            match self.time.offset_minutes {
                Some(0) => out.push('Z'),
                Some(off) => {
                    let sign = if off < 0 { '-' } else { '+' };
                    let off = off.abs();
                    out.push_str(&format!("{}{:02}:{:02}", sign, off / 60, off % 60));
                }
                None => {}
            }
        }
        out
    }
}

static ISO_FULL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?x)
        (?P<year>\d{4})-(?P<month>\d{2})-(?P<day>\d{2})
        (?:[T ](?P<hour>\d{2}):(?P<minute>\d{2})(?::(?P<second>\d{2}))?
            (?:\.\d+)?
            (?P<offset>Z|[+-]\d{2}:?\d{2})?
        )?
        ",
    )
    .unwrap()
});

static YEAR_MONTH: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?P<year>\d{4})-(?P<month>\d{2})$").unwrap());

static TIME_ONLY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?P<hour>\d{1,2}):(?P<minute>\d{2})(?::(?P<second>\d{2}))?\s*(?P<ampm>am|pm)?\b")
        .unwrap()
});

static MONTH_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?P<day1>\d{1,2})?\s*(?P<month>jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|jun(?:e)?|jul(?:y)?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)[a-z]*\.?\s*(?P<day2>\d{1,2})?,?\s*(?P<year>\d{4})\b",
    )
    .unwrap()
});

fn month_from_name(name: &str) -> Option<u32> {
    let n = name.to_lowercase();
    let idx = ["jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec"]
        .iter()
        .position(|m| n.starts_with(m))?;
    Some(idx as u32 + 1)
}

fn offset_minutes_from(s: &str) -> Option<i32> {
    if s.eq_ignore_ascii_case("Z") {
        return Some(0);
    }
    let sign = if s.starts_with('-') { -1 } else { 1 };
    let digits: String = s.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() < 3 {
        return None;
    }
    let (h, m) = digits.split_at(2);
    let hours: i32 = h.parse().ok()?;
    let minutes: i32 = m.parse().ok()?;
    Some(sign * (hours * 60 + minutes))
}

/// The span (byte offsets) of a recognized date/time fragment within the
/// input text, used by the `<p>` dominance check (§4.10).
#[derive(Debug, Clone, Copy)]
pub struct MatchSpan {
    pub start: usize,
    pub end: usize,
}

/// Best-effort fuzzy date/time extraction. Tries, in order: a full/partial
/// ISO 8601 timestamp, a "Month D, YYYY [HH:MM]" textual form, a bare
/// year-month, and a bare time-of-day. Returns the parsed value plus the
/// spans of text consumed, so callers can judge how much of the input was
/// actually date-like.
pub fn extract(text: &str) -> (FuzzyDateTime, Vec<MatchSpan>) {
    let mut dt = FuzzyDateTime::default();
    let mut spans = Vec::new();

    if let Some(caps) = ISO_FULL.captures(text) {
        if let Some(m) = caps.get(0) {
            spans.push(MatchSpan { start: m.start(), end: m.end() });
        }
        dt.date.year = caps.name("year").and_then(|m| m.as_str().parse().ok());
        dt.date.month = caps.name("month").and_then(|m| m.as_str().parse().ok());
        dt.date.day = caps.name("day").and_then(|m| m.as_str().parse().ok());
        dt.time.hour = caps.name("hour").and_then(|m| m.as_str().parse().ok());
        dt.time.minute = caps.name("minute").and_then(|m| m.as_str().parse().ok());
        dt.time.second = caps.name("second").and_then(|m| m.as_str().parse().ok());
        dt.time.offset_minutes = caps.name("offset").and_then(|m| offset_minutes_from(m.as_str()));
        if !dt.empty() {
            return (dt, spans);
        }
    }

    if let Some(caps) = MONTH_NAME.captures(text) {
        if let Some(m) = caps.get(0) {
            spans.push(MatchSpan { start: m.start(), end: m.end() });
        }
        dt.date.month = caps.name("month").and_then(|m| month_from_name(m.as_str()));
        dt.date.day = caps
            .name("day1")
            .or_else(|| caps.name("day2"))
            .and_then(|m| m.as_str().parse().ok());
        dt.date.year = caps.name("year").and_then(|m| m.as_str().parse().ok());
        if let Some(tcaps) = TIME_ONLY.captures(text) {
            if let Some(m) = tcaps.get(0) {
                spans.push(MatchSpan { start: m.start(), end: m.end() });
            }
            apply_time(&mut dt, &tcaps);
        }
        if !dt.empty() {
            return (dt, spans);
        }
    }

    if let Some(caps) = YEAR_MONTH.captures(text.trim()) {
        if let Some(m) = caps.get(0) {
            spans.push(MatchSpan { start: m.start(), end: m.end() });
        }
        dt.date.year = caps.name("year").and_then(|m| m.as_str().parse().ok());
        dt.date.month = caps.name("month").and_then(|m| m.as_str().parse().ok());
        return (dt, spans);
    }

    if let Some(caps) = TIME_ONLY.captures(text) {
        if let Some(m) = caps.get(0) {
            spans.push(MatchSpan { start: m.start(), end: m.end() });
        }
        apply_time(&mut dt, &caps);
    }

    (dt, spans)
}

fn apply_time(dt: &mut FuzzyDateTime, caps: &regex::Captures) {
    let mut hour: Option<u32> = caps.name("hour").and_then(|m| m.as_str().parse().ok());
    let minute: Option<u32> = caps.name("minute").and_then(|m| m.as_str().parse().ok());
    let second: Option<u32> = caps.name("second").and_then(|m| m.as_str().parse().ok());
    if let (Some(h), Some(ampm)) = (hour, caps.name("ampm")) {
        let pm = ampm.as_str().eq_ignore_ascii_case("pm");
        hour = Some(match (h % 12, pm) {
            (0, false) => 0,
            (h12, false) => h12,
            (0, true) => 12,
            (h12, true) => h12 + 12,
        });
    }
    dt.time.hour = hour;
    dt.time.minute = minute;
    dt.time.second = second;
}

/// Parse a Unix-seconds timestamp (rejecting anything that would not yield a
/// sane calendar year), formatting as RFC 3339 text for re-extraction — the
/// same "format then re-parse" trick `dates.go` uses for `data-timestamp`.
pub fn format_unix_seconds(secs: i64) -> Option<String> {
    let dt = chrono::DateTime::<chrono::Utc>::from_timestamp(secs, 0)?;
    if dt.format("%Y").to_string().len() > 4 {
        return None;
    }
    Some(dt.to_rfc3339())
}

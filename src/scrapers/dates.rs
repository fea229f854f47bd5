//! Calendar date recognition in free text.
//!
//! Every pattern is tried against every span; a source's declared
//! `date_format` is never consulted. Supported shapes:
//!
//! | Pattern | Example |
//! |---------|---------|
//! | slash | `2025/6/10`, `2025 / 06 / 10` |
//! | dot | `2025.06.10` |
//! | kanji | `2025年6月10日` |
//!
//! A span with more than one match is a *container*: a list or summary
//! that encloses several entries, never a single entry.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

/// Spans longer than this (in characters) are too noisy to be one entry.
pub const MAX_SPAN_CHARS: usize = 500;

struct DatePattern {
    name: &'static str,
    regex: Regex,
}

impl DatePattern {
    fn new(name: &'static str, year_sep: &str, month_sep: &str, day_suffix: &str) -> Self {
        let re = format!(
            r"([0-9]{{4}})\s*{year_sep}\s*([0-9]{{1,2}})\s*{month_sep}\s*([0-9]{{1,2}}){day_suffix}"
        );
        Self {
            name,
            regex: Regex::new(&re).expect("date pattern must compile"),
        }
    }
}

static PATTERNS: Lazy<Vec<DatePattern>> = Lazy::new(|| {
    vec![
        DatePattern::new("slash", "/", "/", ""),
        DatePattern::new("dot", r"\.", r"\.", ""),
        DatePattern::new("kanji", "年", "月", r"\s*日"),
    ]
});

/// One date found in a text span.
///
/// The numeric parts are kept as written, so a match may still name a day
/// that doesn't exist (`2025/02/30`); [`DateCandidate::date`] checks that.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateCandidate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    /// The matched substring exactly as it appeared.
    pub raw: String,
    /// Byte offsets of `raw` within the scanned text.
    pub start: usize,
    pub end: usize,
    pub pattern: &'static str,
}

impl DateCandidate {
    pub fn date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
    }

    /// Canonical `YYYY-MM-DD`, zero padded.
    pub fn iso(&self) -> String {
        format!("{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

/// How many dates a span holds, from the point of view of single-entry
/// extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpanDates {
    NoDate,
    Single(DateCandidate),
    /// More than one match; holds the count.
    Container(usize),
    /// Over [`MAX_SPAN_CHARS`]; holds the character count.
    TooLong(usize),
}

fn digit_at(text: &str, idx: usize, before: bool) -> bool {
    let c = if before {
        text[..idx].chars().next_back()
    } else {
        text[idx..].chars().next()
    };
    c.is_some_and(|c| c.is_ascii_digit())
}

/// Find every non-overlapping date in `text`, in text order.
pub fn find_dates(text: &str) -> Vec<DateCandidate> {
    let mut found: Vec<DateCandidate> = Vec::new();
    for pattern in PATTERNS.iter() {
        for caps in pattern.regex.captures_iter(text) {
            let Some(whole) = caps.get(0) else { continue };
            if digit_at(text, whole.start(), true) || digit_at(text, whole.end(), false) {
                continue;
            }
            let (Ok(year), Ok(month), Ok(day)) = (
                caps[1].parse::<i32>(),
                caps[2].parse::<u32>(),
                caps[3].parse::<u32>(),
            ) else {
                continue;
            };
            found.push(DateCandidate {
                year,
                month,
                day,
                raw: whole.as_str().to_string(),
                start: whole.start(),
                end: whole.end(),
                pattern: pattern.name,
            });
        }
    }

    found.sort_by_key(|c| (c.start, std::cmp::Reverse(c.end)));
    let mut out: Vec<DateCandidate> = Vec::with_capacity(found.len());
    for c in found {
        if out.last().is_some_and(|prev| c.start < prev.end) {
            continue;
        }
        out.push(c);
    }
    out
}

pub fn contains_date(text: &str) -> bool {
    PATTERNS.iter().any(|p| p.regex.is_match(text)) && !find_dates(text).is_empty()
}

/// Classify a span for single-entry extraction.
pub fn scan_span(text: &str) -> SpanDates {
    let chars = text.chars().count();
    if chars > MAX_SPAN_CHARS {
        return SpanDates::TooLong(chars);
    }
    let mut dates = find_dates(text);
    match dates.len() {
        0 => SpanDates::NoDate,
        1 => SpanDates::Single(dates.remove(0)),
        n => SpanDates::Container(n),
    }
}

/// The span's one date, if it has exactly one and isn't oversized.
pub fn usable_date(text: &str) -> Option<DateCandidate> {
    match scan_span(text) {
        SpanDates::Single(c) => Some(c),
        _ => None,
    }
}

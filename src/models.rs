//! Data models for sources, extracted news items and run reports.
//!
//! This module defines the core data structures used throughout the engine:
//! - [`SourceConfig`]: One publisher from the source registry
//! - [`Strategy`]: How a source's document is turned into items
//! - [`DateRange`]: The inclusive window a run asks for
//! - [`NewsItem`]: One output record, extracted or fallback
//! - [`ExtractionLog`]: The human-readable trace of a run
//! - [`RunReport`]: Everything a run hands back to its caller
//!
//! Serialized field names are camelCase to match what the dashboard that
//! consumes these records expects.

use crate::error::RunError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Badge shown on items from a source that actively refused us (HTTP 403).
pub const RESTRICTED_BADGE_COLOR: &str = "#808080";

pub const LINK_ONLY_TITLE: &str = "Check the latest releases on the official site";
pub const RESTRICTED_TITLE: &str = "Access restricted: view on the official site";

/// Extraction strategy for one source.
///
/// The original deployment spelled these `auto` and `force_link`; both
/// spellings are still accepted when reading a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Heuristic scan of any document layout.
    #[serde(alias = "auto")]
    Generic,
    /// Card layouts with bare date text and repeated category labels.
    Dedicated,
    /// No parsing at all; emit a pointer to the source page.
    #[serde(alias = "force_link")]
    LinkOnly,
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Strategy::Generic => "generic",
            Strategy::Dedicated => "dedicated",
            Strategy::LinkOnly => "link_only",
        };
        f.write_str(s)
    }
}

/// One publisher entry from the source registry.
///
/// Read-only after load. `badge_color` and `date_format` are carried through
/// to output untouched; the engine recognizes every supported date format
/// regardless of what `date_format` declares.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SourceConfig {
    /// Stable identifier used to request the source.
    pub id: String,
    /// Company name shown next to each item.
    #[serde(rename = "name")]
    pub display_name: String,
    /// Presentation grouping (e.g. convenience stores, beverages).
    #[serde(default)]
    pub category: String,
    /// Newsroom page to fetch; also the base for relative links.
    pub url: String,
    #[serde(alias = "scraper_type", default = "default_strategy")]
    pub strategy: Strategy,
    pub badge_color: String,
    #[serde(default)]
    pub date_format: Option<String>,
}

fn default_strategy() -> Strategy {
    Strategy::Generic
}

/// Inclusive calendar window requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, RunError> {
        if start > end {
            return Err(RunError::InvertedRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Parse a `YYYY-MM-DD` pair; a missing end means a single day.
    pub fn parse(start: &str, end: Option<&str>) -> Result<Self, RunError> {
        let parse = |s: &str| {
            NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
                .map_err(|_| RunError::InvalidDate(s.to_string()))
        };
        let start = parse(start)?;
        let end = match end {
            Some(e) => parse(e)?,
            None => start,
        };
        Self::new(start, end)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// A single output record.
///
/// `url` is always absolute with query and fragment stripped, which is what
/// makes per-source deduplication by URL sound. `date` is inside the run's
/// range, or equal to its start for fallback records.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    pub company_name: String,
    pub badge_color: String,
    pub title: String,
    pub url: String,
    pub date: NaiveDate,
    pub is_link_only: bool,
    pub is_error: bool,
}

impl NewsItem {
    /// An item extracted from a document.
    pub fn extracted(source: &SourceConfig, title: String, url: String, date: NaiveDate) -> Self {
        Self {
            company_name: source.display_name.clone(),
            badge_color: source.badge_color.clone(),
            title,
            url,
            date,
            is_link_only: false,
            is_error: false,
        }
    }

    /// Pointer record for sources that are never parsed.
    pub fn link_only(source: &SourceConfig, range: &DateRange) -> Self {
        Self {
            company_name: source.display_name.clone(),
            badge_color: source.badge_color.clone(),
            title: LINK_ONLY_TITLE.to_string(),
            url: source.url.clone(),
            date: range.start,
            is_link_only: true,
            is_error: false,
        }
    }

    /// Fallback for a source that answered 403.
    pub fn restricted(source: &SourceConfig, range: &DateRange) -> Self {
        Self {
            badge_color: RESTRICTED_BADGE_COLOR.to_string(),
            title: RESTRICTED_TITLE.to_string(),
            ..Self::link_only(source, range)
        }
    }

    /// Fallback for any other failed fetch. `status` is `None` when the
    /// request never produced a response.
    pub fn failure(source: &SourceConfig, range: &DateRange, status: Option<u16>) -> Self {
        let title = match status {
            Some(code) => format!("Failed to fetch releases (HTTP {code})"),
            None => "Failed to fetch releases (connection error)".to_string(),
        };
        Self {
            company_name: source.display_name.clone(),
            badge_color: source.badge_color.clone(),
            title,
            url: source.url.clone(),
            date: range.start,
            is_link_only: false,
            is_error: true,
        }
    }
}

/// Append-only diagnostic trace of a run.
///
/// Lines are meant for people ("checked X", "matched date Y"); every line is
/// mirrored to `tracing` at debug level as well.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ExtractionLog {
    lines: Vec<String>,
}

impl ExtractionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: impl Into<String>) {
        let line = line.into();
        debug!(target: "extraction_log", "{line}");
        self.lines.push(line);
    }

    pub fn append(&mut self, other: ExtractionLog) {
        self.lines.extend(other.lines);
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// What a run returns: items in request order, the log, and the names of
/// every source that was attempted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub range: DateRange,
    pub items: Vec<NewsItem>,
    pub log: ExtractionLog,
    pub checked_sources: Vec<String>,
}

//! Mapping a fetch outcome to "extract", "give up with a record" or "skip".
//!
//! | Outcome | Verdict | Why |
//! |---------|---------|-----|
//! | HTTP 200 | [`Verdict::Proceed`] | |
//! | HTTP 404 | [`Verdict::Skip`] | Expected: e.g. next year's archive page doesn't exist yet |
//! | HTTP 403 | link-only record, not an error | The site blocks us but the user can still click through |
//! | other status | error record with the status code | |
//! | transport failure / timeout | error record, no status | |

use crate::error::FetchError;
use crate::fetch::RawDocument;
use crate::models::{DateRange, ExtractionLog, NewsItem, SourceConfig};

/// Failure taxonomy for one source's fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchFailure {
    NotFound,
    Forbidden,
    OtherHttp(u16),
    Transport(FetchError),
}

impl std::fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchFailure::NotFound => f.write_str("HTTP 404"),
            FetchFailure::Forbidden => f.write_str("HTTP 403"),
            FetchFailure::OtherHttp(code) => write!(f, "HTTP {code}"),
            FetchFailure::Transport(e) => write!(f, "{e}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict<'a> {
    /// Page body to hand to the extraction strategy.
    Proceed(&'a str),
    /// Extraction can't run; this single record stands in for the source.
    Terminal(NewsItem),
    /// Nothing to report for this source.
    Skip,
}

pub fn failure_of(outcome: &Result<RawDocument, FetchError>) -> Option<FetchFailure> {
    match outcome {
        Ok(doc) => match doc.status {
            200 => None,
            404 => Some(FetchFailure::NotFound),
            403 => Some(FetchFailure::Forbidden),
            code => Some(FetchFailure::OtherHttp(code)),
        },
        Err(e) => Some(FetchFailure::Transport(e.clone())),
    }
}

/// Classify one fetch outcome, appending exactly one log line.
pub fn classify<'a>(
    outcome: &'a Result<RawDocument, FetchError>,
    source: &SourceConfig,
    range: &DateRange,
    log: &mut ExtractionLog,
) -> Verdict<'a> {
    let name = &source.display_name;
    let Some(failure) = failure_of(outcome) else {
        let body = outcome.as_ref().map(|d| d.body.as_str()).unwrap_or_default();
        log.push(format!("{name}: HTTP 200, {} bytes", body.len()));
        return Verdict::Proceed(body);
    };

    match failure {
        FetchFailure::NotFound => {
            log.push(format!("{name}: HTTP 404, no page for this period; skipped"));
            Verdict::Skip
        }
        FetchFailure::Forbidden => {
            log.push(format!("{name}: HTTP 403, access restricted; linking to the site"));
            Verdict::Terminal(NewsItem::restricted(source, range))
        }
        FetchFailure::OtherHttp(code) => {
            log.push(format!("{name}: HTTP {code}, reported as error"));
            Verdict::Terminal(NewsItem::failure(source, range, Some(code)))
        }
        FetchFailure::Transport(e) => {
            log.push(format!("{name}: fetch failed: {e}"));
            Verdict::Terminal(NewsItem::failure(source, range, None))
        }
    }
}

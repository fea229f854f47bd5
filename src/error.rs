//! Error types shared across the extraction engine.
//!
//! Only [`RunError`] ever escapes a run. Fetch failures become fallback
//! records, and candidate failures are logged and skipped, so callers
//! always get a complete item list for well-formed input.

use std::time::Duration;
use thiserror::Error;

/// A failed fetch for one source. Always terminal for that source's run.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("transport failure: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            // reqwest doesn't report the configured limit back
            FetchError::Timeout(Duration::ZERO)
        } else {
            FetchError::Transport(e.to_string())
        }
    }
}

/// A single malformed candidate inside an otherwise parsable document.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CandidateError {
    #[error("unresolvable href {href:?}: {reason}")]
    BadHref { href: String, reason: String },
}

/// Problems loading or validating the source registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("failed to read registry {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed registry: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("source with empty id at position {0}")]
    EmptyId(usize),
    #[error("duplicate source id {0:?}")]
    DuplicateId(String),
    #[error("source {id:?} has an invalid url {url:?}")]
    InvalidUrl { id: String, url: String },
}

/// The only failures that abort a whole run: bad input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RunError {
    #[error("unparsable date {0:?}, expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("start date {start} is after end date {end}")]
    InvertedRange {
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },
}

//! Utility functions for text and URL normalization and file system checks.
//!
//! This module provides helper functions used throughout the engine:
//! - Whitespace collapsing and title capping for extracted titles
//! - URL canonicalization so per-source deduplication compares like with like
//! - String truncation for logging
//! - File system validation for output directories

use itertools::Itertools;
use std::error::Error;
use std::fs as stdfs;
use tokio::fs;
use tracing::{info, instrument};
use url::Url;

/// Maximum title length in characters, truncation marker included.
pub const MAX_TITLE_CHARS: usize = 100;

/// Appended to titles that were cut.
pub const TRUNCATION_MARKER: char = '…';

/// Collapse every run of whitespace (including full-width spaces) into a
/// single ASCII space and trim both ends.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().join(" ")
}

/// Length in characters, which is what every length threshold means here.
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Normalize a candidate title for output.
///
/// Collapses whitespace and caps the result at [`MAX_TITLE_CHARS`]
/// characters, with [`TRUNCATION_MARKER`] counted inside the cap. Running it
/// on its own output is a no-op.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(normalize_title("  New \n Product "), "New Product");
/// ```
pub fn normalize_title(s: &str) -> String {
    let collapsed = collapse_whitespace(s);
    if char_len(&collapsed) <= MAX_TITLE_CHARS {
        return collapsed;
    }
    let mut cut: String = collapsed.chars().take(MAX_TITLE_CHARS - 1).collect();
    // a trailing space would be eaten by the next collapse
    while cut.ends_with(' ') {
        cut.pop();
    }
    cut.push(TRUNCATION_MARKER);
    cut
}

/// Canonicalize a URL: keep scheme, host, port and path; drop query and
/// fragment.
pub fn normalize_url(url: &Url) -> Url {
    let mut out = url.clone();
    out.set_query(None);
    out.set_fragment(None);
    out
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to `max` characters with an ellipsis and a count of
/// the dropped bytes appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        None => s.to_string(),
        Some((idx, _)) => format!("{}…(+{} bytes)", &s[..idx], s.len() - idx),
    }
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if it doesn't exist, then performs a write test by
/// creating and immediately deleting a probe file.
///
/// # Errors
///
/// Returns an error if:
/// - The directory cannot be created
/// - The directory is not writable (permission denied, read-only filesystem, etc.)
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> Result<(), Box<dyn Error>> {
    if let Err(e) = fs::create_dir_all(path).await {
        return Err(Box::new(e));
    }
    // Try a small sync write using std fs (simpler error surface)
    let probe_path = format!("{}/..__probe_write__", path.trim_end_matches('/'));
    match stdfs::File::create(&probe_path) {
        Ok(_) => {
            let _ = stdfs::remove_file(&probe_path);
            info!("Output directory is writable");
            Ok(())
        }
        Err(e) => Err(Box::new(e)),
    }
}

//! Fetching newsroom pages.
//!
//! The engine only sees the [`FetchGateway`] trait: give it a URL and a
//! timeout, get back a status code and body or a [`FetchError`]. The
//! production implementation is [`HttpGateway`]; tests substitute an
//! in-memory gateway.
//!
//! # Client Behavior
//!
//! - Browser-class User-Agent and Accept headers (many corporate sites
//!   answer 403 to anything that doesn't look like a browser)
//! - At most 5 redirects
//! - No cookie store, so nothing from one publisher reaches another
//! - Bodies are decoded using the charset the server declares
//! - No retries: one failed attempt is final for the run

use crate::error::FetchError;
use crate::utils::truncate_for_log;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue};
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// A fetched page: whatever status the server answered with, and its body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument {
    pub status: u16,
    pub body: String,
}

/// Trait for anything that can fetch a page.
///
/// Implementors must honor `timeout` for the whole request. The coordinator
/// also enforces it from the outside, so a gateway that overruns is cut off
/// and reported as [`FetchError::Timeout`].
#[allow(async_fn_in_trait)]
pub trait FetchGateway {
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<RawDocument, FetchError>;
}

/// [`FetchGateway`] backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
}

impl HttpGateway {
    pub fn new() -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static("ja,en-US;q=0.8,en;q=0.6"),
        );

        let client = reqwest::Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .map_err(|e| FetchError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client })
    }
}

impl FetchGateway for HttpGateway {
    #[instrument(level = "info", skip(self))]
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<RawDocument, FetchError> {
        let t0 = Instant::now();
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| timeout_aware(e, timeout))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| timeout_aware(e, timeout))?;

        let elapsed_ms = t0.elapsed().as_millis() as u64;
        if status == 200 {
            info!(status, bytes = body.len(), elapsed_ms, "Fetched page");
        } else {
            warn!(status, elapsed_ms, "Non-200 response");
            debug!(body_preview = %truncate_for_log(&body, 200), "Response body");
        }
        Ok(RawDocument { status, body })
    }
}

fn timeout_aware(e: reqwest::Error, timeout: Duration) -> FetchError {
    match FetchError::from(e) {
        FetchError::Timeout(_) => FetchError::Timeout(timeout),
        other => other,
    }
}

//! Extraction strategies that turn one newsroom page into news items.
//!
//! A source's [`Strategy`] picks one [`Extractor`] once, before any parsing
//! happens:
//!
//! | Strategy | Module | Method |
//! |----------|--------|--------|
//! | generic | [`generic`] | Find every date-bearing element, resolve its link via [`resolver`] |
//! | dedicated | [`dedicated`] | Card layouts: climb from bare date text to the card's anchor |
//! | link_only | [`link_only`] | No parsing; one pointer to the source page |
//!
//! Every strategy shares the same failure rule: a malformed candidate is
//! logged and skipped, never allowed to end extraction for the rest of the
//! document.

pub mod dates;
pub mod dedicated;
pub mod dom;
pub mod generic;
pub mod link_only;
pub mod resolver;

use crate::models::{DateRange, ExtractionLog, NewsItem, SourceConfig, Strategy};
use scraper::Html;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use url::Url;

pub use dedicated::DedicatedStrategy;
pub use generic::GenericStrategy;
pub use link_only::LinkOnlyStrategy;

/// Whether the generic strategy keeps scanning after its first accepted
/// item. Publishers regularly post several releases on the same day, so the
/// default keeps going.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanPolicy {
    #[default]
    AllMatches,
    FirstMatch,
}

/// Per-source inputs shared by every strategy.
#[derive(Debug, Clone)]
pub struct ExtractContext<'a> {
    pub source: &'a SourceConfig,
    /// Parsed source URL; relative links resolve against it.
    pub base: Url,
    pub range: DateRange,
}

impl<'a> ExtractContext<'a> {
    pub fn new(source: &'a SourceConfig, base: Url, range: DateRange) -> Self {
        Self {
            source,
            base,
            range,
        }
    }

    pub fn name(&self) -> &str {
        &self.source.display_name
    }
}

/// The extraction strategy chosen for one source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extractor {
    Generic(GenericStrategy),
    Dedicated(DedicatedStrategy),
    LinkOnly(LinkOnlyStrategy),
}

impl Extractor {
    pub fn for_source(source: &SourceConfig, policy: ScanPolicy) -> Self {
        match source.strategy {
            Strategy::Generic => Extractor::Generic(GenericStrategy { policy }),
            Strategy::Dedicated => Extractor::Dedicated(DedicatedStrategy),
            Strategy::LinkOnly => Extractor::LinkOnly(LinkOnlyStrategy),
        }
    }

    /// Link-only sources never need their page fetched.
    pub fn needs_document(&self) -> bool {
        !matches!(self, Extractor::LinkOnly(_))
    }

    /// Run the strategy over a fetched page body.
    #[instrument(level = "debug", skip_all, fields(source = %ctx.source.id))]
    pub fn extract(
        &self,
        body: &str,
        ctx: &ExtractContext<'_>,
        log: &mut ExtractionLog,
    ) -> Vec<NewsItem> {
        let items = match self {
            Extractor::LinkOnly(s) => s.extract(ctx, log),
            Extractor::Generic(s) => s.extract(&Html::parse_document(body), ctx, log),
            Extractor::Dedicated(s) => s.extract(&Html::parse_document(body), ctx, log),
        };
        info!(count = items.len(), "Extracted items");
        items
    }
}

//! Pointer records for sources whose pages can't be parsed usefully.
//!
//! Some publishers block automated clients or render their release list
//! client-side. For those the registry says `link_only` and the user gets a
//! single item pointing at the newsroom page instead.

use super::ExtractContext;
use crate::models::{ExtractionLog, NewsItem};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkOnlyStrategy;

impl LinkOnlyStrategy {
    pub fn extract(&self, ctx: &ExtractContext<'_>, log: &mut ExtractionLog) -> Vec<NewsItem> {
        log.push(format!(
            "{}: link-only source, pointing at {}",
            ctx.name(),
            ctx.source.url
        ));
        vec![NewsItem::link_only(ctx.source, &ctx.range)]
    }
}

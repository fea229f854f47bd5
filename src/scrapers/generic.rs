//! Heuristic extraction for arbitrary newsroom layouts.
//!
//! The scan looks for *date-bearing nodes*: the deepest elements whose text
//! holds a date while none of their child elements does. Each one that
//! carries exactly one in-range date is handed to the
//! [`resolver`](super::resolver) for its link and title.
//!
//! Same-day entries from one page are all kept; only exact URL repeats are
//! dropped (first occurrence wins).

use super::dates::{SpanDates, contains_date, scan_span};
use super::dom::{element_text, tag, within_non_content};
use super::resolver::resolve;
use super::{ExtractContext, ScanPolicy};
use crate::models::{ExtractionLog, NewsItem};
use crate::utils::truncate_for_log;
use scraper::{ElementRef, Html};
use std::collections::HashSet;
use tracing::{trace, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenericStrategy {
    pub policy: ScanPolicy,
}

/// Deepest date-carrying elements in document order.
fn date_bearing_nodes(document: &Html) -> Vec<ElementRef<'_>> {
    document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|el| !within_non_content(el))
        .filter(|el| contains_date(&element_text(el)))
        .filter(|el| {
            !el.children()
                .filter_map(ElementRef::wrap)
                .any(|child| contains_date(&element_text(&child)))
        })
        .collect()
}

impl GenericStrategy {
    pub fn extract(
        &self,
        document: &Html,
        ctx: &ExtractContext<'_>,
        log: &mut ExtractionLog,
    ) -> Vec<NewsItem> {
        let name = ctx.name();
        let mut items = Vec::new();
        let mut seen_urls = HashSet::new();

        for node in date_bearing_nodes(document) {
            let text = element_text(&node);
            let candidate = match scan_span(&text) {
                SpanDates::Single(c) => c,
                SpanDates::Container(n) => {
                    log.push(format!(
                        "{name}: skipped <{}> holding {n} dates (list container)",
                        tag(&node)
                    ));
                    continue;
                }
                SpanDates::TooLong(chars) => {
                    trace!(chars, "Span too long for a single entry");
                    continue;
                }
                SpanDates::NoDate => continue,
            };

            let Some(date) = candidate.date() else {
                log.push(format!("{name}: ignored impossible date {:?}", candidate.raw));
                continue;
            };
            if !ctx.range.contains(date) {
                continue;
            }
            log.push(format!("{name}: matched date {date} in <{}>", tag(&node)));

            match resolve(node, &candidate.raw, &ctx.base) {
                Ok(Some(res)) => {
                    let url = res.url.to_string();
                    if !seen_urls.insert(url.clone()) {
                        log.push(format!("{name}: duplicate {url} suppressed"));
                        continue;
                    }
                    log.push(format!(
                        "{name}: found \"{}\" -> {url}",
                        truncate_for_log(&res.title, 40)
                    ));
                    items.push(NewsItem::extracted(ctx.source, res.title, url, date));
                    if self.policy == ScanPolicy::FirstMatch {
                        break;
                    }
                }
                Ok(None) => {
                    log.push(format!("{name}: no link found for entry dated {date}"));
                }
                Err(e) => {
                    warn!(error = %e, %date, "Skipping malformed entry");
                    log.push(format!("{name}: skipped malformed entry dated {date}: {e}"));
                }
            }
        }

        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DateRange, SourceConfig, Strategy};
    use url::Url;

    fn source() -> SourceConfig {
        SourceConfig {
            id: "lawson".to_string(),
            display_name: "Lawson".to_string(),
            category: "Convenience".to_string(),
            url: "https://www.lawson.co.jp/company/news/".to_string(),
            strategy: Strategy::Generic,
            badge_color: "#0068B7".to_string(),
            date_format: Some("%Y.%m.%d".to_string()),
        }
    }

    fn run(html: &str, start: &str, end: &str, policy: ScanPolicy) -> (Vec<NewsItem>, ExtractionLog) {
        let src = source();
        let range = DateRange::parse(start, Some(end)).unwrap();
        let ctx = ExtractContext::new(&src, Url::parse(&src.url).unwrap(), range);
        let mut log = ExtractionLog::new();
        let doc = Html::parse_document(html);
        let items = GenericStrategy { policy }.extract(&doc, &ctx, &mut log);
        (items, log)
    }

    #[test]
    fn test_single_list_item() {
        let html = r#"<ul><li>2025.06.10 <a href="/n/1">New Product</a></li></ul>"#;
        let (items, _) = run(html, "2025-06-10", "2025-06-10", ScanPolicy::AllMatches);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].date.to_string(), "2025-06-10");
        assert_eq!(items[0].title, "New Product");
        assert_eq!(items[0].url, "https://www.lawson.co.jp/n/1");
        assert_eq!(items[0].company_name, "Lawson");
        assert!(!items[0].is_link_only && !items[0].is_error);
    }

    const SAME_DAY: &str = r#"
        <ul class="newsList">
          <li><span class="date">2025.06.10</span><a href="/n/3">Third release of the day</a></li>
          <li><span class="date">2025.06.10</span><a href="/n/2">Second release of the day</a></li>
          <li><span class="date">2025.06.09</span><a href="/n/1">Yesterday's release</a></li>
        </ul>"#;

    #[test]
    fn test_keeps_every_same_day_entry() {
        let (items, log) = run(SAME_DAY, "2025-06-10", "2025-06-10", ScanPolicy::AllMatches);
        let urls: Vec<_> = items.iter().map(|i| i.url.as_str()).collect();
        assert_eq!(
            urls,
            ["https://www.lawson.co.jp/n/3", "https://www.lawson.co.jp/n/2"]
        );
        assert!(log.lines().iter().any(|l| l.contains("matched date 2025-06-10")));
    }

    #[test]
    fn test_first_match_policy_stops_early() {
        let (items, _) = run(SAME_DAY, "2025-06-10", "2025-06-10", ScanPolicy::FirstMatch);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].url, "https://www.lawson.co.jp/n/3");
    }

    #[test]
    fn test_everything_in_range_stays_in_range() {
        let (items, _) = run(SAME_DAY, "2025-06-09", "2025-06-10", ScanPolicy::AllMatches);
        assert_eq!(items.len(), 3);
        for item in &items {
            assert!(item.date.to_string().as_str() >= "2025-06-09");
            assert!(item.date.to_string().as_str() <= "2025-06-10");
        }
    }

    #[test]
    fn test_repeated_url_is_suppressed() {
        let html = r#"
            <div class="pickup-block"><p>2025年6月10日</p><a href="/n/5?from=pickup">Pickup headline</a></div>
            <ul><li>2025年6月10日 <a href="/n/5#list">Pickup headline</a></li></ul>"#;
        let (items, log) = run(html, "2025-06-10", "2025-06-10", ScanPolicy::AllMatches);
        assert_eq!(items.len(), 1);
        assert!(log.lines().iter().any(|l| l.contains("duplicate")));
    }

    #[test]
    fn test_container_span_is_not_an_entry() {
        let html = r#"<p>Campaign runs 2025/06/10 - 2025/06/20 <a href="/c/1">Campaign details</a></p>"#;
        let (items, log) = run(html, "2025-06-10", "2025-06-20", ScanPolicy::AllMatches);
        assert!(items.is_empty());
        assert!(log.lines().iter().any(|l| l.contains("holding 2 dates")));
    }

    #[test]
    fn test_malformed_entry_does_not_stop_scan() {
        let html = r#"<ul>
            <li>2025.06.10 <a href="http://[broken">Broken release link</a></li>
            <li>2025.06.10 <a href="/n/ok">Working release link</a></li>
        </ul>"#;
        let (items, log) = run(html, "2025-06-10", "2025-06-10", ScanPolicy::AllMatches);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].url, "https://www.lawson.co.jp/n/ok");
        assert!(log.lines().iter().any(|l| l.contains("malformed")));
    }

    #[test]
    fn test_dates_in_head_and_scripts_are_ignored() {
        let html = r#"<html><head><title>2025.06.10 News</title>
            <script>var d = "2025.06.10";</script></head>
            <body><p>Nothing dated here</p></body></html>"#;
        let (items, log) = run(html, "2025-06-10", "2025-06-10", ScanPolicy::AllMatches);
        assert!(items.is_empty());
        assert!(log.is_empty());
    }

    #[test]
    fn test_table_rows() {
        let html = r#"<table>
            <tr><td class="d">2025/06/10</td><td><a href="/ir/1.pdf">Notice of dividend forecast</a></td></tr>
            <tr><td class="d">2025/05/30</td><td><a href="/ir/0.pdf">Older notice</a></td></tr>
        </table>"#;
        let (items, _) = run(html, "2025-06-10", "2025-06-10", ScanPolicy::AllMatches);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].url, "https://www.lawson.co.jp/ir/1.pdf");
        assert_eq!(items[0].title, "Notice of dividend forecast");
    }

    #[test]
    fn test_dated_anchor_is_not_confused_with_later_links() {
        let html = r#"<div class="list"><p><a href="/n/1">2025.06.10 Alpha launch</a></p></div>
            <footer><a href="/privacy">Privacy policy page</a></footer>"#;
        let (items, _) = run(html, "2025-06-10", "2025-06-10", ScanPolicy::AllMatches);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].url, "https://www.lawson.co.jp/n/1");
        assert_eq!(items[0].title, "Alpha launch");
    }

    #[test]
    fn test_sibling_dated_anchors() {
        let html = r#"<div class="list"><a href="/n/1">2025.06.10 Alpha launch</a><a href="/n/2">2025.06.09 Beta launch</a></div>"#;
        let (items, log) = run(html, "2025-06-09", "2025-06-10", ScanPolicy::AllMatches);
        let found: Vec<_> = items.iter().map(|i| (i.url.as_str(), i.title.as_str())).collect();
        assert_eq!(
            found,
            [
                ("https://www.lawson.co.jp/n/1", "Alpha launch"),
                ("https://www.lawson.co.jp/n/2", "Beta launch")
            ]
        );
        assert!(!log.lines().iter().any(|l| l.contains("no link found")));
    }
}

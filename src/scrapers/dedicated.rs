//! Extraction tuned for card-based newsroom layouts.
//!
//! On these pages the date is a bare text node inside a card, next to a
//! category label ("NEWS", "お知らせ") and usually an image. The card's
//! anchor either wraps everything or sits somewhere inside the card, so the
//! generic link search picks the wrong thing. Here we climb from each date
//! text node to the first anchor we can reach, then take the longest of a
//! few title candidates.
//!
//! # Deduplication
//!
//! Cards for the same release often appear twice (carousel + list). Items
//! are keyed by normalized URL and the longest title seen for a URL wins.

use super::ExtractContext;
use super::dates::{find_dates, usable_date};
use super::dom::{
    absolute_url, descendant_links, element_text, link_href, own_text, within_non_content,
};
use super::resolver::PLACEHOLDER_TITLE;
use crate::models::{ExtractionLog, NewsItem};
use crate::utils::{char_len, collapse_whitespace, normalize_title, truncate_for_log};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;
use tracing::warn;

/// Levels climbed from the date text's parent element, inclusive.
pub const MAX_CARD_LEVELS: usize = 6;

static BOILERPLATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:press\s+release|news\s*release|news|notice|information|topics|new)\b")
        .expect("boilerplate pattern must compile")
});

const BOILERPLATE_JA: &[&str] = &[
    "ニュースリリース",
    "プレスリリース",
    "お知らせ",
    "ニュース",
    "トピックス",
    "新着",
];

static IMG_WITH_ALT: Lazy<Selector> =
    Lazy::new(|| Selector::parse("img[alt]").expect("static selector must parse"));

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DedicatedStrategy;

/// The anchor a date belongs to and the element that frames the card.
struct Card<'a> {
    anchor: ElementRef<'a>,
    href: &'a str,
    container: ElementRef<'a>,
}

/// Climb from `start` until an element is, or contains, a link. Stops early
/// at an element that already holds more than one date.
fn enclosing_card<'a>(start: ElementRef<'a>) -> Option<Card<'a>> {
    let levels = std::iter::once(start)
        .chain(start.ancestors().filter_map(ElementRef::wrap))
        .take(MAX_CARD_LEVELS);
    for el in levels {
        if find_dates(&element_text(&el)).len() > 1 {
            return None;
        }
        if let Some(href) = link_href(&el) {
            return Some(Card {
                anchor: el,
                href,
                container: el,
            });
        }
        if let Some(anchor) = descendant_links(el).next() {
            let href = link_href(&anchor)?;
            return Some(Card {
                anchor,
                href,
                container: el,
            });
        }
    }
    None
}

fn strip_boilerplate(text: &str) -> String {
    let mut out = BOILERPLATE.replace_all(text, " ").into_owned();
    for phrase in BOILERPLATE_JA {
        out = out.replace(phrase, " ");
    }
    collapse_whitespace(&out)
}

fn without_date(text: &str, date_raw: &str) -> String {
    collapse_whitespace(&text.replace(date_raw, " "))
}

/// Longest of: image alt text, the anchor's own text, and the card text
/// with boilerplate removed.
fn card_title(card: &Card<'_>, date_raw: &str) -> String {
    let alt = card
        .container
        .select(&IMG_WITH_ALT)
        .filter_map(|img| img.value().attr("alt"))
        .map(collapse_whitespace)
        .find(|alt| char_len(alt) > 1);

    let candidates = [
        alt.unwrap_or_default(),
        without_date(&own_text(&card.anchor), date_raw),
        strip_boilerplate(&without_date(&element_text(&card.container), date_raw)),
    ];

    let mut best = String::new();
    for c in candidates {
        if char_len(&c) > char_len(&best) {
            best = c;
        }
    }
    if best.is_empty() {
        PLACEHOLDER_TITLE.to_string()
    } else {
        normalize_title(&best)
    }
}

impl DedicatedStrategy {
    pub fn extract(
        &self,
        document: &Html,
        ctx: &ExtractContext<'_>,
        log: &mut ExtractionLog,
    ) -> Vec<NewsItem> {
        let name = ctx.name();
        let mut items: Vec<NewsItem> = Vec::new();
        let mut by_url: HashMap<String, usize> = HashMap::new();

        let text_nodes = document
            .root_element()
            .descendants()
            .filter_map(|n| n.value().as_text().map(|t| (n, collapse_whitespace(t))));

        for (node, text) in text_nodes {
            let Some(candidate) = usable_date(&text) else {
                continue;
            };
            let Some(parent) = node.parent().and_then(ElementRef::wrap) else {
                continue;
            };
            if within_non_content(&parent) {
                continue;
            }
            let Some(date) = candidate.date() else {
                log.push(format!("{name}: ignored impossible date {:?}", candidate.raw));
                continue;
            };
            if !ctx.range.contains(date) {
                continue;
            }
            log.push(format!("{name}: matched date {date}"));

            let Some(card) = enclosing_card(parent) else {
                log.push(format!("{name}: no enclosing link for {date}, discarded"));
                continue;
            };
            let url = match absolute_url(&ctx.base, card.href) {
                Ok(u) => u.to_string(),
                Err(e) => {
                    warn!(error = %e, %date, "Skipping malformed card");
                    log.push(format!("{name}: skipped malformed card dated {date}: {e}"));
                    continue;
                }
            };
            let title = card_title(&card, &candidate.raw);

            match by_url.get(&url) {
                Some(&idx) => {
                    if char_len(&title) > char_len(&items[idx].title) {
                        log.push(format!("{name}: longer title for {url}, replaced"));
                        items[idx].title = title;
                    } else {
                        log.push(format!("{name}: duplicate {url} suppressed"));
                    }
                }
                None => {
                    log.push(format!(
                        "{name}: found \"{}\" -> {url}",
                        truncate_for_log(&title, 40)
                    ));
                    by_url.insert(url.clone(), items.len());
                    items.push(NewsItem::extracted(ctx.source, title, url, date));
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
            id: "ajinomoto_frozen".to_string(),
            display_name: "Ajinomoto Frozen Foods".to_string(),
            category: "Frozen food".to_string(),
            url: "https://news.ajinomoto.co.jp/".to_string(),
            strategy: Strategy::Dedicated,
            badge_color: "#EA5514".to_string(),
            date_format: Some("%Y年%m月%d日".to_string()),
        }
    }

    fn run(html: &str, day: &str) -> (Vec<NewsItem>, ExtractionLog) {
        let src = source();
        let range = DateRange::parse(day, None).unwrap();
        let ctx = ExtractContext::new(&src, Url::parse(&src.url).unwrap(), range);
        let mut log = ExtractionLog::new();
        let doc = Html::parse_document(html);
        let items = DedicatedStrategy.extract(&doc, &ctx, &mut log);
        (items, log)
    }

    #[test]
    fn test_same_url_keeps_longest_title() {
        let html = r#"
            <div class="slider"><a href="/p/1?from=slider"><p>2025.06.10</p><p>Short tl</p></a></div>
            <div class="list"><a href="/p/1#top"><p>2025.06.10</p><p>Twenty chars title!!</p></a></div>"#;
        let (items, log) = run(html, "2025-06-10");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].url, "https://news.ajinomoto.co.jp/p/1");
        assert_eq!(items[0].title, "Twenty chars title!!");
        assert!(log.lines().iter().any(|l| l.contains("replaced")));
    }

    #[test]
    fn test_boilerplate_is_stripped_from_card_text() {
        let html = r#"
            <div class="card">
              <span class="cat">NEWS</span><span class="cat">お知らせ</span>
              <time>2025年6月10日</time>
              <h3>Frozen gyoza lineup renewed</h3>
              <a href="/release/20250610.html"><span>Read</span></a>
            </div>"#;
        let (items, _) = run(html, "2025-06-10");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Frozen gyoza lineup renewed Read");
        assert_eq!(items[0].url, "https://news.ajinomoto.co.jp/release/20250610.html");
    }

    #[test]
    fn test_image_alt_wins_when_longest() {
        let html = r#"
            <a href="/p/9"><img src="x.jpg" alt="Summer limited edition fried rice with extra garlic">
              <span>2025.06.10</span><span>NEW</span><span>Fried rice</span></a>"#;
        let (items, _) = run(html, "2025-06-10");
        assert_eq!(items[0].title, "Summer limited edition fried rice with extra garlic");
    }

    #[test]
    fn test_date_without_reachable_link_is_discarded() {
        let html = r#"<div><div><div><div><div><div><div><p>2025.06.10 orphan</p></div></div></div></div></div></div>
            <a href="/p/far">Far away link</a></div>"#;
        let (items, log) = run(html, "2025-06-10");
        assert!(items.is_empty());
        assert!(log.lines().iter().any(|l| l.contains("discarded")));
    }

    #[test]
    fn test_out_of_range_cards_are_skipped() {
        let html = r#"<a href="/p/2"><p>2025.06.09</p><p>Yesterday</p></a>"#;
        let (items, log) = run(html, "2025-06-10");
        assert!(items.is_empty());
        assert!(log.is_empty());
    }

    #[test]
    fn test_strip_boilerplate_keeps_words_containing_labels() {
        assert_eq!(strip_boilerplate("NEWS Newsletter renewal"), "Newsletter renewal");
        assert_eq!(strip_boilerplate("お知らせ 店舗営業時間の変更"), "店舗営業時間の変更");
    }
}

//! Link and title resolution for a date-bearing node.
//!
//! Given the element that carries a news entry's date, find the anchor that
//! belongs to that entry and a title worth showing. Search order, first hit
//! wins:
//!
//! 1. The node is itself an anchor (`<a href>2025.06.10 Headline</a>`).
//! 2. A `<dt>` date pairs with the anchor in its `<dd>` sibling.
//! 3. An anchor inside the node itself.
//! 4. A bounded walk up the ancestors (see [`inspect_ancestor`]).
//! 5. The first anchor after the node in document order.
//!
//! Nothing here fails on odd markup: no link is a valid answer.

use crate::error::CandidateError;
use crate::scrapers::dates::find_dates;
use crate::scrapers::dom::{
    absolute_url, descendant_links, element_text, is_link, link_href, parent_element, tag,
};
use crate::utils::{char_len, collapse_whitespace, normalize_title};
use scraper::ElementRef;
use url::Url;

/// How far step 4 climbs before giving up.
pub const MAX_ANCESTOR_LEVELS: usize = 5;

/// Anchor text this short is a "more"/"detail" link, not a headline.
const MAX_GENERIC_ANCHOR_CHARS: usize = 4;

const MIN_TITLE_CHARS: usize = 5;

pub const PLACEHOLDER_TITLE: &str = "(untitled release)";

const ITEM_TAGS: &[&str] = &["li", "tr", "article"];
const CONTAINER_TAGS: &[&str] = &["div", "section", "dl", "ul", "p", "span"];
const ITEM_CLASS_HINTS: &[&str] = &["item", "news", "col", "block"];

/// Which search step produced the link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkSource {
    /// The date-bearing node is the anchor.
    Node,
    PairedDefinition,
    Descendant,
    /// Found while climbing; holds the level (1 = parent).
    Ancestor(usize),
    Following,
}

/// Outcome of looking at one ancestor during the climb.
#[derive(Debug)]
pub enum Ascent<'a> {
    Resolved(ElementRef<'a>),
    /// The ancestor encloses several dated entries; stop, nothing belongs
    /// to this node alone.
    Blocked,
    Continue,
}

#[derive(Debug, Clone, Copy)]
pub struct FoundLink<'a> {
    pub anchor: ElementRef<'a>,
    pub href: &'a str,
    pub via: LinkSource,
}

impl<'a> FoundLink<'a> {
    fn new(anchor: ElementRef<'a>, via: LinkSource) -> Option<Self> {
        link_href(&anchor).map(|href| Self { anchor, href, via })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub url: Url,
    pub title: String,
    pub via: LinkSource,
}

fn is_item_like(el: &ElementRef<'_>) -> bool {
    let name = tag(el);
    if ITEM_TAGS.contains(&name) {
        return true;
    }
    if !CONTAINER_TAGS.contains(&name) {
        return false;
    }
    el.value().classes().any(|class| {
        let class = class.to_ascii_lowercase();
        ITEM_CLASS_HINTS.iter().any(|hint| class.contains(hint))
    })
}

/// Longest-text anchor under `el`, ignoring generic short links.
fn best_anchor<'a>(el: ElementRef<'a>) -> Option<ElementRef<'a>> {
    let mut best: Option<(usize, ElementRef<'a>)> = None;
    for anchor in descendant_links(el) {
        let len = char_len(&element_text(&anchor));
        if len <= MAX_GENERIC_ANCHOR_CHARS {
            continue;
        }
        if best.is_none_or(|(longest, _)| len > longest) {
            best = Some((len, anchor));
        }
    }
    best.map(|(_, a)| a)
}

/// One step of the ancestor climb.
pub fn inspect_ancestor<'a>(ancestor: ElementRef<'a>) -> Ascent<'a> {
    if find_dates(&element_text(&ancestor)).len() > 1 {
        return Ascent::Blocked;
    }
    if is_link(&ancestor) {
        return Ascent::Resolved(ancestor);
    }
    if is_item_like(&ancestor) {
        if let Some(anchor) = best_anchor(ancestor) {
            return Ascent::Resolved(anchor);
        }
    }
    Ascent::Continue
}

fn paired_definition<'a>(node: ElementRef<'a>) -> Option<ElementRef<'a>> {
    let dt = if tag(&node) == "dt" {
        node
    } else {
        parent_element(&node).filter(|p| tag(p) == "dt")?
    };
    let dd = dt
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .next()
        .filter(|sib| tag(sib) == "dd")?;
    if is_link(&dd) {
        return Some(dd);
    }
    descendant_links(dd).next()
}

fn following_link<'a>(node: ElementRef<'a>) -> Option<ElementRef<'a>> {
    let root = node.ancestors().last()?;
    root.descendants()
        .skip_while(|n| n.id() != node.id())
        .skip(1)
        .filter_map(ElementRef::wrap)
        .find(is_link)
}

/// Find the anchor belonging to the entry dated by `node`.
pub fn find_link<'a>(node: ElementRef<'a>) -> Option<FoundLink<'a>> {
    if is_link(&node) {
        return FoundLink::new(node, LinkSource::Node);
    }
    if let Some(a) = paired_definition(node) {
        return FoundLink::new(a, LinkSource::PairedDefinition);
    }
    if let Some(a) = descendant_links(node).next() {
        return FoundLink::new(a, LinkSource::Descendant);
    }

    let climb = node
        .ancestors()
        .filter_map(ElementRef::wrap)
        .take(MAX_ANCESTOR_LEVELS)
        .enumerate();
    for (i, ancestor) in climb {
        match inspect_ancestor(ancestor) {
            Ascent::Resolved(a) => return FoundLink::new(a, LinkSource::Ancestor(i + 1)),
            Ascent::Blocked => return None,
            Ascent::Continue => {}
        }
    }

    following_link(node).and_then(|a| FoundLink::new(a, LinkSource::Following))
}

/// Pick a title for an entry whose link is `anchor`.
///
/// The anchor's own text wins when it is long enough; otherwise the text of
/// the anchor's immediate container is used. The date is removed from both.
pub fn synthesize_title(anchor: &ElementRef<'_>, date_raw: &str) -> String {
    let text = without_date(&element_text(anchor), date_raw);
    if char_len(&text) >= MIN_TITLE_CHARS {
        return normalize_title(&text);
    }
    if let Some(container) = parent_element(anchor) {
        let text = without_date(&element_text(&container), date_raw);
        if char_len(&text) >= MIN_TITLE_CHARS {
            return normalize_title(&text);
        }
    }
    PLACEHOLDER_TITLE.to_string()
}

fn without_date(text: &str, date_raw: &str) -> String {
    if date_raw.is_empty() {
        return text.to_string();
    }
    collapse_whitespace(&text.replace(date_raw, " "))
}

/// Resolve link and title for a date-bearing node. `Ok(None)` means the
/// node has no link of its own; `Err` means the link found can't be turned
/// into a URL.
pub fn resolve(
    node: ElementRef<'_>,
    date_raw: &str,
    base: &Url,
) -> Result<Option<Resolution>, CandidateError> {
    let Some(found) = find_link(node) else {
        return Ok(None);
    };
    let url = absolute_url(base, found.href)?;
    Ok(Some(Resolution {
        url,
        title: synthesize_title(&found.anchor, date_raw),
        via: found.via,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    fn base() -> Url {
        Url::parse("https://corp.example.co.jp/news/").unwrap()
    }

    fn node<'a>(doc: &'a Html, css: &str) -> ElementRef<'a> {
        let sel = Selector::parse(css).unwrap();
        doc.select(&sel).next().unwrap()
    }

    #[test]
    fn test_descendant_anchor_in_list_item() {
        let doc = Html::parse_fragment(r#"<ul><li>2025.06.10 <a href="/n/1">New Product</a></li></ul>"#);
        let res = resolve(node(&doc, "li"), "2025.06.10", &base()).unwrap().unwrap();
        assert_eq!(res.url.as_str(), "https://corp.example.co.jp/n/1");
        assert_eq!(res.title, "New Product");
        assert_eq!(res.via, LinkSource::Descendant);
    }

    #[test]
    fn test_definition_pair() {
        let doc = Html::parse_fragment(
            r#"<dl><dt>2025年6月10日</dt><dd><a href="r/10.html">Summer campaign starts</a></dd>
               <dt>2025年6月9日</dt><dd><a href="r/9.html">Store opening</a></dd></dl>"#,
        );
        let res = resolve(node(&doc, "dt"), "2025年6月10日", &base()).unwrap().unwrap();
        assert_eq!(res.url.as_str(), "https://corp.example.co.jp/news/r/10.html");
        assert_eq!(res.via, LinkSource::PairedDefinition);
    }

    #[test]
    fn test_ancestor_item_picks_longest_anchor_and_skips_short() {
        let doc = Html::parse_fragment(
            r#"<div class="news-item"><p class="date">2025.06.10</p>
                 <a href="/cat">PR</a>
                 <a href="/n/short">Short one</a>
                 <a href="/n/long">A much longer headline wins</a>
                 <a href="/more">more</a></div>"#,
        );
        let res = resolve(node(&doc, "p.date"), "2025.06.10", &base()).unwrap().unwrap();
        assert_eq!(res.url.path(), "/n/long");
        assert_eq!(res.via, LinkSource::Ancestor(1));
    }

    #[test]
    fn test_enclosing_anchor_resolves() {
        let doc = Html::parse_fragment(
            r#"<a href="/n/7?ref=top"><span class="d">2025/6/10</span><span>Quarterly results announced</span></a>"#,
        );
        let res = resolve(node(&doc, "span.d"), "2025/6/10", &base()).unwrap().unwrap();
        assert_eq!(res.url.as_str(), "https://corp.example.co.jp/n/7");
        assert_eq!(res.via, LinkSource::Ancestor(1));
    }

    #[test]
    fn test_multi_date_ancestor_blocks() {
        let doc = Html::parse_fragment(
            r#"<div><span class="d">2025.06.10</span><span>2025.06.11</span>
                 <a href="/n/1">Headline after both dates</a></div>"#,
        );
        let found = resolve(node(&doc, "span.d"), "2025.06.10", &base()).unwrap();
        assert!(found.is_none());
    }

    #[test]
    fn test_following_anchor_fallback() {
        let doc = Html::parse_fragment(
            r#"<div><p class="d">2025.06.10</p></div><div><h3><a href="/n/9">Following headline</a></h3></div>"#,
        );
        let res = resolve(node(&doc, "p.d"), "2025.06.10", &base()).unwrap().unwrap();
        assert_eq!(res.url.path(), "/n/9");
        assert_eq!(res.via, LinkSource::Following);
    }

    #[test]
    fn test_no_link_anywhere() {
        let doc = Html::parse_fragment(r#"<p class="d">2025.06.10 Notice without link</p>"#);
        assert_eq!(resolve(node(&doc, "p.d"), "2025.06.10", &base()).unwrap(), None);
    }

    #[test]
    fn test_title_falls_back_to_container_text_without_date() {
        let doc = Html::parse_fragment(
            r#"<li><span>2025.06.10</span> Spring lineup renewal <a href="/n/2">詳細</a></li>"#,
        );
        let res = resolve(node(&doc, "span"), "2025.06.10", &base()).unwrap().unwrap();
        assert_eq!(res.title, "Spring lineup renewal 詳細");
    }

    #[test]
    fn test_title_placeholder_when_nothing_usable() {
        let doc = Html::parse_fragment(r#"<li><span>2025.06.10</span><a href="/n/3">PDF</a></li>"#);
        let res = resolve(node(&doc, "span"), "2025.06.10", &base()).unwrap().unwrap();
        assert_eq!(res.title, PLACEHOLDER_TITLE);
    }

    #[test]
    fn test_bad_href_is_an_error() {
        let doc = Html::parse_fragment(r#"<li>2025.06.10 <a href="http://[::1">Broken link here</a></li>"#);
        assert!(resolve(node(&doc, "li"), "2025.06.10", &base()).is_err());
    }

    #[test]
    fn test_date_inside_anchor_uses_that_anchor() {
        let doc = Html::parse_fragment(
            r#"<div class="list"><p><a href="/n/1">2025.06.10 Alpha launch</a></p></div>
               <footer><a href="/privacy">Privacy policy page</a></footer>"#,
        );
        let res = resolve(node(&doc, "a"), "2025.06.10", &base()).unwrap().unwrap();
        assert_eq!(res.url.as_str(), "https://corp.example.co.jp/n/1");
        assert_eq!(res.title, "Alpha launch");
        assert_eq!(res.via, LinkSource::Node);
    }

    #[test]
    fn test_sibling_dated_anchors_resolve_to_themselves() {
        let doc = Html::parse_fragment(
            r#"<div class="list"><a href="/n/1">2025.06.10 Alpha launch</a><a href="/n/2">2025.06.09 Beta launch</a></div>"#,
        );
        let res = resolve(node(&doc, "a"), "2025.06.10", &base()).unwrap().unwrap();
        assert_eq!(res.url.path(), "/n/1");
        assert_eq!(res.via, LinkSource::Node);
    }

    /// A date span whose item-like block is `levels` ancestors up. The
    /// block's only link precedes the span in document order.
    fn nested_item(levels: usize) -> String {
        format!(
            r#"<div class="news-item"><a href="/n/deep">Headline reachable only by climbing</a>{}<span class="d">2025.06.10</span>{}</div>"#,
            "<div>".repeat(levels - 1),
            "</div>".repeat(levels - 1),
        )
    }

    #[test]
    fn test_climb_reaches_fifth_ancestor() {
        let doc = Html::parse_fragment(&nested_item(5));
        let res = resolve(node(&doc, "span.d"), "2025.06.10", &base()).unwrap().unwrap();
        assert_eq!(res.url.path(), "/n/deep");
        assert_eq!(res.via, LinkSource::Ancestor(MAX_ANCESTOR_LEVELS));
    }

    #[test]
    fn test_climb_stops_before_sixth_ancestor() {
        let doc = Html::parse_fragment(&nested_item(6));
        let found = resolve(node(&doc, "span.d"), "2025.06.10", &base()).unwrap();
        assert!(found.is_none(), "{found:?}");
    }

    #[test]
    fn test_inspect_ancestor_steps() {
        let doc = Html::parse_fragment(
            r#"<section><div class="wrap"><span>x</span></div></section>"#,
        );
        assert!(matches!(inspect_ancestor(node(&doc, "div.wrap")), Ascent::Continue));

        let doc = Html::parse_fragment(
            r#"<ul class="news"><li>2025.06.10</li><li>2025.06.11</li><a href="/x">Some headline</a></ul>"#,
        );
        assert!(matches!(inspect_ancestor(node(&doc, "ul")), Ascent::Blocked));
    }
}

//! Small read-only helpers over `scraper`'s element tree.

use crate::error::CandidateError;
use crate::utils::{collapse_whitespace, normalize_url};
use itertools::Itertools;
use scraper::ElementRef;
use url::Url;

/// Elements whose text is never page content.
const NON_CONTENT_TAGS: &[&str] = &[
    "head", "script", "style", "noscript", "template", "title", "meta", "svg",
];

/// Full visible text of an element, whitespace collapsed.
pub fn element_text(el: &ElementRef<'_>) -> String {
    collapse_whitespace(&el.text().collect::<Vec<_>>().join(" "))
}

/// Text of the element's direct text children only.
pub fn own_text(el: &ElementRef<'_>) -> String {
    let parts = el
        .children()
        .filter_map(|n| n.value().as_text().map(|t| &**t))
        .join(" ");
    collapse_whitespace(&parts)
}

pub fn tag<'a>(el: &ElementRef<'a>) -> &'a str {
    el.value().name()
}

pub fn is_non_content(el: &ElementRef<'_>) -> bool {
    NON_CONTENT_TAGS.contains(&tag(el))
}

/// True when the element or any ancestor is a non-content element.
pub fn within_non_content(el: &ElementRef<'_>) -> bool {
    is_non_content(el)
        || el
            .ancestors()
            .filter_map(ElementRef::wrap)
            .any(|a| is_non_content(&a))
}

pub fn parent_element<'a>(el: &ElementRef<'a>) -> Option<ElementRef<'a>> {
    el.parent().and_then(ElementRef::wrap)
}

/// The href of an anchor that actually navigates somewhere.
pub fn link_href<'a>(el: &ElementRef<'a>) -> Option<&'a str> {
    if tag(el) != "a" {
        return None;
    }
    let href = el.value().attr("href")?.trim();
    let lower = href.to_ascii_lowercase();
    let dead = href.is_empty()
        || href.starts_with('#')
        || ["javascript:", "mailto:", "tel:"]
            .iter()
            .any(|p| lower.starts_with(p));
    if dead { None } else { Some(href) }
}

pub fn is_link(el: &ElementRef<'_>) -> bool {
    link_href(el).is_some()
}

/// Navigable anchors below `el`, in document order. `el` itself is excluded.
pub fn descendant_links<'a>(el: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    el.descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .filter(is_link)
}

/// Resolve an href against the page URL and canonicalize it.
pub fn absolute_url(base: &Url, href: &str) -> Result<Url, CandidateError> {
    base.join(href)
        .map(|u| normalize_url(&u))
        .map_err(|e| CandidateError::BadHref {
            href: href.to_string(),
            reason: e.to_string(),
        })
}

//! HTML parser for extracting titles and in-scope links
//!
//! This module handles parsing HTML content to extract:
//! - The page title
//! - Links to follow, filtered down to the crawl scope

use crate::url::{is_binary_resource, without_fragment, CrawlScope};
use scraper::{Html, Selector};
use std::collections::BTreeSet;
use url::Url;

/// Extracts the page title from the HTML document
///
/// Whitespace runs inside the title collapse to single spaces. Returns `None`
/// when the page has no non-empty `<title>`.
pub fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| {
            element
                .text()
                .flat_map(str::split_whitespace)
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|s| !s.is_empty())
}

/// Collects the in-scope outbound links of a page
///
/// # Link Rules
///
/// **Skipped before resolution:**
/// - empty and fragment-only (`#...`) hrefs
/// - `mailto:`, `javascript:`, `tel:` and `data:` hrefs
///
/// **Skipped after resolution against `page_url`:**
/// - anything that is not `http`/`https`
/// - `.pdf`, `.zip`, `.png` and `.jpg` resources
/// - URLs outside `scope` (see [`CrawlScope::allows`])
///
/// Surviving URLs lose their fragment; the set collapses duplicates.
///
/// # Example
///
/// ```
/// use doc_scraper::crawler::resolve_links;
/// use doc_scraper::url::CrawlScope;
/// use scraper::Html;
/// use url::Url;
///
/// let page = Url::parse("https://example.com/docs/index.html").unwrap();
/// let scope = CrawlScope::from_seed(&page, true).unwrap();
/// let html = Html::parse_document(r#"<a href="a.html">A</a><a href="/blog/">Blog</a>"#);
///
/// let links = resolve_links(&html, &page, &scope);
/// assert_eq!(links.len(), 1);
/// assert!(links.contains("https://example.com/docs/a.html"));
/// ```
pub fn resolve_links(document: &Html, page_url: &Url, scope: &CrawlScope) -> BTreeSet<String> {
    let mut links = BTreeSet::new();

    let Ok(a_selector) = Selector::parse("a[href]") else {
        return links;
    };

    for element in document.select(&a_selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };

        let Some(absolute_url) = resolve_link(href, page_url) else {
            continue;
        };

        if is_binary_resource(&absolute_url) {
            tracing::trace!("Skipping binary resource {}", absolute_url);
            continue;
        }

        if !scope.allows(&absolute_url) {
            tracing::trace!("Skipping out-of-scope link {}", absolute_url);
            continue;
        }

        links.insert(without_fragment(&absolute_url).to_string());
    }

    links
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - Fragment-only links
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if lowered.starts_with("javascript:")
        || lowered.starts_with("mailto:")
        || lowered.starts_with("tel:")
        || lowered.starts_with("data:")
    {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) if matches!(absolute_url.scheme(), "http" | "https") => {
            Some(absolute_url)
        }
        _ => None,
    }
}

/// Convenience function that parses markup and resolves its links
pub fn extract_links_simple(html: &str, page_url: &Url, scope: &CrawlScope) -> BTreeSet<String> {
    resolve_links(&Html::parse_document(html), page_url, scope)
}

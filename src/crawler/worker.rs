//! Per-page work: fetch, parse, extract, resolve links
//!
//! Only the fetch awaits. Everything that touches `scraper::Html` runs in
//! plain functions, so a parsed document never lives across a suspension
//! point and worker futures stay `Send`.

use crate::crawler::classifier::{classify, SiteTemplate};
use crate::crawler::extractor::extract;
use crate::crawler::fetcher::{FetchError, FetchedPage, Fetcher};
use crate::crawler::parser::{extract_title, resolve_links};
use crate::state::PageRecord;
use crate::url::CrawlScope;
use scraper::Html;
use std::collections::BTreeSet;
use std::future::Future;

/// A page that was fetched and turned into a record
#[derive(Debug, Clone)]
pub struct ProcessedPage {
    pub record: PageRecord,

    /// In-scope links found on the page; empty when links are not followed
    pub links: BTreeSet<String>,
}

/// Result of one unit of work, tagged with the URL it was dispatched for
#[derive(Debug, Clone)]
pub struct PageOutcome {
    pub url: String,
    pub result: Result<ProcessedPage, FetchError>,
}

impl PageOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Work a pool worker performs for each URL it pops
pub trait PageTask: Send + Sync + 'static {
    fn run(&self, url: String) -> impl Future<Output = PageOutcome> + Send;
}

/// The crawl's page task
///
/// The template is fixed for the whole crawl. With a scope the processor also
/// resolves outbound links; without one it only produces records.
#[derive(Debug, Clone)]
pub struct PageProcessor {
    fetcher: Fetcher,
    template: SiteTemplate,
    scope: Option<CrawlScope>,
}

impl PageProcessor {
    pub fn new(fetcher: Fetcher, template: SiteTemplate, scope: Option<CrawlScope>) -> Self {
        Self {
            fetcher,
            template,
            scope,
        }
    }

    pub fn template(&self) -> SiteTemplate {
        self.template
    }

    /// Fetches and processes one URL
    ///
    /// Fetch failures come back in the outcome rather than as an error; the
    /// caller decides how to account for them.
    pub async fn process(&self, url: String) -> PageOutcome {
        let result = match self.fetcher.fetch(&url).await {
            Ok(page) => Ok(read_page(&url, &page, self.template, self.scope.as_ref())),
            Err(e) => Err(e),
        };

        PageOutcome { url, result }
    }
}

impl PageTask for PageProcessor {
    fn run(&self, url: String) -> impl Future<Output = PageOutcome> + Send {
        self.process(url)
    }
}

/// Builds the record (and links, when scoped) for already-fetched markup
///
/// `url` is the URL that was requested and becomes the record's URL; links
/// resolve against the final URL after redirects.
pub fn read_page(
    url: &str,
    page: &FetchedPage,
    template: SiteTemplate,
    scope: Option<&CrawlScope>,
) -> ProcessedPage {
    let document = Html::parse_document(&page.body);
    build_page(url, page, &document, template, scope)
}

/// Like [`read_page`], but classifies the markup first
///
/// Used once per crawl, on the seed page.
pub fn read_seed(url: &str, page: &FetchedPage, scope: &CrawlScope) -> (SiteTemplate, ProcessedPage) {
    let document = Html::parse_document(&page.body);
    let template = classify(&document);
    let processed = build_page(url, page, &document, template, Some(scope));
    (template, processed)
}

fn build_page(
    url: &str,
    page: &FetchedPage,
    document: &Html,
    template: SiteTemplate,
    scope: Option<&CrawlScope>,
) -> ProcessedPage {
    let title = extract_title(document).unwrap_or_else(|| url.to_string());
    let content = extract(document, template);

    if content.is_empty() {
        tracing::debug!("No readable content extracted from {}", url);
    }

    let links = scope
        .map(|scope| resolve_links(document, &page.final_url, scope))
        .unwrap_or_default();

    ProcessedPage {
        record: PageRecord::new(title, url, content),
        links,
    }
}

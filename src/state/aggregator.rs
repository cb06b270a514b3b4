//! Result aggregation for a single crawl
//!
//! The aggregator owns the visited set, the failed set and the page records.
//! Only the coordinator touches it, consuming worker outcomes one at a time,
//! so every mutation is serialized without a lock.

use crate::crawler::SiteTemplate;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// One successfully processed page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    /// Page title, or the URL when the page has none
    pub title: String,

    /// The URL that was requested
    pub url: String,

    /// Extracted text; may be empty
    pub content: String,
}

impl PageRecord {
    pub fn new(title: impl Into<String>, url: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            content: content.into(),
        }
    }

    /// Returns true if extraction produced no text for this page
    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }
}

/// Final output of a crawl
#[derive(Debug, Clone)]
pub struct CrawlResult {
    /// Records in completion order
    pub pages: Vec<PageRecord>,

    /// URLs that exhausted their fetch attempts
    pub failed: BTreeSet<String>,

    /// Template applied to every page of the crawl
    pub template: SiteTemplate,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl CrawlResult {
    /// Number of URLs that were submitted for fetching
    pub fn total_submitted(&self) -> usize {
        self.pages.len() + self.failed.len()
    }

    /// Wall-clock duration of the crawl
    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

/// Accumulates visited URLs, failures and page records
#[derive(Debug)]
pub struct ResultAggregator {
    visited: HashSet<String>,
    failed: BTreeSet<String>,
    pages: Vec<PageRecord>,
    started_at: DateTime<Utc>,
}

impl Default for ResultAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultAggregator {
    pub fn new() -> Self {
        Self {
            visited: HashSet::new(),
            failed: BTreeSet::new(),
            pages: Vec::new(),
            started_at: Utc::now(),
        }
    }

    /// Marks a URL as visited
    ///
    /// Returns true if the URL was not seen before, i.e. the caller now owns
    /// the only right to dispatch it.
    pub fn claim(&mut self, url: &str) -> bool {
        self.visited.insert(url.to_string())
    }

    /// Claims every unseen URL of a wave and returns them in input order
    ///
    /// Duplicates within `urls` are collapsed, so no URL is dispatched twice.
    pub fn partition_unvisited<I>(&mut self, urls: I) -> Vec<String>
    where
        I: IntoIterator<Item = String>,
    {
        self.partition_unvisited_up_to(urls, usize::MAX)
    }

    /// Like [`Self::partition_unvisited`], but claims at most `max` URLs
    ///
    /// URLs past the cap are left unclaimed, so the visited set only ever
    /// holds URLs that were actually dispatched.
    pub fn partition_unvisited_up_to<I>(&mut self, urls: I, max: usize) -> Vec<String>
    where
        I: IntoIterator<Item = String>,
    {
        let mut wave = Vec::new();
        for url in urls {
            if wave.len() >= max {
                break;
            }
            if self.claim(&url) {
                wave.push(url);
            }
        }
        wave
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    /// Appends a successfully processed page
    pub fn record_page(&mut self, record: PageRecord) {
        debug_assert!(
            !self.failed.contains(&record.url),
            "url recorded as both page and failure: {}",
            record.url
        );
        self.pages.push(record);
    }

    /// Records a URL whose fetch attempts were exhausted
    pub fn record_failure(&mut self, url: impl Into<String>) {
        let url = url.into();
        debug_assert!(
            !self.pages.iter().any(|p| p.url == url),
            "url recorded as both failure and page: {}",
            url
        );
        self.failed.insert(url);
    }

    /// Number of units of work finished so far (success or failure)
    pub fn completed(&self) -> usize {
        self.pages.len() + self.failed.len()
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn pages(&self) -> &[PageRecord] {
        &self.pages
    }

    pub fn failed(&self) -> &BTreeSet<String> {
        &self.failed
    }

    /// Consumes the aggregator into the final crawl result
    pub fn into_result(self, template: SiteTemplate) -> CrawlResult {
        CrawlResult {
            pages: self.pages,
            failed: self.failed,
            template,
            started_at: self.started_at,
            finished_at: Utc::now(),
        }
    }
}

//! Crawler module for page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with retry logic
//! - Site classification and text extraction
//! - HTML parsing and link resolution
//! - The worker pool and overall crawl coordination

mod classifier;
mod coordinator;
mod extractor;
mod fetcher;
mod observer;
mod parser;
mod scheduler;
mod worker;

pub use classifier::{classify, SiteTemplate};
pub use coordinator::{Coordinator, CrawlSession};
pub use extractor::{clean_text, extract};
pub use fetcher::{build_http_client, FetchError, FetchedPage, Fetcher};
pub use observer::{CrawlObserver, NoopObserver, RecordingObserver, TracingObserver};
pub use parser::{extract_links_simple, extract_title, resolve_links};
pub use scheduler::{Wave, WorkerPool};
pub use worker::{read_page, read_seed, PageOutcome, PageProcessor, PageTask, ProcessedPage};

use crate::config::ScraperConfig;
use crate::state::CrawlResult;
use std::sync::Arc;

/// Runs a complete wave crawl from a seed URL
///
/// Convenience entry point that logs through [`TracingObserver`]. Use
/// [`Coordinator`] directly to observe progress or to run the selection
/// variant.
pub async fn crawl(config: &ScraperConfig, seed: &str) -> crate::Result<CrawlResult> {
    let mut coordinator = Coordinator::new(config, Arc::new(TracingObserver))?;
    coordinator.crawl(seed).await
}

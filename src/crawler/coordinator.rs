//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl engine, which coordinates:
//! - Seed discovery (fetch, classify, resolve links)
//! - The phase machine (`CrawlPhase`)
//! - Wave-by-wave dispatch to the worker pool
//! - Result aggregation and progress reporting
//!
//! Two variants share the engine. [`Coordinator::crawl`] follows links wave
//! after wave until nothing new turns up. [`Coordinator::run_interactive`]
//! discovers the seed's links, lets a [`LinkSelector`] pick some, and scrapes
//! exactly those in a single wave.

use crate::config::ScraperConfig;
use crate::crawler::classifier::SiteTemplate;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::observer::CrawlObserver;
use crate::crawler::scheduler::{Wave, WorkerPool};
use crate::crawler::worker::{read_seed, PageProcessor};
use crate::selection::LinkSelector;
use crate::state::{CrawlPhase, CrawlResult, PageRecord, ResultAggregator};
use crate::url::{normalize_url, CrawlScope};
use crate::{Result, ScraperError};
use std::collections::BTreeSet;
use std::sync::Arc;
use url::Url;

/// Everything discovery learned about a seed
///
/// Produced by [`Coordinator::discover`] and passed back into
/// [`Coordinator::scrape_selected`].
#[derive(Debug, Clone)]
pub struct CrawlSession {
    /// Normalized seed URL
    pub seed: Url,

    pub scope: CrawlScope,

    /// Template decided from the seed page, applied to every page
    pub template: SiteTemplate,

    /// In-scope links found on the seed page, sorted
    pub discovered: Vec<String>,

    /// Record built from the seed markup during discovery
    pub seed_page: PageRecord,
}

/// Main crawler coordinator structure
pub struct Coordinator {
    config: ScraperConfig,
    fetcher: Fetcher,
    observer: Arc<dyn CrawlObserver>,
    phase: CrawlPhase,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - Crawl settings (concurrency, retry, scope, page cap)
    /// * `observer` - Receives status, progress and error events
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to crawl, in phase `Idle`
    /// * `Err(ScraperError)` - The HTTP client could not be built
    pub fn new(config: &ScraperConfig, observer: Arc<dyn CrawlObserver>) -> Result<Self> {
        let fetcher = Fetcher::new(config)?;
        Ok(Self::with_fetcher(config, fetcher, observer))
    }

    /// Creates a coordinator around an existing fetcher
    pub fn with_fetcher(
        config: &ScraperConfig,
        fetcher: Fetcher,
        observer: Arc<dyn CrawlObserver>,
    ) -> Self {
        Self {
            config: config.clone(),
            fetcher,
            observer,
            phase: CrawlPhase::Idle,
        }
    }

    /// Current phase of the crawl
    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }

    /// Moves to a new phase, rejecting illegal transitions
    fn transition(&mut self, to: CrawlPhase) -> Result<()> {
        if !self.phase.can_transition_to(to) {
            return Err(ScraperError::InvalidTransition {
                from: self.phase,
                to,
            });
        }

        tracing::debug!("Phase {} -> {}", self.phase, to);
        self.phase = to;
        Ok(())
    }

    /// Discovers the seed's links for the selection variant
    ///
    /// On success the coordinator waits in `Selecting` for
    /// [`Self::scrape_selected`].
    ///
    /// # Errors
    ///
    /// * `ScraperError::UrlError` - The seed is not an absolute http(s) URL
    /// * `ScraperError::SeedFetch` - The seed could not be fetched; the phase
    ///   becomes `Failed`
    pub async fn discover(&mut self, seed: &str) -> Result<CrawlSession> {
        let session = self.discover_scoped(seed, false).await?;
        self.transition(CrawlPhase::Selecting)?;
        Ok(session)
    }

    /// Fetches the seed once, classifies it and resolves its links
    ///
    /// `prefers_path_scope` is the scope policy `ScopeMode::Auto` resolves to
    /// for the calling variant.
    async fn discover_scoped(
        &mut self,
        seed: &str,
        prefers_path_scope: bool,
    ) -> Result<CrawlSession> {
        let seed_url = normalize_url(seed)?;
        let path_scoped = self.config.scope.is_path_scoped(prefers_path_scope);
        let scope = CrawlScope::from_seed(&seed_url, path_scoped)?;

        self.transition(CrawlPhase::Discovering)?;
        self.observer
            .on_status(&format!("Discovering links from {}", seed_url));
        tracing::info!(
            "Scope: domain {} {}",
            scope.base_domain,
            scope
                .path_prefix
                .as_deref()
                .map(|p| format!("under {}", p))
                .unwrap_or_else(|| "(domain-wide)".to_string())
        );

        let page = match self.fetcher.fetch(seed_url.as_str()).await {
            Ok(page) => page,
            Err(source) => {
                self.transition(CrawlPhase::Failed)?;
                self.observer
                    .on_error(&format!("Could not fetch seed {}: {}", seed_url, source));
                return Err(ScraperError::SeedFetch {
                    url: seed_url.to_string(),
                    source,
                });
            }
        };

        let (template, processed) = read_seed(seed_url.as_str(), &page, &scope);
        let discovered: Vec<String> = processed.links.into_iter().collect();

        tracing::info!("Site template: {}", template);
        self.observer.on_links_discovered(&discovered);

        Ok(CrawlSession {
            seed: seed_url,
            scope,
            template,
            discovered,
            seed_page: processed.record,
        })
    }

    /// Crawls everything reachable from the seed, wave by wave
    ///
    /// The seed page is recorded from the discovery fetch. Each wave claims
    /// the unvisited URLs of the frontier, runs them through the pool, and
    /// collects their unvisited links into the next frontier. The crawl ends
    /// when a wave yields nothing new, or when `max_pages` URLs have been
    /// dispatched.
    pub async fn crawl(&mut self, seed: &str) -> Result<CrawlResult> {
        let session = self.discover_scoped(seed, true).await?;
        self.transition(CrawlPhase::Scraping)?;

        let mut aggregator = ResultAggregator::new();
        aggregator.claim(session.seed.as_str());
        aggregator.record_page(session.seed_page.clone());

        let mut dispatched = 1;
        self.observer.on_progress(aggregator.completed(), dispatched);

        let limit = self.config.page_limit().unwrap_or(usize::MAX);
        let pool = self.pool(session.template, Some(session.scope.clone()));
        let mut frontier = session.discovered;
        let mut wave_number = 0;

        loop {
            let room = limit.saturating_sub(dispatched);
            let wave = aggregator.partition_unvisited_up_to(frontier, room);
            if wave.is_empty() {
                break;
            }

            wave_number += 1;
            dispatched += wave.len();
            tracing::info!("Wave {}: dispatching {} page(s)", wave_number, wave.len());
            self.observer.on_status(&format!(
                "Scraping wave {} ({} page(s))",
                wave_number,
                wave.len()
            ));

            let links = self
                .consume_wave(&mut aggregator, pool.spawn(wave), dispatched)
                .await;
            frontier = links.into_iter().collect();

            if dispatched >= limit {
                tracing::info!("Page limit of {} reached", limit);
                break;
            }
        }

        self.complete(aggregator, session.template)
    }

    /// Scrapes a caller-chosen set of URLs in a single wave
    ///
    /// Must follow [`Self::discover`]. Selected URLs are normalized and
    /// deduplicated; ones that do not parse or fall outside the session's
    /// scope are reported through the observer and skipped. Links on the
    /// scraped pages are not followed.
    pub async fn scrape_selected(
        &mut self,
        session: &CrawlSession,
        selected: Vec<String>,
    ) -> Result<CrawlResult> {
        self.transition(CrawlPhase::Scraping)?;

        let mut candidates = Vec::with_capacity(selected.len());
        for raw in selected {
            match normalize_url(&raw) {
                Ok(url) if session.scope.allows(&url) => candidates.push(url.to_string()),
                Ok(url) => self
                    .observer
                    .on_error(&format!("Skipping out-of-scope selection {}", url)),
                Err(e) => self
                    .observer
                    .on_error(&format!("Skipping invalid selection {}: {}", raw, e)),
            }
        }

        let limit = self.config.page_limit().unwrap_or(usize::MAX);
        let mut aggregator = ResultAggregator::new();
        let wave = aggregator.partition_unvisited_up_to(candidates, limit);
        let total = wave.len();

        tracing::info!("Scraping {} selected page(s)", total);
        self.observer
            .on_status(&format!("Scraping {} selected page(s)", total));

        let pool = self.pool(session.template, None);
        self.consume_wave(&mut aggregator, pool.spawn(wave), total)
            .await;

        self.complete(aggregator, session.template)
    }

    /// Discovers, asks the selector, then scrapes the selection
    ///
    /// # Errors
    ///
    /// * `ScraperError::SelectionAborted` - The selector returned `None`; the
    ///   coordinator stays in `Selecting` and may discover again
    pub async fn run_interactive(
        &mut self,
        seed: &str,
        selector: &dyn LinkSelector,
    ) -> Result<CrawlResult> {
        let session = self.discover(seed).await?;

        match selector.select(&session.discovered) {
            Some(selected) => self.scrape_selected(&session, selected).await,
            None => {
                self.observer.on_status("Selection cancelled");
                Err(ScraperError::SelectionAborted)
            }
        }
    }

    fn pool(&self, template: SiteTemplate, scope: Option<CrawlScope>) -> WorkerPool<PageProcessor> {
        let processor = PageProcessor::new(self.fetcher.clone(), template, scope);
        WorkerPool::new(processor, self.config.concurrency)
    }

    /// Drains a wave into the aggregator, returning links not yet visited
    async fn consume_wave(
        &self,
        aggregator: &mut ResultAggregator,
        mut wave: Wave,
        total: usize,
    ) -> BTreeSet<String> {
        let mut next = BTreeSet::new();

        while let Some(outcome) = wave.next_outcome().await {
            match outcome.result {
                Ok(page) => {
                    tracing::debug!("Scraped {}", outcome.url);
                    next.extend(
                        page.links
                            .into_iter()
                            .filter(|link| !aggregator.is_visited(link)),
                    );
                    aggregator.record_page(page.record);
                }
                Err(e) => {
                    self.observer
                        .on_error(&format!("Failed to scrape {}: {}", outcome.url, e));
                    aggregator.record_failure(outcome.url);
                }
            }
            self.observer.on_progress(aggregator.completed(), total);
        }

        for url in wave.finish().await {
            self.observer
                .on_error(&format!("Worker stopped before finishing {}", url));
            aggregator.record_failure(url);
            self.observer.on_progress(aggregator.completed(), total);
        }

        next
    }

    fn complete(&mut self, aggregator: ResultAggregator, template: SiteTemplate) -> Result<CrawlResult> {
        self.transition(CrawlPhase::Completed)?;

        let result = aggregator.into_result(template);
        tracing::info!(
            "Crawl completed: {} page(s), {} failure(s) in {}ms",
            result.pages.len(),
            result.failed.len(),
            result.duration().num_milliseconds()
        );
        self.observer.on_status(&format!(
            "Completed: {} page(s) scraped, {} failed",
            result.pages.len(),
            result.failed.len()
        ));

        Ok(result)
    }
}

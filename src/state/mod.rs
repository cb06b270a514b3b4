//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlPhase`: Tracks where a crawl session is (discovering, scraping, completed, ...)
//! - `ResultAggregator`: Owns the visited set, failed set and page records of one crawl
//! - `PageRecord` / `CrawlResult`: The data a finished crawl hands back

mod aggregator;
mod crawl_phase;

// Re-export main types
pub use aggregator::{CrawlResult, PageRecord, ResultAggregator};
pub use crawl_phase::CrawlPhase;

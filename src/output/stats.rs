//! Statistics for a finished crawl
//!
//! This module summarizes a `CrawlResult` and prints the summary.

use crate::crawler::SiteTemplate;
use crate::state::CrawlResult;

/// Crawl statistics summary
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlStatistics {
    /// Pages turned into records
    pub pages: usize,

    /// URLs that exhausted their retries
    pub failed: usize,

    /// Records whose extraction produced no text
    pub empty_pages: usize,

    /// Characters of extracted text across all records
    pub total_chars: usize,

    pub template: SiteTemplate,

    pub duration_ms: i64,
}

impl CrawlStatistics {
    pub fn from_result(result: &CrawlResult) -> Self {
        Self {
            pages: result.pages.len(),
            failed: result.failed.len(),
            empty_pages: result.pages.iter().filter(|p| p.is_empty()).count(),
            total_chars: result.pages.iter().map(|p| p.content.chars().count()).sum(),
            template: result.template,
            duration_ms: result.duration().num_milliseconds(),
        }
    }

    /// Successful pages as a percentage of submitted URLs
    pub fn success_rate(&self) -> f64 {
        let total = self.pages + self.failed;
        if total == 0 {
            return 0.0;
        }
        (self.pages as f64 / total as f64) * 100.0
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Site template: {}", stats.template);
    println!("  Pages scraped: {}", stats.pages);
    println!("  Failed URLs: {}", stats.failed);
    println!("  Pages without content: {}", stats.empty_pages);
    println!("  Total characters: {}", stats.total_chars);
    println!(
        "  Duration: {:.2}s",
        stats.duration_ms as f64 / 1000.0
    );
    println!();

    println!(
        "Success Rate: {:.1}% ({} / {} URLs)",
        stats.success_rate(),
        stats.pages,
        stats.pages + stats.failed
    );
}

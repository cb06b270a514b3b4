use crate::url::ScopeMode;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Default number of concurrent page fetches
pub const DEFAULT_CONCURRENCY: usize = 5;

/// Default per-attempt request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Default number of fetch attempts per URL
pub const DEFAULT_RETRY_ATTEMPTS: u32 = 3;

/// Default delay between fetch attempts in milliseconds
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1000;

/// Main configuration structure for doc-scraper
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scraper: ScraperConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawl behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ScraperConfig {
    /// Maximum number of concurrent page fetches
    pub concurrency: usize,

    /// Per-attempt request timeout (seconds)
    pub timeout_secs: u64,

    /// Total fetch attempts per URL, including the first
    pub retry_attempts: u32,

    /// Fixed delay between attempts (milliseconds)
    pub retry_delay_ms: u64,

    /// Link scoping policy
    pub scope: ScopeMode,

    /// Stop dispatching new pages after this many; 0 means unlimited
    pub max_pages: usize,

    /// User agent sent with every request
    pub user_agent: String,
}

impl ScraperConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    /// Page cap as an option, treating 0 as "no limit"
    pub fn page_limit(&self) -> Option<usize> {
        (self.max_pages > 0).then_some(self.max_pages)
    }
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            retry_attempts: DEFAULT_RETRY_ATTEMPTS,
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
            scope: ScopeMode::Auto,
            max_pages: 0,
            user_agent: format!(
                "{}/{} (+https://github.com/doc-scraper/doc-scraper)",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION")
            ),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct OutputConfig {
    /// Directory that receives the output files
    pub directory: PathBuf,

    /// Write the JSON array of page records
    pub write_json: bool,

    /// Write the plain-text rendering
    pub write_text: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("output"),
            write_json: true,
            write_text: true,
        }
    }
}

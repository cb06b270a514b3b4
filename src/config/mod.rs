//! Configuration module for doc-scraper
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! A crawl can run without any file at all: `Config::default()` carries the
//! stock settings (5 workers, 10 second timeout, 3 attempts one second apart).
//!
//! # Example
//!
//! ```no_run
//! use doc_scraper::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("scraper.toml")).unwrap();
//! println!("Crawler will use {} workers", config.scraper.concurrency);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, OutputConfig, ScraperConfig, DEFAULT_CONCURRENCY, DEFAULT_RETRY_ATTEMPTS,
    DEFAULT_RETRY_DELAY_MS, DEFAULT_TIMEOUT_SECS,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::{validate, MAX_CONCURRENCY};

//! Output module for writing crawl results
//!
//! This module handles:
//! - Writing page records as JSON and as readable text
//! - Listing failed URLs
//! - Summarizing crawl statistics

mod json;
mod paths;
pub mod stats;
mod text;
mod traits;

pub use json::{read_json, JsonOutput};
pub use paths::OutputPaths;
pub use stats::{print_statistics, CrawlStatistics};
pub use text::{format_text, FailedUrlsOutput, TextOutput};
pub use traits::{OutputError, OutputHandler, OutputResult};

use crate::config::OutputConfig;
use crate::state::CrawlResult;
use std::fs;
use std::path::PathBuf;

/// Writes every enabled output for a finished crawl
///
/// Creates the directory holding `paths` if needed. The failed-URLs file is written
/// whenever the crawl had failures, regardless of the format switches.
///
/// # Returns
///
/// * `Ok(paths)` - Files that were written
/// * `Err(OutputError)` - The directory or a file could not be written
pub fn write_all(
    result: &CrawlResult,
    paths: &OutputPaths,
    config: &OutputConfig,
) -> OutputResult<Vec<PathBuf>> {
    if let Some(dir) = paths.json.parent() {
        fs::create_dir_all(dir)?;
    }

    let mut handlers: Vec<Box<dyn OutputHandler>> = Vec::new();
    if config.write_json {
        handlers.push(Box::new(JsonOutput));
    }
    if config.write_text {
        handlers.push(Box::new(TextOutput));
    }
    handlers.push(Box::new(FailedUrlsOutput));

    let mut written = Vec::new();
    for handler in handlers {
        if let Some(path) = handler.write(result, paths)? {
            written.push(path);
        }
    }

    Ok(written)
}

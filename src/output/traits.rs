//! Output handler traits and types
//!
//! This module defines the trait interface for output handlers and the
//! error type they share.

use crate::output::OutputPaths;
use crate::state::CrawlResult;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output to {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to format output: {0}")]
    Format(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Trait for output handlers
///
/// Each handler renders one file from a finished crawl. Rendering is separate
/// from writing so formats can be inspected without touching the disk.
pub trait OutputHandler {
    /// Short label used in logs
    fn name(&self) -> &'static str;

    /// Where this handler writes, given the crawl's output paths
    fn path<'a>(&self, paths: &'a OutputPaths) -> &'a Path;

    /// Renders the file contents
    ///
    /// # Returns
    ///
    /// * `Ok(Some(contents))` - Contents to write
    /// * `Ok(None)` - Nothing to write for this crawl
    fn render(&self, result: &CrawlResult) -> OutputResult<Option<String>>;

    /// Renders and writes the file
    ///
    /// # Returns
    ///
    /// The path written, or `None` when the handler had nothing to write
    fn write(&self, result: &CrawlResult, paths: &OutputPaths) -> OutputResult<Option<PathBuf>> {
        let Some(contents) = self.render(result)? else {
            tracing::debug!("No {} output for this crawl", self.name());
            return Ok(None);
        };

        let path = self.path(paths);
        fs::write(path, contents).map_err(|source| OutputError::Write {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::info!("Wrote {} output to {}", self.name(), path.display());
        Ok(Some(path.to_path_buf()))
    }
}

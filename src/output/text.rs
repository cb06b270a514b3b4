//! Plain-text outputs
//!
//! - `TextOutput`: every record as a titled block, separated by a rule
//! - `FailedUrlsOutput`: one failed URL per line, only when there are any

use crate::output::traits::{OutputHandler, OutputResult};
use crate::output::OutputPaths;
use crate::state::{CrawlResult, PageRecord};
use std::path::Path;

/// Width of the rule between text records
const RULE_WIDTH: usize = 80;

/// Writes the records as readable text
#[derive(Debug, Default, Clone, Copy)]
pub struct TextOutput;

impl OutputHandler for TextOutput {
    fn name(&self) -> &'static str {
        "text"
    }

    fn path<'a>(&self, paths: &'a OutputPaths) -> &'a Path {
        &paths.text
    }

    fn render(&self, result: &CrawlResult) -> OutputResult<Option<String>> {
        Ok(Some(format_text(&result.pages)))
    }
}

/// Formats records as text blocks
///
/// Each record renders as:
///
/// ```text
/// Title: <title>
/// URL: <url>
///
/// <content>
///
/// ================ (80 wide)
///
/// ```
pub fn format_text(pages: &[PageRecord]) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut out = String::new();

    for page in pages {
        out.push_str(&format!("Title: {}\nURL: {}\n\n", page.title, page.url));
        out.push_str(&page.content);
        out.push_str("\n\n");
        out.push_str(&rule);
        out.push_str("\n\n");
    }

    out
}

/// Lists URLs that exhausted their retries
#[derive(Debug, Default, Clone, Copy)]
pub struct FailedUrlsOutput;

impl OutputHandler for FailedUrlsOutput {
    fn name(&self) -> &'static str {
        "failed urls"
    }

    fn path<'a>(&self, paths: &'a OutputPaths) -> &'a Path {
        &paths.failed
    }

    fn render(&self, result: &CrawlResult) -> OutputResult<Option<String>> {
        if result.failed.is_empty() {
            return Ok(None);
        }

        let mut out = String::new();
        for url in &result.failed {
            out.push_str(url);
            out.push('\n');
        }
        Ok(Some(out))
    }
}

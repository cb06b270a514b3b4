//! Output file naming

use crate::url::extract_domain;
use std::path::{Path, PathBuf};
use url::Url;

/// Files one crawl writes, all named after the seed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub json: PathBuf,
    pub text: PathBuf,
    pub failed: PathBuf,
}

impl OutputPaths {
    /// Derives the output files for a seed inside `dir`
    ///
    /// # Examples
    ///
    /// ```
    /// use doc_scraper::output::OutputPaths;
    /// use std::path::Path;
    /// use url::Url;
    ///
    /// let seed = Url::parse("https://example.com/docs/guide/").unwrap();
    /// let paths = OutputPaths::for_seed(Path::new("out"), &seed);
    /// assert_eq!(paths.json, Path::new("out/docs_guide.json"));
    /// assert_eq!(paths.failed, Path::new("out/docs_guide_failed_urls.txt"));
    /// ```
    pub fn for_seed(dir: &Path, seed: &Url) -> Self {
        let base = base_name(seed);
        Self {
            json: dir.join(format!("{}.json", base)),
            text: dir.join(format!("{}.txt", base)),
            failed: dir.join(format!("{}_failed_urls.txt", base)),
        }
    }
}

/// Seed path with slashes trimmed and inner slashes as underscores, or the
/// sanitized authority for a root seed
fn base_name(seed: &Url) -> String {
    let path = seed.path().trim_matches('/');
    if !path.is_empty() {
        return path.replace('/', "_");
    }

    extract_domain(seed)
        .unwrap_or_else(|| "output".to_string())
        .replace(['.', ':'], "_")
}

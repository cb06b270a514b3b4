//! Link selection between discovery and scraping
//!
//! After discovery the coordinator hands the in-scope links to a
//! [`LinkSelector`]. Returning `None` aborts the crawl; returning a list
//! scrapes exactly those URLs.

use regex::Regex;

/// Chooses which discovered links to scrape
pub trait LinkSelector: Send + Sync {
    /// Returns the URLs to scrape, or `None` to cancel
    fn select(&self, discovered: &[String]) -> Option<Vec<String>>;
}

/// Selects every discovered link
#[derive(Debug, Default, Clone, Copy)]
pub struct SelectAll;

impl LinkSelector for SelectAll {
    fn select(&self, discovered: &[String]) -> Option<Vec<String>> {
        Some(discovered.to_vec())
    }
}

/// Selects links by regular expression
///
/// A link is kept when it matches at least one include pattern (or there are
/// none) and matches no exclude pattern.
#[derive(Debug, Clone, Default)]
pub struct PatternSelector {
    include: Vec<Regex>,
    exclude: Vec<Regex>,
}

impl PatternSelector {
    /// Compiles the given patterns
    ///
    /// # Examples
    ///
    /// ```
    /// use doc_scraper::selection::{LinkSelector, PatternSelector};
    ///
    /// let selector = PatternSelector::new(&["/guide/"], &["draft"]).unwrap();
    /// let links = vec![
    ///     "https://example.com/guide/intro".to_string(),
    ///     "https://example.com/guide/draft-notes".to_string(),
    ///     "https://example.com/api/".to_string(),
    /// ];
    /// assert_eq!(
    ///     selector.select(&links),
    ///     Some(vec!["https://example.com/guide/intro".to_string()])
    /// );
    /// ```
    pub fn new<S: AsRef<str>>(include: &[S], exclude: &[S]) -> Result<Self, regex::Error> {
        Ok(Self {
            include: compile(include)?,
            exclude: compile(exclude)?,
        })
    }

    /// Returns true if the link passes both pattern lists
    pub fn matches(&self, link: &str) -> bool {
        let included = self.include.is_empty() || self.include.iter().any(|re| re.is_match(link));
        included && !self.exclude.iter().any(|re| re.is_match(link))
    }
}

impl LinkSelector for PatternSelector {
    fn select(&self, discovered: &[String]) -> Option<Vec<String>> {
        let selected: Vec<String> = discovered
            .iter()
            .filter(|link| self.matches(link))
            .cloned()
            .collect();

        tracing::info!(
            "Selected {} of {} discovered links",
            selected.len(),
            discovered.len()
        );
        Some(selected)
    }
}

fn compile<S: AsRef<str>>(patterns: &[S]) -> Result<Vec<Regex>, regex::Error> {
    patterns.iter().map(|p| Regex::new(p.as_ref())).collect()
}

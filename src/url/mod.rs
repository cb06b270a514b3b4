//! URL handling module for doc-scraper
//!
//! This module provides URL normalization, authority extraction and the crawl
//! scope that decides which discovered links belong to the crawl.

mod domain;
mod normalize;

use crate::{UrlError, UrlResult};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use url::Url;

// Re-export main functions
pub use domain::extract_domain;
pub use normalize::{normalize_url, without_fragment};

/// Substrings marking administrative, feed and comment endpoints
///
/// Matched against the lowercased absolute URL when the crawl is scoped to the
/// whole domain rather than to a path prefix.
pub const NOISE_PATTERNS: &[&str] = &[
    "wp-admin",
    "wp-json",
    "wp-includes",
    "xmlrpc",
    "wp-login",
    "feed",
    "?",
    "#comment",
    "replytocom",
];

/// File extensions that are never followed
pub const BINARY_EXTENSIONS: &[&str] = &[".pdf", ".zip", ".png", ".jpg"];

/// How discovered links are scoped relative to the seed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopeMode {
    /// Path-prefix scoping for full crawls, domain scoping for selections
    #[default]
    Auto,
    /// Same domain and under the seed's directory
    Path,
    /// Same domain, minus administrative/feed noise
    Domain,
}

impl ScopeMode {
    /// Resolves the mode to "path scoped or not" for a given crawl variant
    ///
    /// `variant_prefers_path` is the policy `Auto` falls back to.
    pub fn is_path_scoped(self, variant_prefers_path: bool) -> bool {
        match self {
            Self::Auto => variant_prefers_path,
            Self::Path => true,
            Self::Domain => false,
        }
    }
}

impl fmt::Display for ScopeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Auto => "auto",
            Self::Path => "path",
            Self::Domain => "domain",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for ScopeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "path" => Ok(Self::Path),
            "domain" => Ok(Self::Domain),
            other => Err(format!(
                "unknown scope '{}', expected one of: auto, path, domain",
                other
            )),
        }
    }
}

/// The part of the web a crawl is allowed to visit
///
/// Computed once from the seed URL and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlScope {
    /// Authority of the seed (lowercase host plus non-default port)
    pub base_domain: String,

    /// Directory of the seed path, with trailing slash, when path scoped
    pub path_prefix: Option<String>,
}

impl CrawlScope {
    /// Derives the scope from a seed URL
    ///
    /// # Examples
    ///
    /// ```
    /// use doc_scraper::url::CrawlScope;
    /// use url::Url;
    ///
    /// let seed = Url::parse("https://example.com/docs/index.html").unwrap();
    /// let scope = CrawlScope::from_seed(&seed, true).unwrap();
    /// assert_eq!(scope.base_domain, "example.com");
    /// assert_eq!(scope.path_prefix.as_deref(), Some("/docs/"));
    /// ```
    pub fn from_seed(seed: &Url, path_scoped: bool) -> UrlResult<Self> {
        let base_domain = extract_domain(seed).ok_or(UrlError::MissingDomain)?;
        let path_prefix = path_scoped.then(|| directory_of(seed.path()));

        Ok(Self {
            base_domain,
            path_prefix,
        })
    }

    /// Returns true if the URL belongs to this crawl
    ///
    /// The authority must match exactly. With a path prefix the path must
    /// start with it; without one the noise denylist applies instead.
    pub fn allows(&self, url: &Url) -> bool {
        if extract_domain(url).as_deref() != Some(self.base_domain.as_str()) {
            return false;
        }

        match &self.path_prefix {
            Some(prefix) => url.path().starts_with(prefix.as_str()),
            None => !is_noise(url),
        }
    }

    /// Returns true when links are restricted to the seed's directory
    pub fn is_path_scoped(&self) -> bool {
        self.path_prefix.is_some()
    }
}

/// Returns true if the URL hits the administrative/feed/comment denylist
pub fn is_noise(url: &Url) -> bool {
    let lowered = url.as_str().to_lowercase();
    NOISE_PATTERNS.iter().any(|pattern| lowered.contains(pattern))
}

/// Returns true if the URL path names a binary download
pub fn is_binary_resource(url: &Url) -> bool {
    let path = url.path().to_lowercase();
    BINARY_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

/// Drops the final path segment, keeping the trailing slash
fn directory_of(path: &str) -> String {
    match path.rsplit_once('/') {
        Some((dir, _)) => format!("{}/", dir),
        None => "/".to_string(),
    }
}

/// Crawl phase definitions
///
/// This module defines the phases a crawl passes through and which moves
/// between them are legal.
use std::fmt;

/// Represents the current phase of a crawl session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CrawlPhase {
    /// No crawl has started yet
    #[default]
    Idle,

    /// Fetching the seed, classifying the site and collecting its links
    Discovering,

    /// Waiting for the caller to confirm which discovered links to scrape
    Selecting,

    /// Worker pool is processing the frontier
    Scraping,

    // ===== Terminal States =====
    /// All work drained and results emitted
    Completed,

    /// The seed could not be fetched; no results exist
    Failed,
}

impl CrawlPhase {
    /// Returns true if no further work happens in this phase
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Returns true if the crawl is currently doing work
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Discovering | Self::Selecting | Self::Scraping)
    }

    /// Returns true if moving from `self` to `next` is allowed
    ///
    /// Idle and the terminal phases may all start a new discovery, which is
    /// how a coordinator is reused with a new seed. A pending selection may
    /// also be abandoned for a new discovery.
    pub fn can_transition_to(&self, next: CrawlPhase) -> bool {
        use CrawlPhase::*;
        matches!(
            (self, next),
            (Idle | Selecting | Completed | Failed, Discovering)
                | (Discovering, Selecting | Scraping | Failed)
                | (Selecting, Scraping)
                | (Scraping, Completed)
        )
    }

    /// Lowercase label used in logs and status messages
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Discovering => "discovering",
            Self::Selecting => "selecting",
            Self::Scraping => "scraping",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// Returns all phases
    pub fn all_phases() -> Vec<Self> {
        vec![
            Self::Idle,
            Self::Discovering,
            Self::Selecting,
            Self::Scraping,
            Self::Completed,
            Self::Failed,
        ]
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

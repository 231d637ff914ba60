/// Crawl phase definitions for tracking run progress
///
/// A run cycles through these phases once per results page.
use std::fmt;

/// Represents the current phase of a crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlPhase {
    // ===== Results-page phases =====
    /// Loading the results page
    Navigate,

    /// Scrolling until the tile count settles
    Stabilize,

    /// Reading listing URLs from the settled page
    DiscoverUrls,

    /// Reading the pagination control (page 1 only)
    DetermineTotalPages,

    // ===== Listing phases =====
    /// Visiting listings and emitting their records
    ExtractAndEmit,

    /// Deciding whether another page follows
    AdvanceOrTerminate,

    // ===== Terminal =====
    /// The run is over
    Done,
}

impl CrawlPhase {
    /// Returns true if the run is over
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Returns true if a failure in this phase ends the run
    ///
    /// Failures while loading, stabilizing or reading a results page are
    /// fatal; failures on a single listing are not.
    pub fn failure_is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Navigate | Self::Stabilize | Self::DiscoverUrls | Self::DetermineTotalPages
        )
    }

    /// Returns true if the run may move from this phase to `next`
    pub fn can_transition_to(&self, next: CrawlPhase) -> bool {
        use CrawlPhase::*;

        match (self, next) {
            (Navigate, Stabilize) => true,
            (Stabilize, DiscoverUrls) => true,
            (DiscoverUrls, DetermineTotalPages) => true,
            (DiscoverUrls, ExtractAndEmit) => true,
            (DetermineTotalPages, ExtractAndEmit) => true,
            (ExtractAndEmit, AdvanceOrTerminate) => true,
            (AdvanceOrTerminate, Navigate) => true,
            (AdvanceOrTerminate, Done) => true,
            // A fatal page failure ends the run from any results-page phase
            (phase, Done) => phase.failure_is_fatal(),
            _ => false,
        }
    }

    /// Short name used in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Navigate => "navigate",
            Self::Stabilize => "stabilize",
            Self::DiscoverUrls => "discover_urls",
            Self::DetermineTotalPages => "determine_total_pages",
            Self::ExtractAndEmit => "extract_and_emit",
            Self::AdvanceOrTerminate => "advance_or_terminate",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

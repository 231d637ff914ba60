//! Transient state of one crawl run

use crate::state::CrawlPhase;

/// Run state owned by the coordinator for the duration of a crawl
#[derive(Debug, Clone)]
pub struct CrawlState {
    /// 1-based index of the results page being processed
    current_page: u32,

    /// Page bound, fixed once page 1 has been read
    total_pages: Option<u32>,

    /// Records successfully emitted
    emitted: u64,

    /// Listings skipped after a failure
    failed_listings: u64,

    phase: CrawlPhase,
}

impl CrawlState {
    /// State at the start of a run
    pub fn new() -> Self {
        Self {
            current_page: 1,
            total_pages: None,
            emitted: 0,
            failed_listings: 0,
            phase: CrawlPhase::Navigate,
        }
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn total_pages(&self) -> Option<u32> {
        self.total_pages
    }

    pub fn emitted(&self) -> u64 {
        self.emitted
    }

    pub fn failed_listings(&self) -> u64 {
        self.failed_listings
    }

    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }

    /// Moves to `next`, logging transitions the phase graph does not allow
    pub fn enter(&mut self, next: CrawlPhase) {
        if !self.phase.can_transition_to(next) {
            tracing::warn!("Unexpected phase transition: {} -> {}", self.phase, next);
        }
        tracing::trace!("Page {}: {} -> {}", self.current_page, self.phase, next);
        self.phase = next;
    }

    /// Fixes the page bound; later calls are ignored
    ///
    /// Returns the bound in effect.
    pub fn freeze_total_pages(&mut self, total: u32) -> u32 {
        *self.total_pages.get_or_insert(total.max(1))
    }

    pub fn record_emitted(&mut self) {
        self.emitted += 1;
    }

    pub fn record_failed_listing(&mut self) {
        self.failed_listings += 1;
    }

    /// Whether the current page is the last one to visit
    pub fn is_last_page(&self) -> bool {
        match self.total_pages {
            Some(total) => self.current_page >= total,
            None => true,
        }
    }

    /// Advances to the next page
    pub fn advance(&mut self) {
        self.current_page += 1;
    }
}

impl Default for CrawlState {
    fn default() -> Self {
        Self::new()
    }
}

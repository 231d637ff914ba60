//! Run outcome reporting

use std::fmt;
use std::time::Duration;

/// How a run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Termination {
    /// Every page up to the page bound was processed
    Completed,

    /// A results page failed; later pages were not visited
    Aborted { page: u32, reason: String },
}

impl Termination {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

/// Summary of a finished run
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlReport {
    /// Results pages whose listings were processed
    pub pages_visited: u32,

    /// Frozen page bound (0 if page 1 never loaded)
    pub total_pages: u32,

    pub records_emitted: u64,

    pub listings_failed: u64,

    pub termination: Termination,

    pub elapsed: Duration,
}

impl fmt::Display for CrawlReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} listings scraped from {}/{} pages ({} failed) in {:.1}s",
            self.records_emitted,
            self.pages_visited,
            self.total_pages,
            self.listings_failed,
            self.elapsed.as_secs_f64()
        )?;

        if let Termination::Aborted { page, reason } = &self.termination {
            write!(f, "; aborted on page {}: {}", page, reason)?;
        }

        Ok(())
    }
}

//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlPhase`: the step of the per-page cycle the run is in
//! - `CrawlState`: page index, frozen page bound and record counters

mod crawl_phase;
mod crawl_state;

// Re-export main types
pub use crawl_phase::CrawlPhase;
pub use crawl_state::CrawlState;

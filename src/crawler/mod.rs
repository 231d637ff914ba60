//! Crawler module for results-page traversal and listing extraction
//!
//! This module contains the core crawling logic, including:
//! - Scroll stabilization of lazily-loaded results pages
//! - Listing URL and page-count discovery
//! - Listing detail extraction
//! - Request pacing and overall crawl coordination

mod coordinator;
mod delay;
mod detail;
mod discovery;
mod report;
pub mod stabilize;
pub mod timing;

pub use coordinator::{run_crawl, Coordinator};
pub use delay::DelayPolicy;
pub use detail::{extract_features, extract_record, join_agent_names, scrape_listing};
pub use discovery::{clamp_total_pages, discover_total_pages, extract_listing_urls};
pub use report::{CrawlReport, Termination};
pub use stabilize::{stabilize, ScrollSettings, StopReason, Stabilized};
pub use timing::Timing;

//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the page loop that ties the crawl together:
//! - Navigating to each results page and waiting for it to settle
//! - Determining the page bound from page 1
//! - Visiting every listing, emitting its record and pacing requests
//! - Flushing the sink and closing the session when the run ends
//!
//! Per-listing failures are logged and skipped. A failure on a results page
//! ends the run; records emitted before it stay in the sink.

use crate::config::{validate, Config};
use crate::crawler::delay::DelayPolicy;
use crate::crawler::detail::scrape_listing;
use crate::crawler::discovery::{clamp_total_pages, discover_total_pages, extract_listing_urls};
use crate::crawler::report::{CrawlReport, Termination};
use crate::crawler::stabilize::{stabilize, ScrollSettings};
use crate::crawler::timing::Timing;
use crate::markup::SitePatterns;
use crate::render::{open_session, RenderSession};
use crate::sink::{open_sink, RecordSink};
use crate::site::SiteLayout;
use crate::state::{CrawlPhase, CrawlState};
use crate::{ListingError, PageError, SweepError};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Main crawler coordinator structure
///
/// Owns the rendering session and the sink for the whole run. Everything
/// happens sequentially on the calling task.
pub struct Coordinator<S, K> {
    config: Config,
    session: S,
    sink: K,
    layout: SiteLayout,
    patterns: SitePatterns,
    scroll: ScrollSettings,
    delay: DelayPolicy,
    timing: Timing,
    rng: StdRng,
    state: CrawlState,
}

impl<S, K> Coordinator<S, K>
where
    S: RenderSession,
    K: RecordSink,
{
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The run configuration
    /// * `session` - The rendering session to drive
    /// * `sink` - Where extracted records go
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(SweepError)` - The configuration is invalid
    pub fn new(config: Config, session: S, sink: K) -> Result<Self, SweepError> {
        validate(&config)?;

        let layout = SiteLayout::new(&config.site, &config.run.location)?;
        let patterns = SitePatterns::compile()?;
        let scroll = ScrollSettings::from(&config.scroll);
        let delay = DelayPolicy::from(&config.run);

        Ok(Self {
            config,
            session,
            sink,
            layout,
            patterns,
            scroll,
            delay,
            timing: Timing::system(),
            rng: StdRng::from_entropy(),
            state: CrawlState::new(),
        })
    }

    /// Replaces the clock and sleeper
    pub fn with_timing(mut self, timing: Timing) -> Self {
        self.timing = timing;
        self
    }

    /// Seeds the delay jitter
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn state(&self) -> &CrawlState {
        &self.state
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    /// Consumes the coordinator, returning the session and sink
    pub fn into_parts(self) -> (S, K) {
        (self.session, self.sink)
    }

    /// Runs the page loop to completion
    ///
    /// Returns `Err` only when the sink cannot be flushed at the end of the
    /// run. Page and listing failures are reported through the returned
    /// [`CrawlReport`].
    pub async fn run(&mut self) -> Result<CrawlReport, SweepError> {
        let started = self.timing.now();
        tracing::info!(
            "Starting scraper for {} with max {} pages",
            self.config.run.location,
            self.config.run.max_pages
        );

        let mut pages_visited = 0u32;

        let termination = loop {
            let page = self.state.current_page();

            let urls = match self.process_results_page(page).await {
                Ok(urls) => urls,
                Err(error) => {
                    tracing::error!("Error processing page {}: {}", page, error);
                    self.state.enter(CrawlPhase::Done);
                    break Termination::Aborted {
                        page,
                        reason: error.to_string(),
                    };
                }
            };

            self.state.enter(CrawlPhase::ExtractAndEmit);
            self.process_listings(page, &urls).await;
            pages_visited += 1;

            self.state.enter(CrawlPhase::AdvanceOrTerminate);
            if self.state.is_last_page() {
                self.state.enter(CrawlPhase::Done);
                break Termination::Completed;
            }

            self.state.advance();
            self.state.enter(CrawlPhase::Navigate);
        };

        let flushed = self.sink.flush();
        if let Err(e) = self.session.close().await {
            tracing::warn!("Failed to close render session: {}", e);
        }
        flushed?;

        let report = CrawlReport {
            pages_visited,
            total_pages: self.state.total_pages().unwrap_or(0),
            records_emitted: self.state.emitted(),
            listings_failed: self.state.failed_listings(),
            termination,
            elapsed: self.timing.now().saturating_duration_since(started),
        };

        tracing::info!(
            "Scraping completed! Total listings scraped: {}",
            report.records_emitted
        );
        tracing::debug!("{}", report);

        Ok(report)
    }

    /// Loads, stabilizes and reads one results page
    ///
    /// On page 1 this also fixes the page bound.
    async fn process_results_page(&mut self, page: u32) -> Result<Vec<String>, PageError> {
        let url = self.layout.page_url(page);
        tracing::info!("Visiting page {}: {}", page, url);

        let load_error = |source| PageError::Load {
            page,
            url: url.clone(),
            source,
        };
        self.session.load_url(&url).await.map_err(load_error)?;
        self.session.wait_for_load().await.map_err(load_error)?;

        self.state.enter(CrawlPhase::Stabilize);
        let settled = stabilize(&mut self.session, &self.patterns.tile, &self.scroll, &self.timing)
            .await
            .map_err(|source| PageError::Stabilize {
                page,
                url: url.clone(),
                source,
            })?;

        self.state.enter(CrawlPhase::DiscoverUrls);
        let urls = extract_listing_urls(&settled.markup, &self.patterns, &self.layout);

        if self.state.total_pages().is_none() {
            self.state.enter(CrawlPhase::DetermineTotalPages);
            let discovered = discover_total_pages(&settled.markup, &self.patterns);
            let total = self
                .state
                .freeze_total_pages(clamp_total_pages(discovered, self.config.run.max_pages));
            tracing::info!("Scraping up to {} page(s).", total);
        }

        tracing::info!("Found {} listing URLs on page {}", urls.len(), page);
        Ok(urls)
    }

    /// Visits each listing in turn, sleeping after every emitted record
    async fn process_listings(&mut self, page: u32, urls: &[String]) {
        for (i, url) in urls.iter().enumerate() {
            tracing::info!("[Page {} - {}/{}] Scraping: {}", page, i + 1, urls.len(), url);

            match self.process_listing(url).await {
                Ok(()) => {
                    let delay = self.delay.sample(&mut self.rng);
                    tracing::info!("Sleeping for {:.2} seconds...", delay.as_secs_f64());
                    self.timing.sleep(delay).await;
                }
                Err(e) => {
                    tracing::error!("Error scraping {}: {}", url, e);
                    self.state.record_failed_listing();
                }
            }
        }
    }

    /// Extracts one listing and appends it to the sink
    async fn process_listing(&mut self, url: &str) -> Result<(), ListingError> {
        let record = scrape_listing(&mut self.session, url, &self.patterns).await?;

        self.sink
            .append(&record)
            .map_err(|source| ListingError::Emit {
                url: url.to_string(),
                source,
            })?;
        self.state.record_emitted();

        Ok(())
    }
}

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Open the rendering session selected by `render.engine`
/// 2. Open the output sink selected by `output.format`
/// 3. Walk the results pages and extract every listing
/// 4. Flush the sink and close the session
///
/// # Arguments
///
/// * `config` - The run configuration
///
/// # Returns
///
/// * `Ok(CrawlReport)` - The run finished, completely or after a page failure
/// * `Err(SweepError)` - The session or sink could not be set up or flushed
///
/// # Example
///
/// ```no_run
/// use realty_sweep::config::load_config;
/// use realty_sweep::crawler::run_crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("sweep.toml"))?;
/// let report = run_crawl(config).await?;
/// println!("{}", report);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config) -> Result<CrawlReport, SweepError> {
    validate(&config)?;

    let sink = open_sink(&config.output)?;
    let session = open_session(&config.render).await?;

    let mut coordinator = Coordinator::new(config, session, sink)?;
    coordinator.run().await
}

//! Scroll stabilization
//!
//! Results pages load their tiles lazily as the viewport moves. The detector
//! scrolls a step at a time and counts tiles after each pause; once the count
//! has failed to grow for `max_retries` consecutive readings the page is
//! considered fully loaded.
//!
//! # State machine
//!
//! ```text
//!            ┌────────── count grew: idle = 0 ───────────┐
//!            ▼                                           │
//! Scroll → Pause → Snapshot → Count ──► Observe ─────────┘
//!                                        │  count did not grow: idle += 1
//!                                        ├─ idle == max_retries ──► Converged
//!                                        └─ elapsed >= timeout ───► TimedOut
//! ```

use crate::config::ScrollConfig;
use crate::crawler::timing::Timing;
use crate::markup::{MarkupQuery, Pattern, Snapshot};
use crate::render::RenderSession;
use crate::RenderResult;
use std::time::Duration;

/// Parameters of the scroll loop
#[derive(Debug, Clone)]
pub struct ScrollSettings {
    /// Pixels per scroll action
    pub step: i64,
    /// Wait after each scroll
    pub pause: Duration,
    /// Consecutive non-growing readings that end the loop
    pub max_retries: u32,
    /// Wall-clock ceiling on the whole loop
    pub timeout: Duration,
}

impl From<&ScrollConfig> for ScrollSettings {
    fn from(config: &ScrollConfig) -> Self {
        Self {
            step: config.step,
            pause: config.pause(),
            max_retries: config.max_retries,
            timeout: config.timeout(),
        }
    }
}

impl Default for ScrollSettings {
    fn default() -> Self {
        Self::from(&ScrollConfig::default())
    }
}

/// Decision after one tile-count reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Keep scrolling
    Continue,
    /// The idle budget is spent
    Converged,
}

/// Idle-retry counter over a stream of tile counts
///
/// A reading resets the counter when it is larger than the previous reading
/// (the very first reading always does); any other reading increments it.
#[derive(Debug, Clone)]
pub struct IdleTracker {
    previous: Option<usize>,
    idle: u32,
    max_retries: u32,
}

impl IdleTracker {
    pub fn new(max_retries: u32) -> Self {
        Self {
            previous: None,
            idle: 0,
            max_retries,
        }
    }

    /// Records a tile count and says whether to keep going
    pub fn observe(&mut self, count: usize) -> Verdict {
        let grew = match self.previous {
            Some(previous) => count > previous,
            None => true,
        };

        if grew {
            self.idle = 0;
        } else {
            self.idle += 1;
        }
        self.previous = Some(count);

        if self.idle >= self.max_retries {
            Verdict::Converged
        } else {
            Verdict::Continue
        }
    }

    /// Current consecutive non-growing readings
    pub fn idle(&self) -> u32 {
        self.idle
    }

    /// Last observed count
    pub fn last_count(&self) -> Option<usize> {
        self.previous
    }
}

/// Why the scroll loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Converged,
    TimedOut,
}

/// Outcome of stabilizing one results page
#[derive(Debug, Clone)]
pub struct Stabilized {
    /// Markup of the last snapshot taken
    pub markup: String,
    /// Tiles in the last snapshot
    pub tile_count: usize,
    /// Scroll actions performed
    pub scrolls: u32,
    pub reason: StopReason,
}

/// Scrolls the current page until its tile count settles
///
/// Pages without any tiles are not an error: the loop spends its idle budget
/// and returns the tile-less snapshot. Failures of the session itself
/// propagate.
pub async fn stabilize<S>(
    session: &mut S,
    tile: &Pattern,
    settings: &ScrollSettings,
    timing: &Timing,
) -> RenderResult<Stabilized>
where
    S: RenderSession + ?Sized,
{
    let started = timing.now();
    let mut tracker = IdleTracker::new(settings.max_retries);
    let mut scrolls = 0u32;

    loop {
        session.scroll_by(settings.step).await?;
        scrolls += 1;
        timing.sleep(settings.pause).await;

        let markup = session.read_markup().await?;
        let tile_count = count_tiles(&markup, tile);
        tracing::info!("Listings loaded: {}", tile_count);

        if tracker.observe(tile_count) == Verdict::Converged {
            tracing::info!("Scrolling completed after {} scrolls", scrolls);
            return Ok(Stabilized {
                markup,
                tile_count,
                scrolls,
                reason: StopReason::Converged,
            });
        }

        let elapsed = timing.now().saturating_duration_since(started);
        if elapsed >= settings.timeout {
            tracing::warn!(
                "Scrolling stopped after {:?} without settling ({} tiles, {} idle readings)",
                elapsed,
                tile_count,
                tracker.idle()
            );
            return Ok(Stabilized {
                markup,
                tile_count,
                scrolls,
                reason: StopReason::TimedOut,
            });
        }
    }
}

/// Counts tiles in a markup snapshot
pub fn count_tiles(markup: &str, tile: &Pattern) -> usize {
    Snapshot::parse(markup).count(tile)
}

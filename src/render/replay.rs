//! Offline rendering session serving canned markup
//!
//! Each URL maps to a sequence of snapshots: the first is served right after
//! load and every scroll reveals the next one, which is how a lazily-loaded
//! results page behaves. Used for dry runs against saved pages and for
//! exercising the crawler without a network.

use crate::render::RenderSession;
use crate::{RenderError, RenderResult};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};

/// Rendering session that replays canned pages
#[derive(Debug, Default)]
pub struct ReplaySession {
    pages: HashMap<String, Vec<String>>,
    failing: HashSet<String>,
    current: Option<String>,
    scrolls: usize,
    visited: Vec<String>,
    closed: bool,
}

impl ReplaySession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves `markup` for `url` regardless of scrolling
    pub fn with_page(mut self, url: impl Into<String>, markup: impl Into<String>) -> Self {
        self.pages.insert(url.into(), vec![markup.into()]);
        self
    }

    /// Serves `snapshots[n]` after `n` scrolls, repeating the last one
    pub fn with_lazy_page(mut self, url: impl Into<String>, snapshots: Vec<String>) -> Self {
        self.pages.insert(url.into(), snapshots);
        self
    }

    /// Makes every load of `url` fail
    pub fn with_failing_url(mut self, url: impl Into<String>) -> Self {
        self.failing.insert(url.into());
        self
    }

    /// URLs passed to `load_url`, in call order
    pub fn visited(&self) -> &[String] {
        &self.visited
    }

    /// Number of scroll actions since the last load
    pub fn scrolls(&self) -> usize {
        self.scrolls
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

#[async_trait]
impl RenderSession for ReplaySession {
    async fn load_url(&mut self, url: &str) -> RenderResult<()> {
        self.visited.push(url.to_string());
        self.current = None;
        self.scrolls = 0;

        if self.failing.contains(url) {
            return Err(RenderError::Status {
                url: url.to_string(),
                status: 503,
            });
        }

        if !self.pages.contains_key(url) {
            return Err(RenderError::UnknownUrl {
                url: url.to_string(),
            });
        }

        self.current = Some(url.to_string());
        Ok(())
    }

    async fn wait_for_load(&mut self) -> RenderResult<()> {
        if self.current.is_none() {
            return Err(RenderError::NothingLoaded);
        }
        Ok(())
    }

    async fn scroll_by(&mut self, _delta_y: i64) -> RenderResult<()> {
        if self.current.is_none() {
            return Err(RenderError::NothingLoaded);
        }
        self.scrolls += 1;
        Ok(())
    }

    async fn read_markup(&mut self) -> RenderResult<String> {
        let url = self.current.as_ref().ok_or(RenderError::NothingLoaded)?;
        let snapshots = self
            .pages
            .get(url)
            .ok_or_else(|| RenderError::UnknownUrl { url: url.clone() })?;

        let index = self.scrolls.min(snapshots.len().saturating_sub(1));
        Ok(snapshots.get(index).cloned().unwrap_or_default())
    }

    async fn close(&mut self) -> RenderResult<()> {
        self.current = None;
        self.closed = true;
        Ok(())
    }
}

//! Plain-HTTP rendering session
//!
//! Fetches pages with reqwest and serves the response body as the rendered
//! markup. No scripts run, so lazily-loaded content never appears and
//! scrolling does nothing; the stabilization loop simply sees a constant
//! tile count and stops after its idle budget.

use crate::config::RenderConfig;
use crate::render::RenderSession;
use crate::{RenderError, RenderResult};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Rendering session backed by an HTTP client
pub struct HttpSession {
    client: Client,
    current: Option<LoadedPage>,
}

struct LoadedPage {
    url: String,
    body: String,
}

impl HttpSession {
    /// Builds an HTTP session with the configured User-Agent and load timeout
    pub fn new(config: &RenderConfig) -> RenderResult<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.load_timeout())
            .connect_timeout(Duration::from_secs(10))
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self {
            client,
            current: None,
        })
    }

    /// URL of the page currently held by the session
    pub fn current_url(&self) -> Option<&str> {
        self.current.as_ref().map(|page| page.url.as_str())
    }
}

#[async_trait]
impl RenderSession for HttpSession {
    async fn load_url(&mut self, url: &str) -> RenderResult<()> {
        self.current = None;

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                RenderError::Timeout {
                    url: url.to_string(),
                }
            } else {
                RenderError::Http {
                    url: url.to_string(),
                    source: e,
                }
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RenderError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let final_url = response.url().to_string();
        let body = response.text().await.map_err(|e| RenderError::Http {
            url: url.to_string(),
            source: e,
        })?;

        tracing::debug!("Fetched {} ({} bytes)", final_url, body.len());
        self.current = Some(LoadedPage {
            url: final_url,
            body,
        });

        Ok(())
    }

    async fn wait_for_load(&mut self) -> RenderResult<()> {
        // The body is fully read in load_url
        if self.current.is_none() {
            return Err(RenderError::NothingLoaded);
        }
        Ok(())
    }

    async fn scroll_by(&mut self, _delta_y: i64) -> RenderResult<()> {
        Ok(())
    }

    async fn read_markup(&mut self) -> RenderResult<String> {
        self.current
            .as_ref()
            .map(|page| page.body.clone())
            .ok_or(RenderError::NothingLoaded)
    }
}

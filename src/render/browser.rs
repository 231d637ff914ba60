//! Headless Chrome rendering session
//!
//! Uses chromiumoxide (CDP) to drive a single tab for the whole run, so
//! cookies and navigation history carry across every results page and
//! detail page.

use crate::config::RenderConfig;
use crate::render::RenderSession;
use crate::{RenderError, RenderResult};
use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::network::SetUserAgentOverrideParams;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::info;

/// Rendering session backed by a headless Chrome tab
pub struct BrowserSession {
    browser: Browser,
    page: Page,
    handler: Option<JoinHandle<()>>,
    load_timeout: Duration,
    current_url: Option<String>,
}

impl BrowserSession {
    /// Launches Chrome and opens the tab used for the run
    ///
    /// The tab's User-Agent is overridden before any navigation.
    pub async fn launch(config: &RenderConfig) -> RenderResult<Self> {
        info!("Launching browser (headless={})", config.headless);

        let mut builder = BrowserConfig::builder();

        // with_head means NOT headless
        if !config.headless {
            builder = builder.with_head();
        }

        if let Some(ref path) = config.chrome_executable {
            builder = builder.chrome_executable(path);
        }

        builder = builder
            .arg("--disable-blink-features=AutomationControlled")
            .arg("--disable-infobars")
            .arg("--disable-dev-shm-usage")
            .arg("--no-first-run")
            .arg("--no-default-browser-check")
            .arg("--no-sandbox")
            .arg("--disable-gpu");

        let browser_config = builder
            .build()
            .map_err(|e| RenderError::Browser(format!("Failed to build browser config: {}", e)))?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| RenderError::Browser(format!("Failed to launch browser: {}", e)))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| RenderError::Browser(format!("Failed to open tab: {}", e)))?;

        page.execute(SetUserAgentOverrideParams::new(config.user_agent.clone()))
            .await
            .map_err(|e| RenderError::Browser(format!("Failed to set user agent: {}", e)))?;

        Ok(Self {
            browser,
            page,
            handler: Some(handler),
            load_timeout: config.load_timeout(),
            current_url: None,
        })
    }

    fn current_url_or_blank(&self) -> String {
        self.current_url
            .clone()
            .unwrap_or_else(|| "about:blank".to_string())
    }
}

#[async_trait]
impl RenderSession for BrowserSession {
    async fn load_url(&mut self, url: &str) -> RenderResult<()> {
        match tokio::time::timeout(self.load_timeout, self.page.goto(url)).await {
            Ok(Ok(_)) => {
                self.current_url = Some(url.to_string());
                Ok(())
            }
            Ok(Err(e)) => Err(RenderError::Browser(format!(
                "Navigation to {} failed: {}",
                url, e
            ))),
            Err(_) => Err(RenderError::Timeout {
                url: url.to_string(),
            }),
        }
    }

    async fn wait_for_load(&mut self) -> RenderResult<()> {
        let url = self.current_url_or_blank();
        match tokio::time::timeout(self.load_timeout, self.page.wait_for_navigation()).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(RenderError::Browser(format!(
                "Waiting for {} failed: {}",
                url, e
            ))),
            Err(_) => Err(RenderError::Timeout { url }),
        }
    }

    async fn scroll_by(&mut self, delta_y: i64) -> RenderResult<()> {
        self.page
            .evaluate(format!("window.scrollBy(0, {})", delta_y))
            .await
            .map_err(|e| RenderError::Browser(format!("Scroll failed: {}", e)))?;
        Ok(())
    }

    async fn read_markup(&mut self) -> RenderResult<String> {
        self.page
            .content()
            .await
            .map_err(|e| RenderError::Browser(format!("Failed to read page content: {}", e)))
    }

    async fn close(&mut self) -> RenderResult<()> {
        self.browser
            .close()
            .await
            .map_err(|e| RenderError::Browser(format!("Failed to close browser: {}", e)))?;

        if let Some(handler) = self.handler.take() {
            let _ = handler.await;
        }

        Ok(())
    }
}

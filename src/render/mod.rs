//! Rendering sessions
//!
//! A [`RenderSession`] is one browser tab (or its stand-in) that the crawler
//! drives for the whole run. It can:
//! - load a URL and wait for the load to complete
//! - scroll the page to trigger lazy loading
//! - hand back the full rendered markup
//!
//! Three adapters are provided: [`BrowserSession`] (headless Chrome, behind
//! the `browser` feature), [`HttpSession`] (plain HTTP, no scripts) and
//! [`ReplaySession`] (canned markup, no network).

#[cfg(feature = "browser")]
mod browser;
mod http;
mod replay;

#[cfg(feature = "browser")]
pub use browser::BrowserSession;
pub use http::HttpSession;
pub use replay::ReplaySession;

use crate::config::{RenderConfig, RenderEngine};
use crate::{RenderResult, SweepError};
use async_trait::async_trait;

/// A single navigable page
///
/// Calls are strictly sequential; a session is never shared between tasks.
#[async_trait]
pub trait RenderSession: Send {
    /// Starts navigation to `url`
    async fn load_url(&mut self, url: &str) -> RenderResult<()>;

    /// Waits for the current navigation to finish loading
    async fn wait_for_load(&mut self) -> RenderResult<()>;

    /// Scrolls the viewport vertically by `delta_y` pixels
    async fn scroll_by(&mut self, delta_y: i64) -> RenderResult<()>;

    /// Returns the full rendered markup of the current page
    async fn read_markup(&mut self) -> RenderResult<String>;

    /// Releases the session's resources
    async fn close(&mut self) -> RenderResult<()> {
        Ok(())
    }
}

/// Opens the session selected by `config.engine`
pub async fn open_session(config: &RenderConfig) -> Result<Box<dyn RenderSession>, SweepError> {
    match config.engine {
        RenderEngine::Http => Ok(Box::new(HttpSession::new(config)?)),
        #[cfg(feature = "browser")]
        RenderEngine::Browser => Ok(Box::new(BrowserSession::launch(config).await?)),
        #[cfg(not(feature = "browser"))]
        RenderEngine::Browser => Err(SweepError::UnsupportedEngine(config.engine.to_string())),
    }
}

#[async_trait]
impl<S: RenderSession + ?Sized> RenderSession for Box<S> {
    async fn load_url(&mut self, url: &str) -> RenderResult<()> {
        (**self).load_url(url).await
    }

    async fn wait_for_load(&mut self) -> RenderResult<()> {
        (**self).wait_for_load().await
    }

    async fn scroll_by(&mut self, delta_y: i64) -> RenderResult<()> {
        (**self).scroll_by(delta_y).await
    }

    async fn read_markup(&mut self) -> RenderResult<String> {
        (**self).read_markup().await
    }

    async fn close(&mut self) -> RenderResult<()> {
        (**self).close().await
    }
}

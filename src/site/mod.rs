//! Site layout for Realty-Sweep
//!
//! This module knows how the target site arranges its search results:
//! the origin, how a location name maps to a region path, how result pages
//! are numbered, and how listing links resolve to absolute URLs.

mod resolve;

use crate::config::SiteConfig;
use crate::ConfigError;
use url::Url;

pub use resolve::resolve_listing_href;

/// Resolved search layout for one location
#[derive(Debug, Clone)]
pub struct SiteLayout {
    origin: Url,
    search_base: String,
}

impl SiteLayout {
    /// Builds the layout for `location` from the site configuration
    ///
    /// The location is looked up case-insensitively in the configured
    /// location paths; unknown locations are used as the path verbatim.
    ///
    /// # Example
    ///
    /// ```
    /// use realty_sweep::config::SiteConfig;
    /// use realty_sweep::site::SiteLayout;
    ///
    /// let layout = SiteLayout::new(&SiteConfig::default(), "Queenstown").unwrap();
    /// assert_eq!(
    ///     layout.page_url(2),
    ///     "https://www.realestate.co.nz/residential/sale/central-otago-lakes-district/queenstown?page=2"
    /// );
    /// ```
    pub fn new(config: &SiteConfig, location: &str) -> Result<Self, ConfigError> {
        let origin = Url::parse(&config.base_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base_url: {}", e)))?;

        let location_path = location_path(config, location);

        let search_base = format!(
            "{}/{}/{}",
            config.base_url.trim_end_matches('/'),
            config.search_path.trim_matches('/'),
            location_path.trim_matches('/')
        );

        Ok(Self {
            origin,
            search_base,
        })
    }

    /// The origin that relative listing links are resolved against
    pub fn origin(&self) -> &Url {
        &self.origin
    }

    /// URL of the given 1-based result page
    ///
    /// Page 1 is the bare search URL; later pages carry a `page` query
    /// parameter.
    pub fn page_url(&self, page: u32) -> String {
        if page <= 1 {
            self.search_base.clone()
        } else {
            format!("{}?page={}", self.search_base, page)
        }
    }

    /// Resolves a listing href found on a result page
    pub fn resolve(&self, href: &str) -> Option<String> {
        resolve_listing_href(href, &self.origin)
    }
}

/// Looks up the region path for a location name
fn location_path(config: &SiteConfig, location: &str) -> String {
    let wanted = location.trim().to_lowercase();

    config
        .location_paths
        .iter()
        .find(|(name, _)| name.to_lowercase() == wanted)
        .map(|(_, path)| path.clone())
        .unwrap_or_else(|| location.trim().to_string())
}

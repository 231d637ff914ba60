//! Realty-Sweep: a throttled crawler for real-estate search results
//!
//! This crate walks the paginated, lazily-loaded search results of a listing
//! site, discovers every listing detail page, extracts a fixed set of property
//! fields from each one and hands the records to an output sink.

pub mod config;
pub mod crawler;
pub mod listing;
pub mod markup;
pub mod render;
pub mod site;
pub mod sink;
pub mod state;

use thiserror::Error;

/// Main error type for Realty-Sweep operations
///
/// These are the errors that stop a run from starting or finishing cleanly.
/// Failures during the crawl itself are reported through [`PageError`] and
/// [`ListingError`] and never escape the coordinator.
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Sink error: {0}")]
    Sink(#[from] SinkError),

    #[error("Markup error: {0}")]
    Markup(#[from] MarkupError),

    #[error("Render engine '{0}' is not available in this build")]
    UnsupportedEngine(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Errors raised by a rendering session
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Timed out waiting for {url}")]
    Timeout { url: String },

    #[error("No page has been loaded in this session")]
    NothingLoaded,

    #[error("No canned markup for {url}")]
    UnknownUrl { url: String },
}

/// Errors raised while writing records
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

/// Errors raised while compiling markup patterns
#[derive(Debug, Error)]
pub enum MarkupError {
    #[error("Invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },
}

/// A results-page failure. Any of these ends the run.
#[derive(Debug, Error)]
pub enum PageError {
    #[error("Failed to load page {page} ({url}): {source}")]
    Load {
        page: u32,
        url: String,
        source: RenderError,
    },

    #[error("Failed to stabilize page {page} ({url}): {source}")]
    Stabilize {
        page: u32,
        url: String,
        source: RenderError,
    },
}

/// A single-listing failure. The listing is skipped and the run goes on.
#[derive(Debug, Error)]
pub enum ListingError {
    #[error("Failed to render {url}: {source}")]
    Render { url: String, source: RenderError },

    #[error("Failed to emit {url}: {source}")]
    Emit { url: String, source: SinkError },
}

/// Result type alias for Realty-Sweep operations
pub type Result<T> = std::result::Result<T, SweepError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for rendering operations
pub type RenderResult<T> = std::result::Result<T, RenderError>;

/// Result type alias for sink operations
pub type SinkResult<T> = std::result::Result<T, SinkError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlReport, Termination};
pub use listing::{FeatureMap, ListingRecord};
pub use state::{CrawlPhase, CrawlState};

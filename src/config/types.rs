use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// Main configuration structure for Realty-Sweep
///
/// Every section and every key is optional; an empty file yields the
/// defaults below.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub run: RunConfig,
    pub site: SiteConfig,
    pub scroll: ScrollConfig,
    pub render: RenderConfig,
    pub output: OutputConfig,
}

/// Per-run crawl limits and pacing
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RunConfig {
    /// Upper bound on the number of result pages visited
    pub max_pages: u32,

    /// Location to search (e.g. "queenstown")
    pub location: String,

    /// Lower bound of the post-listing delay (seconds)
    pub min_delay: f64,

    /// Upper bound of the post-listing delay (seconds)
    pub max_delay: f64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            max_pages: 3,
            location: "queenstown".to_string(),
            min_delay: 1.5,
            max_delay: 4.0,
        }
    }
}

/// Target site layout
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SiteConfig {
    /// Site origin that relative listing links are resolved against
    pub base_url: String,

    /// Path segment of the search results below the origin
    pub search_path: String,

    /// Known location names and the region path they live under
    pub location_paths: BTreeMap<String, String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        let mut location_paths = BTreeMap::new();
        location_paths.insert(
            "queenstown".to_string(),
            "central-otago-lakes-district/queenstown".to_string(),
        );

        Self {
            base_url: "https://www.realestate.co.nz".to_string(),
            search_path: "residential/sale".to_string(),
            location_paths,
        }
    }
}

/// Scroll-stabilization parameters
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ScrollConfig {
    /// Vertical distance of each scroll action (pixels)
    pub step: i64,

    /// Pause after each scroll action (milliseconds)
    pub pause_ms: u64,

    /// Consecutive non-growing tile counts that end the scroll loop
    pub max_retries: u32,

    /// Wall-clock ceiling on the scroll loop (seconds)
    pub timeout_secs: u64,
}

impl ScrollConfig {
    pub fn pause(&self) -> Duration {
        Duration::from_millis(self.pause_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            step: 1000,
            pause_ms: 3000,
            max_retries: 3,
            timeout_secs: 120,
        }
    }
}

/// Which rendering backend drives the crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RenderEngine {
    /// Headless Chrome over CDP
    Browser,
    /// Plain HTTP fetches; no script execution, scrolling is a no-op
    Http,
}

impl fmt::Display for RenderEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Browser => write!(f, "browser"),
            Self::Http => write!(f, "http"),
        }
    }
}

/// Rendering session configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RenderConfig {
    pub engine: RenderEngine,

    /// Run Chrome without a window
    pub headless: bool,

    /// User-Agent header sent with every navigation
    pub user_agent: String,

    /// Timeout for a single page load (seconds)
    pub load_timeout_secs: u64,

    /// Explicit Chrome/Chromium binary; auto-detected when absent
    pub chrome_executable: Option<String>,
}

impl RenderConfig {
    pub fn load_timeout(&self) -> Duration {
        Duration::from_secs(self.load_timeout_secs)
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            engine: RenderEngine::Browser,
            headless: true,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36"
                .to_string(),
            load_timeout_secs: 30,
            chrome_executable: None,
        }
    }
}

/// Record output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One JSON object per line
    Jsonl,
    /// Rows in a SQLite `listings` table
    Sqlite,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Jsonl => write!(f, "jsonl"),
            Self::Sqlite => write!(f, "sqlite"),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    pub format: OutputFormat,

    /// Destination file
    pub path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Jsonl,
            path: "listings.jsonl".to_string(),
        }
    }
}

//! Command-line overrides of file configuration

use crate::config::{validate, Config, OutputFormat, RenderEngine};
use crate::ConfigError;

/// Values given on the command line; `None` keeps the file value
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub max_pages: Option<u32>,
    pub location: Option<String>,
    pub output_path: Option<String>,
    pub output_format: Option<OutputFormat>,
    pub engine: Option<RenderEngine>,
}

impl Overrides {
    pub fn is_empty(&self) -> bool {
        self.max_pages.is_none()
            && self.location.is_none()
            && self.output_path.is_none()
            && self.output_format.is_none()
            && self.engine.is_none()
    }

    /// Applies the overrides and validates the result
    ///
    /// # Returns
    ///
    /// * `Ok(Config)` - The merged configuration
    /// * `Err(ConfigError)` - An override produced an invalid configuration
    pub fn apply(self, mut config: Config) -> Result<Config, ConfigError> {
        if let Some(max_pages) = self.max_pages {
            config.run.max_pages = max_pages;
        }
        if let Some(location) = self.location {
            config.run.location = location;
        }
        if let Some(path) = self.output_path {
            config.output.path = path;
        }
        if let Some(format) = self.output_format {
            config.output.format = format;
        }
        if let Some(engine) = self.engine {
            config.render.engine = engine;
        }

        validate(&config)?;
        Ok(config)
    }
}

//! Configuration module for Realty-Sweep
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key has a default, so running without a file is valid.
//!
//! # Example
//!
//! ```no_run
//! use realty_sweep::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("sweep.toml")).unwrap();
//! println!("Crawler will visit at most {} pages", config.run.max_pages);
//! ```

mod overrides;
mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, OutputConfig, OutputFormat, RenderConfig, RenderEngine, RunConfig, ScrollConfig,
    SiteConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use overrides::Overrides;
pub use validation::validate;

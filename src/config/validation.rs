use crate::config::types::{Config, OutputConfig, RenderConfig, RunConfig, ScrollConfig, SiteConfig};
use crate::ConfigError;
use url::Url;

/// Upper bound on `max_delay` (seconds)
pub const MAX_DELAY_SECS: f64 = 3600.0;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_run_config(&config.run)?;
    validate_site_config(&config.site)?;
    validate_scroll_config(&config.scroll)?;
    validate_render_config(&config.render)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates page cap, location and delay bounds
fn validate_run_config(config: &RunConfig) -> Result<(), ConfigError> {
    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max_pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    if config.location.trim().is_empty() {
        return Err(ConfigError::Validation(
            "location cannot be empty".to_string(),
        ));
    }

    if !config
        .location
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '/')
    {
        return Err(ConfigError::Validation(format!(
            "location must contain only alphanumeric characters, hyphens and slashes, got '{}'",
            config.location
        )));
    }

    if !config.min_delay.is_finite() || config.min_delay < 0.0 {
        return Err(ConfigError::Validation(format!(
            "min_delay must be a non-negative number of seconds, got {}",
            config.min_delay
        )));
    }

    if !config.max_delay.is_finite() || config.max_delay < config.min_delay {
        return Err(ConfigError::Validation(format!(
            "max_delay must be >= min_delay ({}), got {}",
            config.min_delay, config.max_delay
        )));
    }

    if config.max_delay > MAX_DELAY_SECS {
        return Err(ConfigError::Validation(format!(
            "max_delay must be <= {} seconds, got {}",
            MAX_DELAY_SECS, config.max_delay
        )));
    }

    Ok(())
}

/// Validates the site origin and path pieces
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base_url: {}", e)))?;

    if url.scheme() != "https" && url.scheme() != "http" {
        return Err(ConfigError::InvalidUrl(format!(
            "base_url '{}' must use http or https",
            config.base_url
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "base_url '{}' has no host",
            config.base_url
        )));
    }

    for (name, path) in &config.location_paths {
        if path.trim_matches('/').is_empty() {
            return Err(ConfigError::Validation(format!(
                "location path for '{}' cannot be empty",
                name
            )));
        }
    }

    Ok(())
}

/// Validates scroll-stabilization parameters
fn validate_scroll_config(config: &ScrollConfig) -> Result<(), ConfigError> {
    if config.step == 0 {
        return Err(ConfigError::Validation(
            "scroll step cannot be 0".to_string(),
        ));
    }

    if config.max_retries < 1 {
        return Err(ConfigError::Validation(format!(
            "scroll max_retries must be >= 1, got {}",
            config.max_retries
        )));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "scroll timeout_secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    Ok(())
}

/// Validates rendering session configuration
fn validate_render_config(config: &RenderConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.load_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "load_timeout_secs must be >= 1, got {}",
            config.load_timeout_secs
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.path.is_empty() {
        return Err(ConfigError::Validation(
            "output path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

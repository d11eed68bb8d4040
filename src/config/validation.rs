use crate::config::types::{
    Config, CrawlerConfig, OutputConfig, RendererConfig, RendererEngine, SourceConfig,
};
use crate::ConfigError;
use url::Url;

const MAX_PAGE_TIMEOUT_MS: u64 = 300_000;
const MAX_INTER_PAGE_DELAY_SECONDS: f64 = 60.0;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_source_config(&config.source)?;
    validate_output_config(&config.output)?;
    validate_renderer_config(&config.renderer)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max_pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    if config.page_timeout_ms < 1 || config.page_timeout_ms > MAX_PAGE_TIMEOUT_MS {
        return Err(ConfigError::Validation(format!(
            "page_timeout_ms must be between 1 and {}, got {}",
            MAX_PAGE_TIMEOUT_MS, config.page_timeout_ms
        )));
    }

    let delay = config.inter_page_delay_seconds;
    if !delay.is_finite() || !(0.0..=MAX_INTER_PAGE_DELAY_SECONDS).contains(&delay) {
        return Err(ConfigError::Validation(format!(
            "inter_page_delay_seconds must be between 0 and {}, got {}",
            MAX_INTER_PAGE_DELAY_SECONDS, delay
        )));
    }

    Ok(())
}

/// Validates the listing location
fn validate_source_config(config: &SourceConfig) -> Result<(), ConfigError> {
    validate_http_url("base_url", &config.base_url)?;
    validate_http_url("origin", &config.origin)?;
    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.output_path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "output_path cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Validates renderer configuration
fn validate_renderer_config(config: &RendererConfig) -> Result<(), ConfigError> {
    if config.engine == RendererEngine::Chromium && !cfg!(feature = "browser") {
        return Err(ConfigError::Validation(
            "renderer engine 'chromium' requires the 'browser' feature".to_string(),
        ));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if let Some(path) = &config.chrome_executable {
        if path.trim().is_empty() {
            return Err(ConfigError::Validation(
                "chrome_executable cannot be empty when set".to_string(),
            ));
        }
    }

    Ok(())
}

/// Validates that a string is an absolute http(s) URL
fn validate_http_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {}: {}", field, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} must use http or https, got '{}'",
            field,
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!("{} has no host", field)));
    }

    Ok(())
}

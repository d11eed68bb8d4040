use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigResult;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use catalog_snapshot::config::load_config;
///
/// let config = load_config(Path::new("config.toml")).unwrap();
/// println!("Max pages: {}", config.crawler.max_pages);
/// ```
pub fn load_config(path: &Path) -> ConfigResult<Config> {
    let config = read_config(path)?;
    validate(&config)?;
    Ok(config)
}

/// Reads and parses a configuration file without validating it
///
/// Used by the CLI, which applies command-line overrides before
/// validation.
pub fn read_config(path: &Path) -> ConfigResult<Config> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Logged at startup so a snapshot can be traced back to the settings
/// that produced it.
pub fn compute_config_hash(path: &Path) -> ConfigResult<String> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RendererEngine;
    use crate::ConfigError;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[crawler]
max-pages = 3
page-timeout-ms = 5000
inter-page-delay-seconds = 0.5

[source]
base-url = "https://catalog.example.com/search"
origin = "https://catalog.example.com"

[output]
output-path = "./out/models.json"

[renderer]
engine = "http"
user-agent = "TestCrawler/1.0"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawler.max_pages, 3);
        assert_eq!(config.crawler.page_timeout_ms, 5000);
        assert_eq!(config.crawler.inter_page_delay_seconds, 0.5);
        assert_eq!(config.source.origin, "https://catalog.example.com");
        assert_eq!(config.output.output_path, "./out/models.json");
        assert_eq!(config.renderer.engine, RendererEngine::Http);
        assert_eq!(config.renderer.user_agent, "TestCrawler/1.0");
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let file = create_temp_config("[crawler]\nmax-pages = 2\n");
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawler.max_pages, 2);
        assert_eq!(config.crawler.page_timeout_ms, 10_000);
        assert_eq!(config.crawler.inter_page_delay_seconds, 1.5);
        assert_eq!(config.source.base_url, "https://ollama.com/search");
        assert_eq!(config.output.output_path, "data/models.json");
        assert!(config.renderer.block_resources);
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_with_unknown_engine() {
        let file = create_temp_config("[renderer]\nengine = \"netscape\"\n");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let file = create_temp_config("[crawler]\nmax-pages = 0\n");
        let result = load_config(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
    }

    #[test]
    fn test_read_config_skips_validation() {
        let file = create_temp_config("[crawler]\nmax-pages = 0\n");
        let config = read_config(file.path()).unwrap();
        assert_eq!(config.crawler.max_pages, 0);
    }

    #[test]
    fn test_compute_config_hash() {
        let file = create_temp_config("test content");

        let hash1 = compute_config_hash(file.path()).unwrap();
        let hash2 = compute_config_hash(file.path()).unwrap();

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn test_different_content_different_hash() {
        let file1 = create_temp_config("content 1");
        let file2 = create_temp_config("content 2");

        let hash1 = compute_config_hash(file1.path()).unwrap();
        let hash2 = compute_config_hash(file2.path()).unwrap();

        assert_ne!(hash1, hash2);
    }
}

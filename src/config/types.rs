use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Main configuration structure for Catalog-Snapshot
///
/// Every section is optional; missing values fall back to the defaults
/// of the public catalog listing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub source: SourceConfig,
    pub output: OutputConfig,
    pub renderer: RendererConfig,
}

/// Crawl loop configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Hard cap on the number of listing pages visited
    #[serde(rename = "max-pages")]
    pub max_pages: u32,

    /// How long to wait for the listing container to appear (milliseconds)
    #[serde(rename = "page-timeout-ms")]
    pub page_timeout_ms: u64,

    /// Pause between consecutive page visits (seconds)
    #[serde(rename = "inter-page-delay-seconds")]
    pub inter_page_delay_seconds: f64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_pages: 20,
            page_timeout_ms: 10_000,
            inter_page_delay_seconds: 1.5,
        }
    }
}

/// Upstream listing location
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Search URL; the 1-indexed `page` query parameter is appended to it
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Origin that relative record links are resolved against
    pub origin: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://ollama.com/search".to_string(),
            origin: "https://ollama.com".to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path to the JSON snapshot file
    #[serde(rename = "output-path")]
    pub output_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_path: "data/models.json".to_string(),
        }
    }
}

/// Page renderer configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Which renderer drives page navigation
    pub engine: RendererEngine,

    /// Chromium binary; auto-detected when unset
    #[serde(rename = "chrome-executable")]
    pub chrome_executable: Option<String>,

    /// Block image and font requests (Chromium only)
    #[serde(rename = "block-resources")]
    pub block_resources: bool,

    /// User agent sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            engine: RendererEngine::default(),
            chrome_executable: None,
            block_resources: true,
            user_agent: format!("catalog-snapshot/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Available page renderers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RendererEngine {
    /// Headless Chromium; executes the listing's JavaScript
    #[default]
    Chromium,

    /// Plain HTTP fetch of the server-rendered HTML
    Http,
}

impl RendererEngine {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Chromium => "chromium",
            Self::Http => "http",
        }
    }
}

impl fmt::Display for RendererEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RendererEngine {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "chromium" => Ok(Self::Chromium),
            "http" => Ok(Self::Http),
            other => Err(format!(
                "unknown renderer engine '{}' (expected 'chromium' or 'http')",
                other
            )),
        }
    }
}

//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// HTTP and crawling behavior settings
    #[serde(default)]
    pub crawler: CrawlerConfig,

    /// Generative rewrite settings
    #[serde(default)]
    pub rewrite: RewriteConfig,

    /// Output directory settings
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.crawler.user_agent.trim().is_empty() {
            return Err(AppError::config("crawler.user_agent is empty"));
        }
        if self.crawler.timeout_secs == 0 {
            return Err(AppError::config("crawler.timeout_secs must be > 0"));
        }
        if self.crawler.render_timeout_secs == 0 {
            return Err(AppError::config("crawler.render_timeout_secs must be > 0"));
        }
        if self.crawler.render_threshold == 0 {
            return Err(AppError::config("crawler.render_threshold must be > 0"));
        }
        if self.crawler.max_concurrent == 0 {
            return Err(AppError::config("crawler.max_concurrent must be > 0"));
        }
        if self.crawler.blog_max_depth > self.crawler.max_depth {
            return Err(AppError::config(
                "crawler.blog_max_depth must not exceed crawler.max_depth",
            ));
        }
        if self.rewrite.model.trim().is_empty() {
            return Err(AppError::config("rewrite.model is empty"));
        }
        if self.output.root_dir.trim().is_empty() {
            return Err(AppError::config("output.root_dir is empty"));
        }
        Ok(())
    }
}

/// HTTP client and crawling behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Navigation timeout for the headless browser fallback, in seconds
    #[serde(default = "defaults::render_timeout")]
    pub render_timeout_secs: u64,

    /// Static bodies shorter than this many characters trigger the
    /// headless browser fallback
    #[serde(default = "defaults::render_threshold")]
    pub render_threshold: usize,

    /// Default crawl depth ceiling
    #[serde(default = "defaults::max_depth")]
    pub max_depth: u32,

    /// Depth ceiling for pages classified as blog
    #[serde(default = "defaults::blog_max_depth")]
    pub blog_max_depth: u32,

    /// Delay between page fetches in milliseconds
    #[serde(default = "defaults::request_delay")]
    pub request_delay_ms: u64,

    /// Maximum concurrent rewrite requests
    #[serde(default = "defaults::max_concurrent")]
    pub max_concurrent: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            render_timeout_secs: defaults::render_timeout(),
            render_threshold: defaults::render_threshold(),
            max_depth: defaults::max_depth(),
            blog_max_depth: defaults::blog_max_depth(),
            request_delay_ms: defaults::request_delay(),
            max_concurrent: defaults::max_concurrent(),
        }
    }
}

/// Generative rewrite API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewriteConfig {
    /// Base URL of the OpenAI-compatible API
    #[serde(default = "defaults::api_base")]
    pub api_base: String,

    /// Model identifier
    #[serde(default = "defaults::model")]
    pub model: String,

    /// Completion token budget per page
    #[serde(default = "defaults::max_tokens")]
    pub max_tokens: u32,
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self {
            api_base: defaults::api_base(),
            model: defaults::model(),
            max_tokens: defaults::max_tokens(),
        }
    }
}

/// Output directory settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory under which per-domain output roots are created
    #[serde(default = "defaults::root_dir")]
    pub root_dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            root_dir: defaults::root_dir(),
        }
    }
}

/// Default values for configuration fields.
mod defaults {
    pub fn user_agent() -> String {
        format!("copyforge/{}", env!("CARGO_PKG_VERSION"))
    }

    pub fn timeout() -> u64 {
        30
    }

    pub fn render_timeout() -> u64 {
        45
    }

    pub fn render_threshold() -> usize {
        1500
    }

    pub fn max_depth() -> u32 {
        2
    }

    pub fn blog_max_depth() -> u32 {
        1
    }

    pub fn request_delay() -> u64 {
        200
    }

    pub fn max_concurrent() -> usize {
        4
    }

    pub fn api_base() -> String {
        "https://api.openai.com/v1".to_string()
    }

    pub fn model() -> String {
        "gpt-4o".to_string()
    }

    pub fn max_tokens() -> u32 {
        1500
    }

    pub fn root_dir() -> String {
        "output".to_string()
    }
}

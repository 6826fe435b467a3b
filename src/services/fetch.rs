// src/services/fetch.rs

//! Two-tier page fetching.
//!
//! Pages are fetched with a plain HTTP GET first. Bodies shorter than the
//! configured threshold are assumed to be JS-rendered shells and re-fetched
//! through a headless Chromium session, which is launched per page and
//! released on every path, including navigation failures and timeouts.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use futures::StreamExt;
use reqwest::Client;

use crate::error::{AppError, Result};
use crate::models::CrawlerConfig;

/// Markup obtained for a single URL.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Raw markup text
    pub html: String,

    /// Whether the headless browser fallback produced it
    pub rendered: bool,
}

/// Source of page markup, keyed by URL.
///
/// The crawl scheduler depends on this seam rather than on a concrete
/// fetcher so traversal can be exercised against an in-memory site.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedPage>;
}

/// Production fetcher: static HTTP with a rendered-browser fallback.
pub struct PageFetcher {
    client: Client,
    render_threshold: usize,
    render_timeout: Duration,
    browser_path: Option<PathBuf>,
}

impl PageFetcher {
    /// Build a fetcher from crawler settings.
    pub fn new(config: &CrawlerConfig, browser_path: Option<PathBuf>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            render_threshold: config.render_threshold,
            render_timeout: Duration::from_secs(config.render_timeout_secs),
            browser_path,
        })
    }

    /// Whether a static body is too short to trust.
    fn needs_render(&self, body: &str) -> bool {
        body.len() < self.render_threshold
    }

    async fn fetch_static(&self, url: &str) -> Result<String> {
        let body = self.client.get(url).send().await?.text().await?;
        Ok(body)
    }

    /// Fetch through a headless Chromium session.
    ///
    /// The browser is a heavyweight scoped resource: launched here, used for
    /// exactly one navigation, and closed before returning regardless of the
    /// navigation outcome.
    async fn fetch_rendered(&self, url: &str) -> Result<String> {
        let mut builder = BrowserConfig::builder()
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage");
        if let Some(path) = &self.browser_path {
            builder = builder.chrome_executable(path);
        }
        let browser_config = builder.build().map_err(AppError::browser)?;

        let (mut browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(AppError::browser)?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                let _ = event;
            }
        });

        let result = self.capture_rendered(&browser, url).await;

        if let Err(e) = browser.close().await {
            log::debug!("Browser close failed for {url}: {e}");
        }
        let _ = browser.wait().await;
        handler_task.abort();

        result
    }

    async fn capture_rendered(&self, browser: &Browser, url: &str) -> Result<String> {
        let navigate = async {
            let page = browser.new_page(url).await.map_err(AppError::browser)?;
            page.wait_for_navigation().await.map_err(AppError::browser)?;

            let html: String = page
                .evaluate("document.documentElement.outerHTML")
                .await
                .map_err(AppError::browser)?
                .into_value()
                .map_err(|e| AppError::browser(format!("outerHTML capture: {e:?}")))?;

            let _ = page.close().await;
            Ok(html)
        };

        tokio::time::timeout(self.render_timeout, navigate)
            .await
            .map_err(|_| {
                AppError::browser(format!(
                    "navigation timed out after {:?} for {url}",
                    self.render_timeout
                ))
            })?
    }
}

#[async_trait]
impl PageSource for PageFetcher {
    /// Fetch a page, escalating to the rendered session when the static
    /// body looks like an unrendered shell.
    async fn fetch(&self, url: &str) -> Result<FetchedPage> {
        let body = self.fetch_static(url).await?;

        if !self.needs_render(&body) {
            return Ok(FetchedPage {
                html: body,
                rendered: false,
            });
        }

        log::debug!(
            "Static body for {url} is {} chars, below threshold {}; rendering",
            body.len(),
            self.render_threshold
        );

        let html = self.fetch_rendered(url).await?;
        Ok(FetchedPage {
            html,
            rendered: true,
        })
    }
}

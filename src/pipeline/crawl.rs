// src/pipeline/crawl.rs

//! Breadth-first crawl over the seed's same-origin link graph.
//!
//! An explicit FIFO work queue plus a visited set keep memory bounded and
//! traversal iterative. URLs are marked visited before their fetch starts,
//! so a URL discovered again while in flight is never re-queued.

use std::collections::{HashSet, VecDeque};
use std::time::Duration;

use scraper::{Html, Selector};
use url::Url;

use crate::classify::classify;
use crate::error::{AppError, Result};
use crate::models::{CrawlTask, CrawlerConfig, PageRecord, PageType};
use crate::services::PageSource;
use crate::utils::{resolve_url, same_origin};

/// Summary of one crawl run.
#[derive(Debug, Default)]
pub struct CrawlOutcome {
    /// Successfully fetched pages, in visit order; URLs are unique
    pub pages: Vec<PageRecord>,

    /// Pages whose fetch failed and was skipped
    pub fetch_failures: usize,

    /// Pages that needed the rendered-browser fallback
    pub rendered_count: usize,
}

/// Depth ceiling for a page, given its classified type.
///
/// Blog pages fan out into many low-value post pages, so they cap at the
/// configured blog depth regardless of the default.
fn effective_max_depth(page_type: Option<PageType>, config: &CrawlerConfig) -> u32 {
    match page_type {
        Some(PageType::Blog) => config.blog_max_depth,
        _ => config.max_depth,
    }
}

/// Crawl the site reachable from `seed`, breadth-first.
///
/// Individual fetch failures are logged and skipped; a crawl that yields no
/// pages at all (unreachable seed) is an error.
pub async fn crawl_site(
    source: &dyn PageSource,
    seed: &Url,
    config: &CrawlerConfig,
) -> Result<CrawlOutcome> {
    let delay = Duration::from_millis(config.request_delay_ms);
    let mut visited: HashSet<String> = HashSet::new();
    let mut queue: VecDeque<CrawlTask> = VecDeque::new();
    let mut outcome = CrawlOutcome::default();

    queue.push_back(CrawlTask {
        url: seed.clone(),
        depth: 0,
    });

    log::info!(
        "Starting crawl at {seed} (max depth {}, blog depth {})",
        config.max_depth,
        config.blog_max_depth
    );

    while let Some(task) = queue.pop_front() {
        let url_str = task.url.to_string();
        if visited.contains(&url_str) {
            continue;
        }

        let page_type = classify(&url_str, seed.as_str());
        let max_depth = effective_max_depth(page_type, config);
        if task.depth > max_depth {
            continue;
        }

        log::debug!(
            "Crawling {url_str} at depth {} (type: {})",
            task.depth,
            page_type.map(|t| t.as_str()).unwrap_or("unclassified")
        );
        visited.insert(url_str.clone());

        let fetched = match source.fetch(&url_str).await {
            Ok(fetched) => fetched,
            Err(e) => {
                outcome.fetch_failures += 1;
                log::warn!("Failed to fetch {url_str}: {e}");
                continue;
            }
        };

        if fetched.rendered {
            outcome.rendered_count += 1;
        }

        if task.depth < max_depth {
            for link in extract_links(&fetched.html, &task.url, seed) {
                queue.push_back(CrawlTask {
                    url: link,
                    depth: task.depth + 1,
                });
            }
        }

        outcome.pages.push(PageRecord {
            url: task.url,
            html: fetched.html,
            rendered: fetched.rendered,
        });

        if !queue.is_empty() && delay.as_millis() > 0 {
            tokio::time::sleep(delay).await;
        }
    }

    if outcome.pages.is_empty() {
        return Err(AppError::crawl(
            seed.as_str(),
            "no pages could be fetched from the seed",
        ));
    }

    log::info!(
        "Crawl complete: {} pages, {} failures, {} rendered",
        outcome.pages.len(),
        outcome.fetch_failures,
        outcome.rendered_count
    );

    Ok(outcome)
}

/// Extract same-origin links from a page's markup.
///
/// Each href is resolved against the page's own URL; unresolvable hrefs are
/// dropped silently. Only links sharing the seed's origin survive, deduped
/// by exact resolved string.
fn extract_links(html: &str, page_url: &Url, seed: &Url) -> Vec<Url> {
    let document = Html::parse_document(html);
    let anchor_sel = Selector::parse("a[href]").expect("anchor selector is valid");

    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for anchor in document.select(&anchor_sel) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let Some(resolved) = resolve_url(page_url, href) else {
            continue;
        };
        if !same_origin(&resolved, seed) {
            continue;
        }
        if seen.insert(resolved.to_string()) {
            links.push(resolved);
        }
    }

    links
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::FetchedPage;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory site: URL -> markup, recording fetch counts.
    struct StubSite {
        pages: HashMap<String, String>,
        fetch_log: Mutex<Vec<String>>,
    }

    impl StubSite {
        fn new(pages: &[(&str, &str)]) -> Self {
            Self {
                pages: pages
                    .iter()
                    .map(|(url, html)| (url.to_string(), html.to_string()))
                    .collect(),
                fetch_log: Mutex::new(Vec::new()),
            }
        }

        fn fetch_count(&self, url: &str) -> usize {
            self.fetch_log
                .lock()
                .unwrap()
                .iter()
                .filter(|u| u.as_str() == url)
                .count()
        }
    }

    #[async_trait]
    impl PageSource for StubSite {
        async fn fetch(&self, url: &str) -> Result<FetchedPage> {
            self.fetch_log.lock().unwrap().push(url.to_string());
            match self.pages.get(url) {
                Some(html) => Ok(FetchedPage {
                    html: html.clone(),
                    rendered: false,
                }),
                None => Err(AppError::crawl(url, "stub: no such page")),
            }
        }
    }

    fn quiet_config() -> CrawlerConfig {
        CrawlerConfig {
            request_delay_ms: 0,
            ..CrawlerConfig::default()
        }
    }

    #[tokio::test]
    async fn test_cyclic_graph_terminates_and_visits_once() {
        let site = StubSite::new(&[
            (
                "https://example.com/",
                r#"<a href="/b">to b</a>"#,
            ),
            (
                "https://example.com/b",
                r#"<a href="/">back to a</a>"#,
            ),
        ]);
        let seed = Url::parse("https://example.com/").unwrap();

        let outcome = crawl_site(&site, &seed, &quiet_config()).await.unwrap();

        assert_eq!(outcome.pages.len(), 2);
        assert_eq!(site.fetch_count("https://example.com/"), 1);
        assert_eq!(site.fetch_count("https://example.com/b"), 1);
    }

    #[tokio::test]
    async fn test_blog_pages_do_not_expand_past_depth_one() {
        // seed -> /blog (depth 1) -> /blog/post (depth 2, must not be fetched)
        let site = StubSite::new(&[
            (
                "https://example.com/",
                r#"<a href="/blog">blog</a>"#,
            ),
            (
                "https://example.com/blog",
                r#"<a href="/blog/post">post</a>"#,
            ),
            ("https://example.com/blog/post", "never reached"),
        ]);
        let seed = Url::parse("https://example.com/").unwrap();

        let outcome = crawl_site(&site, &seed, &quiet_config()).await.unwrap();

        let urls: Vec<String> = outcome.pages.iter().map(|p| p.url.to_string()).collect();
        assert!(urls.contains(&"https://example.com/blog".to_string()));
        assert_eq!(site.fetch_count("https://example.com/blog/post"), 0);
    }

    #[tokio::test]
    async fn test_fetch_failure_does_not_abort_run() {
        let site = StubSite::new(&[
            (
                "https://example.com/",
                r#"<a href="/missing">gone</a><a href="/ok">ok</a>"#,
            ),
            ("https://example.com/ok", "fine"),
        ]);
        let seed = Url::parse("https://example.com/").unwrap();

        let outcome = crawl_site(&site, &seed, &quiet_config()).await.unwrap();

        assert_eq!(outcome.pages.len(), 2);
        assert_eq!(outcome.fetch_failures, 1);
    }

    #[tokio::test]
    async fn test_unreachable_seed_is_fatal() {
        let site = StubSite::new(&[]);
        let seed = Url::parse("https://example.com/").unwrap();

        assert!(crawl_site(&site, &seed, &quiet_config()).await.is_err());
    }

    #[tokio::test]
    async fn test_default_depth_limit_respected() {
        // Chain of depth 3; with max_depth 2 the last page is never fetched.
        let site = StubSite::new(&[
            ("https://example.com/", r#"<a href="/one">1</a>"#),
            ("https://example.com/one", r#"<a href="/one/two">2</a>"#),
            ("https://example.com/one/two", r#"<a href="/one/two/three">3</a>"#),
            ("https://example.com/one/two/three", "too deep"),
        ]);
        let seed = Url::parse("https://example.com/").unwrap();

        let outcome = crawl_site(&site, &seed, &quiet_config()).await.unwrap();

        assert_eq!(outcome.pages.len(), 3);
        assert_eq!(site.fetch_count("https://example.com/one/two/three"), 0);
    }

    #[test]
    fn test_effective_max_depth_blog_cap() {
        let config = quiet_config();
        assert_eq!(effective_max_depth(Some(PageType::Blog), &config), 1);
        assert_eq!(effective_max_depth(Some(PageType::About), &config), 2);
        assert_eq!(effective_max_depth(None, &config), 2);
    }

    #[test]
    fn test_extract_links_same_origin_and_dedupe() {
        let page_url = Url::parse("https://example.com/a/").unwrap();
        let seed = Url::parse("https://example.com/").unwrap();
        let html = r#"
            <a href="/one">absolute path</a>
            <a href="two">relative</a>
            <a href="https://example.com/one">duplicate</a>
            <a href="https://other.com/x">cross origin</a>
            <a href="https://">unresolvable is dropped</a>
        "#;

        let links = extract_links(html, &page_url, &seed);
        let strings: Vec<String> = links.iter().map(|u| u.to_string()).collect();

        assert_eq!(
            strings,
            vec![
                "https://example.com/one".to_string(),
                "https://example.com/a/two".to_string(),
            ]
        );
    }
}

// src/pipeline/optimise.rs

//! Whole-run orchestration for one seed URL.
//!
//! Crawl, convert every page to Markdown, detect shared layout fragments,
//! classify and extract per page, rewrite classified pages through the
//! generative API, and persist everything under the site's output root.

use futures::stream::{self, StreamExt};
use url::Url;

use crate::classify::classify;
use crate::error::Result;
use crate::extract::{detect_common_sections, extract_contact_facts, extract_posts};
use crate::models::{BlogPost, Config, ContactFacts, PageType};
use crate::pipeline::crawl::crawl_site;
use crate::services::{PageSource, RewriteClient, RewriteRequest};
use crate::storage::OutputStorage;
use crate::utils::page_filename;

/// Summary of one site run.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub pages_crawled: usize,
    pub fetch_failures: usize,
    pub rendered_count: usize,
    pub optimised_written: usize,
    pub rewrite_failures: usize,
    pub header_footer_written: bool,
}

/// One page's inputs to the rewrite stage.
struct RewriteJob {
    url: Url,
    page_type: PageType,
    markdown: String,
    facts: ContactFacts,
    posts: Vec<BlogPost>,
}

/// Run the full pipeline for one seed URL.
pub async fn run_site(
    seed: &Url,
    config: &Config,
    source: &dyn PageSource,
    rewriter: Option<&RewriteClient>,
    storage: &dyn OutputStorage,
    tone: Option<&str>,
) -> Result<RunSummary> {
    storage.prepare().await?;

    let outcome = crawl_site(source, seed, &config.crawler).await?;

    let mut summary = RunSummary {
        pages_crawled: outcome.pages.len(),
        fetch_failures: outcome.fetch_failures,
        rendered_count: outcome.rendered_count,
        ..RunSummary::default()
    };

    // Stage 1: convert every page and persist its raw Markdown.
    let mut converted: Vec<(Url, String)> = Vec::with_capacity(outcome.pages.len());
    for page in &outcome.pages {
        let markdown = html2md::parse_html(&page.html);
        storage
            .write_raw(&page_filename(&page.url), &markdown)
            .await?;
        converted.push((page.url.clone(), markdown));
    }

    // Shared layout fragments are a property of the whole batch.
    let texts: Vec<&str> = converted.iter().map(|(_, md)| md.as_str()).collect();
    let sections = detect_common_sections(&texts);

    // Stage 2: classify and extract, collecting rewrite inputs.
    let mut jobs: Vec<RewriteJob> = Vec::new();
    for (url, markdown) in &converted {
        let Some(page_type) = classify(url.as_str(), seed.as_str()) else {
            log::debug!("Skipping unclassified page {url}");
            continue;
        };

        let facts = extract_contact_facts(markdown);

        // Blog pages rewrite their non-post body; the segmented posts
        // travel alongside as structured records.
        let (body, posts) = if page_type == PageType::Blog {
            let extraction = extract_posts(markdown);
            if extraction.posts.is_empty() {
                (markdown.clone(), Vec::new())
            } else {
                (extraction.clean_body, extraction.posts)
            }
        } else {
            (markdown.clone(), Vec::new())
        };

        jobs.push(RewriteJob {
            url: url.clone(),
            page_type,
            markdown: body,
            facts,
            posts,
        });
    }

    // Stage 3: rewrite classified pages, bounded concurrency, order
    // preserved so the last page of a type deterministically wins.
    if let Some(client) = rewriter {
        let concurrency = config.crawler.max_concurrent.max(1);
        let mut results = stream::iter(jobs.iter())
            .map(|job| async move {
                let request = RewriteRequest {
                    markdown: &job.markdown,
                    page_type: job.page_type,
                    url: &job.url,
                    facts: &job.facts,
                    posts: &job.posts,
                    tone,
                };
                (job, client.rewrite(&request).await)
            })
            .buffered(concurrency);

        while let Some((job, result)) = results.next().await {
            match result {
                Ok(content) => {
                    storage.write_optimised(job.page_type, &content).await?;
                    summary.optimised_written += 1;
                }
                Err(e) => {
                    summary.rewrite_failures += 1;
                    log::warn!("Rewrite failed for {} ({}): {e}", job.url, job.page_type);
                }
            }
        }
    } else {
        log::info!("Rewrite disabled; skipping {} classified pages", jobs.len());
    }

    if !sections.is_empty() {
        let content = format!(
            "{}\n\n{}",
            sections.header.as_deref().unwrap_or_default(),
            sections.footer.as_deref().unwrap_or_default()
        );
        storage.write_header_footer(&content).await?;
        summary.header_footer_written = true;
    }

    log::info!(
        "Run complete for {seed}: {} pages ({} rendered, {} fetch failures), {} optimised, {} rewrite failures",
        summary.pages_crawled,
        summary.rendered_count,
        summary.fetch_failures,
        summary.optimised_written,
        summary.rewrite_failures
    );

    Ok(summary)
}

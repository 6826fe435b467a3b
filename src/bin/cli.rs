//! copyforge CLI
//!
//! Crawls one or more seed URLs and writes raw and rewritten Markdown to a
//! per-domain output directory.

use std::path::PathBuf;

use clap::Parser;
use copyforge::{
    error::{AppError, Result},
    models::Config,
    pipeline::run_site,
    services::{PageFetcher, RewriteClient},
    storage::LocalStorage,
    utils::sanitize_domain,
};
use url::Url;

/// copyforge - website copy optimiser
#[derive(Parser, Debug)]
#[command(
    name = "copyforge",
    version,
    about = "Crawls a website and rewrites its page copy into optimised Markdown"
)]
struct Cli {
    /// Seed URLs to crawl
    urls: Vec<String>,

    /// Path to a file with one seed URL per line
    #[arg(long)]
    list: Option<PathBuf>,

    /// Tone directive passed to the rewrite prompt
    #[arg(long)]
    tone: Option<String>,

    /// Path to the Chrome/Chromium executable for the rendered fallback
    #[arg(long)]
    browser_path: Option<PathBuf>,

    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Override the configured output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Skip the rewrite stage; write raw Markdown only
    #[arg(long)]
    skip_rewrite: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Collect seed URLs from positional arguments and the optional list file.
fn collect_seeds(cli: &Cli) -> Result<Vec<String>> {
    let mut seeds = cli.urls.clone();

    if let Some(list_path) = &cli.list {
        let content = std::fs::read_to_string(list_path)?;
        seeds.extend(
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(String::from),
        );
    }

    if seeds.is_empty() {
        return Err(AppError::config(
            "no seed URLs given; pass URLs or use --list",
        ));
    }

    Ok(seeds)
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    log::info!("copyforge starting...");

    let mut config = Config::load_or_default(&cli.config);
    if let Some(dir) = &cli.output_dir {
        config.output.root_dir = dir.display().to_string();
    }
    config.validate()?;

    let seeds = collect_seeds(&cli)?;

    let fetcher = PageFetcher::new(&config.crawler, cli.browser_path.clone())?;

    let rewriter = if cli.skip_rewrite {
        log::info!("Rewrite stage disabled (--skip-rewrite)");
        None
    } else {
        Some(RewriteClient::from_env(config.rewrite.clone())?)
    };

    for seed_str in &seeds {
        let seed = Url::parse(seed_str)?;
        let storage = LocalStorage::new(&config.output.root_dir, &sanitize_domain(&seed));

        log::info!("Processing {seed}");
        let summary = run_site(
            &seed,
            &config,
            &fetcher,
            rewriter.as_ref(),
            &storage,
            cli.tone.as_deref(),
        )
        .await?;

        log::info!(
            "{seed}: {} pages crawled, {} optimised, output in {}",
            summary.pages_crawled,
            summary.optimised_written,
            storage.site_dir().display()
        );
    }

    log::info!("Done!");

    Ok(())
}

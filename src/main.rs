//! doc-scraper main entry point
//!
//! This is the command-line interface for the doc-scraper documentation
//! crawler.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use doc_scraper::config::{load_config_with_hash, validate, Config};
use doc_scraper::crawler::{Coordinator, TracingObserver};
use doc_scraper::output::{print_statistics, write_all, CrawlStatistics, OutputPaths};
use doc_scraper::selection::PatternSelector;
use doc_scraper::url::ScopeMode;
use doc_scraper::CrawlResult;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// doc-scraper: a concurrent documentation crawler
///
/// Crawls a documentation site from a seed URL, staying on the seed's domain
/// (and by default its section), and writes the readable text of every page
/// as JSON and plain text.
#[derive(Parser, Debug)]
#[command(name = "doc-scraper")]
#[command(version)]
#[command(about = "A concurrent documentation crawler", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(flatten)]
    overrides: Overrides,
}

/// Settings that take precedence over the configuration file
#[derive(Args, Debug, Default)]
struct Overrides {
    /// Number of concurrent page fetches (1-10)
    #[arg(long, global = true)]
    concurrency: Option<usize>,

    /// Directory for output files
    #[arg(long, value_name = "DIR", global = true)]
    output_dir: Option<PathBuf>,

    /// Per-attempt request timeout in seconds
    #[arg(long, value_name = "SECS", global = true)]
    timeout: Option<u64>,

    /// Link scope: auto, path or domain
    #[arg(long, global = true)]
    scope: Option<ScopeMode>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl every in-scope page reachable from the seed
    Crawl {
        /// Seed URL
        url: String,
    },

    /// Show the site template and in-scope links of the seed page
    Discover {
        /// Seed URL
        url: String,
    },

    /// Scrape only the seed's links that match the given patterns
    Select {
        /// Seed URL
        url: String,

        /// Regex a link must match (repeatable; default: everything)
        #[arg(long = "include", value_name = "PATTERN")]
        include: Vec<String>,

        /// Regex that excludes a link (repeatable)
        #[arg(long = "exclude", value_name = "PATTERN")]
        exclude: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = load_configuration(cli.config.as_ref(), &cli.overrides)?;

    match cli.command {
        Command::Crawl { url } => handle_crawl(&config, &url).await,
        Command::Discover { url } => handle_discover(&config, &url).await,
        Command::Select {
            url,
            include,
            exclude,
        } => handle_select(&config, &url, &include, &exclude).await,
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("doc_scraper=info,warn"),
            1 => EnvFilter::new("doc_scraper=debug,info"),
            2 => EnvFilter::new("doc_scraper=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file (if any), applies CLI overrides and re-validates
fn load_configuration(path: Option<&PathBuf>, overrides: &Overrides) -> Result<Config> {
    let mut config = match path {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Some(concurrency) = overrides.concurrency {
        config.scraper.concurrency = concurrency;
    }
    if let Some(dir) = &overrides.output_dir {
        config.output.directory = dir.clone();
    }
    if let Some(timeout) = overrides.timeout {
        config.scraper.timeout_secs = timeout;
    }
    if let Some(scope) = overrides.scope {
        config.scraper.scope = scope;
    }

    validate(&config).context("invalid configuration")?;
    Ok(config)
}

fn coordinator(config: &Config) -> Result<Coordinator> {
    Coordinator::new(&config.scraper, Arc::new(TracingObserver))
        .context("failed to build HTTP client")
}

/// Handles the crawl command: wave crawl, then outputs and statistics
async fn handle_crawl(config: &Config, url: &str) -> Result<()> {
    tracing::info!(
        "Starting crawl of {} with {} worker(s)",
        url,
        config.scraper.concurrency
    );

    let result = coordinator(config)?
        .crawl(url)
        .await
        .with_context(|| format!("crawl of {} failed", url))?;

    finish(config, url, &result)
}

/// Handles the discover command: prints what a crawl would start from
async fn handle_discover(config: &Config, url: &str) -> Result<()> {
    let session = coordinator(config)?
        .discover(url)
        .await
        .with_context(|| format!("discovery of {} failed", url))?;

    println!("=== Discovery ===\n");
    println!("Seed: {}", session.seed);
    println!("Title: {}", session.seed_page.title);
    println!("Site template: {}", session.template);
    println!("Domain: {}", session.scope.base_domain);
    if let Some(prefix) = &session.scope.path_prefix {
        println!("Path prefix: {}", prefix);
    }

    println!("\nIn-scope links ({}):", session.discovered.len());
    for link in &session.discovered {
        println!("  - {}", link);
    }

    Ok(())
}

/// Handles the select command: discovery, pattern selection, one wave
async fn handle_select(
    config: &Config,
    url: &str,
    include: &[String],
    exclude: &[String],
) -> Result<()> {
    let selector = PatternSelector::new(include, exclude).context("invalid link pattern")?;

    let result = coordinator(config)?
        .run_interactive(url, &selector)
        .await
        .with_context(|| format!("scrape of {} failed", url))?;

    finish(config, url, &result)
}

/// Writes outputs and prints statistics for a finished crawl
fn finish(config: &Config, url: &str, result: &CrawlResult) -> Result<()> {
    let seed = doc_scraper::normalize_url(url)?;
    let paths = OutputPaths::for_seed(&config.output.directory, &seed);

    let written = write_all(result, &paths, &config.output).context("failed to write output")?;
    for path in &written {
        println!("✓ Wrote {}", path.display());
    }
    println!();

    print_statistics(&CrawlStatistics::from_result(result));
    Ok(())
}

//! Email-Census main entry point
//!
//! This is the command-line interface for the Email-Census subpage scanner.

use anyhow::Context;
use clap::Parser;
use email_census::config::{load_config_with_hash, validate, Config};
use email_census::crawler::{crawl, CancelFlag, CrawlObserver};
use email_census::output::{export_results, print_summary};
use email_census::state::{CrawlSummary, ScanResult};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Exit status after a second Ctrl-C (128 + SIGINT)
const INTERRUPTED_EXIT_CODE: i32 = 130;

/// Email-Census: count an email address across the subpages of a website
///
/// Email-Census fetches the seed page, follows every link on it exactly once
/// and counts how often the target string appears in each linked page.
#[derive(Parser, Debug)]
#[command(name = "email-census")]
#[command(version)]
#[command(about = "Count a target string across the subpages of a seed page", long_about = None)]
#[command(after_help = "Ctrl-C stops after the current subpage; a second Ctrl-C exits immediately.")]
struct Cli {
    /// Page whose links are scanned
    #[arg(value_name = "SEED_URL", value_parser = non_empty)]
    seed_url: String,

    /// Literal text to count on each subpage (case-sensitive)
    #[arg(value_name = "TARGET", value_parser = non_empty)]
    target: String,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Export results to this file (.html/.htm for HTML, anything else CSV)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Verify TLS certificates (disabled by default)
    #[arg(long)]
    verify_tls: bool,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error log output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn non_empty(value: &str) -> Result<String, String> {
    if value.trim().is_empty() {
        Err("value cannot be empty".to_string())
    } else {
        Ok(value.to_string())
    }
}

/// Prints progress and results as the crawl advances
struct ConsoleObserver;

impl CrawlObserver for ConsoleObserver {
    fn on_progress(&mut self, _index: usize, _total: usize, url: &str) {
        println!("Searching subpage: {}", url);
    }

    fn on_result(&mut self, _index: usize, result: &ScanResult) {
        println!("{}\t{}", result.url, result.outcome);
    }

    fn on_done(&mut self, _summary: &CrawlSummary) {
        println!("Search done");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = build_config(&cli)?;

    let cancel = CancelFlag::new();
    tokio::spawn(watch_interrupts(cancel.clone()));

    tracing::info!(
        "Scanning links of {} for {:?}",
        cli.seed_url,
        cli.target
    );

    let summary = crawl(
        &config,
        &cli.seed_url,
        &cli.target,
        &mut ConsoleObserver,
        &cancel,
    )
    .await
    .context("crawl failed")?;

    println!();
    print_summary(&summary);

    if let Some(path) = &config.output.path {
        let format = export_results(&summary.results, Path::new(path))
            .with_context(|| format!("failed to export results to {}", path))?;
        println!("Results exported to {} ({:?})", path, format);
    }

    Ok(())
}

/// Cancels the crawl on the first Ctrl-C and exits on the second
///
/// Once the handler is installed SIGINT no longer terminates the process, so a
/// second interrupt has to end it explicitly while a request is still pending.
async fn watch_interrupts(cancel: CancelFlag) {
    while tokio::signal::ctrl_c().await.is_ok() {
        if cancel.cancel() {
            eprintln!("Interrupted again, exiting");
            std::process::exit(INTERRUPTED_EXIT_CODE);
        }
        tracing::warn!("Interrupt received, stopping after the current subpage (Ctrl-C again to exit now)");
    }
}

/// Loads the configuration file, if any, and applies command-line overrides
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if cli.verify_tls {
        config.http.accept_invalid_certs = false;
    }

    if let Some(timeout) = cli.timeout {
        config.http.timeout_secs = timeout;
        config.http.connect_timeout_secs = config.http.connect_timeout_secs.min(timeout);
    }

    if let Some(output) = &cli.output {
        config.output.path = Some(output.display().to_string());
    }

    validate(&config).context("invalid configuration")?;
    Ok(config)
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("email_census=info,warn"),
            1 => EnvFilter::new("email_census=debug,info"),
            2 => EnvFilter::new("email_census=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

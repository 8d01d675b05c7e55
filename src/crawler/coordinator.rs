//! Crawler coordinator - main crawl orchestration logic
//!
//! This module drives a single crawl:
//! - Fetching the seed page and extracting its links
//! - Scanning each link in order, one request at a time
//! - Notifying the observer before and after each scan
//! - Stopping early when cancellation is requested

use crate::config::HttpConfig;
use crate::crawler::fetcher::build_http_client;
use crate::crawler::links::fetch_links;
use crate::crawler::observer::{CallbackObserver, CrawlObserver};
use crate::crawler::scanner::scan_page;
use crate::state::{CrawlPhase, CrawlSummary, ScanResult};
use crate::CensusError;
use chrono::Utc;
use reqwest::Client;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cooperative cancellation signal checked between scans
///
/// Clones share the same flag, so one clone can be handed to a signal handler
/// while another is passed to the coordinator.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests that the crawl stop before its next scan
    ///
    /// Returns true if cancellation had already been requested.
    pub fn cancel(&self) -> bool {
        self.0.swap(true, Ordering::Relaxed)
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Main crawler coordinator structure
#[derive(Debug, Clone)]
pub struct Coordinator {
    client: Client,
}

impl Coordinator {
    /// Creates a coordinator with a client built from the HTTP configuration
    pub fn new(config: &HttpConfig) -> Result<Self, CensusError> {
        Ok(Self {
            client: build_http_client(config)?,
        })
    }

    /// Creates a coordinator around an existing client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Runs a crawl from `seed_url`, counting `target` on every linked page
    ///
    /// The crawl never fails because of the network: an unreachable seed page
    /// yields zero links (recorded in [`CrawlSummary::seed_error`]) and an
    /// unreachable subpage yields a `FetchFailed` outcome for that link only.
    /// `on_done` is called exactly once, whether the crawl finished, found no
    /// links, or was cancelled.
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlSummary)` - The crawl terminated
    /// * `Err(CensusError)` - The phase machine was driven out of order
    pub async fn run<O>(
        &self,
        seed_url: &str,
        target: &str,
        observer: &mut O,
        cancel: &CancelFlag,
    ) -> Result<CrawlSummary, CensusError>
    where
        O: CrawlObserver + ?Sized,
    {
        let started_at = Utc::now();
        let mut phase = CrawlPhase::Idle;

        phase.advance(CrawlPhase::Extracting)?;
        tracing::info!("Extracting links from seed page {}", seed_url);

        let (links, seed_error) = match fetch_links(&self.client, seed_url).await {
            Ok(links) => (links, None),
            Err(e) => {
                tracing::warn!("Failed to fetch seed page {}: {}", seed_url, e);
                (Vec::new(), Some(e.to_string()))
            }
        };

        let total = links.len();
        tracing::info!("Found {} links on {}", total, seed_url);

        let mut results = Vec::with_capacity(total);
        let mut cancelled = false;

        for (index, url) in links.into_iter().enumerate() {
            if cancel.is_cancelled() {
                tracing::info!("Crawl cancelled after {} of {} subpages", index, total);
                cancelled = true;
                break;
            }

            phase.advance(CrawlPhase::Scanning(index))?;
            observer.on_progress(index, total, &url);

            let outcome = scan_page(&self.client, &url, target).await;
            if let Some(reason) = outcome.failure_reason() {
                tracing::warn!("Could not scan {}: {}", url, reason);
            }

            let result = ScanResult::new(url, outcome);
            observer.on_result(index, &result);
            results.push(result);
        }

        phase.advance(CrawlPhase::Done)?;

        let summary = CrawlSummary {
            seed_url: seed_url.to_string(),
            target: target.to_string(),
            links_found: total,
            results,
            seed_error,
            cancelled,
            started_at,
            finished_at: Utc::now(),
        };

        tracing::info!(
            "Crawl completed: {} subpages scanned, {} occurrences, {} failed, in {}ms",
            summary.results.len(),
            summary.total_occurrences(),
            summary.failed_pages(),
            summary.duration_millis()
        );

        observer.on_done(&summary);
        Ok(summary)
    }
}

/// Runs a crawl reporting through plain callbacks
///
/// `on_progress` receives each subpage URL before it is fetched, `on_result`
/// receives the URL and its occurrence count (zero when the fetch failed), and
/// `on_done` fires once at the end.
///
/// # Example
///
/// ```no_run
/// use email_census::crawler::run_crawl;
///
/// # async fn example() -> email_census::Result<()> {
/// let client = reqwest::Client::new();
/// let summary = run_crawl(
///     &client,
///     "https://example.com/",
///     "info@example.com",
///     |url| println!("Searching subpage: {}", url),
///     |url, count| println!("{}\t{}", url, count),
///     || println!("Search done"),
/// )
/// .await?;
/// println!("{} occurrences", summary.total_occurrences());
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl<P, R, D>(
    client: &Client,
    seed_url: &str,
    target: &str,
    on_progress: P,
    on_result: R,
    on_done: D,
) -> Result<CrawlSummary, CensusError>
where
    P: FnMut(&str),
    R: FnMut(&str, usize),
    D: FnOnce(),
{
    let mut observer = CallbackObserver::new(on_progress, on_result, on_done);
    Coordinator::with_client(client.clone())
        .run(seed_url, target, &mut observer, &CancelFlag::new())
        .await
}

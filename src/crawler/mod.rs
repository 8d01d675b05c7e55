//! Crawler module for seed page extraction and subpage scanning
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with error classification
//! - HTML parsing and link extraction
//! - Target counting on each subpage
//! - Overall crawl coordination and progress notification

mod coordinator;
mod fetcher;
mod links;
mod observer;
mod scanner;

pub use coordinator::{run_crawl, CancelFlag, Coordinator};
pub use fetcher::{build_http_client, fetch_body, FetchError};
pub use links::{extract_links, extract_links_or_empty, fetch_links, resolve_href};
pub use observer::{CallbackObserver, ChannelObserver, CrawlObserver};
pub use scanner::{count_occurrences, count_page_occurrences, scan_page};

use crate::config::Config;
use crate::state::CrawlSummary;
use crate::CensusError;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the HTTP client from the configuration
/// 2. Fetch the seed page and extract its links
/// 3. Scan each link for the target, in order
/// 4. Report progress and results to the observer
///
/// # Arguments
///
/// * `config` - The census configuration
/// * `seed_url` - The page whose links are scanned
/// * `target` - The literal string to count
/// * `observer` - Receiver of progress, result and completion notifications
/// * `cancel` - Flag checked before each subpage scan
pub async fn crawl<O>(
    config: &Config,
    seed_url: &str,
    target: &str,
    observer: &mut O,
    cancel: &CancelFlag,
) -> Result<CrawlSummary, CensusError>
where
    O: CrawlObserver + ?Sized,
{
    Coordinator::new(&config.http)?
        .run(seed_url, target, observer, cancel)
        .await
}

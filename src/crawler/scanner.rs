//! Per-page target counting
//!
//! The body is searched as raw text, markup included, so an address that only
//! appears inside an `href="mailto:..."` attribute still counts.

use crate::crawler::fetcher::fetch_body;
use crate::state::ScanOutcome;
use reqwest::Client;

/// Counts non-overlapping, case-sensitive occurrences of `target` in `text`
///
/// Scanning goes left to right and resumes right after each match. An empty
/// target counts as zero occurrences.
///
/// ```
/// use email_census::crawler::count_occurrences;
///
/// assert_eq!(count_occurrences("aaa", "aa"), 1);
/// assert_eq!(count_occurrences("a@b.com, A@B.COM", "a@b.com"), 1);
/// ```
pub fn count_occurrences(text: &str, target: &str) -> usize {
    if target.is_empty() {
        return 0;
    }
    text.matches(target).count()
}

/// Fetches a page and counts the target in its body
///
/// Fetch failures are reported as [`ScanOutcome::FetchFailed`] rather than
/// returned as errors, so one bad link never stops a crawl. An empty target is
/// answered with `NotFound` without touching the network.
pub async fn scan_page(client: &Client, url: &str, target: &str) -> ScanOutcome {
    if target.is_empty() {
        tracing::debug!("Empty target, skipping fetch of {}", url);
        return ScanOutcome::NotFound;
    }

    match fetch_body(client, url).await {
        Ok(body) => {
            let count = count_occurrences(&body, target);
            tracing::debug!("{}: {} occurrence(s) of {:?}", url, count, target);
            ScanOutcome::from_count(count)
        }
        Err(e) => {
            tracing::debug!("Failed to scan {}: {}", url, e);
            ScanOutcome::FetchFailed(e.to_string())
        }
    }
}

/// Fetches a page and returns the occurrence count, zero on any failure
pub async fn count_page_occurrences(client: &Client, url: &str, target: &str) -> usize {
    scan_page(client, url, target).await.count()
}

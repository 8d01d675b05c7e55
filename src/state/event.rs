//! Crawl events and the final summary

use crate::state::ScanResult;
use chrono::{DateTime, Utc};

/// Notification emitted by the coordinator while a crawl runs
///
/// Events are emitted in scan order: `Progress` for link `i` comes before the
/// request for link `i`, and `Result` for link `i` comes before the request for
/// link `i + 1`.
#[derive(Debug, Clone, PartialEq)]
pub enum CrawlEvent {
    /// The subpage at `index` is about to be scanned
    Progress {
        index: usize,
        total: usize,
        url: String,
    },

    /// The subpage at `index` has been scanned
    Result { index: usize, result: ScanResult },

    /// The crawl terminated; emitted exactly once
    Done(CrawlSummary),
}

/// Everything a finished crawl produced
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlSummary {
    pub seed_url: String,
    pub target: String,

    /// Number of links extracted from the seed page
    pub links_found: usize,

    /// One result per scanned link, in link order
    pub results: Vec<ScanResult>,

    /// Why the seed page could not be fetched, if it could not
    pub seed_error: Option<String>,

    /// True if the crawl stopped before scanning every link
    pub cancelled: bool,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl CrawlSummary {
    /// Sum of occurrences over all scanned pages
    pub fn total_occurrences(&self) -> usize {
        self.results.iter().map(ScanResult::count).sum()
    }

    /// Number of pages containing the target at least once
    pub fn pages_with_target(&self) -> usize {
        self.results.iter().filter(|r| r.count() > 0).count()
    }

    /// Number of pages that could not be fetched
    pub fn failed_pages(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.outcome.is_failure())
            .count()
    }

    /// Returns true if every extracted link was scanned
    pub fn is_complete(&self) -> bool {
        self.results.len() == self.links_found
    }

    /// Wall-clock duration of the crawl in milliseconds
    pub fn duration_millis(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }
}

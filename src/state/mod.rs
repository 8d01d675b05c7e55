//! Result records and crawl state
//!
//! This module defines the values a crawl produces: per-link scan outcomes,
//! the events emitted while scanning, the phase machine the coordinator walks
//! through, and the summary handed over when the crawl terminates.

mod crawl_phase;
mod event;
mod scan_result;

pub use crawl_phase::CrawlPhase;
pub use event::{CrawlEvent, CrawlSummary};
pub use scan_result::{ScanOutcome, ScanResult};

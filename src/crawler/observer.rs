//! Observers receiving crawl notifications
//!
//! The coordinator calls its observer synchronously and awaits nothing while
//! doing so: a progress notification has been fully handled before the request
//! for that link is sent, and a result has been fully handled before the next
//! request is sent.

use crate::state::{CrawlEvent, CrawlSummary, ScanResult};
use tokio::sync::mpsc::UnboundedSender;

/// Receiver of crawl notifications
pub trait CrawlObserver {
    /// Called before the subpage at `index` is fetched
    fn on_progress(&mut self, index: usize, total: usize, url: &str) {
        let _ = (index, total, url);
    }

    /// Called after the subpage at `index` has been scanned
    fn on_result(&mut self, index: usize, result: &ScanResult) {
        let _ = (index, result);
    }

    /// Called exactly once when the crawl terminates
    fn on_done(&mut self, summary: &CrawlSummary) {
        let _ = summary;
    }
}

/// Records every notification as a [`CrawlEvent`]
impl CrawlObserver for Vec<CrawlEvent> {
    fn on_progress(&mut self, index: usize, total: usize, url: &str) {
        self.push(CrawlEvent::Progress {
            index,
            total,
            url: url.to_string(),
        });
    }

    fn on_result(&mut self, index: usize, result: &ScanResult) {
        self.push(CrawlEvent::Result {
            index,
            result: result.clone(),
        });
    }

    fn on_done(&mut self, summary: &CrawlSummary) {
        self.push(CrawlEvent::Done(summary.clone()));
    }
}

/// Forwards notifications into an unbounded channel
///
/// Events arrive in scan order, but the crawl does not wait for the receiving
/// side to process them. Use a direct [`CrawlObserver`] implementation when
/// rendering must finish before the next request starts.
#[derive(Debug, Clone)]
pub struct ChannelObserver {
    tx: UnboundedSender<CrawlEvent>,
}

impl ChannelObserver {
    pub fn new(tx: UnboundedSender<CrawlEvent>) -> Self {
        Self { tx }
    }

    fn send(&self, event: CrawlEvent) {
        if self.tx.send(event).is_err() {
            tracing::trace!("Event receiver dropped, discarding crawl event");
        }
    }
}

impl CrawlObserver for ChannelObserver {
    fn on_progress(&mut self, index: usize, total: usize, url: &str) {
        self.send(CrawlEvent::Progress {
            index,
            total,
            url: url.to_string(),
        });
    }

    fn on_result(&mut self, index: usize, result: &ScanResult) {
        self.send(CrawlEvent::Result {
            index,
            result: result.clone(),
        });
    }

    fn on_done(&mut self, summary: &CrawlSummary) {
        self.send(CrawlEvent::Done(summary.clone()));
    }
}

/// Adapts three closures to the observer interface
///
/// `on_progress` receives the URL about to be scanned, `on_result` the URL and
/// its occurrence count, and `on_done` fires once at the end.
pub struct CallbackObserver<P, R, D> {
    on_progress: P,
    on_result: R,
    on_done: Option<D>,
}

impl<P, R, D> CallbackObserver<P, R, D>
where
    P: FnMut(&str),
    R: FnMut(&str, usize),
    D: FnOnce(),
{
    pub fn new(on_progress: P, on_result: R, on_done: D) -> Self {
        Self {
            on_progress,
            on_result,
            on_done: Some(on_done),
        }
    }
}

impl<P, R, D> CrawlObserver for CallbackObserver<P, R, D>
where
    P: FnMut(&str),
    R: FnMut(&str, usize),
    D: FnOnce(),
{
    fn on_progress(&mut self, _index: usize, _total: usize, url: &str) {
        (self.on_progress)(url);
    }

    fn on_result(&mut self, _index: usize, result: &ScanResult) {
        (self.on_result)(&result.url, result.count());
    }

    fn on_done(&mut self, _summary: &CrawlSummary) {
        if let Some(on_done) = self.on_done.take() {
            on_done();
        }
    }
}

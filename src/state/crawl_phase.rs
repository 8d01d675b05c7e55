/// Crawl phase definitions
///
/// A crawl moves `Idle -> Extracting -> Scanning(0) -> ... -> Scanning(n-1) -> Done`,
/// skipping straight from `Extracting` to `Done` when no links were found.
use crate::CensusError;
use std::fmt;

/// Current phase of a crawl
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CrawlPhase {
    /// Nothing has happened yet
    #[default]
    Idle,

    /// The seed page is being fetched and its links collected
    Extracting,

    /// The subpage at this index is being scanned
    Scanning(usize),

    /// All scans finished, or the crawl was cancelled
    Done,
}

impl CrawlPhase {
    /// Returns true if no further transitions are possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Checks whether moving from this phase to `next` is allowed
    ///
    /// Scanning indices must advance one at a time, which is what keeps the
    /// results in link order.
    pub fn can_transition_to(&self, next: CrawlPhase) -> bool {
        match (self, next) {
            (Self::Idle, Self::Extracting) => true,
            (Self::Extracting, Self::Scanning(0)) => true,
            (Self::Scanning(current), Self::Scanning(following)) => following == current + 1,
            (Self::Extracting | Self::Scanning(_), Self::Done) => true,
            _ => false,
        }
    }

    /// Moves to `next`, or fails with [`CensusError::InvalidTransition`]
    pub fn advance(&mut self, next: CrawlPhase) -> Result<(), CensusError> {
        if !self.can_transition_to(next) {
            return Err(CensusError::InvalidTransition {
                from: *self,
                to: next,
            });
        }
        *self = next;
        Ok(())
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Extracting => write!(f, "extracting"),
            Self::Scanning(index) => write!(f, "scanning #{}", index),
            Self::Done => write!(f, "done"),
        }
    }
}

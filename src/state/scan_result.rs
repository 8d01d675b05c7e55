/// Scan outcome definitions
///
/// A scanned subpage either contained the target some number of times, did not
/// contain it, or could not be fetched at all.
use std::fmt;

/// Result of scanning one subpage for the target string
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ScanOutcome {
    /// The target appeared this many times (always at least one)
    Found(usize),

    /// The page was fetched and the target does not appear in it
    NotFound,

    /// The page could not be fetched; carries the failure reason
    FetchFailed(String),
}

impl ScanOutcome {
    /// Builds an outcome from an occurrence count
    pub fn from_count(count: usize) -> Self {
        if count == 0 {
            Self::NotFound
        } else {
            Self::Found(count)
        }
    }

    /// Returns the occurrence count, treating a failed fetch as zero
    ///
    /// This is the count reported in exports, where an unreachable page and a
    /// page without the target are indistinguishable.
    pub fn count(&self) -> usize {
        match self {
            Self::Found(count) => *count,
            Self::NotFound | Self::FetchFailed(_) => 0,
        }
    }

    /// Returns true if the page could not be fetched
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::FetchFailed(_))
    }

    /// Returns the failure reason, if any
    pub fn failure_reason(&self) -> Option<&str> {
        match self {
            Self::FetchFailed(reason) => Some(reason.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for ScanOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Found(count) => write!(f, "{}", count),
            Self::NotFound => write!(f, "0"),
            Self::FetchFailed(reason) => write!(f, "0 (fetch failed: {})", reason),
        }
    }
}

/// One scanned subpage and its outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanResult {
    /// Absolute URL of the subpage, as discovered on the seed page
    pub url: String,

    /// What scanning the subpage produced
    pub outcome: ScanOutcome,
}

impl ScanResult {
    pub fn new(url: impl Into<String>, outcome: ScanOutcome) -> Self {
        Self {
            url: url.into(),
            outcome,
        }
    }

    /// Occurrence count, zero for pages that failed to fetch
    pub fn count(&self) -> usize {
        self.outcome.count()
    }
}

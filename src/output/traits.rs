//! Exporter trait and shared types
//!
//! This module defines the trait interface for result exporters and the
//! errors they can raise.

use crate::state::ScanResult;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// File formats results can be exported to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Html,
}

impl ExportFormat {
    /// Picks the format from a file extension, case-insensitively
    ///
    /// `.html` and `.htm` select HTML; every other path, with or without an
    /// extension, is written as CSV.
    ///
    /// ```
    /// use email_census::output::ExportFormat;
    /// use std::path::Path;
    ///
    /// assert_eq!(ExportFormat::from_path(Path::new("out.htm")), ExportFormat::Html);
    /// assert_eq!(ExportFormat::from_path(Path::new("out.CSV")), ExportFormat::Csv);
    /// assert_eq!(ExportFormat::from_path(Path::new("out.txt")), ExportFormat::Csv);
    /// ```
    pub fn from_path(path: &Path) -> Self {
        let is_html = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("html") || ext.eq_ignore_ascii_case("htm"))
            .unwrap_or(false);

        if is_html {
            Self::Html
        } else {
            Self::Csv
        }
    }
}

/// Column headers shared by every export format
pub const COLUMN_HEADERS: [&str; 2] = ["Subpage", "Email Count"];

/// Trait for result exporters
///
/// An exporter serializes the final, ordered result sequence. Failed fetches
/// are written with a count of zero.
pub trait ResultExporter {
    /// The format this exporter produces
    fn format(&self) -> ExportFormat;

    /// Writes all results to `out`
    ///
    /// # Arguments
    ///
    /// * `results` - The scan results, in link order
    /// * `out` - Destination of the serialized results
    fn write_results(&self, results: &[ScanResult], out: &mut dyn Write) -> OutputResult<()>;
}

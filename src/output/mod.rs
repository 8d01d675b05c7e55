//! Output module for exporting and summarizing crawl results
//!
//! This module handles:
//! - Exporting the result sequence to CSV or HTML
//! - Rendering a short end-of-crawl summary for the terminal

mod csv_export;
mod html_export;
mod summary;
mod traits;

pub use csv_export::CsvExporter;
pub use html_export::{format_html_table, HtmlExporter};
pub use summary::{format_summary, print_summary};
pub use traits::{ExportFormat, OutputError, OutputResult, ResultExporter, COLUMN_HEADERS};

use crate::state::ScanResult;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Returns the exporter producing `format`
pub fn exporter_for(format: ExportFormat) -> Box<dyn ResultExporter> {
    match format {
        ExportFormat::Csv => Box::new(CsvExporter),
        ExportFormat::Html => Box::new(HtmlExporter),
    }
}

/// Exports results to a file, choosing the format from its extension
///
/// `.html` and `.htm` produce an HTML table; any other path gets a CSV file.
/// The file is created or truncated.
///
/// # Returns
///
/// * `Ok(ExportFormat)` - The format that was written
/// * `Err(OutputError)` - Write failure
pub fn export_results(results: &[ScanResult], path: &Path) -> OutputResult<ExportFormat> {
    let format = ExportFormat::from_path(path);

    let mut file = BufWriter::new(File::create(path)?);
    exporter_for(format).write_results(results, &mut file)?;

    tracing::info!(
        "Exported {} results as {:?} to {}",
        results.len(),
        format,
        path.display()
    );

    Ok(format)
}

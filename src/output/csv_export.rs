//! CSV export
//!
//! One header row followed by one row per scanned subpage.

use crate::output::traits::{ExportFormat, OutputResult, ResultExporter, COLUMN_HEADERS};
use crate::state::ScanResult;
use std::io::Write;

/// Writes results as `Subpage,Email Count` rows
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvExporter;

impl ResultExporter for CsvExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Csv
    }

    fn write_results(&self, results: &[ScanResult], out: &mut dyn Write) -> OutputResult<()> {
        let mut writer = csv::Writer::from_writer(out);
        writer.write_record(COLUMN_HEADERS)?;

        for result in results {
            let count = result.count().to_string();
            writer.write_record([result.url.as_str(), count.as_str()])?;
        }

        writer.flush()?;
        Ok(())
    }
}

//! HTML table export

use crate::output::traits::{ExportFormat, OutputResult, ResultExporter, COLUMN_HEADERS};
use crate::state::ScanResult;
use html_escape::{encode_double_quoted_attribute, encode_text};
use std::io::Write;

/// Writes results as a standalone HTML document with one table
///
/// Each subpage cell links to the subpage itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlExporter;

impl ResultExporter for HtmlExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Html
    }

    fn write_results(&self, results: &[ScanResult], out: &mut dyn Write) -> OutputResult<()> {
        out.write_all(format_html_table(results).as_bytes())?;
        out.flush()?;
        Ok(())
    }
}

/// Formats results as an HTML document
pub fn format_html_table(results: &[ScanResult]) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\">");
    html.push_str("<title>Results</title></head><body>\n");
    html.push_str("<table border=\"1\">\n");
    html.push_str(&format!(
        "<tr><th>{}</th><th>{}</th></tr>\n",
        COLUMN_HEADERS[0], COLUMN_HEADERS[1]
    ));

    for result in results {
        html.push_str(&format!(
            "<tr><td><a href=\"{}\">{}</a></td><td>{}</td></tr>\n",
            encode_double_quoted_attribute(&result.url),
            encode_text(&result.url),
            result.count()
        ));
    }

    html.push_str("</table>\n</body></html>\n");
    html
}

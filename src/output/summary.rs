//! End-of-crawl summary for the terminal

use crate::state::CrawlSummary;

/// Formats a crawl summary as plain text
pub fn format_summary(summary: &CrawlSummary) -> String {
    let mut text = String::new();

    text.push_str("=== Census Summary ===\n");
    text.push_str(&format!("  Seed page: {}\n", summary.seed_url));
    text.push_str(&format!("  Target: {}\n", summary.target));

    if let Some(error) = &summary.seed_error {
        text.push_str(&format!("  Seed page could not be fetched: {}\n", error));
    }

    text.push_str(&format!("  Links found: {}\n", summary.links_found));
    text.push_str(&format!("  Subpages scanned: {}\n", summary.results.len()));
    text.push_str(&format!(
        "  Subpages containing target: {}\n",
        summary.pages_with_target()
    ));
    text.push_str(&format!(
        "  Total occurrences: {}\n",
        summary.total_occurrences()
    ));

    let failed = summary.failed_pages();
    if failed > 0 {
        text.push_str(&format!("  Subpages that failed to load: {}\n", failed));
    }

    if summary.cancelled {
        text.push_str(&format!(
            "  Cancelled: {} of {} subpages were not scanned\n",
            summary.links_found - summary.results.len(),
            summary.links_found
        ));
    }

    text.push_str(&format!(
        "  Duration: {:.2}s\n",
        summary.duration_millis() as f64 / 1000.0
    ));

    text
}

/// Prints a crawl summary to stdout
pub fn print_summary(summary: &CrawlSummary) {
    print!("{}", format_summary(summary));
}

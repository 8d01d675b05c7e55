//! Link extraction from the seed page
//!
//! Every `<a>` element carrying an `href` attribute contributes exactly one
//! link, in document order. Nothing is filtered or deduplicated: `mailto:`,
//! fragment-only and repeated links are all kept, so the number of subpages
//! scanned always equals the number of anchors found.

use crate::crawler::fetcher::{fetch_body, FetchError};
use reqwest::Client;
use scraper::{Html, Selector};
use url::Url;

/// Extracts every anchor `href` from an HTML document as an absolute URL
///
/// # Arguments
///
/// * `html` - The HTML content to parse
/// * `base_url` - The base URL for resolving relative links
///
/// # Example
///
/// ```
/// use email_census::crawler::extract_links;
/// use url::Url;
///
/// let html = r#"<a href="/page">Link</a><a href="https://other.com/x">Other</a>"#;
/// let base_url = Url::parse("https://example.com/dir/").unwrap();
/// let links = extract_links(html, &base_url);
/// assert_eq!(links, vec!["https://example.com/page", "https://other.com/x"]);
/// ```
pub fn extract_links(html: &str, base_url: &Url) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut links = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            if let Some(href) = element.value().attr("href") {
                links.push(resolve_href(href, base_url));
            }
        }
    }

    links
}

/// Resolves a raw href against the base URL
///
/// Absolute hrefs are returned exactly as written. Relative ones
/// (scheme-relative, path-relative, query or fragment only) are joined against
/// `base_url` following RFC 3986. An href that cannot be joined is returned
/// verbatim; fetching it later fails and is reported for that link alone.
pub fn resolve_href(href: &str, base_url: &Url) -> String {
    if Url::parse(href).is_ok() {
        return href.to_string();
    }

    match base_url.join(href) {
        Ok(absolute_url) => absolute_url.to_string(),
        Err(e) => {
            tracing::debug!("Could not resolve href {:?} against {}: {}", href, base_url, e);
            href.to_string()
        }
    }
}

/// Fetches the seed page and returns the links it references
///
/// The seed URL itself is the base for resolution, even if the request was
/// redirected elsewhere.
pub async fn fetch_links(client: &Client, seed_url: &str) -> Result<Vec<String>, FetchError> {
    let base_url = Url::parse(seed_url).map_err(|e| FetchError::InvalidUrl {
        url: seed_url.to_string(),
        message: e.to_string(),
    })?;

    let body = fetch_body(client, seed_url).await?;
    let links = extract_links(&body, &base_url);
    tracing::debug!("Extracted {} links from {}", links.len(), seed_url);

    Ok(links)
}

/// Fetches the seed page's links, returning an empty list on any failure
pub async fn extract_links_or_empty(client: &Client, seed_url: &str) -> Vec<String> {
    match fetch_links(client, seed_url).await {
        Ok(links) => links,
        Err(e) => {
            tracing::warn!("Failed to fetch seed page {}: {}", seed_url, e);
            Vec::new()
        }
    }
}

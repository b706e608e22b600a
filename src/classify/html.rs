// src/classify/html.rs
// =============================================================================
// This module extracts links from HTML pages.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Is built on html5ever (Mozilla's HTML parser)
//
// We also use the `url` crate to:
// - Resolve relative hrefs against the page they appear on
// - Drop #fragments so "page.html#top" and "page.html" count as one link
// =============================================================================

use scraper::{Html, Selector};
use url::Url;

// Extracts all links from HTML content, in document order
//
// Parameters:
//   html: the HTML content to parse
//   base: the final URL of the page (after redirects), for relative links
//
// Returns: absolute http/https URLs without fragments
//
// Example:
//   html = "<a href='exams/prelim1.pdf'>Prelim 1</a>"
//   base = "http://www.cs.cornell.edu/courses/cs4410/2016fa/"
//   result = ["http://www.cs.cornell.edu/courses/cs4410/2016fa/exams/prelim1.pdf"]
pub fn extract_html_links(html: &str, base: &Url) -> Vec<Url> {
    let document = Html::parse_document(html);

    // The selector is a constant and known to be valid
    let selector = Selector::parse("a[href]").expect("a[href] is a valid selector");

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_link(base, href))
        .collect()
}

// Resolves a possibly-relative href to an absolute http(s) URL
//
// Examples:
//   base = "https://example.com/page"
//   href = "/docs" -> Some("https://example.com/docs")
//   href = "other#part" -> Some("https://example.com/other")
//   href = "javascript:void(0)" -> None
fn resolve_link(base: &Url, href: &str) -> Option<Url> {
    let href = href.trim();

    // Skip anchors and special protocols
    if href.is_empty()
        || href.starts_with('#')
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("javascript:")
    {
        return None;
    }

    let mut url = base.join(href).ok()?;
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }

    url.set_fragment(None);
    Some(url)
}

// src/classify/mod.rs
// =============================================================================
// This module turns a fetched page into decisions about its links.
//
// Submodules:
// - html: Extracts absolute links from an HTML page
// - pattern: Classifies each link as a document, a page to follow, or noise
// =============================================================================

mod html;
mod pattern;

pub use html::extract_html_links;
pub use pattern::{LinkClass, LinkClassifier};

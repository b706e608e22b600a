// src/crawl/mod.rs
// =============================================================================
// This module handles crawling a course website.
//
// Features:
// - Breadth-first crawling starting from a crawl target (one per semester)
// - Same-host and /courses/ path restriction
// - Optional depth limit
// - Polite crawling with delays between requests
// - One visited set for the whole run, shared by every crawl target
// =============================================================================

mod queue;

pub use queue::{CrawlEvent, CrawlStats, Crawler};

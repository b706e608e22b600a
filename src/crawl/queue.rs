// src/crawl/queue.rs
// =============================================================================
// This module implements the course-site crawler with a breadth-first approach.
//
// How it works:
// 1. Start with the crawl target (e.g. .../courses/cs4410/2016fa) in the queue
// 2. Fetch every page of the current level (a few at a time)
// 3. Extract all links from each page, in queue order
// 4. Classify each link we have not seen before:
//    - candidate documents go into the DocumentIndex
//    - pages under /courses/ on the same host go into the next level
//    - everything else is only reported as discovered
// 5. Repeat until the queue is empty or max depth is reached
//
// Two sets live on the Crawler, not inside one crawl:
// - visited: every URL seen so far; a link is classified and reported once
// - fetched: every page actually requested; a page is fetched once per run
// A page seen past the depth limit is visited but not fetched, so a later
// crawl target can still reach it.
//
// Politeness:
// - A small delay before each request
// - Bounded concurrency within a level
// - Only the allowed host is ever fetched
// =============================================================================

use crate::classify::{extract_html_links, LinkClass, LinkClassifier};
use crate::config::ScrapeConfig;
use crate::documents::{Document, DocumentIndex};
use anyhow::{anyhow, Result};
use futures::stream::{self, StreamExt};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

// Something the crawler wants the caller to know about, in discovery order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlEvent<'a> {
    /// About to fetch this page
    Visiting(&'a Url),
    /// A new link that is not a candidate document
    Discovered(&'a Url),
    /// A new candidate document
    Candidate(&'a Document),
    /// The page could not be fetched
    FetchFailed { url: &'a Url, reason: &'a str },
}

// Counters for one crawl target
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CrawlStats {
    pub pages_fetched: usize,
    pub links_discovered: usize,
    pub documents_found: usize,
}

impl std::ops::AddAssign for CrawlStats {
    fn add_assign(&mut self, other: Self) {
        self.pages_fetched += other.pages_fetched;
        self.links_discovered += other.links_discovered;
        self.documents_found += other.documents_found;
    }
}

// Represents a page in the crawl queue
#[derive(Debug, Clone)]
struct CrawlItem {
    url: Url,
    depth: usize, // How many levels deep from the crawl target (target = 1)
}

// A fetched HTML page
struct Page {
    final_url: Url, // After redirects; relative links resolve against this
    body: String,
}

pub struct Crawler {
    client: Client,
    classifier: LinkClassifier,
    visited: HashSet<String>,
    fetched: HashSet<String>,
    max_depth: Option<usize>,
    concurrency: usize,
    delay: Duration,
}

impl Crawler {
    pub fn new(config: &ScrapeConfig, classifier: LinkClassifier) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            classifier,
            visited: HashSet::new(),
            fetched: HashSet::new(),
            max_depth: config.max_depth,
            concurrency: config.concurrency.max(1),
            delay: config.delay,
        })
    }

    // Crawls one target, adding every candidate document to `index`
    //
    // `on_event` is called for each fetch, discovered link and document,
    // in the order the crawler processes them.
    pub async fn crawl<F>(
        &mut self,
        seed: &Url,
        index: &mut DocumentIndex,
        mut on_event: F,
    ) -> Result<CrawlStats>
    where
        F: FnMut(CrawlEvent<'_>),
    {
        let mut stats = CrawlStats::default();

        let mut seed = seed.clone();
        seed.set_fragment(None);
        if self.fetched.contains(seed.as_str()) {
            debug!(url = %seed, "crawl target already fetched, skipping");
            return Ok(stats);
        }

        let mut frontier = vec![CrawlItem { url: seed, depth: 1 }];

        while !frontier.is_empty() {
            for item in &frontier {
                self.visited.insert(item.url.to_string());
                self.fetched.insert(item.url.to_string());
                on_event(CrawlEvent::Visiting(&item.url));
            }

            let pages = self.fetch_level(frontier).await;
            let mut next = Vec::new();

            for (item, result) in pages {
                let page = match result {
                    Ok(Some(page)) => page,
                    Ok(None) => {
                        debug!(url = %item.url, "not an HTML page, not parsing");
                        continue;
                    }
                    Err(e) => {
                        let reason = e.to_string();
                        warn!(url = %item.url, error = %reason, "failed to fetch page");
                        on_event(CrawlEvent::FetchFailed {
                            url: &item.url,
                            reason: &reason,
                        });
                        continue;
                    }
                };

                stats.pages_fetched += 1;
                self.visited.insert(page.final_url.to_string());
                self.fetched.insert(page.final_url.to_string());

                for link in extract_html_links(&page.body, &page.final_url) {
                    let key = link.to_string();
                    // insert() returns false for links we have already seen
                    let first_sighting = self.visited.insert(key.clone());
                    if first_sighting {
                        stats.links_discovered += 1;
                    }

                    match self.classifier.classify(&link) {
                        LinkClass::Document(document) => {
                            if first_sighting {
                                on_event(CrawlEvent::Candidate(&document));
                                if index.insert(document) {
                                    stats.documents_found += 1;
                                }
                            }
                        }
                        LinkClass::Follow => {
                            if first_sighting {
                                on_event(CrawlEvent::Discovered(&link));
                            }
                            // fetched also holds everything already queued
                            if self.within_depth(item.depth + 1) && self.fetched.insert(key) {
                                next.push(CrawlItem {
                                    url: link,
                                    depth: item.depth + 1,
                                });
                            }
                        }
                        LinkClass::Ignore => {
                            if first_sighting {
                                on_event(CrawlEvent::Discovered(&link));
                            }
                        }
                    }
                }
            }

            frontier = next;
        }

        debug!(
            pages = stats.pages_fetched,
            links = stats.links_discovered,
            documents = stats.documents_found,
            "crawl target finished"
        );
        Ok(stats)
    }

    fn within_depth(&self, depth: usize) -> bool {
        self.max_depth.map_or(true, |max| depth <= max)
    }

    // Fetches one BFS level. Requests overlap, but results come back in
    // queue order so discovery order stays deterministic.
    async fn fetch_level(&self, frontier: Vec<CrawlItem>) -> Vec<(CrawlItem, Result<Option<Page>>)> {
        let client = &self.client;
        let delay = self.delay;

        stream::iter(frontier)
            .map(move |item| async move {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                let result = fetch_page(client, &item.url).await;
                (item, result)
            })
            .buffered(self.concurrency)
            .collect()
            .await
    }
}

// Fetches a page. Returns None for responses that are not HTML.
async fn fetch_page(client: &Client, url: &Url) -> Result<Option<Page>> {
    let response = client.get(url.clone()).send().await?;

    if !response.status().is_success() {
        return Err(anyhow!("HTTP {}", response.status()));
    }

    if !is_html(&response) {
        return Ok(None);
    }

    let final_url = response.url().clone();
    let body = response.text().await?;
    Ok(Some(Page { final_url, body }))
}

// A missing Content-Type is given the benefit of the doubt
fn is_html(response: &reqwest::Response) -> bool {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map_or(true, |ct| ct.to_ascii_lowercase().contains("html"))
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why fetch a whole level at once?
//    - buffered(n) keeps up to n requests in flight
//    - unlike buffer_unordered, results are yielded in input order
//    - so the index and the printed output do not depend on network timing
//
// 2. Why both a visited and a fetched set?
//    - visited: a link that appears on twenty pages is reported once
//    - fetched: a page is requested once, but a page skipped at the depth
//      limit stays fetchable from a later, shallower path
//
// 3. What does the FnMut callback buy us?
//    - The crawler never prints anything itself
//    - main.rs decides between console output and --json
//    - tests can record the events and assert on them
// -----------------------------------------------------------------------------

// src/config.rs
// =============================================================================
// Run configuration for a scrape.
//
// Everything the crawler and the reporter need lives in ScrapeConfig. It is
// built from the command line (see cli.rs) and validated once, so the rest of
// the program can trust its values.
//
// This module also knows the site layout: a crawl target is
//   <base_url>/courses/<subject><course>/<year><semester>
// e.g. http://www.cs.cornell.edu/courses/cs4410/2016fa
// =============================================================================

use anyhow::{anyhow, bail, Context, Result};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "http://www.cs.cornell.edu";
pub const DEFAULT_SUBJECT: &str = "cs";
pub const DEFAULT_PATH_PREFIX: &str = "/courses/";
pub const DEFAULT_KEYWORDS: &str = r"prelim\d*|final|sol|midterm|sample|review|exam|answer";
pub const DEFAULT_CONCURRENCY: usize = 4;
pub const DEFAULT_DELAY_MS: u64 = 100;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

// A term of the academic year, written as its two-letter code in URLs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Semester {
    #[serde(rename = "fa")]
    Fall,
    #[serde(rename = "sp")]
    Spring,
    #[serde(rename = "su")]
    Summer,
}

impl Semester {
    pub fn code(self) -> &'static str {
        match self {
            Semester::Fall => "fa",
            Semester::Spring => "sp",
            Semester::Summer => "su",
        }
    }

    pub fn season(self) -> &'static str {
        match self {
            Semester::Fall => "fall",
            Semester::Spring => "spring",
            Semester::Summer => "summer",
        }
    }
}

impl fmt::Display for Semester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Semester {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "fa" | "fall" => Ok(Semester::Fall),
            "sp" | "spring" => Ok(Semester::Spring),
            "su" | "summer" => Ok(Semester::Summer),
            other => Err(anyhow!("unknown semester '{}' (expected fa, sp or su)", other)),
        }
    }
}

// One page to start crawling from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTarget {
    pub year: u16,
    pub semester: Semester,
    pub url: Url,
}

// Validated settings for one run
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    pub course: String,
    pub start_year: u16,
    pub end_year: u16,
    pub keywords: String,
    pub subject: String,
    pub semesters: Vec<Semester>,
    pub base_url: Url,
    pub path_prefix: String,
    pub max_depth: Option<usize>,
    pub concurrency: usize,
    pub delay: Duration,
    pub timeout: Duration,
    pub verbose: bool,
    pub json: bool,
}

impl ScrapeConfig {
    // Creates a config with every optional setting at its default
    pub fn new(course: &str, start_year: u16, end_year: u16) -> Result<Self> {
        let base_url = Url::parse(DEFAULT_BASE_URL).context("default base URL is invalid")?;
        Ok(Self {
            course: course.to_string(),
            start_year,
            end_year,
            keywords: DEFAULT_KEYWORDS.to_string(),
            subject: DEFAULT_SUBJECT.to_string(),
            semesters: vec![Semester::Fall, Semester::Spring],
            base_url,
            path_prefix: DEFAULT_PATH_PREFIX.to_string(),
            max_depth: None,
            concurrency: DEFAULT_CONCURRENCY,
            delay: Duration::from_millis(DEFAULT_DELAY_MS),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            verbose: false,
            json: false,
        })
    }

    // Checks the invariants the crawler relies on
    pub fn validate(&self) -> Result<()> {
        if self.course.is_empty() || !self.course.chars().all(|c| c.is_ascii_alphanumeric()) {
            bail!("course number must be alphanumeric, got '{}'", self.course);
        }
        if self.start_year > self.end_year {
            bail!(
                "start year {} is after end year {}",
                self.start_year,
                self.end_year
            );
        }
        if self.semesters.is_empty() {
            bail!("at least one semester must be searched");
        }
        if self.base_url.host_str().is_none() {
            bail!("base URL has no host: {}", self.base_url);
        }
        if !matches!(self.base_url.scheme(), "http" | "https") {
            bail!("base URL must be http or https: {}", self.base_url);
        }
        if !self.path_prefix.starts_with('/') {
            bail!("path prefix must start with '/', got '{}'", self.path_prefix);
        }
        if self.concurrency == 0 {
            bail!("concurrency must be at least 1");
        }
        if self.max_depth == Some(0) {
            bail!("max depth must be at least 1");
        }
        Ok(())
    }

    // Host the crawler is allowed to fetch from
    pub fn allowed_host(&self) -> &str {
        self.base_url.host_str().unwrap_or_default()
    }

    // Every (year, semester) page to crawl, in search order:
    // years ascending, and within a year the semesters in configured order
    pub fn targets(&self) -> Result<Vec<CrawlTarget>> {
        let mut targets = Vec::new();
        for year in self.start_year..=self.end_year {
            for &semester in &self.semesters {
                targets.push(CrawlTarget {
                    year,
                    semester,
                    url: self.target_url(year, semester)?,
                });
            }
        }
        Ok(targets)
    }

    fn target_url(&self, year: u16, semester: Semester) -> Result<Url> {
        let path = format!(
            "courses/{}{}/{}{}",
            self.subject, self.course, year, semester
        );
        self.base_url
            .join(&path)
            .with_context(|| format!("cannot build crawl target from '{}'", path))
    }

    // Course label used in output, e.g. "cs4410"
    pub fn course_label(&self) -> String {
        format!("{}{}", self.subject, self.course)
    }
}

// src/classify/pattern.rs
// =============================================================================
// Decides what to do with every link the crawler discovers.
//
// Two regular expressions drive the decision:
//
// 1. The document regex. It recognizes course material by its URL shape:
//      /courses/cs4410/2016fa/exams/prelim1.pdf
//               ^^^^^^ ^^^^^^ ^^^^^^^^^^^^^^^^^
//               course  year   name with a keyword and an extension
//                     + semester
//    The keyword alternation comes from the command line.
//
// 2. The file regex. A link that points at a pdf/txt/doc/ppt file but did not
//    match (1) is not worth downloading to look for more links.
//
// Everything else is followed only if it stays on the allowed host and under
// the path prefix (/courses/ by default).
// =============================================================================

use crate::config::{ScrapeConfig, Semester};
use crate::documents::Document;
use anyhow::{Context, Result};
use regex::Regex;
use url::Url;

const FILE_PATTERN: &str = r"(?i)\.(pdf|txt|docx?|pptx?)$";

// The outcome of classifying one link
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkClass {
    /// Matches the naming convention: record it
    Document(Document),
    /// A page on the course site worth crawling
    Follow,
    /// A file, or a page outside the crawl boundary
    Ignore,
}

#[derive(Debug, Clone)]
pub struct LinkClassifier {
    document_regex: Regex,
    file_regex: Regex,
    allowed_host: String,
    path_prefix: String,
}

impl LinkClassifier {
    // Builds the classifier for a run. Fails if the keywords are not a valid regex.
    pub fn new(config: &ScrapeConfig) -> Result<Self> {
        let document_regex = Regex::new(&document_pattern(config))
            .with_context(|| format!("invalid keyword pattern '{}'", config.keywords))?;
        let file_regex = Regex::new(FILE_PATTERN).context("invalid file pattern")?;

        Ok(Self {
            document_regex,
            file_regex,
            allowed_host: config.allowed_host().to_string(),
            path_prefix: config.path_prefix.clone(),
        })
    }

    pub fn classify(&self, url: &Url) -> LinkClass {
        if let Some(document) = self.match_document(url) {
            return LinkClass::Document(document);
        }

        if self.is_file(url) {
            return LinkClass::Ignore;
        }

        if self.is_followable(url) {
            LinkClass::Follow
        } else {
            LinkClass::Ignore
        }
    }

    // Applies the document regex and builds a record from its captures
    pub fn match_document(&self, url: &Url) -> Option<Document> {
        let caps = self.document_regex.captures(url.as_str())?;

        let year = caps.name("year")?.as_str().parse().ok()?;
        let semester: Semester = caps.name("semester")?.as_str().parse().ok()?;

        Some(Document {
            url: url.to_string(),
            year,
            semester,
            name: caps.name("name")?.as_str().to_string(),
            category: caps.name("category")?.as_str().to_string(),
            extension: caps.name("extension")?.as_str().to_string(),
        })
    }

    pub fn is_file(&self, url: &Url) -> bool {
        self.file_regex.is_match(url.path())
    }

    // Same host, http(s), and under the path prefix
    pub fn is_followable(&self, url: &Url) -> bool {
        matches!(url.scheme(), "http" | "https")
            && url.host_str() == Some(self.allowed_host.as_str())
            && url.path().starts_with(&self.path_prefix)
    }
}

// Named groups keep the fields stable even when the keywords contain groups
fn document_pattern(config: &ScrapeConfig) -> String {
    let semesters = config
        .semesters
        .iter()
        .map(|s| s.code())
        .collect::<Vec<_>>()
        .join("|");

    format!(
        r"(?i)/courses/{subject}\d{{3,4}}/(?P<year>\d{{4}})(?P<semester>{semesters})/(?P<name>.*(?P<category>{keywords}).*\.(?P<extension>.*))",
        subject = regex::escape(&config.subject),
        semesters = semesters,
        keywords = config.keywords,
    )
}

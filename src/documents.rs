// src/documents.rs
// =============================================================================
// The result map: every candidate document found during a run, grouped by
// filename.
//
// Several offerings of a course often publish the same file name
// (prelim1.pdf, final_sol.pdf, ...). Grouping by that name shows at a glance
// how many versions of each document exist and where they live.
//
// IndexMap keeps buckets in the order their first document was found, and
// each bucket keeps its URLs in discovery order.
// =============================================================================

use crate::config::Semester;
use indexmap::IndexMap;
use serde::Serialize;

// A link that matched the document naming convention
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    /// Absolute URL of the document
    pub url: String,
    /// Year from the course directory (e.g. 2016 in .../2016fa/...)
    pub year: u16,
    /// Semester from the course directory
    pub semester: Semester,
    /// Path below the semester directory (e.g. "exams/prelim1.pdf")
    pub name: String,
    /// Keyword that matched (prelim, final, sol, ...)
    pub category: String,
    /// Everything after the last dot (pdf, doc, ...)
    pub extension: String,
}

impl Document {
    // Name used to group documents: the final segment of the URL
    pub fn filename(&self) -> &str {
        filename_of(&self.url)
    }
}

// Returns the text after the last '/' of a URL
pub fn filename_of(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}

#[derive(Debug, Default, Serialize)]
#[serde(transparent)]
pub struct DocumentIndex {
    buckets: IndexMap<String, Vec<Document>>,
}

impl DocumentIndex {
    pub fn new() -> Self {
        Self::default()
    }

    // Adds a document to its filename bucket.
    // Returns false if that exact URL was already recorded.
    pub fn insert(&mut self, document: Document) -> bool {
        let bucket = self
            .buckets
            .entry(document.filename().to_string())
            .or_default();

        if bucket.iter().any(|existing| existing.url == document.url) {
            return false;
        }

        bucket.push(document);
        true
    }

    /// Number of unique filenames
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Number of URLs across all buckets
    pub fn total_links(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    #[cfg(test)]
    pub fn get(&self, filename: &str) -> Option<&[Document]> {
        self.buckets.get(filename).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Document])> {
        self.buckets
            .iter()
            .map(|(name, docs)| (name.as_str(), docs.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(url: &str, year: u16) -> Document {
        Document {
            url: url.to_string(),
            year,
            semester: Semester::Fall,
            name: filename_of(url).to_string(),
            category: "prelim".to_string(),
            extension: "pdf".to_string(),
        }
    }

    #[test]
    fn test_filename_of() {
        assert_eq!(
            filename_of("http://x.edu/courses/cs4410/2016fa/exams/prelim1.pdf"),
            "prelim1.pdf"
        );
        assert_eq!(filename_of("no-slash"), "no-slash");
        assert_eq!(filename_of("http://x.edu/dir/"), "");
    }

    #[test]
    fn test_groups_same_filename() {
        let mut index = DocumentIndex::new();
        assert!(index.insert(doc("http://x.edu/courses/cs4410/2016fa/prelim1.pdf", 2016)));
        assert!(index.insert(doc("http://x.edu/courses/cs4410/2015fa/prelim1.pdf", 2015)));
        assert!(index.insert(doc("http://x.edu/courses/cs4410/2015fa/final.pdf", 2015)));

        assert_eq!(index.len(), 2);
        assert_eq!(index.total_links(), 3);

        let bucket = index.get("prelim1.pdf").unwrap();
        assert_eq!(bucket.len(), 2);
        // discovery order within a bucket
        assert_eq!(bucket[0].year, 2016);
        assert_eq!(bucket[1].year, 2015);
    }

    #[test]
    fn test_bucket_order_is_first_discovery() {
        let mut index = DocumentIndex::new();
        index.insert(doc("http://x.edu/b/final.pdf", 2016));
        index.insert(doc("http://x.edu/a/prelim1.pdf", 2016));
        index.insert(doc("http://x.edu/c/final.pdf", 2016));

        let names: Vec<&str> = index.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["final.pdf", "prelim1.pdf"]);
    }

    #[test]
    fn test_duplicate_url_rejected() {
        let mut index = DocumentIndex::new();
        assert!(index.insert(doc("http://x.edu/a/final.pdf", 2016)));
        assert!(!index.insert(doc("http://x.edu/a/final.pdf", 2016)));
        assert_eq!(index.total_links(), 1);
    }

    #[test]
    fn test_serializes_as_map() {
        let mut index = DocumentIndex::new();
        index.insert(doc("http://x.edu/a/final.pdf", 2016));
        let json = serde_json::to_value(&index).unwrap();
        assert_eq!(json["final.pdf"][0]["semester"], "fa");
        assert_eq!(json["final.pdf"][0]["year"], 2016);
    }
}

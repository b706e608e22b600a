// src/report.rs
// =============================================================================
// Everything the user sees on stdout.
//
// Two output modes:
// - Console (default): progress lines while crawling, then the grouped report
// - JSON (--json): a single pretty-printed object at the end, nothing else
//
// The functions here build Strings instead of printing directly, which keeps
// them easy to test. main.rs does the printing.
// =============================================================================

use crate::config::{CrawlTarget, ScrapeConfig};
use crate::crawl::{CrawlEvent, CrawlStats};
use crate::documents::DocumentIndex;
use anyhow::Result;
use serde::Serialize;

const STAR_LINE: &str = "***************************************************************";
pub const SEPARATOR: &str = "===============================================================";
const CANDIDATE_LINE: &str = "======================";

// Printed once before the first crawl target
pub fn banner(config: &ScrapeConfig) -> String {
    format!(
        "{stars}\n\nSearching for documents for {course} from {start} to {end}...\n\n{stars}",
        stars = STAR_LINE,
        course = config.course_label(),
        start = config.start_year,
        end = config.end_year,
    )
}

// Printed before each crawl target
pub fn target_header(config: &ScrapeConfig, target: &CrawlTarget) -> String {
    format!(
        "\nNow searching for {} documents from {} of {}",
        config.course_label(),
        target.semester.season(),
        target.year
    )
}

// Progress line for one crawler event.
// Discovered links are only shown in verbose mode.
pub fn format_event(event: &CrawlEvent<'_>, verbose: bool) -> Option<String> {
    match event {
        CrawlEvent::Visiting(url) => Some(format!("[Visiting] {}", url)),
        CrawlEvent::Candidate(document) => Some(format!("{}\n{}", CANDIDATE_LINE, document.name)),
        CrawlEvent::Discovered(url) if verbose => Some(format!("\t[Discovered] {}", url)),
        CrawlEvent::Discovered(_) => None,
        CrawlEvent::FetchFailed { url, reason } => {
            Some(format!("[Failed] {} ({})", url, reason))
        }
    }
}

// The final report: every unique filename followed by the URLs sharing it
pub fn summary(index: &DocumentIndex) -> String {
    let mut out = format!(
        "\nFound {} (unique) documents at these locations: \n\n",
        index.len()
    );

    for (filename, documents) in index.iter() {
        out.push_str(&format!("[{}]", filename));
        for document in documents {
            out.push_str(&format!("\n\t{}\n", document.url));
        }
        out.push('\n');
    }

    out
}

#[derive(Serialize)]
struct JsonReport<'a> {
    course: String,
    start_year: u16,
    end_year: u16,
    keywords: &'a str,
    pages_visited: usize,
    unique_documents: usize,
    document_links: usize,
    documents: &'a DocumentIndex,
}

pub fn json_report(
    config: &ScrapeConfig,
    index: &DocumentIndex,
    stats: &CrawlStats,
) -> Result<String> {
    let report = JsonReport {
        course: config.course_label(),
        start_year: config.start_year,
        end_year: config.end_year,
        keywords: &config.keywords,
        pages_visited: stats.pages_fetched,
        unique_documents: index.len(),
        document_links: index.total_links(),
        documents: index,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Semester;
    use crate::documents::Document;
    use url::Url;

    fn doc(url: &str, name: &str) -> Document {
        Document {
            url: url.to_string(),
            year: 2016,
            semester: Semester::Fall,
            name: name.to_string(),
            category: "prelim".to_string(),
            extension: "pdf".to_string(),
        }
    }

    fn sample_index() -> DocumentIndex {
        let mut index = DocumentIndex::new();
        index.insert(doc("http://x.edu/courses/cs4410/2016fa/prelim1.pdf", "prelim1.pdf"));
        index.insert(doc("http://x.edu/courses/cs4410/2015fa/prelim1.pdf", "prelim1.pdf"));
        index.insert(doc("http://x.edu/courses/cs4410/2016fa/final.pdf", "final.pdf"));
        index
    }

    #[test]
    fn test_banner_names_course_and_years() {
        let config = ScrapeConfig::new("4410", 2015, 2016).unwrap();
        let text = banner(&config);
        assert!(text.contains("Searching for documents for cs4410 from 2015 to 2016..."));
        assert!(text.starts_with(STAR_LINE));
    }

    #[test]
    fn test_target_header_uses_season() {
        let config = ScrapeConfig::new("4410", 2016, 2016).unwrap();
        let target = &config.targets().unwrap()[1];
        assert_eq!(
            target_header(&config, target),
            "\nNow searching for cs4410 documents from spring of 2016"
        );
    }

    #[test]
    fn test_discovered_hidden_unless_verbose() {
        let url = Url::parse("http://x.edu/courses/").unwrap();
        let event = CrawlEvent::Discovered(&url);
        assert_eq!(format_event(&event, false), None);
        assert_eq!(
            format_event(&event, true),
            Some("\t[Discovered] http://x.edu/courses/".to_string())
        );
    }

    #[test]
    fn test_candidate_line() {
        let document = doc("http://x.edu/courses/cs4410/2016fa/exams/final.pdf", "exams/final.pdf");
        let line = format_event(&CrawlEvent::Candidate(&document), false).unwrap();
        assert_eq!(line, "======================\nexams/final.pdf");
    }

    #[test]
    fn test_summary_groups_by_filename() {
        let text = summary(&sample_index());
        assert_eq!(
            text,
            "\nFound 2 (unique) documents at these locations: \n\n\
             [prelim1.pdf]\n\thttp://x.edu/courses/cs4410/2016fa/prelim1.pdf\n\
             \n\thttp://x.edu/courses/cs4410/2015fa/prelim1.pdf\n\n\
             [final.pdf]\n\thttp://x.edu/courses/cs4410/2016fa/final.pdf\n\n"
        );
    }

    #[test]
    fn test_summary_empty() {
        let text = summary(&DocumentIndex::new());
        assert!(text.contains("Found 0 (unique) documents"));
    }

    #[test]
    fn test_json_report_shape() {
        let config = ScrapeConfig::new("4410", 2015, 2016).unwrap();
        let stats = CrawlStats {
            pages_fetched: 7,
            links_discovered: 40,
            documents_found: 3,
        };
        let json = json_report(&config, &sample_index(), &stats).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["course"], "cs4410");
        assert_eq!(value["pages_visited"], 7);
        assert_eq!(value["unique_documents"], 2);
        assert_eq!(value["document_links"], 3);
        assert_eq!(value["documents"]["prelim1.pdf"].as_array().unwrap().len(), 2);
    }
}

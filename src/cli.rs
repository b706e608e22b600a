// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// The positional arguments follow the classic invocation:
//   course-scraper <course> <start year> <end year> [keywords] [v]
// e.g.
//   course-scraper 312 1999 2002 "prelim\d*|final|sol|midterm|sample|review|exam|answer"
//
// Everything else is an optional flag with a sensible default for the
// Cornell CS course pages.
// =============================================================================

use crate::config::{self, ScrapeConfig, Semester};
use anyhow::Result;
use clap::Parser;
use std::time::Duration;
use url::Url;

#[derive(Parser, Debug)]
#[command(
    name = "course-scraper",
    version,
    about = "Crawls course websites for past exams, solutions and homework",
    long_about = "course-scraper walks the course pages of every fall and spring semester \
                  between two years and lists links whose names look like exams, \
                  solutions or homework, grouped by file name.",
    after_help = "Keywords: a regex matched against file names, default is \
                  \"prelim\\d*|final|sol|midterm|sample|review|exam|answer\""
)]
pub struct Cli {
    /// Course number (e.g. 4410 for cs4410)
    pub course: String,

    /// First year to search
    pub start_year: u16,

    /// Last year to search (inclusive)
    pub end_year: u16,

    /// Regex of keywords a document name must contain
    pub keywords: Option<String>,

    /// Pass `v` to print every discovered link (same as --verbose)
    #[arg(value_parser = ["v"])]
    pub mode: Option<String>,

    /// Print every discovered link, and debug logs
    #[arg(short, long)]
    pub verbose: bool,

    /// Output the final report as JSON instead of text
    #[arg(long)]
    pub json: bool,

    /// Subject prefix of the course directory
    #[arg(long, default_value = config::DEFAULT_SUBJECT)]
    pub subject: String,

    /// Site to crawl; only this host is ever fetched
    #[arg(long, default_value = config::DEFAULT_BASE_URL)]
    pub base_url: Url,

    /// Only pages whose path starts with this prefix are followed
    #[arg(long, default_value = config::DEFAULT_PATH_PREFIX)]
    pub path_prefix: String,

    /// Semesters to search each year, in order (fa, sp, su)
    #[arg(long, value_delimiter = ',', default_value = "fa,sp")]
    pub semesters: Vec<Semester>,

    /// Maximum crawl depth from each semester page (1 = just that page)
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Pages fetched at the same time
    #[arg(long, default_value_t = config::DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Delay before each request, in milliseconds
    #[arg(long, default_value_t = config::DEFAULT_DELAY_MS)]
    pub delay_ms: u64,

    /// Request timeout in seconds
    #[arg(long, default_value_t = config::DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,
}

impl Cli {
    pub fn is_verbose(&self) -> bool {
        self.verbose || self.mode.is_some()
    }

    // Converts the parsed arguments into a validated ScrapeConfig
    pub fn into_config(self) -> Result<ScrapeConfig> {
        let verbose = self.is_verbose();
        let mut config = ScrapeConfig::new(&self.course, self.start_year, self.end_year)?;

        if let Some(keywords) = self.keywords {
            config.keywords = keywords;
        }
        config.subject = self.subject;
        config.base_url = self.base_url;
        config.path_prefix = self.path_prefix;
        config.semesters = self.semesters;
        config.max_depth = self.max_depth;
        config.concurrency = self.concurrency;
        config.delay = Duration::from_millis(self.delay_ms);
        config.timeout = Duration::from_secs(self.timeout_secs);
        config.verbose = verbose;
        config.json = self.json;

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["course-scraper"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_required_positionals_only() {
        let cli = parse(&["4410", "2015", "2016"]);
        assert_eq!(cli.course, "4410");
        assert_eq!(cli.start_year, 2015);
        assert_eq!(cli.end_year, 2016);
        assert!(cli.keywords.is_none());
        assert!(!cli.is_verbose());

        let config = cli.into_config().unwrap();
        assert_eq!(config.keywords, config::DEFAULT_KEYWORDS);
        assert_eq!(config.semesters, vec![Semester::Fall, Semester::Spring]);
        assert_eq!(config.base_url.as_str(), "http://www.cs.cornell.edu/");
    }

    #[test]
    fn test_keywords_and_trailing_v() {
        let cli = parse(&["312", "1999", "2002", "final|prelim", "v"]);
        assert_eq!(cli.keywords.as_deref(), Some("final|prelim"));
        assert!(cli.is_verbose());

        // the keywords are kept even in verbose mode
        let config = cli.into_config().unwrap();
        assert_eq!(config.keywords, "final|prelim");
        assert!(config.verbose);
    }

    #[test]
    fn test_trailing_mode_must_be_v() {
        let result = Cli::try_parse_from(["course-scraper", "312", "1999", "2002", "final", "x"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_end_year_is_error() {
        let result = Cli::try_parse_from(["course-scraper", "312", "1999"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_non_numeric_year_is_error() {
        let result = Cli::try_parse_from(["course-scraper", "312", "nineteen", "2002"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_flags() {
        let cli = parse(&[
            "4410",
            "2016",
            "2016",
            "--json",
            "--semesters",
            "sp,su",
            "--max-depth",
            "3",
            "--base-url",
            "http://127.0.0.1:9000",
            "--delay-ms",
            "0",
        ]);
        let config = cli.into_config().unwrap();
        assert!(config.json);
        assert_eq!(config.semesters, vec![Semester::Spring, Semester::Summer]);
        assert_eq!(config.max_depth, Some(3));
        assert_eq!(config.allowed_host(), "127.0.0.1");
        assert!(config.delay.is_zero());
    }

    #[test]
    fn test_reversed_years_fail_validation() {
        let cli = parse(&["4410", "2017", "2016"]);
        assert!(cli.into_config().is_err());
    }

    #[test]
    fn test_help_flag() {
        let err = Cli::try_parse_from(["course-scraper", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }
}

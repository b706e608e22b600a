// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap and validate them
// 2. Set up logging (stderr, controlled by RUST_LOG)
// 3. Crawl every (year, semester) course page in turn
// 4. Print the documents found, grouped by file name
// 5. Exit with proper code (0 = success, 2 = error)
// =============================================================================

mod classify;  // src/classify/ - link extraction and classification
mod cli;       // src/cli.rs - command-line parsing
mod config;    // src/config.rs - run settings and crawl targets
mod crawl;     // src/crawl/ - breadth-first course site crawler
mod documents; // src/documents.rs - documents grouped by file name
mod report;    // src/report.rs - console and JSON output

use anyhow::Result;
use clap::Parser;
use classify::LinkClassifier;
use cli::Cli;
use config::ScrapeConfig;
use crawl::{CrawlStats, Crawler};
use documents::DocumentIndex;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // clap prints usage and exits on its own for malformed arguments
    let cli = Cli::parse();
    init_tracing(cli.is_verbose());

    let exit_code = match run(cli).await {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            eprintln!("Run with --help for usage.");
            2
        }
    };

    std::process::exit(exit_code);
}

// Logs go to stderr so they never mix with the report on stdout.
// RUST_LOG takes priority over the verbose flag.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let config = cli.into_config()?;
    debug!(?config, "configuration loaded");

    let classifier = LinkClassifier::new(&config)?;
    let mut crawler = Crawler::new(&config, classifier)?;
    let mut index = DocumentIndex::new();
    let mut totals = CrawlStats::default();

    // Progress output is suppressed in JSON mode
    let console = !config.json;
    let verbose = config.verbose;

    if console {
        println!("{}", report::banner(&config));
    }

    for target in config.targets()? {
        info!(year = target.year, semester = %target.semester, url = %target.url, "crawling target");
        if console {
            println!("{}", report::target_header(&config, &target));
        }

        let stats = crawler
            .crawl(&target.url, &mut index, |event| {
                if console {
                    if let Some(line) = report::format_event(&event, verbose) {
                        println!("{}", line);
                    }
                }
            })
            .await?;
        totals += stats;

        if console {
            println!("{}", report::SEPARATOR);
        }
    }

    info!(
        pages = totals.pages_fetched,
        links = totals.links_discovered,
        documents = index.len(),
        "search finished"
    );
    if index.is_empty() {
        info!(keywords = %config.keywords, "no documents matched");
    }

    print_results(&config, &index, &totals)
}

fn print_results(config: &ScrapeConfig, index: &DocumentIndex, totals: &CrawlStats) -> Result<()> {
    if config.json {
        println!("{}", report::json_report(config, index, totals)?);
    } else {
        print!("{}", report::summary(index));
    }
    Ok(())
}

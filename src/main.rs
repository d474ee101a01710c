use clap::Parser;
use course_scrape::{CrawlOutput, Scrape, ScrapeError};
use std::path::Path;
use std::process::ExitCode;

mod args;
use args::{Args, parse_excluded_links};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    env_logger::init();

    // Parse command-line arguments
    let args = Args::parse();

    ::log::info!(
        "Starting scrape for {:?} in category {:?}",
        args.search_term,
        args.category
    );
    println!("Note: Scraping requires a WebDriver server (e.g., ChromeDriver).");
    println!(
        "Set WEBDRIVER_URL environment variable if not using the default http://localhost:4444"
    );

    let scrape = match build(&args) {
        Ok(scrape) => scrape,
        Err(e) => {
            ::log::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let start_time = std::time::Instant::now();
    let (output, failure) = match scrape.run().await {
        Ok(output) => (output, None),
        Err(ScrapeError::Aborted { source, partial }) => (*partial, Some(*source)),
        Err(e) => {
            ::log::error!("Scrape failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    ::log::info!(
        "Scraped {} courses and {} reviews in {:.2} seconds",
        output.courses.len(),
        output.reviews.len(),
        start_time.elapsed().as_secs_f64()
    );

    if let Err(e) = write_output(&args.output, &output) {
        ::log::error!("Failed to write {}: {}", args.output.display(), e);
        return ExitCode::FAILURE;
    }
    ::log::info!("Wrote results to {}", args.output.display());

    match failure {
        Some(e) => {
            ::log::error!(
                "Scrape aborted: {}. Exclude the `visited` links from {} to resume.",
                e,
                args.output.display()
            );
            ExitCode::FAILURE
        }
        None => ExitCode::SUCCESS,
    }
}

fn build(args: &Args) -> Result<Scrape, Box<dyn std::error::Error>> {
    let mut scrape = Scrape::new(&args.search_term, &args.category);
    if let Some(path) = &args.config {
        scrape = scrape.with_config_file(path)?;
    }
    if let Some(url) = &args.webdriver_url {
        scrape = scrape.with_webdriver_url(url);
    }
    if args.headed {
        scrape = scrape.headless(false);
    }
    if let Some(path) = &args.exclude {
        let links = parse_excluded_links(&std::fs::read_to_string(path)?);
        ::log::info!("Excluding {} links from {}", links.len(), path.display());
        scrape = scrape.with_excluded_links(links);
    }
    Ok(scrape)
}

fn write_output(path: &Path, output: &CrawlOutput) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string_pretty(output)?;
    std::fs::write(path, json)?;
    Ok(())
}

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "course-scrape")]
#[command(about = "Scrapes course details and reviews from Udemy search results")]
#[command(version)]
pub struct Args {
    /// Search query to submit
    #[arg(default_value = "python machine learning")]
    pub search_term: String,

    /// Topic filter to narrow the results to, as the site labels it
    #[arg(short, long, default_value = "Machine Learning")]
    pub category: String,

    /// File of course links to skip, one per line (`#` starts a comment)
    #[arg(short, long)]
    pub exclude: Option<PathBuf>,

    /// JSON configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// URL for the WebDriver instance (overrides the config file)
    #[arg(long)]
    pub webdriver_url: Option<String>,

    /// Show the browser window
    #[arg(long)]
    pub headed: bool,

    /// Where to write the scraped courses and reviews
    #[arg(short, long, default_value = "scrape.json")]
    pub output: PathBuf,
}

/// Links listed in an exclude file; blank lines and `#` comments are skipped
pub fn parse_excluded_links(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(|line| line.split('#').next().unwrap_or_default().trim())
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

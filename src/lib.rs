// Re-export modules
pub mod client;
pub mod config;
pub mod crawlers;
pub mod error;
pub mod filter;
pub mod layouts;
pub mod parsers;
pub mod results;
pub mod retry;

// Re-export commonly used types for convenience
pub use client::{ClientError, PageClient, SnapshotClient, WebDriverClient};
pub use config::{EligibilityPolicy, ScraperConfig};
pub use crawlers::{crawl, crawl_with_layouts};
pub use error::ScrapeError;
pub use results::{CourseRecord, CrawlOutput, Instructors, ReviewRecord, SearchRequest};

/// Main builder for a course crawl
#[derive(Debug, Clone)]
pub struct Scrape {
    request: SearchRequest,
    config: ScraperConfig,
    /// Set by `with_webdriver_url`; such a URL is not overridden from the environment
    webdriver_url_pinned: bool,
}

impl Scrape {
    /// Create a new crawl for `search_term`, narrowed to `filter_category`
    pub fn new(search_term: impl Into<String>, filter_category: impl Into<String>) -> Self {
        Self {
            request: SearchRequest::new(search_term, filter_category),
            config: ScraperConfig::default(),
            webdriver_url_pinned: false,
        }
    }

    /// Skip these course links, e.g. the `visited` list of an earlier run
    pub fn with_excluded_links<I, S>(mut self, links: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.request = self.request.with_excluded_links(links);
        self
    }

    /// Set the configuration
    pub fn with_config(mut self, config: ScraperConfig) -> Self {
        self.config = config;
        self.webdriver_url_pinned = false;
        self
    }

    /// Load configuration from a file
    pub fn with_config_file(self, path: impl AsRef<std::path::Path>) -> Result<Self, ScrapeError> {
        let config = ScraperConfig::from_file(path)?;
        Ok(self.with_config(config))
    }

    /// Load configuration from a string
    pub fn with_config_str(self, config_str: &str) -> Result<Self, ScrapeError> {
        let config = ScraperConfig::from_json(config_str)?;
        Ok(self.with_config(config))
    }

    /// Use this WebDriver URL, even when `WEBDRIVER_URL` is set
    pub fn with_webdriver_url(mut self, webdriver_url: impl Into<String>) -> Self {
        self.config.webdriver_url = webdriver_url.into();
        self.webdriver_url_pinned = true;
        self
    }

    pub fn headless(mut self, headless: bool) -> Self {
        self.config.headless = headless;
        self
    }

    pub fn request(&self) -> &SearchRequest {
        &self.request
    }

    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    /// Connect to WebDriver, run the crawl and close the browser session.
    ///
    /// Input is validated before a browser is started.
    pub async fn run(self) -> Result<CrawlOutput, ScrapeError> {
        self.request.validate()?;

        let config = self.session_config();
        ::log::info!("Connecting to WebDriver at {}", config.webdriver_url);
        let client = WebDriverClient::connect(&config.webdriver_url, config.headless).await?;

        let result = crawl(&client, &self.request, &config).await;
        if let Err(e) = client.close().await {
            ::log::warn!("Failed to close the browser session: {}", e);
        }
        result
    }

    /// The configuration `run` connects with
    fn session_config(&self) -> ScraperConfig {
        if self.webdriver_url_pinned {
            self.config.clone()
        } else {
            // Override the WebDriver URL with an environment variable if provided
            self.config.clone().with_env_overrides()
        }
    }

    /// Run the crawl on an already connected client, leaving it open
    pub async fn run_with<C: PageClient>(&self, client: &C) -> Result<CrawlOutput, ScrapeError> {
        crawl(client, &self.request, &self.config).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_sets_options() {
        let scrape = Scrape::new("rust", "Programming Languages")
            .with_excluded_links(["https://www.udemy.com/course/a/"])
            .with_webdriver_url("http://localhost:9515")
            .headless(false);

        assert_eq!(scrape.request().search_term, "rust");
        assert_eq!(scrape.request().excluded_links.len(), 1);
        assert_eq!(scrape.config().webdriver_url, "http://localhost:9515");
        assert!(!scrape.config().headless);
    }

    #[test]
    fn test_explicit_webdriver_url_wins_over_environment() {
        let scrape = Scrape::new("rust", "Programming Languages")
            .with_webdriver_url("http://localhost:9515");
        assert_eq!(scrape.session_config().webdriver_url, "http://localhost:9515");
    }

    #[test]
    fn test_config_str_replaces_defaults() {
        let scrape = Scrape::new("rust", "Programming Languages")
            .with_config_str(r#"{"eligibility": {"min_reviews": 10}}"#)
            .unwrap();
        assert_eq!(scrape.config().eligibility.min_reviews, 10);
        assert_eq!(scrape.config().eligibility.min_enrollment, 500);
    }

    #[tokio::test]
    async fn test_run_rejects_blank_term_without_a_browser() {
        let err = Scrape::new("", "Machine Learning").run().await.unwrap_err();
        assert!(matches!(err, ScrapeError::Validation(_)));
    }

    #[tokio::test]
    async fn test_run_with_snapshot_client() {
        let client = SnapshotClient::new();
        let err = Scrape::new("rust", "Programming Languages")
            .run_with(&client)
            .await
            .unwrap_err();
        // Nothing saved for the search page
        assert!(matches!(err, ScrapeError::Client(ClientError::Navigation { .. })));
    }
}

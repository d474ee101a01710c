use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Duration;

/// Errors loading a configuration file
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration for a scrape run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    /// Site root, e.g. `https://www.udemy.com`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path of the search results page, relative to `base_url`
    #[serde(default = "default_search_path")]
    pub search_path: String,

    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Run the browser without a window
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// Thresholds a course must meet before it is extracted
    #[serde(default)]
    pub eligibility: EligibilityPolicy,

    /// Bounded wait for pages and panels to render
    #[serde(default = "default_wait_timeout_ms")]
    pub wait_timeout_ms: u64,

    /// Bounded wait for optional expand toggles
    #[serde(default = "default_toggle_timeout_ms")]
    pub toggle_timeout_ms: u64,

    /// Pause after a filter click so results can re-render
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,

    /// Retry policy for stale element reads and clicks
    #[serde(default)]
    pub retry: RetryConfig,

    /// How many times to press "show more reviews"
    #[serde(default = "default_review_expand_attempts")]
    pub review_expand_attempts: usize,
}

/// The eligibility gate: a course is extracted only when it meets all three.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityPolicy {
    #[serde(default = "default_min_enrollment")]
    pub min_enrollment: u64,

    #[serde(default = "default_min_reviews")]
    pub min_reviews: u64,

    /// Declared course language, also used for the search language filter
    #[serde(default = "default_language")]
    pub language: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,

    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,
}

fn default_base_url() -> String {
    "https://www.udemy.com".to_string()
}

fn default_search_path() -> String {
    "/courses/search/".to_string()
}

/// Default value for webdriver_url
fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_headless() -> bool {
    true
}

fn default_wait_timeout_ms() -> u64 {
    5000
}

fn default_toggle_timeout_ms() -> u64 {
    3000
}

fn default_settle_delay_ms() -> u64 {
    1000
}

fn default_review_expand_attempts() -> usize {
    5
}

fn default_min_enrollment() -> u64 {
    500
}

fn default_min_reviews() -> u64 {
    50
}

fn default_language() -> String {
    "English".to_string()
}

fn default_max_attempts() -> usize {
    3
}

fn default_backoff_ms() -> u64 {
    1000
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            search_path: default_search_path(),
            webdriver_url: default_webdriver_url(),
            headless: default_headless(),
            eligibility: EligibilityPolicy::default(),
            wait_timeout_ms: default_wait_timeout_ms(),
            toggle_timeout_ms: default_toggle_timeout_ms(),
            settle_delay_ms: default_settle_delay_ms(),
            retry: RetryConfig::default(),
            review_expand_attempts: default_review_expand_attempts(),
        }
    }
}

impl Default for EligibilityPolicy {
    fn default() -> Self {
        Self {
            min_enrollment: default_min_enrollment(),
            min_reviews: default_min_reviews(),
            language: default_language(),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff_ms: default_backoff_ms(),
        }
    }
}

impl RetryConfig {
    pub fn backoff(&self) -> Duration {
        Duration::from_millis(self.backoff_ms)
    }
}

impl ScraperConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Override the WebDriver URL from `WEBDRIVER_URL` when it is set
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(webdriver_url) = std::env::var("WEBDRIVER_URL") {
            if !webdriver_url.is_empty() {
                self.webdriver_url = webdriver_url;
            }
        }
        self
    }

    pub fn wait_timeout(&self) -> Duration {
        Duration::from_millis(self.wait_timeout_ms)
    }

    pub fn toggle_timeout(&self) -> Duration {
        Duration::from_millis(self.toggle_timeout_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

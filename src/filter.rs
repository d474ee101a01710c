use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

/// Configuration for deciding which listing links are course pages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkFilterConfig {
    /// Only links on this host are kept (if None, any host)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_domain: Option<String>,

    /// Regex patterns a link must match (if empty, every link is included unless excluded)
    #[serde(default)]
    pub include_patterns: Vec<String>,

    /// Regex patterns for links to drop (these take precedence over include patterns)
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
}

impl Default for LinkFilterConfig {
    fn default() -> Self {
        Self {
            required_domain: None,
            include_patterns: vec![r"/course/[^/]+/?$".to_string()],
            exclude_patterns: vec![
                // Draft previews and the bundle landing pages share the course path
                r"/course/draft/".to_string(),
                r"/course/subscribe/".to_string(),
            ],
        }
    }
}

/// Keeps course links and puts them in a canonical form, so the same course
/// reached with different tracking parameters is visited once
#[derive(Debug)]
pub struct LinkFilter {
    config: LinkFilterConfig,
    include_regexes: Vec<Regex>,
    exclude_regexes: Vec<Regex>,
}

impl LinkFilter {
    /// Create a new link filter from configuration
    pub fn new(config: LinkFilterConfig) -> Result<Self, regex::Error> {
        let mut include_regexes = Vec::with_capacity(config.include_patterns.len());
        for pattern in &config.include_patterns {
            include_regexes.push(Regex::new(pattern)?);
        }

        let mut exclude_regexes = Vec::with_capacity(config.exclude_patterns.len());
        for pattern in &config.exclude_patterns {
            exclude_regexes.push(Regex::new(pattern)?);
        }

        Ok(Self {
            config,
            include_regexes,
            exclude_regexes,
        })
    }

    /// The default course-link rules restricted to the host of `base_url`
    pub fn for_site(base_url: &str) -> Result<Self, url::ParseError> {
        let base = Url::parse(base_url)?;
        let config = LinkFilterConfig {
            required_domain: base.domain().map(|d| d.to_string()),
            ..LinkFilterConfig::default()
        };
        Ok(Self::new(config).expect("Default regex patterns should be valid"))
    }

    /// Determine if a link points at a course page
    pub fn accepts(&self, url: &Url) -> bool {
        if !self.is_in_domain_scope(url) {
            return false;
        }

        // Patterns look at the canonical form so query strings cannot sneak a match in
        let canonical = self.normalize_url(url);
        let url_str = canonical.as_str();
        if self.exclude_regexes.iter().any(|regex| regex.is_match(url_str)) {
            return false;
        }

        self.include_regexes.is_empty()
            || self.include_regexes.iter().any(|regex| regex.is_match(url_str))
    }

    fn is_in_domain_scope(&self, url: &Url) -> bool {
        match &self.config.required_domain {
            Some(required_domain) => url.domain() == Some(required_domain.as_str()),
            None => true,
        }
    }

    /// Drops the fragment and the query string
    pub fn normalize_url(&self, url: &Url) -> Url {
        let mut normalized = url.clone();
        normalized.set_fragment(None);
        normalized.set_query(None);
        normalized
    }

    /// [`normalize_url`](Self::normalize_url) for a link string; links that
    /// do not parse are kept verbatim
    pub fn normalize(&self, link: &str) -> String {
        match Url::parse(link) {
            Ok(url) => self.normalize_url(&url).to_string(),
            Err(_) => link.to_string(),
        }
    }

    /// Canonical form of `link` if it is a course page
    pub fn course_link(&self, link: &str) -> Option<String> {
        let url = Url::parse(link).ok()?;
        self.accepts(&url)
            .then(|| self.normalize_url(&url).to_string())
    }
}

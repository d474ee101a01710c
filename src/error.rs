use crate::client::ClientError;
use crate::config::ConfigError;
use crate::results::CrawlOutput;
use std::time::Duration;

/// Errors raised by a crawl run.
///
/// Variants split into two groups: those that abort the run (see
/// [`ScrapeError::is_fatal`]) and those that only cost the current course,
/// which the crawler logs and records as visited before moving on.
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    /// Bad caller input, raised before any navigation
    #[error("invalid input: {0}")]
    Validation(String),

    /// The requested filter option is not offered by the live filter UI
    #[error(
        "unable to filter by {group} `{requested}`; available options: {}",
        available.join(", ")
    )]
    CategoryNotFound {
        group: String,
        requested: String,
        available: Vec<String>,
    },

    /// A page or control never rendered within the bounded wait
    #[error("{what} did not appear within {timeout:?}; site unreachable or markup unrecognized")]
    NavigationTimeout { what: String, timeout: Duration },

    /// A listing page could not be read at all
    #[error("failed to read listing page {url}: {source}")]
    PageRead {
        url: String,
        #[source]
        source: ClientError,
    },

    /// A field the course page must carry is absent
    #[error("required field `{field}` missing on {link}")]
    RequiredFieldMissing { link: String, field: String },

    /// A field is present but its text cannot be parsed
    #[error("field `{field}` on {link} has unexpected value {value:?}")]
    MalformedField {
        link: String,
        field: String,
        value: String,
    },

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A fatal error after results started accumulating; `partial` holds
    /// everything collected up to the last completed link.
    #[error("crawl aborted: {source}")]
    Aborted {
        #[source]
        source: Box<ScrapeError>,
        partial: Box<CrawlOutput>,
    },
}

impl ScrapeError {
    /// Whether this error must stop the whole run rather than just the
    /// current course.
    pub fn is_fatal(&self) -> bool {
        match self {
            ScrapeError::RequiredFieldMissing { .. } | ScrapeError::MalformedField { .. } => false,
            ScrapeError::Client(e) => e.is_session_lost(),
            _ => true,
        }
    }

    /// The underlying error, looking through `Aborted`.
    pub fn root(&self) -> &ScrapeError {
        match self {
            ScrapeError::Aborted { source, .. } => source.root(),
            other => other,
        }
    }

    pub(crate) fn missing(link: &str, field: &str) -> Self {
        ScrapeError::RequiredFieldMissing {
            link: link.to_string(),
            field: field.to_string(),
        }
    }

    pub(crate) fn malformed(link: &str, field: &str, value: &str) -> Self {
        ScrapeError::MalformedField {
            link: link.to_string(),
            field: field.to_string(),
            value: value.to_string(),
        }
    }
}

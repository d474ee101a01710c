//! Deciding whether a course page is worth extracting.

use crate::client::{ClientError, PageClient};
use crate::config::{EligibilityPolicy, ScraperConfig};
use crate::crawlers::interact;
use crate::error::ScrapeError;
use crate::layouts::{CourseLayout, CourseSummary};
use std::fmt;

/// Why a course was skipped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    TooFewStudents { enrollment: u64, minimum: u64 },
    TooFewReviews { reviews: u64, minimum: u64 },
    Language { found: String, wanted: String },
    UnrecognizedLayout,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::TooFewStudents {
                enrollment,
                minimum,
            } => write!(f, "{enrollment} students, need {minimum}"),
            SkipReason::TooFewReviews { reviews, minimum } => {
                write!(f, "{reviews} reviews, need {minimum}")
            }
            SkipReason::Language { found, wanted } => write!(f, "taught in {found}, not {wanted}"),
            SkipReason::UnrecognizedLayout => f.write_str("unrecognized-layout"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Eligibility {
    /// `layout` indexes the layout list the page was checked against
    Eligible { layout: usize, summary: CourseSummary },
    Ineligible(SkipReason),
}

impl EligibilityPolicy {
    /// Applies the thresholds; the first failing one is reported
    pub fn evaluate(&self, summary: &CourseSummary) -> Result<(), SkipReason> {
        if summary.enrollment < self.min_enrollment {
            return Err(SkipReason::TooFewStudents {
                enrollment: summary.enrollment,
                minimum: self.min_enrollment,
            });
        }
        if summary.review_count < self.min_reviews {
            return Err(SkipReason::TooFewReviews {
                reviews: summary.review_count,
                minimum: self.min_reviews,
            });
        }
        if summary.language != self.language {
            return Err(SkipReason::Language {
                found: summary.language.clone(),
                wanted: self.language.clone(),
            });
        }
        Ok(())
    }
}

/// Figures out which layout the current course page uses and checks it
/// against the eligibility thresholds.
pub async fn check<C: PageClient>(
    client: &C,
    layouts: &[Box<dyn CourseLayout<C>>],
    link: &str,
    config: &ScraperConfig,
) -> Result<Eligibility, ScrapeError> {
    let enrollment = layouts
        .iter()
        .map(|layout| layout.selectors().enrollment)
        .collect::<Vec<_>>()
        .join(", ");

    match client.wait_for(&enrollment, config.wait_timeout()).await {
        Ok(_) => {}
        Err(ClientError::Timeout { .. }) => {
            ::log::debug!("No enrollment block on {}", link);
            return Ok(Eligibility::Ineligible(SkipReason::UnrecognizedLayout));
        }
        Err(e) => return Err(e.into()),
    }

    let Some(layout) = detect_layout(client, layouts, link).await? else {
        return Ok(Eligibility::Ineligible(SkipReason::UnrecognizedLayout));
    };

    let summary = layouts[layout].read_summary(client, link).await?;
    ::log::debug!(
        "{} ({} layout): {} students, {} reviews, {}",
        link,
        layouts[layout].name(),
        summary.enrollment,
        summary.review_count,
        summary.language
    );

    Ok(match config.eligibility.evaluate(&summary) {
        Ok(()) => Eligibility::Eligible { layout, summary },
        Err(reason) => Eligibility::Ineligible(reason),
    })
}

/// Index of the first layout whose rating block is on the page and reads
/// the way that layout writes it
async fn detect_layout<C: PageClient>(
    client: &C,
    layouts: &[Box<dyn CourseLayout<C>>],
    link: &str,
) -> Result<Option<usize>, ScrapeError> {
    let mut rating_seen = false;
    for (index, layout) in layouts.iter().enumerate() {
        let Some(rating) = interact::text_of(client, layout.selectors().rating).await? else {
            continue;
        };
        rating_seen = true;
        if layout.recognizes(&rating) {
            return Ok(Some(index));
        }
        ::log::trace!("Rating {:?} is not in the {} layout", rating, layout.name());
    }

    if rating_seen {
        Ok(None)
    } else {
        Err(ScrapeError::missing(link, "rating"))
    }
}

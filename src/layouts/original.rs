use super::{CourseLayout, LayoutSelectors};
use crate::client::PageClient;
use crate::config::ScraperConfig;
use crate::crawlers::interact;
use crate::error::ScrapeError;
use crate::parsers::counts;
use crate::retry::retry;
use async_trait::async_trait;

static SELECTORS: LayoutSelectors = LayoutSelectors {
    enrollment: "div[data-content-group*='Landing Page'] div[data-purpose='enrollment']",
    rating: "div[data-content-group*='Landing Page'] div.rate-count",
    language: "div[data-content-group*='Landing Page'] div.clp-lead__locale",
    title: "h1",
    topics_expand: "div.what-you-get button.js-simple-collapse-more-btn",
    topics: ".what-you-get__text",
    description_expand: "div[data-purpose*='course-description'] button.js-simple-collapse-more-btn",
    description: "div.description__title ~ * *",
    curriculum_toggles: &[
        "a[data-purpose='load-full-curriculum'], a[data-purpose='toggle-section']",
        "a.sections-toggle",
    ],
    lecture_titles: "div[data-purpose='course-curriculum'] div.title",
    lecture_durations: "div[data-purpose='course-curriculum'] div.details",
    price: "div[data-purpose='course-old-price-text'] s span",
    instructor: ".instructor--instructor--2qudS",
    instructor_name: ".instructor--title__link--1NJ6S",
    bio_expand: "button.instructor--view-more-wrapper__button--2egB6",
    bio: ".instructor--instructor--2qudS div[data-purpose='safely-set-inner-html:trusted-html:content'] p",
    instructor_stats: "span.instructor--instructor__stat-value--2Kwe1",
};

const LECTURE_COUNT: &str = "span.dib";
const TOTAL_DURATION: &str = "span.curriculum-header-length";

/// The first landing page markup: `4.6 (1,234 ratings)` on one line
#[derive(Debug, Clone, Copy, Default)]
pub struct OriginalLayout;

#[async_trait]
impl<C: PageClient> CourseLayout<C> for OriginalLayout {
    fn name(&self) -> &'static str {
        "original"
    }

    fn selectors(&self) -> &'static LayoutSelectors {
        &SELECTORS
    }

    fn recognizes(&self, rating_text: &str) -> bool {
        !rating_text.trim().contains('\n')
    }

    fn review_count_from(&self, rating_text: &str) -> Option<u64> {
        counts::parenthesized_count(rating_text)
    }

    async fn read_lecture_stats(
        &self,
        client: &C,
        link: &str,
        config: &ScraperConfig,
    ) -> Result<(String, String), ScrapeError> {
        let (count, duration) = retry(&config.retry, "reading lecture stats", || async move {
            let count = interact::text_of(client, LECTURE_COUNT).await?;
            let duration = interact::text_of(client, TOTAL_DURATION).await?;
            Ok((count, duration))
        })
        .await?;

        match (count, duration) {
            (Some(count), Some(duration)) => Ok((count, duration)),
            (None, _) => Err(ScrapeError::missing(link, "lecture count")),
            (_, None) => Err(ScrapeError::missing(link, "total duration")),
        }
    }
}

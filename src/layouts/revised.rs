use super::{CourseLayout, LayoutSelectors, required_text};
use crate::client::PageClient;
use crate::config::ScraperConfig;
use crate::error::ScrapeError;
use crate::parsers::{counts, text};
use async_trait::async_trait;

static SELECTORS: LayoutSelectors = LayoutSelectors {
    enrollment: "div.course-landing-page__main-content div[data-purpose='enrollment']",
    rating: "div.course-landing-page__main-content div[data-purpose='rating']",
    language: "div.course-landing-page__main-content div[class*='clp-lead__locale']",
    title: "h1",
    topics_expand: "div.what-you-will-learn--what-will-you-learn--mnJ5T label",
    topics: ".what-you-will-learn--objectives-list--2cWZN",
    description_expand: "div[class*='styles--description--3y4KY'] label",
    description: "div[data-purpose='safely-set-inner-html:description:description'] p",
    curriculum_toggles: &[
        "button[class*='curriculum--show-more--2tshH']",
        "button[data-purpose='expand-toggle']",
    ],
    lecture_titles: "div.section--lecture-title-and-description--3lul7",
    lecture_durations: "span.section--lecture-content--2I4Bi",
    price: "div[class*='course-landing-page__purchase-section__main'] div[data-purpose='original-price-container'] s span",
    instructor: ".styles--instructors--2JsS3",
    instructor_name: ".instructor--instructor__title--34ItB",
    bio_expand: "div.styles--instructors--2JsS3 label",
    bio: "div[data-purpose='description-content'] p",
    instructor_stats: "div.instructor--instructor__image-and-stats--1IqE7 li",
};

const CURRICULUM_STATS: &str = "div[data-purpose='curriculum-stats']";

/// The redesigned landing page: the rating block spans several lines and
/// ends with `(1,234 ratings)`
#[derive(Debug, Clone, Copy, Default)]
pub struct RevisedLayout;

#[async_trait]
impl<C: PageClient> CourseLayout<C> for RevisedLayout {
    fn name(&self) -> &'static str {
        "revised"
    }

    fn selectors(&self) -> &'static LayoutSelectors {
        &SELECTORS
    }

    fn recognizes(&self, rating_text: &str) -> bool {
        rating_text.trim().contains('\n')
    }

    fn review_count_from(&self, rating_text: &str) -> Option<u64> {
        text::last_line(rating_text).and_then(counts::parenthesized_count)
    }

    async fn read_lecture_stats(
        &self,
        client: &C,
        link: &str,
        _config: &ScraperConfig,
    ) -> Result<(String, String), ScrapeError> {
        let stats = required_text(client, CURRICULUM_STATS, link, "curriculum stats").await?;
        counts::curriculum_stats(&stats)
            .ok_or_else(|| ScrapeError::malformed(link, "curriculum stats", &stats))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::SnapshotClient;

    const RATING: &str = "Rating: 4.6 out of 5\n4.6\n(1,234 ratings)";

    #[test]
    fn test_recognizes_line_break_rating() {
        let layout = RevisedLayout;
        assert!(CourseLayout::<SnapshotClient>::recognizes(&layout, RATING));
        assert!(!CourseLayout::<SnapshotClient>::recognizes(
            &layout,
            "4.6 (1,234 ratings)"
        ));
    }

    #[test]
    fn test_review_count_from_last_line() {
        let layout = RevisedLayout;
        assert_eq!(
            CourseLayout::<SnapshotClient>::review_count_from(&layout, RATING),
            Some(1234)
        );
        assert_eq!(
            CourseLayout::<SnapshotClient>::review_count_from(
                &layout,
                "Rating: 0 out of 5\n(0 ratings)"
            ),
            Some(0)
        );
    }
}

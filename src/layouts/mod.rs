//! Readers for the course landing page.
//!
//! The site has shipped more than one markup for the same page. Each markup
//! is a [`CourseLayout`]; the eligibility and extraction stages only talk to
//! the trait, so supporting another markup means adding an implementation to
//! [`default_layouts`].

pub mod original;
pub mod revised;

pub use original::OriginalLayout;
pub use revised::RevisedLayout;

use crate::client::PageClient;
use crate::config::ScraperConfig;
use crate::crawlers::interact;
use crate::error::ScrapeError;
use crate::parsers::counts;
use crate::results::{Instructors, Lecture};
use crate::retry::retry;
use async_trait::async_trait;

/// Trailing nodes of a description block that belong to its collapse control
const DESCRIPTION_CHROME_NODES: usize = 3;

/// CSS selectors for one markup of the course page
#[derive(Debug)]
pub struct LayoutSelectors {
    pub enrollment: &'static str,
    pub rating: &'static str,
    pub language: &'static str,
    pub title: &'static str,
    pub topics_expand: &'static str,
    pub topics: &'static str,
    pub description_expand: &'static str,
    pub description: &'static str,
    pub curriculum_toggles: &'static [&'static str],
    pub lecture_titles: &'static str,
    pub lecture_durations: &'static str,
    pub price: &'static str,
    pub instructor: &'static str,
    pub instructor_name: &'static str,
    pub bio_expand: &'static str,
    pub bio: &'static str,
    pub instructor_stats: &'static str,
}

/// The signals the eligibility gate looks at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseSummary {
    pub enrollment: u64,
    pub review_count: u64,
    pub language: String,
}

/// Header fields of a course page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseOverview {
    pub title: String,
    pub topics: String,
    pub summary: String,
    pub lecture_count: String,
    pub total_duration: String,
    pub price: Option<String>,
}

/// One markup of the course landing page.
#[async_trait]
pub trait CourseLayout<C: PageClient>: Send + Sync {
    fn name(&self) -> &'static str;

    fn selectors(&self) -> &'static LayoutSelectors;

    /// Whether the text of the rating block is written the way this layout
    /// writes it
    fn recognizes(&self, rating_text: &str) -> bool;

    /// Number of reviews from the text of the rating block
    fn review_count_from(&self, rating_text: &str) -> Option<u64>;

    /// Lecture count and total video length, as displayed
    async fn read_lecture_stats(
        &self,
        client: &C,
        link: &str,
        config: &ScraperConfig,
    ) -> Result<(String, String), ScrapeError>;

    async fn read_enrollment(&self, client: &C, link: &str) -> Result<u64, ScrapeError> {
        let text = required_text(client, self.selectors().enrollment, link, "enrollment").await?;
        counts::leading_count(&text)
            .ok_or_else(|| ScrapeError::malformed(link, "enrollment", &text))
    }

    async fn read_reviews_count(&self, client: &C, link: &str) -> Result<u64, ScrapeError> {
        let text = required_text(client, self.selectors().rating, link, "review count").await?;
        self.review_count_from(&text)
            .ok_or_else(|| ScrapeError::malformed(link, "review count", &text))
    }

    async fn read_language(&self, client: &C, link: &str) -> Result<String, ScrapeError> {
        let text = required_text(client, self.selectors().language, link, "language").await?;
        Ok(text.trim().to_string())
    }

    async fn read_summary(&self, client: &C, link: &str) -> Result<CourseSummary, ScrapeError> {
        Ok(CourseSummary {
            enrollment: self.read_enrollment(client, link).await?,
            review_count: self.read_reviews_count(client, link).await?,
            language: self.read_language(client, link).await?,
        })
    }

    async fn read_overview(
        &self,
        client: &C,
        link: &str,
        config: &ScraperConfig,
    ) -> Result<CourseOverview, ScrapeError> {
        let s = self.selectors();
        let title = required_text(client, s.title, link, "title").await?;

        interact::expand_section(client, s.topics_expand, &config.retry).await;
        let topics = interact::texts_of(client, s.topics, &config.retry)
            .await?
            .join(", ");

        interact::expand_section(client, s.description_expand, &config.retry).await;
        let mut description = interact::texts_of(client, s.description, &config.retry).await?;
        description.truncate(description.len().saturating_sub(DESCRIPTION_CHROME_NODES));

        let (lecture_count, total_duration) = self.read_lecture_stats(client, link, config).await?;
        let price = interact::text_of(client, s.price).await?;

        Ok(CourseOverview {
            title,
            topics,
            summary: description.join("\n"),
            lecture_count,
            total_duration,
            price,
        })
    }

    async fn read_curriculum(
        &self,
        client: &C,
        config: &ScraperConfig,
    ) -> Result<Vec<Lecture>, ScrapeError> {
        let s = self.selectors();
        for toggle in s.curriculum_toggles {
            interact::expand_toggle(client, toggle, config.toggle_timeout(), &config.retry).await;
        }

        let (titles, durations) = retry(&config.retry, "reading curriculum", || async move {
            let titles = interact::read_texts(client, s.lecture_titles).await?;
            let durations = interact::read_texts(client, s.lecture_durations).await?;
            Ok((titles, durations))
        })
        .await?;

        if titles.len() != durations.len() {
            ::log::warn!(
                "{} lecture titles but {} durations; keeping the first {}",
                titles.len(),
                durations.len(),
                titles.len().min(durations.len())
            );
        }

        Ok(titles
            .into_iter()
            .zip(durations)
            .map(|(title, duration)| Lecture { title, duration })
            .collect())
    }

    /// Instructors and their combined bio
    async fn read_instructors(
        &self,
        client: &C,
        link: &str,
        config: &ScraperConfig,
    ) -> Result<(Instructors, String), ScrapeError> {
        let s = self.selectors();
        let blocks = client.find_all(s.instructor).await?;
        if blocks.is_empty() {
            return Err(ScrapeError::missing(link, "instructor"));
        }

        let mut names = Vec::with_capacity(blocks.len());
        for block in &blocks {
            let name = client
                .find_in(block, s.instructor_name)
                .await?
                .ok_or_else(|| ScrapeError::missing(link, "instructor name"))?;
            names.push(client.read_text(&name).await?);
        }

        interact::expand_all(client, s.bio_expand).await;
        let bio = interact::texts_of(client, s.bio, &config.retry)
            .await?
            .iter()
            .map(|paragraph| paragraph.trim())
            .collect::<Vec<_>>()
            .join("\n");

        let stats = interact::texts_of(client, s.instructor_stats, &config.retry).await?;
        let instructor_count = names.len();
        let instructors = Instructors::from_flat_stats(names, &stats).ok_or_else(|| {
            ::log::debug!(
                "{} instructors but {} stat values on {}",
                instructor_count,
                stats.len(),
                link
            );
            ScrapeError::missing(link, "instructor stats")
        })?;

        Ok((instructors, bio))
    }
}

/// Text of `selector`, or `RequiredFieldMissing` naming `field`
pub(crate) async fn required_text<C: PageClient>(
    client: &C,
    selector: &str,
    link: &str,
    field: &str,
) -> Result<String, ScrapeError> {
    interact::text_of(client, selector)
        .await?
        .ok_or_else(|| ScrapeError::missing(link, field))
}

/// Every layout the crawler knows, in detection order
pub fn default_layouts<C: PageClient>() -> Vec<Box<dyn CourseLayout<C>>> {
    vec![Box::new(OriginalLayout), Box::new(RevisedLayout)]
}

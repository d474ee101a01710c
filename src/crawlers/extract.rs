//! Full extraction of an eligible course page.

use crate::client::PageClient;
use crate::config::ScraperConfig;
use crate::error::ScrapeError;
use crate::layouts::CourseLayout;
use crate::results::CourseRecord;

/// Reads the course the browser is on with `layout`.
///
/// Any required field that cannot be found fails the whole record; a
/// course is never emitted half-filled.
pub async fn extract_course<C: PageClient>(
    client: &C,
    layout: &dyn CourseLayout<C>,
    link: &str,
    config: &ScraperConfig,
) -> Result<CourseRecord, ScrapeError> {
    ::log::info!("Extracting {} with the {} layout", link, layout.name());

    let overview = layout.read_overview(client, link, config).await?;
    let lectures = layout.read_curriculum(client, config).await?;
    let (instructors, instructor_bio) = layout.read_instructors(client, link, config).await?;

    if instructors.len() > 1 {
        ::log::debug!("{} is taught by {}", link, instructors.joined_names());
    }

    Ok(CourseRecord {
        link: link.to_string(),
        title: overview.title,
        topics: overview.topics,
        summary: overview.summary,
        lecture_count: overview.lecture_count,
        total_duration: overview.total_duration,
        price: overview.price,
        instructor_bio,
        instructors,
        lectures,
    })
}

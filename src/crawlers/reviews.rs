//! Collecting the reviews shown on a course page.

use super::interact;
use crate::client::{ClientError, PageClient};
use crate::config::ScraperConfig;
use crate::error::ScrapeError;
use crate::parsers::counts;
use crate::results::ReviewRecord;

pub const SHOW_MORE: &str = "button[data-purpose='show-more-review-button']";

/// "Read more" buttons on reviews that are cut short
pub const EXPAND_REVIEW: &str = "div[data-purpose='landing-page-review-list'] button.view-more-container--view-more__collapse-btn--1bVN9";

// Columns are read from the review list only; the course header has its own stars
pub const COMMENT: &str =
    "div[data-purpose='landing-page-review-list'] div[data-purpose='review-comment-content']";
pub const USER_NAME: &str =
    "div[data-purpose='landing-page-review-list'] div[data-purpose='review-detail-user-name']";
pub const STAR_RATING: &str =
    "div[data-purpose='landing-page-review-list'] div[data-purpose='star-rating-shell']";
pub const CREATED: &str =
    "div[data-purpose='landing-page-review-list'] div.individual-review--detail-created--1liJC";

/// Reveals as many reviews as the page allows and reads them.
pub async fn collect<C: PageClient>(
    client: &C,
    link: &str,
    config: &ScraperConfig,
) -> Result<Vec<ReviewRecord>, ScrapeError> {
    let loads = show_more(client, config).await;
    let expanded = interact::expand_all(client, EXPAND_REVIEW).await;
    ::log::debug!(
        "Loaded {} more review batches and expanded {} reviews on {}",
        loads,
        expanded,
        link
    );

    let comments = interact::texts_of(client, COMMENT, &config.retry).await?;
    let names = interact::texts_of(client, USER_NAME, &config.retry).await?;
    let created = interact::texts_of(client, CREATED, &config.retry).await?;
    let ratings: Vec<String> = interact::attributes_of(client, STAR_RATING, "aria-label")
        .await?
        .into_iter()
        .map(|label| label.map(|l| counts::rating_label(&l)).unwrap_or_default())
        .collect();

    let complete = [names.len(), created.len(), ratings.len()]
        .into_iter()
        .fold(comments.len(), usize::min);
    if [names.len(), created.len(), ratings.len()]
        .iter()
        .any(|&len| len != comments.len())
    {
        ::log::warn!(
            "Review columns disagree on {} ({} comments, {} names, {} dates, {} ratings); keeping {}",
            link,
            comments.len(),
            names.len(),
            created.len(),
            ratings.len(),
            complete
        );
    }

    Ok(comments
        .into_iter()
        .zip(names)
        .zip(created)
        .zip(ratings)
        .map(|(((review, customer_name), time_posted), rating)| ReviewRecord {
            course_link: link.to_string(),
            customer_name,
            time_posted,
            review,
            rating,
        })
        .collect())
}

/// Clicks "Show more reviews" until it disappears or the attempts run out.
/// Returns how many clicks landed.
async fn show_more<C: PageClient>(client: &C, config: &ScraperConfig) -> usize {
    let mut loads = 0;
    for _ in 0..config.review_expand_attempts {
        let button = match client.find(SHOW_MORE).await {
            Ok(Some(button)) => button,
            Ok(None) => break,
            Err(e) => {
                ::log::debug!("Stopped loading reviews: {}", e);
                break;
            }
        };
        match client.click(&button).await {
            Ok(()) => loads += 1,
            Err(ClientError::Stale) => break,
            Err(e) => {
                ::log::debug!("Stopped loading reviews: {}", e);
                break;
            }
        }
        if config.settle_delay_ms > 0 {
            tokio::time::sleep(config.settle_delay()).await;
        }
    }
    loads
}

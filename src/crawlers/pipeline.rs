//! The crawl loop: query, then listing pages one after another, with every
//! new course link going through the eligibility gate before extraction.

use super::eligibility::{self, Eligibility};
use super::{extract, listing, query, reviews};
use crate::client::PageClient;
use crate::config::ScraperConfig;
use crate::error::ScrapeError;
use crate::filter::LinkFilter;
use crate::layouts::{CourseLayout, default_layouts};
use crate::results::{
    CourseRecord, CrawlOutput, Harvest, PageCursor, ReviewRecord, SearchRequest, VisitedSet,
};

/// Runs a full crawl with the layouts the crawler knows about.
pub async fn crawl<C: PageClient>(
    client: &C,
    request: &SearchRequest,
    config: &ScraperConfig,
) -> Result<CrawlOutput, ScrapeError> {
    crawl_with_layouts(client, request, config, &default_layouts()).await
}

/// Runs a full crawl, recognizing course pages with `layouts`.
///
/// Courses that are ineligible or fail to extract are logged and skipped.
/// Once listing has begun, a fatal error comes back as
/// [`ScrapeError::Aborted`] holding everything gathered so far.
pub async fn crawl_with_layouts<C: PageClient>(
    client: &C,
    request: &SearchRequest,
    config: &ScraperConfig,
    layouts: &[Box<dyn CourseLayout<C>>],
) -> Result<CrawlOutput, ScrapeError> {
    request.validate()?;
    let filter = LinkFilter::for_site(&config.base_url)
        .map_err(|e| ScrapeError::Validation(format!("invalid base_url: {e}")))?;

    let mut visited = VisitedSet::new();
    for link in &request.excluded_links {
        visited.insert(&filter.normalize(link));
    }
    if !visited.is_empty() {
        ::log::info!("Skipping {} previously visited courses", visited.len());
    }

    query::submit(client, request, config).await?;

    let mut harvest = Harvest::default();
    let mut page_number = 1;
    let mut page_url = query::search_url(config, &request.search_term)?.to_string();

    loop {
        let page = match listing::read_page(client, &filter, &page_url, config).await {
            Ok(page) => page,
            Err(e) => return Err(abort(e, harvest, visited)),
        };
        ::log::info!(
            "Found {} course listings on page {}",
            page.links.len(),
            page_number
        );

        for link in &page.links {
            if visited.contains(link) {
                ::log::debug!("Already visited {}", link);
                continue;
            }

            harvest = match process_course(client, layouts, link, config).await {
                Ok(Some((course, course_reviews))) => {
                    ::log::info!(
                        "Scraped {:?} with {} reviews",
                        course.title,
                        course_reviews.len()
                    );
                    harvest.with_course(course, course_reviews)
                }
                Ok(None) => harvest,
                Err(e) if e.is_fatal() => return Err(abort(e, harvest, visited)),
                Err(e) => {
                    ::log::warn!("Skipping {}: {}", link, e);
                    harvest
                }
            };
            visited.insert(link);
        }

        ::log::info!(
            "Finished with all course listings on page {}! {} courses scraped so far.",
            page_number,
            harvest.course_count()
        );

        match page.next {
            PageCursor::Next(next) => {
                if let Err(source) = client.navigate(&next).await {
                    let e = ScrapeError::PageRead { url: next, source };
                    return Err(abort(e, harvest, visited));
                }
                page_url = next;
                page_number += 1;
            }
            PageCursor::End => break,
        }
    }

    ::log::info!(
        "Crawl finished: {} courses, {} reviews, {} links visited",
        harvest.course_count(),
        harvest.review_count(),
        visited.len()
    );
    Ok(harvest.finish(visited))
}

/// Eligibility then extraction for one course; `None` when it was skipped
async fn process_course<C: PageClient>(
    client: &C,
    layouts: &[Box<dyn CourseLayout<C>>],
    link: &str,
    config: &ScraperConfig,
) -> Result<Option<(CourseRecord, Vec<ReviewRecord>)>, ScrapeError> {
    client.navigate(link).await?;

    let layout = match eligibility::check(client, layouts, link, config).await? {
        Eligibility::Eligible { layout, .. } => &layouts[layout],
        Eligibility::Ineligible(reason) => {
            ::log::info!("Skipping {}: {}", link, reason);
            return Ok(None);
        }
    };

    let course = extract::extract_course(client, layout.as_ref(), link, config).await?;
    let course_reviews = reviews::collect(client, link, config).await?;
    Ok(Some((course, course_reviews)))
}

fn abort(source: ScrapeError, harvest: Harvest, visited: VisitedSet) -> ScrapeError {
    ::log::error!("Aborting crawl: {}", source);
    ScrapeError::Aborted {
        source: Box::new(source),
        partial: Box::new(harvest.finish(visited)),
    }
}

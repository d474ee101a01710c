//! Reading one page of search results.

use super::interact;
use crate::client::{ClientError, PageClient};
use crate::config::ScraperConfig;
use crate::error::ScrapeError;
use crate::filter::LinkFilter;
use crate::results::PageCursor;
use std::collections::HashSet;

/// Course cards of the older and the current results list
pub const COURSE_LINKS: &str =
    "div.course-list--container--3zXPS a.udlite-custom-focus-visible, div[data-purpose='search-course-cards'] a";

/// The "Next" link; newer pagers label an inner span instead of the link
pub const NEXT_PAGE: &str = "div.pagination--container--2wc6Z a[data-page='+1'], a[aria-label='Next'], a:has(> span[aria-label='Next'])";

/// Last item of the pager; it gets a class such as `disabled` on the final page
pub const PAGER_LAST_ITEM: &str = "ul.pagination.pagination-expanded > li:last-child";

/// Course links of the current results page and where to go next
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingPage {
    pub links: Vec<String>,
    pub next: PageCursor,
}

/// Reads the results page the browser is on.
///
/// `page_url` is only used to describe failures.
pub async fn read_page<C: PageClient>(
    client: &C,
    filter: &LinkFilter,
    page_url: &str,
    config: &ScraperConfig,
) -> Result<ListingPage, ScrapeError> {
    let page_read = |source: ClientError| ScrapeError::PageRead {
        url: page_url.to_string(),
        source,
    };

    let links = match client.wait_for(COURSE_LINKS, config.wait_timeout()).await {
        Ok(_) => course_links(client, filter).await.map_err(page_read)?,
        Err(ClientError::Timeout { .. }) => {
            ::log::warn!("No course links showed up on {}", page_url);
            Vec::new()
        }
        Err(e) => return Err(page_read(e)),
    };

    let next = next_page(client).await.map_err(page_read)?;
    Ok(ListingPage { links, next })
}

async fn course_links<C: PageClient>(
    client: &C,
    filter: &LinkFilter,
) -> Result<Vec<String>, ClientError> {
    let hrefs = interact::attributes_of(client, COURSE_LINKS, "href").await?;

    let mut seen = HashSet::new();
    let mut links = Vec::new();
    for href in hrefs.into_iter().flatten() {
        match filter.course_link(&href) {
            Some(link) => {
                if seen.insert(link.clone()) {
                    links.push(link);
                }
            }
            None => ::log::trace!("Ignoring non-course link {}", href),
        }
    }
    Ok(links)
}

async fn next_page<C: PageClient>(client: &C) -> Result<PageCursor, ClientError> {
    if let Some(last) = client.find(PAGER_LAST_ITEM).await? {
        let class = client.read_attribute(&last, "class").await?;
        if class.is_some_and(|class| !class.trim().is_empty()) {
            ::log::debug!("Pager marks this as the last results page");
            return Ok(PageCursor::End);
        }
    }

    let Some(next) = client.find(NEXT_PAGE).await? else {
        return Ok(PageCursor::End);
    };
    match client.read_attribute(&next, "href").await? {
        Some(href) if !href.trim().is_empty() => Ok(PageCursor::Next(href)),
        _ => Ok(PageCursor::End),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::SnapshotClient;

    const PAGE: &str = "https://www.udemy.com/courses/search/?q=rust";

    fn config() -> ScraperConfig {
        ScraperConfig {
            wait_timeout_ms: 10,
            ..ScraperConfig::default()
        }
    }

    async fn read(html: &str) -> ListingPage {
        let client = SnapshotClient::new().with_page(PAGE, html);
        client.navigate(PAGE).await.unwrap();
        let filter = LinkFilter::for_site("https://www.udemy.com").unwrap();
        read_page(&client, &filter, PAGE, &config()).await.unwrap()
    }

    #[tokio::test]
    async fn test_links_are_filtered_and_deduplicated() {
        let page = read(
            r#"<div data-purpose="search-course-cards">
                <a href="/course/rust-basics/?couponCode=A">Rust basics</a>
                <a href="/course/rust-basics/">Rust basics again</a>
                <a href="/user/ferris/">Ferris</a>
                <a href="/course/async-rust/">Async Rust</a>
            </div>
            <a aria-label="Next" href="/courses/search/?q=rust&amp;p=2">Next</a>"#,
        )
        .await;

        assert_eq!(
            page.links,
            vec![
                "https://www.udemy.com/course/rust-basics/",
                "https://www.udemy.com/course/async-rust/",
            ]
        );
        assert_eq!(
            page.next,
            PageCursor::Next("https://www.udemy.com/courses/search/?q=rust&p=2".to_string())
        );
    }

    #[tokio::test]
    async fn test_exhausted_pager_ends_listing() {
        let page = read(
            r#"<div data-purpose="search-course-cards"><a href="/course/a/">A</a></div>
            <ul class="pagination pagination-expanded">
                <li><a aria-label="Next" href="/courses/search/?q=rust&amp;p=3">Next</a></li>
                <li class="disabled"><span>Last</span></li>
            </ul>"#,
        )
        .await;
        assert_eq!(page.next, PageCursor::End);
    }

    #[tokio::test]
    async fn test_next_label_on_inner_span() {
        let page = read(
            r#"<div data-purpose="search-course-cards"><a href="/course/a/">A</a></div>
            <nav><a href="/courses/search/?q=rust&amp;p=2"><span aria-label="Next"></span></a></nav>"#,
        )
        .await;
        assert_eq!(
            page.next,
            PageCursor::Next("https://www.udemy.com/courses/search/?q=rust&p=2".to_string())
        );
    }

    #[tokio::test]
    async fn test_empty_page_has_no_links_and_no_next() {
        let page = read("<html><body><p>No results</p></body></html>").await;
        assert!(page.links.is_empty());
        assert_eq!(page.next, PageCursor::End);
    }
}

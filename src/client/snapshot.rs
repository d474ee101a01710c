//! A page client over saved HTML.
//!
//! Pages are served from memory by URL and queried with the `scraper` crate.
//! Saved markup is already fully rendered, so clicking an element that
//! carries an `href` follows it and any other click is recorded and otherwise
//! ignored. Element handles from before a navigation report
//! [`ClientError::Stale`], the same way a live browser does.

use super::{ClientError, PageClient};
use crate::parsers::text;
use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Step {
    selector: String,
    index: usize,
}

/// Handle to an element of the page that was current when it was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotElement {
    generation: u64,
    path: Vec<Step>,
}

impl SnapshotElement {
    fn child(&self, selector: &str, index: usize) -> Self {
        let mut path = self.path.clone();
        path.push(Step {
            selector: selector.to_string(),
            index,
        });
        Self {
            generation: self.generation,
            path,
        }
    }

    fn describe(&self) -> String {
        self.path
            .iter()
            .map(|step| format!("{}[{}]", step.selector, step.index))
            .collect::<Vec<_>>()
            .join(" >> ")
    }
}

#[derive(Debug, Default)]
struct SnapshotState {
    current: Option<String>,
    generation: u64,
    navigations: Vec<String>,
    clicks: Vec<String>,
    closed: bool,
}

struct CurrentPage {
    url: String,
    html: String,
    generation: u64,
}

#[derive(Debug, Default)]
pub struct SnapshotClient {
    pages: HashMap<String, String>,
    state: Mutex<SnapshotState>,
}

impl SnapshotClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves `html` whenever `url` is navigated to
    pub fn with_page(mut self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.pages.insert(url.into(), html.into());
        self
    }

    /// Every URL navigated to, in order
    pub async fn navigations(&self) -> Vec<String> {
        self.state.lock().await.navigations.clone()
    }

    /// Every click that did not navigate, described by its selector path
    pub async fn clicks(&self) -> Vec<String> {
        self.state.lock().await.clicks.clone()
    }

    async fn current_page(&self) -> Result<CurrentPage, ClientError> {
        let state = self.state.lock().await;
        if state.closed {
            return Err(ClientError::SessionClosed);
        }
        let url = state
            .current
            .clone()
            .ok_or_else(|| ClientError::Command("no page loaded".to_string()))?;
        let html = self.pages.get(&url).cloned().unwrap_or_default();
        Ok(CurrentPage {
            url,
            html,
            generation: state.generation,
        })
    }

    async fn live_page(&self, element: &SnapshotElement) -> Result<CurrentPage, ClientError> {
        let page = self.current_page().await?;
        if page.generation != element.generation {
            return Err(ClientError::Stale);
        }
        Ok(page)
    }
}

fn parse_selector(selector: &str) -> Result<Selector, ClientError> {
    Selector::parse(selector).map_err(|_| ClientError::InvalidSelector(selector.to_string()))
}

fn resolve<'a>(doc: &'a Html, path: &[Step]) -> Result<Option<ElementRef<'a>>, ClientError> {
    let Some((first, rest)) = path.split_first() else {
        return Ok(None);
    };
    let selector = parse_selector(&first.selector)?;
    let Some(mut current) = doc.select(&selector).nth(first.index) else {
        return Ok(None);
    };
    for step in rest {
        let selector = parse_selector(&step.selector)?;
        match current.select(&selector).nth(step.index) {
            Some(next) => current = next,
            None => return Ok(None),
        }
    }
    Ok(Some(current))
}

fn count_matches(html: &str, selector: &str) -> Result<usize, ClientError> {
    let selector = parse_selector(selector)?;
    let doc = Html::parse_document(html);
    Ok(doc.select(&selector).count())
}

fn count_matches_in(
    html: &str,
    scope: &SnapshotElement,
    selector: &str,
) -> Result<usize, ClientError> {
    let parsed = parse_selector(selector)?;
    let doc = Html::parse_document(html);
    let scope = resolve(&doc, &scope.path)?.ok_or(ClientError::Stale)?;
    Ok(scope.select(&parsed).count())
}

fn element_text(html: &str, element: &SnapshotElement) -> Result<String, ClientError> {
    let doc = Html::parse_document(html);
    let found = resolve(&doc, &element.path)?.ok_or(ClientError::Stale)?;
    Ok(text::rendered_text(&found.text().collect::<String>()))
}

fn element_attribute(
    html: &str,
    page_url: &str,
    element: &SnapshotElement,
    name: &str,
) -> Result<Option<String>, ClientError> {
    let doc = Html::parse_document(html);
    let found = resolve(&doc, &element.path)?.ok_or(ClientError::Stale)?;
    let Some(value) = found.value().attr(name) else {
        return Ok(None);
    };
    if matches!(name, "href" | "src") {
        if let Ok(resolved) = Url::parse(page_url).and_then(|base| base.join(value)) {
            return Ok(Some(resolved.to_string()));
        }
    }
    Ok(Some(value.to_string()))
}

#[async_trait]
impl PageClient for SnapshotClient {
    type Element = SnapshotElement;

    async fn navigate(&self, url: &str) -> Result<(), ClientError> {
        let mut state = self.state.lock().await;
        if state.closed {
            return Err(ClientError::SessionClosed);
        }
        state.navigations.push(url.to_string());
        if !self.pages.contains_key(url) {
            return Err(ClientError::Navigation {
                url: url.to_string(),
                reason: "no snapshot saved for this URL".to_string(),
            });
        }
        state.current = Some(url.to_string());
        state.generation += 1;
        ::log::trace!("Snapshot navigated to {} (generation {})", url, state.generation);
        Ok(())
    }

    async fn find(&self, selector: &str) -> Result<Option<SnapshotElement>, ClientError> {
        let page = self.current_page().await?;
        let found = count_matches(&page.html, selector)? > 0;
        Ok(found.then(|| SnapshotElement {
            generation: page.generation,
            path: vec![Step {
                selector: selector.to_string(),
                index: 0,
            }],
        }))
    }

    async fn find_all(&self, selector: &str) -> Result<Vec<SnapshotElement>, ClientError> {
        let page = self.current_page().await?;
        let count = count_matches(&page.html, selector)?;
        Ok((0..count)
            .map(|index| SnapshotElement {
                generation: page.generation,
                path: vec![Step {
                    selector: selector.to_string(),
                    index,
                }],
            })
            .collect())
    }

    async fn find_in(
        &self,
        scope: &SnapshotElement,
        selector: &str,
    ) -> Result<Option<SnapshotElement>, ClientError> {
        let page = self.live_page(scope).await?;
        let found = count_matches_in(&page.html, scope, selector)? > 0;
        Ok(found.then(|| scope.child(selector, 0)))
    }

    async fn wait_for(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> Result<SnapshotElement, ClientError> {
        // Saved pages never change, so there is nothing to wait for.
        self.find(selector).await?.ok_or_else(|| ClientError::Timeout {
            selector: selector.to_string(),
            timeout,
        })
    }

    async fn click(&self, element: &SnapshotElement) -> Result<(), ClientError> {
        let page = self.live_page(element).await?;
        let href = element_attribute(&page.html, &page.url, element, "href")?;
        match href {
            Some(target) => self.navigate(&target).await,
            None => {
                self.state.lock().await.clicks.push(element.describe());
                Ok(())
            }
        }
    }

    async fn read_text(&self, element: &SnapshotElement) -> Result<String, ClientError> {
        let page = self.live_page(element).await?;
        element_text(&page.html, element)
    }

    async fn read_attribute(
        &self,
        element: &SnapshotElement,
        name: &str,
    ) -> Result<Option<String>, ClientError> {
        let page = self.live_page(element).await?;
        element_attribute(&page.html, &page.url, element, name)
    }

    async fn close(&self) -> Result<(), ClientError> {
        self.state.lock().await.closed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOME: &str = "https://example.com/";
    const NEXT: &str = "https://example.com/next/";

    fn client() -> SnapshotClient {
        SnapshotClient::new()
            .with_page(
                HOME,
                r#"<html><body>
                    <ul class="items"><li>One</li><li>Two</li></ul>
                    <a class="next" href="/next/">Next</a>
                    <button class="more">More</button>
                </body></html>"#,
            )
            .with_page(NEXT, "<html><body><p>Second page</p></body></html>")
    }

    #[tokio::test]
    async fn test_find_all_and_read_text() {
        let client = client();
        client.navigate(HOME).await.unwrap();

        let items = client.find_all("ul.items li").await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(client.read_text(&items[1]).await.unwrap(), "Two");
        assert!(client.find("table").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_href_is_resolved_and_followed() {
        let client = client();
        client.navigate(HOME).await.unwrap();

        let next = client.find("a.next").await.unwrap().unwrap();
        assert_eq!(
            client.read_attribute(&next, "href").await.unwrap().as_deref(),
            Some(NEXT)
        );
        client.click(&next).await.unwrap();
        assert_eq!(client.navigations().await, vec![HOME, NEXT]);
    }

    #[tokio::test]
    async fn test_handles_go_stale_after_navigation() {
        let client = client();
        client.navigate(HOME).await.unwrap();
        let more = client.find("button.more").await.unwrap().unwrap();

        client.click(&more).await.unwrap();
        assert_eq!(client.clicks().await.len(), 1);

        client.navigate(NEXT).await.unwrap();
        assert!(matches!(
            client.read_text(&more).await,
            Err(ClientError::Stale)
        ));
    }

    #[tokio::test]
    async fn test_wait_for_missing_element_times_out() {
        let client = client();
        client.navigate(HOME).await.unwrap();
        let err = client
            .wait_for("div.never", Duration::from_millis(10))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Timeout { .. }));
    }

    #[tokio::test]
    async fn test_closed_session_refuses_commands() {
        let client = client();
        client.navigate(HOME).await.unwrap();
        client.close().await.unwrap();
        assert!(matches!(
            client.find("li").await,
            Err(ClientError::SessionClosed)
        ));
        assert!(matches!(
            client.navigate(NEXT).await,
            Err(ClientError::SessionClosed)
        ));
    }

    #[tokio::test]
    async fn test_unknown_url_fails_navigation() {
        let client = client();
        let err = client.navigate("https://example.com/missing/").await.unwrap_err();
        assert!(matches!(err, ClientError::Navigation { .. }));
    }
}

//! Submitting the search and narrowing it with the filter UI.

use super::interact;
use crate::client::{ClientError, PageClient};
use crate::config::ScraperConfig;
use crate::error::ScrapeError;
use crate::parsers::text;
use crate::results::SearchRequest;
use url::Url;

/// Rendered once the results page is ready to be filtered, in either UI
const FILTER_UI_READY: &str =
    "div.filter-panel--sidebar--L2lAU, button[class*='filter-button--filter-button--y-iVA']";

pub const TOPIC_GROUP: &str = "Topic";
pub const LANGUAGE_GROUP: &str = "Language";

/// One of the site's filter UIs
#[derive(Debug)]
pub struct FilterUi {
    pub name: &'static str,
    /// Button that opens the UI; `None` when it is always visible
    pub opener: Option<&'static str>,
    /// Fieldset holding one filter group, narrowed by `[name='<group>']`
    pub fieldset: &'static str,
    /// Collapsed group headers, clicked by their label to open the group
    pub group_toggle: Option<&'static str>,
    /// "Show more" control inside a group's fieldset
    pub show_more: &'static str,
    /// Option label inside a group's fieldset, e.g. `Machine Learning (1,234)`
    pub option_label: &'static str,
    /// Checkbox inside a group's fieldset, aligned with `option_label`
    pub option_input: &'static str,
    /// Button labelled `Done` that applies the selection
    pub confirm: Option<&'static str>,
}

/// The sidebar shown on wide pages
pub static PANEL: FilterUi = FilterUi {
    name: "panel",
    opener: None,
    fieldset: "div.panel--content-wrapper--1yFBX fieldset",
    group_toggle: Some("label.js-panel-toggler[aria-expanded='false']"),
    show_more: "label[role='button']",
    option_label: "span[class*='checkbox-content']",
    option_input: "input",
    confirm: None,
};

/// The overlay opened by the "Filter" button
pub static OVERLAY: FilterUi = FilterUi {
    name: "overlay",
    opener: Some("button[class*='filter-button--filter-button--y-iVA']"),
    fieldset: "fieldset.filter--filter-container--1ftIU",
    group_toggle: None,
    show_more: "button",
    option_label: "span.filter-option--checkbox-content--4HaUs",
    option_input: "input",
    confirm: Some("button"),
};

impl FilterUi {
    fn in_group(&self, group: &str, part: &str) -> String {
        format!("{}[name='{}'] {}", self.fieldset, group, part)
    }
}

/// `{base_url}{search_path}?q=<term>`
pub fn search_url(config: &ScraperConfig, search_term: &str) -> Result<Url, ScrapeError> {
    let base = Url::parse(&config.base_url)
        .and_then(|base| base.join(&config.search_path))
        .map_err(|e| ScrapeError::Validation(format!("invalid base_url/search_path: {e}")))?;
    let mut url = base;
    url.query_pairs_mut().append_pair("q", search_term.trim());
    Ok(url)
}

/// Runs the search and applies the category and language filters.
///
/// Leaves the browser on the first page of filtered results.
pub async fn submit<C: PageClient>(
    client: &C,
    request: &SearchRequest,
    config: &ScraperConfig,
) -> Result<(), ScrapeError> {
    let url = search_url(config, &request.search_term)?;
    ::log::info!("Sending search query {:?}...", request.search_term);
    client.navigate(url.as_str()).await?;

    match client.wait_for(FILTER_UI_READY, config.wait_timeout()).await {
        Ok(_) => {}
        Err(ClientError::Timeout { timeout, .. }) => {
            return Err(ScrapeError::NavigationTimeout {
                what: "search filter panel".to_string(),
                timeout,
            });
        }
        Err(e) => return Err(e.into()),
    }

    let ui = detect_ui(client).await?;
    ::log::info!("Filtering search results with the {} filter UI...", ui.name);

    apply_filter(client, ui, TOPIC_GROUP, &request.filter_category, config).await?;
    apply_filter(
        client,
        ui,
        LANGUAGE_GROUP,
        &config.eligibility.language,
        config,
    )
    .await?;

    if let Some(confirm) = ui.confirm {
        if !interact::click_labelled(client, confirm, "Done").await? {
            ::log::debug!("No Done button on the {} filter UI", ui.name);
        }
        settle(config).await;
    }
    Ok(())
}

async fn detect_ui<C: PageClient>(client: &C) -> Result<&'static FilterUi, ScrapeError> {
    if let Some(opener) = OVERLAY.opener {
        if let Some(button) = client.find(opener).await? {
            client.click(&button).await?;
            return Ok(&OVERLAY);
        }
    }
    Ok(&PANEL)
}

/// Ticks `option` in the filter `group`
async fn apply_filter<C: PageClient>(
    client: &C,
    ui: &FilterUi,
    group: &str,
    option: &str,
    config: &ScraperConfig,
) -> Result<(), ScrapeError> {
    if let Some(toggle) = ui.group_toggle {
        if interact::click_labelled(client, toggle, group).await? {
            ::log::debug!("Opened the {} filter group", group);
        }
    }
    interact::expand_all(client, &ui.in_group(group, ui.show_more)).await;

    let labels = interact::read_texts(client, &ui.in_group(group, ui.option_label)).await?;
    let available: Vec<String> = labels
        .iter()
        .map(|label| text::label_before_count(label))
        .collect();

    let Some(index) = available.iter().position(|name| name == option) else {
        return Err(ScrapeError::CategoryNotFound {
            group: group.to_string(),
            requested: option.to_string(),
            available,
        });
    };

    let inputs = client.find_all(&ui.in_group(group, ui.option_input)).await?;
    let Some(checkbox) = inputs.get(index) else {
        ::log::warn!(
            "{} filter shows {} options but {} checkboxes",
            group,
            available.len(),
            inputs.len()
        );
        return Err(ScrapeError::CategoryNotFound {
            group: group.to_string(),
            requested: option.to_string(),
            available,
        });
    };
    client.click(checkbox).await?;
    ::log::debug!("Selected {} = {:?}", group, option);

    settle(config).await;
    Ok(())
}

async fn settle(config: &ScraperConfig) {
    if config.settle_delay_ms > 0 {
        tokio::time::sleep(config.settle_delay()).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_url_encodes_term() {
        let config = ScraperConfig::default();
        let url = search_url(&config, " python machine learning ").unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.udemy.com/courses/search/?q=python+machine+learning"
        );
    }

    #[tokio::test]
    async fn test_overlay_filters_are_confirmed() {
        let config = ScraperConfig {
            wait_timeout_ms: 10,
            settle_delay_ms: 0,
            ..ScraperConfig::default()
        };
        let url = search_url(&config, "rust").unwrap().to_string();
        let group = |name: &str, option: &str| {
            format!(
                r#"<fieldset class="filter--filter-container--1ftIU" name="{name}">
                    <label><input type="checkbox"><span class="filter-option--checkbox-content--4HaUs">Other (3)</span></label>
                    <label><input type="checkbox"><span class="filter-option--checkbox-content--4HaUs">{option} (12)</span></label>
                </fieldset>"#
            )
        };
        let html = format!(
            r#"<button class="filter-button--filter-button--y-iVA">Filter</button>
            {}{}
            <button>Clear</button><button>Done</button>"#,
            group("Topic", "Programming Languages"),
            group("Language", "English"),
        );
        let client = crate::client::SnapshotClient::new().with_page(url, html);

        let request = SearchRequest::new("rust", "Programming Languages");
        submit(&client, &request, &config).await.unwrap();

        let clicks = client.clicks().await;
        assert_eq!(clicks.len(), 4, "{clicks:?}");
        assert!(
            clicks[1].contains("fieldset.filter--filter-container--1ftIU[name='Topic'] input[1]")
        );
        assert!(clicks[3].starts_with("button["));
    }

    #[tokio::test]
    async fn test_option_without_checkbox_is_not_found() {
        let config = ScraperConfig {
            wait_timeout_ms: 10,
            settle_delay_ms: 0,
            ..ScraperConfig::default()
        };
        let url = search_url(&config, "rust").unwrap().to_string();
        let html = r#"<div class="filter-panel--sidebar--L2lAU"><div class="panel--content-wrapper--1yFBX">
            <fieldset name="Topic">
                <label><input type="checkbox"><span class="checkbox-content">Other (3)</span></label>
                <label><span class="checkbox-content">Programming Languages (12)</span></label>
            </fieldset>
        </div></div>"#;
        let client = crate::client::SnapshotClient::new().with_page(url, html);

        let request = SearchRequest::new("rust", "Programming Languages");
        let err = submit(&client, &request, &config).await.unwrap_err();

        match err {
            ScrapeError::CategoryNotFound {
                group, available, ..
            } => {
                assert_eq!(group, TOPIC_GROUP);
                assert_eq!(available, vec!["Other", "Programming Languages"]);
            }
            other => panic!("expected CategoryNotFound, got {other:?}"),
        }
        assert!(client.clicks().await.is_empty());
    }

    #[test]
    fn test_group_selector() {
        assert_eq!(
            PANEL.in_group("Topic", "input"),
            "div.panel--content-wrapper--1yFBX fieldset[name='Topic'] input"
        );
    }
}

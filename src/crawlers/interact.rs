//! Small page interactions shared by every stage.

use crate::client::{ClientError, PageClient};
use crate::config::RetryConfig;
use crate::retry::retry;
use std::time::Duration;

/// Text of the first match, if anything matches
pub async fn text_of<C: PageClient>(
    client: &C,
    selector: &str,
) -> Result<Option<String>, ClientError> {
    match client.find(selector).await? {
        Some(element) => Ok(Some(client.read_text(&element).await?)),
        None => Ok(None),
    }
}

/// Text of every match, in document order
pub async fn read_texts<C: PageClient>(
    client: &C,
    selector: &str,
) -> Result<Vec<String>, ClientError> {
    let elements = client.find_all(selector).await?;
    let mut texts = Vec::with_capacity(elements.len());
    for element in &elements {
        texts.push(client.read_text(element).await?);
    }
    Ok(texts)
}

/// [`read_texts`], re-locating everything when the page shifts mid-read
pub async fn texts_of<C: PageClient>(
    client: &C,
    selector: &str,
    policy: &RetryConfig,
) -> Result<Vec<String>, ClientError> {
    retry(policy, selector, || read_texts(client, selector)).await
}

/// Attribute `name` of every match, in document order
pub async fn attributes_of<C: PageClient>(
    client: &C,
    selector: &str,
    name: &str,
) -> Result<Vec<Option<String>>, ClientError> {
    let elements = client.find_all(selector).await?;
    let mut values = Vec::with_capacity(elements.len());
    for element in &elements {
        values.push(client.read_attribute(element, name).await?);
    }
    Ok(values)
}

/// Clicks the control matching `selector` if there is one.
///
/// A missing control is fine: the content may already be visible. A control
/// that keeps failing is logged and left alone. Returns whether a click landed.
pub async fn expand_section<C: PageClient>(
    client: &C,
    selector: &str,
    policy: &RetryConfig,
) -> bool {
    let clicked = retry(policy, selector, || async move {
        match client.find(selector).await? {
            Some(control) => client.click(&control).await.map(|_| true),
            None => Ok(false),
        }
    })
    .await;

    match clicked {
        Ok(clicked) => clicked,
        Err(e) => {
            ::log::warn!("Could not expand `{}`, reading what is visible: {}", selector, e);
            false
        }
    }
}

/// Like [`expand_section`] for toggles that render late: waits up to
/// `timeout` for the control to show up first.
pub async fn expand_toggle<C: PageClient>(
    client: &C,
    selector: &str,
    timeout: Duration,
    policy: &RetryConfig,
) -> bool {
    match client.wait_for(selector, timeout).await {
        Ok(_) => expand_section(client, selector, policy).await,
        Err(ClientError::Timeout { .. }) => {
            ::log::trace!("No toggle `{}` on this page", selector);
            false
        }
        Err(e) => {
            ::log::warn!("Could not look for toggle `{}`: {}", selector, e);
            false
        }
    }
}

/// Clicks every control matching `selector`; returns how many clicks landed
pub async fn expand_all<C: PageClient>(client: &C, selector: &str) -> usize {
    let controls = match client.find_all(selector).await {
        Ok(controls) => controls,
        Err(e) => {
            ::log::warn!("Could not look for `{}`: {}", selector, e);
            return 0;
        }
    };

    let mut clicked = 0;
    for control in &controls {
        match client.click(control).await {
            Ok(()) => clicked += 1,
            Err(e) => ::log::debug!("Skipping unresponsive `{}`: {}", selector, e),
        }
    }
    clicked
}

/// Clicks the first element matching `selector` whose text is `label`.
/// Returns false when no element carries that label.
pub async fn click_labelled<C: PageClient>(
    client: &C,
    selector: &str,
    label: &str,
) -> Result<bool, ClientError> {
    for element in client.find_all(selector).await? {
        if client.read_text(&element).await?.trim() == label {
            client.click(&element).await?;
            return Ok(true);
        }
    }
    Ok(false)
}

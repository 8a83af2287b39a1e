//! Bounded waits and ordered locator strategies.
//!
//! A bounded wait polls a condition every [`POLL_INTERVAL`] until it holds or
//! the timeout elapses. Nothing here retries after a timeout.

use crate::driver::{Driver, ElementRef, Locator};
use crate::{Error, Result};
use std::time::Duration;
use tokio::time::{sleep, timeout};

pub const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// First element matching `locator`, if any
pub async fn find_first<D: Driver + ?Sized>(
    driver: &mut D,
    locator: &Locator,
) -> Result<Option<ElementRef>> {
    Ok(driver.find_all(locator).await?.into_iter().next())
}

/// Wait until an element matching `locator` is present in the DOM
pub async fn wait_for_element<D: Driver + ?Sized>(
    driver: &mut D,
    locator: &Locator,
    limit: Duration,
) -> Result<ElementRef> {
    let poll = async {
        loop {
            if let Some(element) = find_first(driver, locator).await? {
                return Ok::<_, Error>(element);
            }
            sleep(POLL_INTERVAL).await;
        }
    };

    match timeout(limit, poll).await {
        Ok(result) => result,
        Err(_) => Err(Error::Timeout {
            what: locator.to_string(),
            seconds: limit.as_secs(),
        }),
    }
}

/// Wait until the current URL satisfies `condition`.
///
/// Returns `Ok(false)` when the limit passes first.
pub async fn wait_for_url<D, F>(driver: &mut D, limit: Duration, condition: F) -> Result<bool>
where
    D: Driver + ?Sized,
    F: Fn(&str) -> bool,
{
    let poll = async {
        loop {
            let url = driver.current_url().await?;
            if condition(&url) {
                return Ok::<_, Error>(());
            }
            sleep(POLL_INTERVAL).await;
        }
    };

    match timeout(limit, poll).await {
        Ok(result) => result.map(|()| true),
        Err(_) => Ok(false),
    }
}

/// Try each locator in order and return the first element that is visible
/// and enabled. Lookup errors skip to the next strategy.
pub async fn first_interactable<D: Driver + ?Sized>(
    driver: &mut D,
    strategies: &[Locator],
) -> Option<ElementRef> {
    for locator in strategies {
        let candidates = match driver.find_all(locator).await {
            Ok(found) => found,
            Err(e) => {
                tracing::debug!("Lookup by {} failed: {}", locator, e);
                continue;
            }
        };

        for element in candidates {
            if driver.is_interactable(element).await.unwrap_or(false) {
                tracing::debug!("Matched {}", locator);
                return Some(element);
            }
        }
    }
    None
}

/// True when any locator matches at least one element.
pub async fn any_present<D: Driver + ?Sized>(driver: &mut D, locators: &[Locator]) -> bool {
    for locator in locators {
        match driver.find_all(locator).await {
            Ok(found) if !found.is_empty() => return true,
            Ok(_) => {}
            Err(e) => tracing::debug!("Lookup by {} failed: {}", locator, e),
        }
    }
    false
}

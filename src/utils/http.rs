// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use reqwest::header::{COOKIE, HeaderMap, HeaderValue};
use scraper::Html;

use crate::error::{AppError, Result};
use crate::models::ClientConfig;

/// Create a configured asynchronous HTTP client.
pub fn create_client(config: &ClientConfig) -> Result<reqwest::Client> {
    let mut headers = HeaderMap::new();
    if let Some(cookie) = &config.cookie {
        let value = HeaderValue::from_str(cookie)
            .map_err(|e| AppError::config(format!("client.cookie is not a valid header: {e}")))?;
        headers.insert(COOKIE, value);
    }

    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .default_headers(headers)
        .build()?;
    Ok(client)
}

/// Create a client for third-party APIs. No site session is attached.
pub fn create_api_client(config: &ClientConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}

/// Fetch a page and return its markup. Non-success statuses are errors.
pub async fn fetch_markup(client: &reqwest::Client, url: &str) -> Result<String> {
    let response = client.get(url).send().await?.error_for_status()?;
    Ok(response.text().await?)
}

/// Parse markup into a queryable document.
pub fn parse_document(markup: &str) -> Html {
    Html::parse_document(markup)
}

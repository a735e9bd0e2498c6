// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use url::Url;

use crate::error::Result;
use crate::models::SearchConfig;

/// Create a configured asynchronous HTTP client.
pub fn create_async_client(config: &SearchConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}

/// Build the search URL for a query, appending `q=<query>`.
pub fn search_url(endpoint: &str, query: &str) -> Result<Url> {
    let mut url = Url::parse(endpoint)?;
    url.query_pairs_mut().append_pair("q", query);
    Ok(url)
}

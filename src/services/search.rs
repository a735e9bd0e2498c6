// src/services/search.rs

//! Search endpoint client.
//!
//! Issues a single GET per run and turns the `results` array into posts.

use async_trait::async_trait;
use reqwest::Client;

use crate::error::{AppError, Result};
use crate::models::{Post, SearchConfig, SearchResponse};
use crate::utils::http;

/// Anything that can produce posts for a query.
#[async_trait]
pub trait PostSource: Send + Sync {
    /// Fetch every post currently matching `query`.
    async fn fetch(&self, query: &str) -> Result<Vec<Post>>;
}

/// Client for a JSON search endpoint.
pub struct SearchClient {
    endpoint: String,
    client: Client,
}

impl SearchClient {
    /// Create a search client with the given configuration.
    pub fn new(config: &SearchConfig) -> Result<Self> {
        Ok(Self {
            endpoint: config.endpoint.clone(),
            client: http::create_async_client(config)?,
        })
    }

    /// Parse a search response body.
    pub fn parse_body(body: &str) -> Result<Vec<Post>> {
        let response: SearchResponse = serde_json::from_str(body)?;
        Ok(response.into_posts())
    }
}

#[async_trait]
impl PostSource for SearchClient {
    async fn fetch(&self, query: &str) -> Result<Vec<Post>> {
        let url = http::search_url(&self.endpoint, query)?;
        log::debug!("GET {}", url);

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::fetch(url.as_str(), format!("status {status}")));
        }

        let body = response.text().await?;
        let posts = Self::parse_body(&body)?;
        log::info!("Fetched {} posts for {:?}", posts.len(), query);
        Ok(posts)
    }
}

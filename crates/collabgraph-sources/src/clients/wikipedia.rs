//! Wikipedia biography client: a title search followed by a page-summary
//! fetch. A missing page is a normal `None`, not an error.

use async_trait::async_trait;
use collabgraph_core::{CollabGraphError, Encyclopedia, Result};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct WikipediaConfig {
    pub api_base: String,
    pub timeout_secs: u64,
}

impl Default for WikipediaConfig {
    fn default() -> Self {
        Self {
            api_base: std::env::var("COLLABGRAPH_WIKIPEDIA_BASE")
                .unwrap_or_else(|_| "https://en.wikipedia.org".to_string()),
            timeout_secs: 15,
        }
    }
}

pub struct WikipediaClient {
    config: WikipediaConfig,
    client: Client,
}

#[derive(Deserialize)]
struct TitleSearchResponse {
    #[serde(default)]
    pages: Vec<TitleHit>,
}

#[derive(Deserialize)]
struct TitleHit {
    key: String,
}

#[derive(Deserialize)]
struct SummaryResponse {
    #[serde(default)]
    extract: Option<String>,
}

impl WikipediaClient {
    pub fn new(config: WikipediaConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { config, client })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(WikipediaConfig::default())
    }

    async fn search_title(&self, name: &str) -> Result<Option<String>> {
        let response = self
            .client
            .get(format!("{}/w/rest.php/v1/search/title", self.config.api_base))
            .query(&[("q", name), ("limit", "1")])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(CollabGraphError::SourceUnavailable(format!(
                "encyclopedia search returned {}",
                response.status()
            )));
        }
        let body: TitleSearchResponse = response.json().await?;
        Ok(body.pages.into_iter().next().map(|p| p.key))
    }
}

#[async_trait]
impl Encyclopedia for WikipediaClient {
    async fn summary_of(&self, name: &str) -> Result<Option<String>> {
        let Some(title) = self.search_title(name).await? else {
            return Ok(None);
        };
        let response = self
            .client
            .get(format!(
                "{}/api/rest_v1/page/summary/{title}",
                self.config.api_base
            ))
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(CollabGraphError::SourceUnavailable(format!(
                "encyclopedia summary returned {}",
                response.status()
            )));
        }
        let body: SummaryResponse = response.json().await?;
        Ok(body.extract)
    }
}

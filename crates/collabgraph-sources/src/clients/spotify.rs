//! Streaming-catalog client used only by the enrichment fan-out, so every
//! failure here degrades to absent node fields rather than an error the
//! caller sees.

use async_trait::async_trait;
use collabgraph_core::{CatalogArtist, CollabGraphError, Result, StreamingCatalog};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct SpotifyConfig {
    pub api_base: String,
    /// Bearer token; obtaining/refreshing it is outside this core.
    pub access_token: String,
    pub timeout_secs: u64,
}

impl Default for SpotifyConfig {
    fn default() -> Self {
        Self {
            api_base: std::env::var("COLLABGRAPH_STREAMING_BASE")
                .unwrap_or_else(|_| "https://api.spotify.com/v1".to_string()),
            access_token: std::env::var("COLLABGRAPH_STREAMING_TOKEN").unwrap_or_default(),
            timeout_secs: 15,
        }
    }
}

pub struct SpotifyClient {
    config: SpotifyConfig,
    client: Client,
}

#[derive(Deserialize)]
struct SearchResponse {
    artists: Option<ArtistPage>,
}

#[derive(Deserialize)]
struct ArtistPage {
    #[serde(default)]
    items: Vec<ArtistItem>,
}

#[derive(Deserialize)]
struct ArtistItem {
    id: String,
    #[serde(default)]
    images: Vec<ArtistImage>,
}

#[derive(Deserialize)]
struct ArtistImage {
    url: String,
}

impl SpotifyClient {
    pub fn new(config: SpotifyConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { config, client })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(SpotifyConfig::default())
    }
}

#[async_trait]
impl StreamingCatalog for SpotifyClient {
    async fn search_artist(&self, name: &str) -> Result<Option<CatalogArtist>> {
        if self.config.access_token.is_empty() {
            return Err(CollabGraphError::SourceUnavailable(
                "streaming catalog token not configured".into(),
            ));
        }
        let response = self
            .client
            .get(format!("{}/search", self.config.api_base))
            .bearer_auth(&self.config.access_token)
            .query(&[("type", "artist"), ("q", name), ("limit", "1")])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(CollabGraphError::SourceUnavailable(format!(
                "streaming catalog returned {}",
                response.status()
            )));
        }
        let body: SearchResponse = response.json().await?;
        let item = body
            .artists
            .and_then(|page| page.items.into_iter().next());
        Ok(item.map(|artist| CatalogArtist {
            id: artist.id,
            // Images arrive largest first.
            image_url: artist.images.into_iter().next().map(|i| i.url),
        }))
    }
}

//! MusicBrainz relation-graph client. The service enforces roughly one
//! request per second per client and requires a descriptive User-Agent, so
//! every call goes through a shared throttle.

use async_trait::async_trait;
use collabgraph_core::{CollabGraphError, MetadataGraph, RelationEdge, Result};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

#[derive(Debug, Clone)]
pub struct MusicBrainzConfig {
    pub api_base: String,
    pub user_agent: String,
    pub timeout_secs: u64,
    pub min_call_interval_ms: u64,
}

impl Default for MusicBrainzConfig {
    fn default() -> Self {
        Self {
            api_base: std::env::var("COLLABGRAPH_MUSICBRAINZ_BASE")
                .unwrap_or_else(|_| "https://musicbrainz.org/ws/2".to_string()),
            user_agent: "collabgraph/0.3 (https://github.com/collabgraph/collabgraph)".to_string(),
            timeout_secs: 20,
            min_call_interval_ms: 1100,
        }
    }
}

pub struct MusicBrainzClient {
    config: MusicBrainzConfig,
    client: Client,
    last_call: Mutex<Option<Instant>>,
}

#[derive(Deserialize)]
struct ArtistSearchResponse {
    #[serde(default)]
    artists: Vec<ArtistHit>,
}

#[derive(Deserialize)]
struct ArtistHit {
    id: String,
}

#[derive(Deserialize)]
struct ArtistRelationsResponse {
    #[serde(default)]
    relations: Vec<RawRelation>,
}

#[derive(Deserialize)]
struct RawRelation {
    #[serde(rename = "type")]
    relation_type: String,
    #[serde(default)]
    artist: Option<RelatedArtist>,
}

#[derive(Deserialize)]
struct RelatedArtist {
    name: String,
}

impl MusicBrainzClient {
    pub fn new(config: MusicBrainzConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self {
            config,
            client,
            last_call: Mutex::new(None),
        })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(MusicBrainzConfig::default())
    }

    async fn throttle(&self) {
        let mut last = self.last_call.lock().await;
        let interval = Duration::from_millis(self.config.min_call_interval_ms);
        if let Some(prev) = *last {
            let elapsed = prev.elapsed();
            if elapsed < interval {
                tokio::time::sleep(interval - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }

    async fn artist_id(&self, name: &str) -> Result<String> {
        self.throttle().await;
        let response = self
            .client
            .get(format!("{}/artist", self.config.api_base))
            .query(&[
                ("query", format!("artist:\"{name}\"")),
                ("fmt", "json".to_string()),
                ("limit", "1".to_string()),
            ])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(CollabGraphError::SourceUnavailable(format!(
                "metadata graph returned {}",
                response.status()
            )));
        }
        let body: ArtistSearchResponse = response.json().await?;
        body.artists
            .into_iter()
            .next()
            .map(|a| a.id)
            .ok_or_else(|| {
                CollabGraphError::SourceUnavailable(format!("no metadata entry for {name}"))
            })
    }
}

#[async_trait]
impl MetadataGraph for MusicBrainzClient {
    async fn relations(&self, artist_name: &str) -> Result<Vec<RelationEdge>> {
        let id = self.artist_id(artist_name).await?;
        self.throttle().await;
        let response = self
            .client
            .get(format!("{}/artist/{id}", self.config.api_base))
            .query(&[("inc", "artist-rels"), ("fmt", "json")])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(CollabGraphError::SourceUnavailable(format!(
                "metadata graph returned {}",
                response.status()
            )));
        }
        let body: ArtistRelationsResponse = response.json().await?;
        Ok(body
            .relations
            .into_iter()
            .filter_map(|r| {
                r.artist.map(|a| RelationEdge {
                    relation: r.relation_type,
                    target: a.name,
                })
            })
            .collect())
    }
}

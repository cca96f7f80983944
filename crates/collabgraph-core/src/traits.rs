use crate::{CollabGraph, CollaboratorRecord, Result, SubjectIdentity};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Text-completion service used by the generative source adapter and the
/// role classifier. Returns unstructured text expected to contain one JSON
/// object; callers own the sanitizing/decoding.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// One typed relation edge from the metadata graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationEdge {
    pub relation: String,
    pub target: String,
}

#[async_trait]
pub trait MetadataGraph: Send + Sync {
    /// All typed relation edges for an artist, by name.
    async fn relations(&self, artist_name: &str) -> Result<Vec<RelationEdge>>;
}

#[async_trait]
pub trait Encyclopedia: Send + Sync {
    /// Free-text biography summary for a person, `None` when no page matches.
    async fn summary_of(&self, name: &str) -> Result<Option<String>>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogArtist {
    pub id: String,
    pub image_url: Option<String>,
}

#[async_trait]
pub trait StreamingCatalog: Send + Sync {
    async fn search_artist(&self, name: &str) -> Result<Option<CatalogArtist>>;
}

/// The subject registry and the durable graph cache. One row per subject;
/// the cached graph lives in that row's JSON column, so caching can never
/// create a registry row.
#[async_trait]
pub trait SubjectStore: Send + Sync {
    /// Case-insensitive exact lookup.
    async fn find_by_name(&self, query: &str) -> Result<Option<SubjectIdentity>>;
    async fn exists_by_name(&self, name: &str) -> Result<bool>;
    /// Seeds or updates a registry row. Never called from the pipeline.
    async fn upsert_subject(&self, subject: &SubjectIdentity) -> Result<()>;
    /// Overwrites the cached graph for an existing subject.
    async fn put_graph(&self, canonical_name: &str, graph: &CollabGraph) -> Result<()>;
    async fn get_graph(&self, canonical_name: &str) -> Result<Option<CollabGraph>>;
}

/// Uniform contract every source adapter satisfies. The orchestrator tries
/// adapters in strict priority order; the first `Ok` result is authoritative
/// (even when empty) and stops the chain, while an `Err` falls through.
#[async_trait]
pub trait CollaboratorSource: Send + Sync {
    fn name(&self) -> &'static str;
    async fn collaborators(&self, canonical_name: &str) -> Result<Vec<CollaboratorRecord>>;
}

//! End-to-end synthesis pipeline:
//! Resolving -> SourceFallback -> Assembling -> Enriching -> Caching.
//! Only a missing subject aborts; every other failure degrades.

use collabgraph_cache::CacheWriter;
use collabgraph_core::{
    CollabGraph, CollabGraphError, CollaboratorRecord, CollaboratorSource, EngineConfig,
    Encyclopedia, MetadataGraph, Result, Role, StreamingCatalog, SubjectIdentity, SubjectStore,
    TextGenerator,
};
use collabgraph_graph::{Enricher, GraphAssembler};
use collabgraph_sources::{
    EncyclopediaSource, GenerativeSource, MetadataGraphSource, RoleClassifier,
    StaticFallbackSource,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

pub struct Synthesizer {
    store: Arc<dyn SubjectStore>,
    generator: Arc<dyn TextGenerator>,
    catalog: Arc<dyn StreamingCatalog>,
    sources: Vec<Arc<dyn CollaboratorSource>>,
    config: EngineConfig,
}

impl Synthesizer {
    /// Caller supplies the adapters, already in priority order.
    pub fn new(
        store: Arc<dyn SubjectStore>,
        generator: Arc<dyn TextGenerator>,
        catalog: Arc<dyn StreamingCatalog>,
        sources: Vec<Arc<dyn CollaboratorSource>>,
        config: EngineConfig,
    ) -> Self {
        Self {
            store,
            generator,
            catalog,
            sources,
            config,
        }
    }

    /// Standard adapter chain: generative, metadata graph, encyclopedia
    /// heuristics, static fallback.
    pub fn with_default_sources(
        store: Arc<dyn SubjectStore>,
        generator: Arc<dyn TextGenerator>,
        metadata: Arc<dyn MetadataGraph>,
        encyclopedia: Arc<dyn Encyclopedia>,
        catalog: Arc<dyn StreamingCatalog>,
        config: EngineConfig,
    ) -> Self {
        let sources: Vec<Arc<dyn CollaboratorSource>> = vec![
            Arc::new(GenerativeSource::new(Arc::clone(&generator))),
            Arc::new(MetadataGraphSource::new(metadata, config.clone())),
            Arc::new(EncyclopediaSource::new(
                encyclopedia,
                config.encyclopedia_cap,
            )),
            Arc::new(StaticFallbackSource::new()),
        ];
        Self::new(store, generator, catalog, sources, config)
    }

    pub async fn synthesize(&self, subject_query: &str) -> Result<CollabGraph> {
        let subject = self.resolve(subject_query).await?;
        info!("synthesizing graph for {}", subject.canonical_name);

        // Per-run classifier; the memo must not leak across requests.
        let classifier = RoleClassifier::new(Arc::clone(&self.generator));
        let subject_roles = classifier
            .classify_subject(&subject.canonical_name, Role::Artist)
            .await;

        let records = self.fetch_collaborators(&subject).await;
        let role_map = self.classify_records(&classifier, &records).await;

        let assembler = GraphAssembler::new(self.config.branch_cap);
        let mut graph = assembler.assemble(&subject, subject_roles, &records, &role_map);

        let enricher = Enricher::new(
            Arc::clone(&self.catalog),
            Arc::clone(&self.store),
            self.config.enrich_concurrency,
        );
        enricher.enrich(&mut graph).await;

        let writer = CacheWriter::new(Arc::clone(&self.store));
        if let Err(e) = writer.store(&subject.canonical_name, &graph).await {
            warn!("cache write failed for {}: {e}", subject.canonical_name);
        }

        Ok(graph)
    }

    async fn resolve(&self, query: &str) -> Result<SubjectIdentity> {
        self.store
            .find_by_name(query)
            .await?
            .ok_or_else(|| CollabGraphError::SubjectNotFound(query.to_string()))
    }

    /// Strict priority fallback. The first `Ok` is authoritative even when
    /// empty; an `Err` is absorbed and the next adapter is consulted.
    async fn fetch_collaborators(&self, subject: &SubjectIdentity) -> Vec<CollaboratorRecord> {
        for source in &self.sources {
            match source.collaborators(&subject.canonical_name).await {
                Ok(records) => {
                    info!(
                        "source {} answered with {} records for {}",
                        source.name(),
                        records.len(),
                        subject.canonical_name
                    );
                    return records;
                }
                Err(e) => {
                    warn!("source {} failed, falling through: {e}", source.name());
                }
            }
        }
        warn!(
            "every source failed for {}; graph will hold the subject alone",
            subject.canonical_name
        );
        Vec::new()
    }

    async fn classify_records(
        &self,
        classifier: &RoleClassifier,
        records: &[CollaboratorRecord],
    ) -> HashMap<String, Vec<Role>> {
        let mut batch: Vec<(String, Role)> = Vec::new();
        for record in records {
            if !batch
                .iter()
                .any(|(n, _)| n.eq_ignore_ascii_case(&record.name))
            {
                batch.push((record.name.clone(), record.role));
            }
        }
        if batch.is_empty() {
            return HashMap::new();
        }
        classifier.classify_batch(&batch).await
    }
}

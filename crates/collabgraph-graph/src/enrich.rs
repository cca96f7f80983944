//! Best-effort enrichment of every node with streaming-catalog and
//! registry identifiers. Each task owns exactly one node, so the fan-out
//! needs no synchronization beyond the join itself.

use collabgraph_core::{CollabGraph, GraphNode, StreamingCatalog, SubjectStore};
use futures::future::join_all;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::warn;

pub struct Enricher {
    catalog: Arc<dyn StreamingCatalog>,
    store: Arc<dyn SubjectStore>,
    concurrency: usize,
}

impl Enricher {
    pub fn new(
        catalog: Arc<dyn StreamingCatalog>,
        store: Arc<dyn SubjectStore>,
        concurrency: usize,
    ) -> Self {
        Self {
            catalog,
            store,
            concurrency: concurrency.max(1),
        }
    }

    /// Completes when every per-node task has settled; partial failures
    /// leave fields absent and never cancel the siblings.
    pub async fn enrich(&self, graph: &mut CollabGraph) {
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let nodes = std::mem::take(&mut graph.nodes);

        let mut tasks = Vec::with_capacity(nodes.len());
        for node in nodes {
            let semaphore = Arc::clone(&semaphore);
            let catalog = Arc::clone(&self.catalog);
            let store = Arc::clone(&self.store);
            // Keep the pre-enrichment node so a panicking task cannot drop
            // it and leave its edges dangling.
            let fallback = node.clone();
            let handle = tokio::spawn(async move {
                let mut node = node;
                let _permit = semaphore.acquire().await.expect("semaphore never closed");
                enrich_node(&mut node, catalog.as_ref(), store.as_ref()).await;
                node
            });
            tasks.push((handle, fallback));
        }

        let (handles, fallbacks): (Vec<_>, Vec<_>) = tasks.into_iter().unzip();
        for (outcome, fallback) in join_all(handles).await.into_iter().zip(fallbacks) {
            match outcome {
                Ok(node) => graph.nodes.push(node),
                Err(e) => {
                    warn!("enrichment task panicked for {}: {e}", fallback.display_name);
                    graph.nodes.push(fallback);
                }
            }
        }
    }
}

async fn enrich_node(node: &mut GraphNode, catalog: &dyn StreamingCatalog, store: &dyn SubjectStore) {
    match catalog.search_artist(&node.display_name).await {
        Ok(Some(artist)) => {
            node.streaming_id = Some(artist.id);
            node.streaming_image = artist.image_url;
        }
        Ok(None) => {}
        Err(e) => warn!("catalog lookup failed for {}: {e}", node.display_name),
    }
    match store.find_by_name(&node.display_name).await {
        Ok(Some(identity)) => node.registry_id = Some(identity.id),
        Ok(None) => {}
        Err(e) => warn!("registry lookup failed for {}: {e}", node.display_name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use collabgraph_core::{
        CatalogArtist, CollabGraphError, GraphEdge, Result, Role, SubjectIdentity, SIZE_MAIN,
    };
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedCatalog {
        known: Vec<(&'static str, &'static str)>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl StreamingCatalog for FixedCatalog {
        async fn search_artist(&self, name: &str) -> Result<Option<CatalogArtist>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .known
                .iter()
                .find(|(n, _)| n.eq_ignore_ascii_case(name))
                .map(|(_, id)| CatalogArtist {
                    id: id.to_string(),
                    image_url: Some(format!("https://img.example/{id}.jpg")),
                }))
        }
    }

    struct FailingCatalog;

    #[async_trait]
    impl StreamingCatalog for FailingCatalog {
        async fn search_artist(&self, _name: &str) -> Result<Option<CatalogArtist>> {
            Err(CollabGraphError::SourceUnavailable("catalog down".into()))
        }
    }

    struct PanickingCatalog(&'static str);

    #[async_trait]
    impl StreamingCatalog for PanickingCatalog {
        async fn search_artist(&self, name: &str) -> Result<Option<CatalogArtist>> {
            if name.eq_ignore_ascii_case(self.0) {
                panic!("catalog blew up");
            }
            Ok(None)
        }
    }

    struct RegistryWithSubject(&'static str);

    #[async_trait]
    impl SubjectStore for RegistryWithSubject {
        async fn find_by_name(&self, query: &str) -> Result<Option<SubjectIdentity>> {
            if query.eq_ignore_ascii_case(self.0) {
                Ok(Some(SubjectIdentity {
                    id: "reg-1".into(),
                    canonical_name: self.0.to_string(),
                }))
            } else {
                Ok(None)
            }
        }

        async fn exists_by_name(&self, name: &str) -> Result<bool> {
            Ok(name.eq_ignore_ascii_case(self.0))
        }

        async fn upsert_subject(&self, _subject: &SubjectIdentity) -> Result<()> {
            Ok(())
        }

        async fn put_graph(&self, _name: &str, _graph: &CollabGraph) -> Result<()> {
            Ok(())
        }

        async fn get_graph(&self, _name: &str) -> Result<Option<CollabGraph>> {
            Ok(None)
        }
    }

    fn two_node_graph() -> CollabGraph {
        CollabGraph {
            nodes: vec![
                GraphNode::new("Ava Example", vec![Role::Artist], SIZE_MAIN),
                GraphNode::new("Max Producer", vec![Role::Producer], 20),
            ],
            links: vec![GraphEdge::new("Ava Example", "Max Producer")],
        }
    }

    #[tokio::test]
    async fn fills_ids_and_images_per_node() {
        let catalog = Arc::new(FixedCatalog {
            known: vec![("Ava Example", "cat-ava")],
            calls: AtomicUsize::new(0),
        });
        let store = Arc::new(RegistryWithSubject("Ava Example"));
        let enricher = Enricher::new(
            Arc::clone(&catalog) as Arc<dyn StreamingCatalog>,
            store,
            4,
        );
        let mut graph = two_node_graph();
        enricher.enrich(&mut graph).await;

        assert_eq!(catalog.calls.load(Ordering::SeqCst), 2);
        let ava = graph.node("Ava Example").unwrap();
        assert_eq!(ava.streaming_id.as_deref(), Some("cat-ava"));
        assert!(ava.streaming_image.is_some());
        assert_eq!(ava.registry_id.as_deref(), Some("reg-1"));

        let max = graph.node("Max Producer").unwrap();
        assert!(max.streaming_id.is_none());
        assert!(max.registry_id.is_none());
    }

    #[tokio::test]
    async fn failures_degrade_to_absent_fields() {
        let enricher = Enricher::new(
            Arc::new(FailingCatalog),
            Arc::new(RegistryWithSubject("Ava Example")),
            2,
        );
        let mut graph = two_node_graph();
        enricher.enrich(&mut graph).await;

        assert_eq!(graph.nodes.len(), 2);
        assert!(graph.node("Max Producer").unwrap().streaming_id.is_none());
        // The registry half still succeeded for the subject.
        assert_eq!(
            graph.node("Ava Example").unwrap().registry_id.as_deref(),
            Some("reg-1")
        );
    }

    #[tokio::test]
    async fn panicking_task_keeps_the_node_in_the_graph() {
        let enricher = Enricher::new(
            Arc::new(PanickingCatalog("Max Producer")),
            Arc::new(RegistryWithSubject("Ava Example")),
            2,
        );
        let mut graph = two_node_graph();
        enricher.enrich(&mut graph).await;

        assert_eq!(graph.nodes.len(), 2);
        let survivor = graph.node("Max Producer").unwrap();
        assert!(survivor.streaming_id.is_none());
        assert!(survivor.registry_id.is_none());
        // Every link endpoint still resolves against a node.
        for link in &graph.links {
            assert!(graph.node(&link.source).is_some());
            assert!(graph.node(&link.target).is_some());
        }
    }
}

//! Cache writer: persists a freshly synthesized graph, gated on the subject
//! already being registered. Caching must never create a registry row.

use collabgraph_core::{CollabGraph, CollabGraphError, Result, SubjectStore};
use std::sync::Arc;
use tracing::debug;

pub struct CacheWriter {
    store: Arc<dyn SubjectStore>,
}

impl CacheWriter {
    pub fn new(store: Arc<dyn SubjectStore>) -> Self {
        Self { store }
    }

    /// Overwrites any prior value. The caller decides whether a failure is
    /// fatal; in the synthesis pipeline it never is.
    pub async fn store(&self, canonical_name: &str, graph: &CollabGraph) -> Result<()> {
        if !self.store.exists_by_name(canonical_name).await? {
            return Err(CollabGraphError::Persistence(format!(
                "refusing to cache graph for unregistered subject {canonical_name}"
            )));
        }
        self.store.put_graph(canonical_name, graph).await?;
        debug!("cached graph for {canonical_name}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::SubjectStorage;
    use collabgraph_core::SubjectIdentity;
    use tempfile::TempDir;

    #[tokio::test]
    async fn refuses_unregistered_subjects() {
        let dir = TempDir::new().unwrap();
        let storage = Arc::new(SubjectStorage::open(dir.path()).unwrap());
        let writer = CacheWriter::new(Arc::clone(&storage) as Arc<dyn SubjectStore>);

        let err = writer
            .store("Ava Example", &CollabGraph::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CollabGraphError::Persistence(_)));

        storage
            .upsert_subject(&SubjectIdentity {
                id: "subj-1".into(),
                canonical_name: "Ava Example".into(),
            })
            .await
            .unwrap();
        writer
            .store("Ava Example", &CollabGraph::default())
            .await
            .unwrap();
        assert!(storage.get_graph("Ava Example").await.unwrap().is_some());
    }
}

//! RocksDB persistence: one column family for registry rows, one for the
//! cached graphs. All DB calls go through `spawn_blocking` so the async
//! pipeline never blocks a runtime thread.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use collabgraph_core::{
    CollabGraph, CollabGraphError, Result, SubjectIdentity, SubjectStore,
};
use rocksdb::{ColumnFamilyDescriptor, Options, DB};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tokio::task;
use tracing::{debug, info};

pub const CF_SUBJECTS: &str = "subjects";
pub const CF_GRAPHS: &str = "graphs";

/// Cached graph as stored on disk. Overwritten on every regeneration; the
/// timestamp is informational only, there is no TTL.
#[derive(Debug, Serialize, Deserialize)]
struct StoredGraph {
    graph: CollabGraph,
    updated_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct SubjectStorage {
    db: Arc<DB>,
}

fn row_key(name: &str) -> Vec<u8> {
    name.trim().to_lowercase().into_bytes()
}

fn persistence(e: impl std::fmt::Display) -> CollabGraphError {
    CollabGraphError::Persistence(e.to_string())
}

impl SubjectStorage {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cfs = vec![
            ColumnFamilyDescriptor::new(CF_SUBJECTS, Options::default()),
            ColumnFamilyDescriptor::new(CF_GRAPHS, Options::default()),
        ];
        let db = DB::open_cf_descriptors(&opts, path, cfs).map_err(persistence)?;
        info!("subject storage opened");
        Ok(Self { db: Arc::new(db) })
    }

    async fn get_raw(&self, cf_name: &'static str, key: Vec<u8>) -> Result<Option<Vec<u8>>> {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || {
            let cf = db
                .cf_handle(cf_name)
                .ok_or_else(|| persistence(format!("missing column family {cf_name}")))?;
            db.get_cf(cf, key).map_err(persistence)
        })
        .await
        .map_err(persistence)?
    }

    async fn put_raw(&self, cf_name: &'static str, key: Vec<u8>, value: Vec<u8>) -> Result<()> {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || {
            let cf = db
                .cf_handle(cf_name)
                .ok_or_else(|| persistence(format!("missing column family {cf_name}")))?;
            db.put_cf(cf, key, value).map_err(persistence)
        })
        .await
        .map_err(persistence)?
    }
}

#[async_trait]
impl SubjectStore for SubjectStorage {
    async fn find_by_name(&self, query: &str) -> Result<Option<SubjectIdentity>> {
        let Some(bytes) = self.get_raw(CF_SUBJECTS, row_key(query)).await? else {
            return Ok(None);
        };
        let identity: SubjectIdentity = serde_json::from_slice(&bytes)?;
        Ok(Some(identity))
    }

    async fn exists_by_name(&self, name: &str) -> Result<bool> {
        Ok(self.get_raw(CF_SUBJECTS, row_key(name)).await?.is_some())
    }

    async fn upsert_subject(&self, subject: &SubjectIdentity) -> Result<()> {
        let value = serde_json::to_vec(subject)?;
        self.put_raw(CF_SUBJECTS, row_key(&subject.canonical_name), value)
            .await?;
        debug!("registered subject {}", subject.canonical_name);
        Ok(())
    }

    async fn put_graph(&self, canonical_name: &str, graph: &CollabGraph) -> Result<()> {
        let stored = StoredGraph {
            graph: graph.clone(),
            updated_at: Utc::now(),
        };
        let value = serde_json::to_vec(&stored)?;
        self.put_raw(CF_GRAPHS, row_key(canonical_name), value).await
    }

    async fn get_graph(&self, canonical_name: &str) -> Result<Option<CollabGraph>> {
        let Some(bytes) = self.get_raw(CF_GRAPHS, row_key(canonical_name)).await? else {
            return Ok(None);
        };
        let stored: StoredGraph = serde_json::from_slice(&bytes)?;
        Ok(Some(stored.graph))
    }
}

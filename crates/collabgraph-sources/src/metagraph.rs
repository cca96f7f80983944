//! Second-priority source: typed relation edges from the public music
//! metadata graph, mapped best-effort onto the role enum.

use async_trait::async_trait;
use collabgraph_core::{
    CollaboratorRecord, CollaboratorSource, EngineConfig, MetadataGraph, Result, Role,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Upstream relation typing is frequently wrong for well-known songwriters
/// (they surface as performers or producers), so this table forces the
/// songwriter role regardless of the raw relation type.
pub const SONGWRITER_OVERRIDES: &[&str] = &[
    "Max Martin",
    "Diane Warren",
    "Desmond Child",
    "Linda Perry",
    "Bonnie McKee",
    "Savan Kotecha",
    "Justin Tranter",
    "Julia Michaels",
];

/// Best-effort relation-type -> role mapping. Returns `None` for relation
/// types that say nothing about a person-to-person working relationship
/// (label contracts, dedications, and the like).
pub fn role_for_relation(relation: &str) -> Option<Role> {
    let rel = relation.to_lowercase();
    if ["producer", "engineer", "mix", "mastering"]
        .iter()
        .any(|k| rel.contains(k))
    {
        Some(Role::Producer)
    } else if ["composer", "lyricist", "writer", "arranger"]
        .iter()
        .any(|k| rel.contains(k))
    {
        Some(Role::Songwriter)
    } else if [
        "member of band",
        "vocal",
        "instrument",
        "performance",
        "performer",
        "collaboration",
        "featured",
        "supporting",
    ]
    .iter()
    .any(|k| rel.contains(k))
    {
        Some(Role::Artist)
    } else {
        None
    }
}

pub fn is_songwriter_override(name: &str) -> bool {
    SONGWRITER_OVERRIDES
        .iter()
        .any(|s| s.eq_ignore_ascii_case(name))
}

pub struct MetadataGraphSource {
    graph: Arc<dyn MetadataGraph>,
    config: EngineConfig,
}

impl MetadataGraphSource {
    pub fn new(graph: Arc<dyn MetadataGraph>, config: EngineConfig) -> Self {
        Self { graph, config }
    }

    async fn throttle(&self) {
        tokio::time::sleep(Duration::from_millis(self.config.metadata_delay_ms)).await;
    }

    /// Second fetch that fills a performer's own top collaborators for the
    /// branching expansion. Strictly best-effort; a failure here only means
    /// an empty branch list.
    async fn top_collaborators_of(&self, name: &str, subject: &str) -> Vec<String> {
        self.throttle().await;
        match self.graph.relations(name).await {
            Ok(edges) => edges
                .iter()
                .filter(|e| role_for_relation(&e.relation) == Some(Role::Artist))
                .map(|e| e.target.clone())
                .filter(|t| !t.eq_ignore_ascii_case(subject) && !t.eq_ignore_ascii_case(name))
                .take(3)
                .collect(),
            Err(e) => {
                debug!("top-collaborator fetch for {name} failed: {e}");
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl CollaboratorSource for MetadataGraphSource {
    fn name(&self) -> &'static str {
        "metadata-graph"
    }

    async fn collaborators(&self, canonical_name: &str) -> Result<Vec<CollaboratorRecord>> {
        let edges = self.graph.relations(canonical_name).await?;

        let mut performers: Vec<CollaboratorRecord> = Vec::new();
        let mut producers: Vec<CollaboratorRecord> = Vec::new();
        let mut songwriters: Vec<CollaboratorRecord> = Vec::new();

        for edge in edges {
            let target = edge.target.trim().to_string();
            if target.is_empty() || target.eq_ignore_ascii_case(canonical_name) {
                continue;
            }
            let Some(mapped) = role_for_relation(&edge.relation) else {
                continue;
            };
            let role = if is_songwriter_override(&target) {
                Role::Songwriter
            } else {
                mapped
            };
            let bucket = match role {
                Role::Artist => &mut performers,
                Role::Producer => &mut producers,
                Role::Songwriter => &mut songwriters,
            };
            if bucket.iter().any(|r| r.name.eq_ignore_ascii_case(&target)) {
                continue;
            }
            bucket.push(CollaboratorRecord::new(target, role));
        }

        // Producers and songwriters are capped independently to bound
        // downstream enrichment cost; performer relations are not.
        if producers.len() > self.config.producer_cap {
            warn!(
                "capping producers from {} to {}",
                producers.len(),
                self.config.producer_cap
            );
            producers.truncate(self.config.producer_cap);
        }
        if songwriters.len() > self.config.songwriter_cap {
            songwriters.truncate(self.config.songwriter_cap);
        }

        for record in performers.iter_mut().take(self.config.branch_cap) {
            record.top_collaborators = self
                .top_collaborators_of(&record.name, canonical_name)
                .await;
        }

        let mut records = performers;
        records.append(&mut producers);
        records.append(&mut songwriters);
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use collabgraph_core::{CollabGraphError, RelationEdge};
    use std::collections::HashMap;

    struct FixedGraph {
        relations: HashMap<String, Vec<RelationEdge>>,
    }

    impl FixedGraph {
        fn new(entries: Vec<(&str, Vec<(&str, &str)>)>) -> Self {
            let relations = entries
                .into_iter()
                .map(|(name, edges)| {
                    (
                        name.to_string(),
                        edges
                            .into_iter()
                            .map(|(rel, target)| RelationEdge {
                                relation: rel.to_string(),
                                target: target.to_string(),
                            })
                            .collect(),
                    )
                })
                .collect();
            Self { relations }
        }
    }

    #[async_trait]
    impl MetadataGraph for FixedGraph {
        async fn relations(&self, artist_name: &str) -> Result<Vec<RelationEdge>> {
            self.relations
                .get(artist_name)
                .cloned()
                .ok_or_else(|| CollabGraphError::SourceUnavailable("no such artist".into()))
        }
    }

    fn quick_config() -> EngineConfig {
        EngineConfig {
            metadata_delay_ms: 0,
            ..EngineConfig::default()
        }
    }

    #[tokio::test]
    async fn maps_relation_types_to_roles() {
        let graph = FixedGraph::new(vec![(
            "Ava Example",
            vec![
                ("producer", "Pat Knobs"),
                ("composer", "Wendy Words"),
                ("member of band", "Sam Stage"),
                ("dedication", "Irrelevant Person"),
            ],
        )]);
        let src = MetadataGraphSource::new(Arc::new(graph), quick_config());
        let records = src.collaborators("Ava Example").await.unwrap();
        let role_of = |name: &str| {
            records
                .iter()
                .find(|r| r.name == name)
                .map(|r| r.role)
        };
        assert_eq!(role_of("Pat Knobs"), Some(Role::Producer));
        assert_eq!(role_of("Wendy Words"), Some(Role::Songwriter));
        assert_eq!(role_of("Sam Stage"), Some(Role::Artist));
        assert_eq!(role_of("Irrelevant Person"), None);
    }

    #[tokio::test]
    async fn songwriter_override_beats_relation_type() {
        let graph = FixedGraph::new(vec![(
            "Ava Example",
            vec![("producer", "Max Martin")],
        )]);
        let src = MetadataGraphSource::new(Arc::new(graph), quick_config());
        let records = src.collaborators("Ava Example").await.unwrap();
        assert_eq!(records[0].role, Role::Songwriter);
    }

    #[tokio::test]
    async fn producers_and_songwriters_are_capped_independently() {
        let producer_edges: Vec<(&str, &str)> = vec![
            ("producer", "P One"),
            ("producer", "P Two"),
            ("producer", "P Three"),
            ("producer", "P Four"),
            ("producer", "P Five"),
            ("producer", "P Six"),
            ("producer", "P Seven"),
            ("composer", "W One"),
            ("vocal", "A One"),
            ("vocal", "A Two"),
        ];
        let graph = FixedGraph::new(vec![("Ava Example", producer_edges)]);
        let src = MetadataGraphSource::new(Arc::new(graph), quick_config());
        let records = src.collaborators("Ava Example").await.unwrap();
        let producers = records.iter().filter(|r| r.role == Role::Producer).count();
        let songwriters = records.iter().filter(|r| r.role == Role::Songwriter).count();
        let artists = records.iter().filter(|r| r.role == Role::Artist).count();
        assert_eq!(producers, 5);
        assert_eq!(songwriters, 1);
        assert_eq!(artists, 2);
    }

    #[tokio::test]
    async fn performer_branches_come_from_second_fetch() {
        let graph = FixedGraph::new(vec![
            ("Ava Example", vec![("vocal", "Sam Stage")]),
            (
                "Sam Stage",
                vec![
                    ("vocal", "Ava Example"),
                    ("vocal", "Third Voice"),
                    ("producer", "Not A Branch"),
                ],
            ),
        ]);
        let src = MetadataGraphSource::new(Arc::new(graph), quick_config());
        let records = src.collaborators("Ava Example").await.unwrap();
        assert_eq!(records[0].top_collaborators, vec!["Third Voice".to_string()]);
    }

    #[tokio::test]
    async fn unknown_artist_propagates_source_error() {
        let graph = FixedGraph::new(vec![]);
        let src = MetadataGraphSource::new(Arc::new(graph), quick_config());
        let err = src.collaborators("Nobody").await.unwrap_err();
        assert!(matches!(err, CollabGraphError::SourceUnavailable(_)));
    }
}

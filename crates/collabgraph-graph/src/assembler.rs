//! Deduplicated node/edge assembly. Runs single-threaded within one
//! synthesis, so a plain map suffices; no node is ever deleted during a run.

use collabgraph_core::{
    order_roles, CollabGraph, CollaboratorRecord, GraphEdge, GraphNode, Role, SubjectIdentity,
    SIZE_BRANCH_MAX, SIZE_BRANCH_MIN, SIZE_COLLABORATOR, SIZE_MAIN,
};
use std::collections::HashMap;
use tracing::debug;

pub struct GraphAssembler {
    branch_cap: usize,
}

impl Default for GraphAssembler {
    fn default() -> Self {
        Self { branch_cap: 3 }
    }
}

impl GraphAssembler {
    pub fn new(branch_cap: usize) -> Self {
        Self { branch_cap }
    }

    /// Builds the full graph from raw records plus the per-run role map
    /// (classifier output; names absent from the map keep the record's own
    /// role, branches default to artist).
    pub fn assemble(
        &self,
        subject: &SubjectIdentity,
        subject_roles: Vec<Role>,
        records: &[CollaboratorRecord],
        role_map: &HashMap<String, Vec<Role>>,
    ) -> CollabGraph {
        let mut graph = CollabGraph::default();
        let mut index: HashMap<String, usize> = HashMap::new();

        let main_roles = if subject_roles.is_empty() {
            vec![Role::Artist]
        } else {
            subject_roles
        };
        let main = GraphNode::new(subject.canonical_name.clone(), main_roles, SIZE_MAIN);
        index.insert(key(&main.id), 0);
        graph.nodes.push(main);

        for record in records {
            let name = record.name.trim();
            if name.is_empty() || name.eq_ignore_ascii_case(&subject.canonical_name) {
                continue;
            }
            let node_idx = match index.get(&key(name)) {
                Some(&idx) => {
                    let node = &mut graph.nodes[idx];
                    node.add_role(record.role);
                    idx
                }
                None => {
                    let roles = lookup_roles(role_map, name)
                        .unwrap_or_else(|| vec![record.role]);
                    let node = GraphNode::new(name, roles, SIZE_COLLABORATOR);
                    let idx = graph.nodes.len();
                    index.insert(key(name), idx);
                    graph.nodes.push(node);
                    idx
                }
            };
            for top in &record.top_collaborators {
                let node = &mut graph.nodes[node_idx];
                if !node
                    .collaboration_refs
                    .iter()
                    .any(|r| r.eq_ignore_ascii_case(top))
                {
                    node.collaboration_refs.push(top.clone());
                }
            }
            // Edge endpoints carry the stored node's id, not the record's
            // casing, so every link resolves against an existing node.
            let node_id = graph.nodes[node_idx].id.clone();
            add_edge(&mut graph, &subject.canonical_name, &node_id);
        }

        self.expand_branches(subject, &mut graph, &mut index, role_map);

        debug!(
            "assembled {} nodes / {} links for {}",
            graph.nodes.len(),
            graph.links.len(),
            subject.canonical_name
        );
        graph
    }

    /// Exactly one level deep: branches never branch further within a run.
    fn expand_branches(
        &self,
        subject: &SubjectIdentity,
        graph: &mut CollabGraph,
        index: &mut HashMap<String, usize>,
        role_map: &HashMap<String, Vec<Role>>,
    ) {
        let collaborators: Vec<(String, Vec<String>)> = graph
            .nodes
            .iter()
            .skip(1)
            .map(|n| (n.id.clone(), n.collaboration_refs.clone()))
            .collect();

        for (collab_name, refs) in collaborators {
            let mut taken = 0;
            for branch_name in refs {
                if taken >= self.branch_cap {
                    break;
                }
                let trimmed = branch_name.trim();
                if trimmed.is_empty()
                    || trimmed.eq_ignore_ascii_case(&subject.canonical_name)
                    || index.contains_key(&key(trimmed))
                {
                    continue;
                }
                let roles =
                    lookup_roles(role_map, trimmed).unwrap_or_else(|| vec![Role::Artist]);
                let size =
                    SIZE_BRANCH_MIN + fastrand::u32(0..=(SIZE_BRANCH_MAX - SIZE_BRANCH_MIN));
                let node = GraphNode::new(trimmed, roles, size);
                index.insert(key(trimmed), graph.nodes.len());
                graph.nodes.push(node);
                add_edge(graph, &collab_name, trimmed);
                taken += 1;
            }
        }
    }
}

fn key(name: &str) -> String {
    name.trim().to_lowercase()
}

fn lookup_roles(role_map: &HashMap<String, Vec<Role>>, name: &str) -> Option<Vec<Role>> {
    role_map
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| order_roles(v.clone()))
        .filter(|v| !v.is_empty())
}

/// Unordered-pair dedup: both (a,b) and (b,a) must be absent before insert.
fn add_edge(graph: &mut CollabGraph, source: &str, target: &str) {
    if !graph.has_edge(source, target) {
        graph.links.push(GraphEdge::new(source, target));
    }
}

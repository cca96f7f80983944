use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Size tier of the subject's own node.
pub const SIZE_MAIN: u32 = 30;
/// Size tier of a first-degree collaborator node.
pub const SIZE_COLLABORATOR: u32 = 20;
/// Lower bound of the second-degree (branch) node size tier.
pub const SIZE_BRANCH_MIN: u32 = 15;
/// Upper bound of the second-degree (branch) node size tier.
pub const SIZE_BRANCH_MAX: u32 = 16;

pub const COLOR_ARTIST: &str = "#ff6b6b";
pub const COLOR_PRODUCER: &str = "#4ecdc4";
pub const COLOR_SONGWRITER: &str = "#ffe66d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Artist,
    Producer,
    Songwriter,
}

impl Role {
    pub fn color(&self) -> &'static str {
        match self {
            Role::Artist => COLOR_ARTIST,
            Role::Producer => COLOR_PRODUCER,
            Role::Songwriter => COLOR_SONGWRITER,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Artist => write!(f, "artist"),
            Role::Producer => write!(f, "producer"),
            Role::Songwriter => write!(f, "songwriter"),
        }
    }
}

impl FromStr for Role {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "artist" => Ok(Role::Artist),
            "producer" => Ok(Role::Producer),
            "songwriter" => Ok(Role::Songwriter),
            _ => Err(()),
        }
    }
}

/// Canonical identity of a subject as stored in the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectIdentity {
    pub id: String,
    pub canonical_name: String,
}

/// Raw collaborator as reported by a single source adapter. Ephemeral;
/// consumed by the graph assembler and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollaboratorRecord {
    pub name: String,
    pub role: Role,
    #[serde(default)]
    pub top_collaborators: Vec<String>,
}

impl CollaboratorRecord {
    pub fn new(name: impl Into<String>, role: Role) -> Self {
        Self {
            name: name.into(),
            role,
            top_collaborators: Vec::new(),
        }
    }

    pub fn with_top(mut self, top: Vec<String>) -> Self {
        self.top_collaborators = top;
        self
    }
}

/// A rendered graph node. `id` equals `display_name`; names are the natural
/// key at this layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    pub id: String,
    pub display_name: String,
    pub roles: Vec<Role>,
    pub size: u32,
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registry_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub streaming_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub streaming_image: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub collaboration_refs: Vec<String>,
}

impl GraphNode {
    pub fn new(name: impl Into<String>, roles: Vec<Role>, size: u32) -> Self {
        let name = name.into();
        let roles = order_roles(roles);
        let color = color_for(&roles).to_string();
        Self {
            id: name.clone(),
            display_name: name,
            roles,
            size,
            color,
            registry_id: None,
            streaming_id: None,
            streaming_image: None,
            collaboration_refs: Vec::new(),
        }
    }

    /// Adds a role if absent, keeping artist first, and refreshes the color.
    pub fn add_role(&mut self, role: Role) {
        if !self.roles.contains(&role) {
            self.roles.push(role);
            self.roles = order_roles(std::mem::take(&mut self.roles));
            self.color = color_for(&self.roles).to_string();
        }
    }
}

/// Moves `Artist` to the front when present, preserving the encounter order
/// of the remaining roles.
pub fn order_roles(mut roles: Vec<Role>) -> Vec<Role> {
    if let Some(pos) = roles.iter().position(|r| *r == Role::Artist) {
        if pos > 0 {
            let artist = roles.remove(pos);
            roles.insert(0, artist);
        }
    }
    roles
}

/// Color tag derivation. Pure function of the role set.
pub fn color_for(roles: &[Role]) -> &'static str {
    let has = |r: Role| roles.contains(&r);
    if has(Role::Artist) && has(Role::Songwriter) {
        COLOR_ARTIST
    } else if has(Role::Producer) && has(Role::Songwriter) {
        COLOR_PRODUCER
    } else {
        roles.first().map(Role::color).unwrap_or(COLOR_ARTIST)
    }
}

/// Directed for storage, undirected for dedup: an A-B edge is equivalent to
/// B-A and must never be duplicated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
}

impl GraphEdge {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }

    /// Endpoint comparison is case-insensitive, matching node identity.
    pub fn same_pair(&self, a: &str, b: &str) -> bool {
        (self.source.eq_ignore_ascii_case(a) && self.target.eq_ignore_ascii_case(b))
            || (self.source.eq_ignore_ascii_case(b) && self.target.eq_ignore_ascii_case(a))
    }
}

/// The wire payload returned by `synthesize` and persisted in the cache.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollabGraph {
    pub nodes: Vec<GraphNode>,
    pub links: Vec<GraphEdge>,
}

impl CollabGraph {
    pub fn node(&self, name: &str) -> Option<&GraphNode> {
        self.nodes
            .iter()
            .find(|n| n.id.eq_ignore_ascii_case(name))
    }

    pub fn node_mut(&mut self, name: &str) -> Option<&mut GraphNode> {
        self.nodes
            .iter_mut()
            .find(|n| n.id.eq_ignore_ascii_case(name))
    }

    pub fn has_edge(&self, a: &str, b: &str) -> bool {
        self.links.iter().any(|e| e.same_pair(a, b))
    }
}

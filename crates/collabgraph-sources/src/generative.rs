//! Highest-priority source: one natural-language generation request asking
//! for real collaborators. The reply is decoded into typed records at the
//! boundary; raw maps never travel further into the pipeline.

use crate::fabrication::is_fabricated;
use crate::sanitize::extract_json_object;
use async_trait::async_trait;
use collabgraph_core::{
    CollabGraphError, CollaboratorRecord, CollaboratorSource, Result, Role, TextGenerator,
};
use serde::Deserialize;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, warn};

pub struct GenerativeSource {
    generator: Arc<dyn TextGenerator>,
}

#[derive(Debug, Deserialize)]
struct GenerativeReply {
    #[serde(default)]
    collaborators: Vec<GenerativeCollaborator>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerativeCollaborator {
    name: String,
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    top_collaborators: Vec<String>,
}

impl GenerativeSource {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    fn prompt_for(subject: &str) -> String {
        format!(
            "List real, verifiable professional collaborators of the musician \
             {subject}. For each give their role (artist, producer or \
             songwriter) and up to three of their own best-known \
             collaborators. Respond with only a JSON object of the form \
             {{\"collaborators\": [{{\"name\": \"...\", \"role\": \"producer\", \
             \"topCollaborators\": [\"...\"]}}]}}. Do not invent names."
        )
    }
}

#[async_trait]
impl CollaboratorSource for GenerativeSource {
    fn name(&self) -> &'static str {
        "generative"
    }

    async fn collaborators(&self, canonical_name: &str) -> Result<Vec<CollaboratorRecord>> {
        let text = self.generator.complete(&Self::prompt_for(canonical_name)).await?;
        let span = extract_json_object(&text).ok_or_else(|| {
            CollabGraphError::MalformedResponse("generative reply holds no JSON object".into())
        })?;
        let reply: GenerativeReply = serde_json::from_str(span).map_err(|e| {
            CollabGraphError::MalformedResponse(format!("generative reply did not decode: {e}"))
        })?;

        let mut records = Vec::new();
        for collab in reply.collaborators {
            let name = collab.name.trim().to_string();
            if is_fabricated(&name) {
                warn!("dropping fabricated collaborator name {name:?}");
                continue;
            }
            if name.eq_ignore_ascii_case(canonical_name) {
                debug!("dropping self-reference {name:?}");
                continue;
            }
            let role = collab
                .role
                .as_deref()
                .and_then(|r| Role::from_str(r).ok())
                .unwrap_or(Role::Artist);
            let top = collab
                .top_collaborators
                .into_iter()
                .map(|n| n.trim().to_string())
                .filter(|n| !is_fabricated(n))
                .collect();
            records.push(CollaboratorRecord::new(name, role).with_top(top));
        }
        Ok(records)
    }
}

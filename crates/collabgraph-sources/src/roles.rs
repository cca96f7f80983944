//! Role classification backed by the text-generation service, with a
//! per-run memo so no name is classified twice within one synthesis.

use crate::sanitize::extract_json_object;
use collabgraph_core::{order_roles, Role, TextGenerator};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, warn};

/// One instance per synthesis run. The memo is deliberately not
/// process-global so concurrent runs for different subjects stay isolated.
pub struct RoleClassifier {
    generator: Arc<dyn TextGenerator>,
    memo: Mutex<HashMap<String, Vec<Role>>>,
}

impl RoleClassifier {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator,
            memo: Mutex::new(HashMap::new()),
        }
    }

    /// Memoized role set for a name classified earlier in this run.
    pub fn roles_for(&self, name: &str) -> Option<Vec<Role>> {
        self.memo.lock().get(&memo_key(name)).cloned()
    }

    /// Classifies the main subject ahead of the batch and seeds the memo so
    /// collaborator classification stays consistent with it.
    pub async fn classify_subject(&self, name: &str, default: Role) -> Vec<Role> {
        if let Some(roles) = self.roles_for(name) {
            return roles;
        }
        let prompt = format!(
            "Which of the roles artist, producer, songwriter does {name} hold \
             in the music industry? Respond with only a JSON object of the form \
             {{\"{name}\": [\"artist\"]}} using exactly those role words."
        );
        let parsed = match self.generator.complete(&prompt).await {
            Ok(text) => parse_role_reply(&text),
            Err(e) => {
                warn!("subject classification failed for {name}: {e}");
                None
            }
        };
        let roles = parsed
            .and_then(|m| lookup_ci(&m, name))
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| vec![default]);
        let roles = order_roles(roles);
        self.memo.lock().insert(memo_key(name), roles.clone());
        roles
    }

    /// One batched request for every unclassified name. Any failure, from
    /// transport to an unparseable payload, silently falls back to each
    /// name's pipeline-supplied default role.
    pub async fn classify_batch(
        &self,
        names: &[(String, Role)],
    ) -> HashMap<String, Vec<Role>> {
        let pending: Vec<&(String, Role)> = {
            let memo = self.memo.lock();
            names
                .iter()
                .filter(|(n, _)| !memo.contains_key(&memo_key(n)))
                .collect()
        };

        if !pending.is_empty() {
            let listed = pending
                .iter()
                .map(|(n, _)| n.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            let prompt = format!(
                "For each of these music industry people: {listed}. Which of \
                 the roles artist, producer, songwriter does each hold? Respond \
                 with only a JSON object mapping each name to an array of role \
                 words, e.g. {{\"Some Name\": [\"producer\", \"songwriter\"]}}."
            );
            let parsed = match self.generator.complete(&prompt).await {
                Ok(text) => parse_role_reply(&text),
                Err(e) => {
                    warn!("batch classification failed, using defaults: {e}");
                    None
                }
            };
            let mut memo = self.memo.lock();
            for (name, default) in &pending {
                let roles = parsed
                    .as_ref()
                    .and_then(|m| lookup_ci(m, name))
                    .filter(|r| !r.is_empty())
                    .unwrap_or_else(|| vec![*default]);
                memo.insert(memo_key(name), order_roles(roles));
            }
            debug!("classified {} new names", pending.len());
        }

        let memo = self.memo.lock();
        names
            .iter()
            .map(|(n, default)| {
                let roles = memo
                    .get(&memo_key(n))
                    .cloned()
                    .unwrap_or_else(|| vec![*default]);
                (n.clone(), roles)
            })
            .collect()
    }
}

fn memo_key(name: &str) -> String {
    name.trim().to_lowercase()
}

fn lookup_ci(map: &HashMap<String, Vec<Role>>, name: &str) -> Option<Vec<Role>> {
    map.iter()
        .find(|(k, _)| k.trim().eq_ignore_ascii_case(name.trim()))
        .map(|(_, v)| v.clone())
}

/// Decodes a classification reply into name -> roles, discarding any role
/// word outside the fixed enum.
fn parse_role_reply(text: &str) -> Option<HashMap<String, Vec<Role>>> {
    let span = extract_json_object(text)?;
    let value: serde_json::Value = serde_json::from_str(span).ok()?;
    let object = value.as_object()?;
    let mut out = HashMap::new();
    for (name, roles) in object {
        let parsed: Vec<Role> = roles
            .as_array()
            .map(|arr| {
                arr.iter()
                    .filter_map(|v| v.as_str())
                    .filter_map(|s| Role::from_str(s).ok())
                    .collect()
            })
            .unwrap_or_default();
        let mut deduped: Vec<Role> = Vec::new();
        for role in parsed {
            if !deduped.contains(&role) {
                deduped.push(role);
            }
        }
        out.insert(name.clone(), deduped);
    }
    Some(out)
}

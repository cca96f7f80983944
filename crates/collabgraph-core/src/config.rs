use serde::{Deserialize, Serialize};
use std::env;

fn env_usize(name: &str, default: usize) -> usize {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Tuning knobs for one synthesis pipeline instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Concurrency ceiling for the enrichment fan-out.
    pub enrich_concurrency: usize,
    /// Branches taken per collaborator during branching expansion.
    pub branch_cap: usize,
    /// Producer results kept by the metadata-graph adapter.
    pub producer_cap: usize,
    /// Songwriter results kept by the metadata-graph adapter.
    pub songwriter_cap: usize,
    /// Candidates kept by the encyclopedia-heuristic adapter.
    pub encyclopedia_cap: usize,
    /// Self-throttle between successive metadata-graph calls, in milliseconds.
    pub metadata_delay_ms: u64,
    /// Timeout applied to every external request, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            enrich_concurrency: env_usize("COLLABGRAPH_ENRICH_CONCURRENCY", 6),
            branch_cap: 3,
            producer_cap: 5,
            songwriter_cap: 5,
            encyclopedia_cap: 6,
            metadata_delay_ms: env_u64("COLLABGRAPH_METADATA_DELAY_MS", 1100),
            request_timeout_secs: env_u64("COLLABGRAPH_REQUEST_TIMEOUT_SECS", 20),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_caps_are_bounded() {
        let config = EngineConfig::default();
        assert_eq!(config.branch_cap, 3);
        assert_eq!(config.producer_cap, 5);
        assert_eq!(config.songwriter_cap, 5);
        assert_eq!(config.encyclopedia_cap, 6);
    }
}

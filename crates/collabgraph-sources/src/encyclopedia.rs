//! Third-priority source: regex heuristics over a free-text biography
//! summary. Noisy by nature, so candidates go through strict validation
//! and the result is capped small.

use async_trait::async_trait;
use collabgraph_core::{
    CollabGraphError, CollaboratorRecord, CollaboratorSource, Encyclopedia, Result, Role,
};
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;
use tracing::debug;

// A dot is only valid as an initial ("J. Ralph"); allowing it inside a word
// would let captures run across sentence boundaries.
const NAME: &str = r"([A-Z](?:[A-Za-z'\-]+|\.)(?:\s[A-Z](?:[A-Za-z'\-]+|\.)){0,3})";

static PATTERNS: Lazy<Vec<(Regex, Role)>> = Lazy::new(|| {
    let pattern = |verb: &str, role: Role| {
        (
            // Verbs match case-insensitively (sentence-initial forms
            // included); the name capture stays case-sensitive.
            Regex::new(&format!(r"(?i:{verb})\s{NAME}")).unwrap(),
            role,
        )
    };
    vec![
        pattern("produced by", Role::Producer),
        pattern("co-produced with", Role::Producer),
        pattern("co-written with", Role::Songwriter),
        pattern("written by", Role::Songwriter),
        pattern("songs with", Role::Songwriter),
        pattern("collaborated with", Role::Artist),
        pattern("collaboration with", Role::Artist),
        pattern("featuring", Role::Artist),
        pattern("duet with", Role::Artist),
        pattern("worked with", Role::Artist),
    ]
});

/// Words the name regex happily captures but which never denote a person.
const STOP_WORDS: &[&str] = &[
    "The", "His", "Her", "Their", "She", "He", "They", "It", "American", "British", "Canadian",
    "Australian", "Grammy", "Billboard", "Records", "Music", "Album", "Single", "January",
    "February", "March", "April", "May", "June", "July", "August", "September", "October",
    "November", "December",
];

fn is_plausible_name(candidate: &str, subject: &str) -> bool {
    let trimmed = candidate.trim();
    let len = trimmed.chars().count();
    if len < 3 || len > 40 {
        return false;
    }
    if trimmed.eq_ignore_ascii_case(subject) {
        return false;
    }
    if trimmed.chars().any(|c| c.is_ascii_digit()) {
        return false;
    }
    if !trimmed.chars().next().is_some_and(|c| c.is_uppercase()) {
        return false;
    }
    let first_word = trimmed.split_whitespace().next().unwrap_or("");
    !STOP_WORDS.contains(&first_word)
}

pub struct EncyclopediaSource {
    encyclopedia: Arc<dyn Encyclopedia>,
    cap: usize,
}

impl EncyclopediaSource {
    pub fn new(encyclopedia: Arc<dyn Encyclopedia>, cap: usize) -> Self {
        Self { encyclopedia, cap }
    }

    /// Pure extraction step, split out so the heuristics are testable
    /// without a live summary fetch.
    pub fn extract(&self, subject: &str, summary: &str) -> Vec<CollaboratorRecord> {
        let mut records: Vec<CollaboratorRecord> = Vec::new();
        for (pattern, role) in PATTERNS.iter() {
            for caps in pattern.captures_iter(summary) {
                let Some(m) = caps.get(1) else { continue };
                let candidate = m.as_str().trim();
                if !is_plausible_name(candidate, subject) {
                    continue;
                }
                if records
                    .iter()
                    .any(|r| r.name.eq_ignore_ascii_case(candidate))
                {
                    continue;
                }
                records.push(CollaboratorRecord::new(candidate, *role));
                if records.len() >= self.cap {
                    return records;
                }
            }
        }
        records
    }
}

#[async_trait]
impl CollaboratorSource for EncyclopediaSource {
    fn name(&self) -> &'static str {
        "encyclopedia"
    }

    async fn collaborators(&self, canonical_name: &str) -> Result<Vec<CollaboratorRecord>> {
        let summary = self
            .encyclopedia
            .summary_of(canonical_name)
            .await?
            .ok_or_else(|| {
                CollabGraphError::SourceUnavailable(format!(
                    "no encyclopedia page for {canonical_name}"
                ))
            })?;
        let records = self.extract(canonical_name, &summary);
        debug!(
            "encyclopedia heuristics found {} candidates for {canonical_name}",
            records.len()
        );
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedEncyclopedia(Option<&'static str>);

    #[async_trait]
    impl Encyclopedia for FixedEncyclopedia {
        async fn summary_of(&self, _name: &str) -> Result<Option<String>> {
            Ok(self.0.map(str::to_string))
        }
    }

    fn source(summary: Option<&'static str>) -> EncyclopediaSource {
        EncyclopediaSource::new(Arc::new(FixedEncyclopedia(summary)), 6)
    }

    #[tokio::test]
    async fn extracts_names_with_verb_context_roles() {
        let src = source(Some(
            "Ava Example rose to fame with an album produced by Pat Knobs. \
             Several tracks were co-written with Wendy Words, and she later \
             collaborated with Sam Stage on a world tour.",
        ));
        let records = src.collaborators("Ava Example").await.unwrap();
        let find = |name: &str| records.iter().find(|r| r.name == name).map(|r| r.role);
        assert_eq!(find("Pat Knobs"), Some(Role::Producer));
        assert_eq!(find("Wendy Words"), Some(Role::Songwriter));
        assert_eq!(find("Sam Stage"), Some(Role::Artist));
    }

    #[tokio::test]
    async fn captures_stop_at_sentence_boundaries() {
        let summary = "Her debut was produced by Pat Knobs. Several tracks \
                       followed, co-written with J. Ralph Writer. New singles \
                       came later.";
        let src = source(None);
        let records = src.extract("Ava Example", summary);
        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Pat Knobs", "J. Ralph Writer"]);
    }

    #[tokio::test]
    async fn verbs_match_regardless_of_casing() {
        let summary = "Produced by Pat Knobs, the record charted worldwide. \
                       Featuring Sam Stage on two tracks.";
        let src = source(None);
        let records = src.extract("Ava Example", summary);
        let find = |name: &str| records.iter().find(|r| r.name == name).map(|r| r.role);
        assert_eq!(find("Pat Knobs"), Some(Role::Producer));
        assert_eq!(find("Sam Stage"), Some(Role::Artist));
    }

    #[tokio::test]
    async fn rejects_subject_digits_lowercase_and_stop_words() {
        let src = source(None);
        let summary = "produced by Ava Example and produced by DJ2 Cool, later \
                       collaborated with the band, featuring The Orchestra";
        let records = src.extract("Ava Example", summary);
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn caps_at_configured_maximum() {
        let summary = "collaborated with Aa Aaa, collaborated with Bb Bbb, \
                       collaborated with Cc Ccc, collaborated with Dd Ddd, \
                       collaborated with Ee Eee, collaborated with Ff Fff, \
                       collaborated with Gg Ggg";
        let src = source(None);
        let records = src.extract("Ava Example", summary);
        assert_eq!(records.len(), 6);
    }

    #[tokio::test]
    async fn missing_page_is_source_unavailable() {
        let src = source(None);
        let err = src.collaborators("Ava Example").await.unwrap_err();
        assert!(matches!(err, CollabGraphError::SourceUnavailable(_)));
    }

    #[tokio::test]
    async fn duplicate_names_are_reported_once() {
        let summary = "produced by Pat Knobs and later co-written with Pat Knobs";
        let src = source(None);
        let records = src.extract("Ava Example", summary);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].role, Role::Producer);
    }
}

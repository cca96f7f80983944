//! Pure predicate that rejects placeholder names a generative source tends
//! to invent. Applied only to generative-adapter output; metadata and
//! encyclopedia names are assumed authentic.

use once_cell::sync::Lazy;
use regex::Regex;

/// "Producer A", "Artist 3", "Songwriter B" and friends.
static ROLE_PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(artist|producer|songwriter|writer|singer|musician|engineer|collaborator)\s*[a-z0-9]$")
        .unwrap()
});

const PLACEHOLDER_TOKENS: &[&str] = &[
    "unknown",
    "anonymous",
    "various",
    "n/a",
    "tbd",
    "placeholder",
    "example",
    "sample",
];

pub fn is_fabricated(name: &str) -> bool {
    let trimmed = name.trim();
    if trimmed.chars().count() <= 2 {
        return true;
    }
    let lowered = trimmed.to_lowercase();
    if PLACEHOLDER_TOKENS.contains(&lowered.as_str()) {
        return true;
    }
    ROLE_PLACEHOLDER.is_match(trimmed)
}

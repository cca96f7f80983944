pub mod clients;
pub mod encyclopedia;
pub mod fabrication;
pub mod fallback;
pub mod generative;
pub mod metagraph;
pub mod roles;
pub mod sanitize;

pub use encyclopedia::EncyclopediaSource;
pub use fabrication::is_fabricated;
pub use fallback::StaticFallbackSource;
pub use generative::GenerativeSource;
pub use metagraph::{MetadataGraphSource, SONGWRITER_OVERRIDES};
pub use roles::RoleClassifier;
pub use sanitize::{extract_json_object, strip_code_fences};

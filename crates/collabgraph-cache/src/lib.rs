pub mod storage;
pub mod writer;

pub use storage::{SubjectStorage, CF_GRAPHS, CF_SUBJECTS};
pub use writer::CacheWriter;

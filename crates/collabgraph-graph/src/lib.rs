pub mod assembler;
pub mod enrich;

pub use assembler::GraphAssembler;
pub use enrich::Enricher;

pub mod synthesizer;

pub use synthesizer::Synthesizer;

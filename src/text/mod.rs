//! Text preparation for narration.
//!
//! Splits source lines into fragments and normalizes each fragment into
//! speakable text (numbers spelled out, acronyms letter-spaced).

mod normalizer;
mod numbers;
mod splitter;

pub use normalizer::normalize;
pub use splitter::split_line;

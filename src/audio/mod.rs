//! Audio encoding for narration clips.
//!
//! Synthesized waveforms are resampled with rubato and written as WAV files
//! with hound.

mod encoder;
pub mod resampler;

pub use encoder::{ClipEncoder, WavEncoder};

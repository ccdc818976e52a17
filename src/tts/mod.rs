//! Text-to-speech module using sherpa-rs.
//!
//! Provides speech synthesis using Kokoro models behind the
//! [`SpeechSynthesizer`] trait so the narration pipeline can be driven by
//! any waveform source.

mod synthesizer;

use anyhow::Result;

pub use synthesizer::KokoroSynthesizer;

/// Fixed voice used for every fragment of a narration run.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeakerProfile {
    pub voice: String,   // Voice name (selects lexicon/language)
    pub speaker_id: i32, // Index into the voices file
    pub speed: f32,      // Speech speed multiplier
}

/// A loaded speech synthesis session.
pub trait SpeechSynthesizer {
    /// Synthesize one piece of text into mono samples at [`Self::sample_rate`].
    ///
    /// # Errors
    /// Returns an error if the model fails to generate audio.
    fn synthesize(&mut self, text: &str) -> Result<Vec<f32>>;

    /// Native sample rate of the produced waveform.
    fn sample_rate(&self) -> u32;
}

//! Text-to-speech synthesizer using Kokoro models.

use anyhow::Result;
use sherpa_rs::OnnxConfig;
use sherpa_rs::tts::{CommonTtsConfig, KokoroTts, KokoroTtsConfig};
use tracing::{debug, info};

use super::{SpeakerProfile, SpeechSynthesizer};
use crate::config::AppConfig;

/// Kokoro produces 24kHz audio.
const KOKORO_SAMPLE_RATE: u32 = 24000;

/// Text-to-speech session using Kokoro models.
pub struct KokoroSynthesizer {
    tts: KokoroTts,          // Kokoro TTS engine
    profile: SpeakerProfile,  // Voice used for every call
}

impl KokoroSynthesizer {
    /// Load the Kokoro model and bind it to the configured speaker.
    ///
    /// # Arguments
    /// * `config` - Application configuration
    ///
    /// # Returns
    /// A new `KokoroSynthesizer` instance.
    ///
    /// # Errors
    /// Returns an error if TTS initialization fails (e.g., missing model files).
    pub fn new(config: &AppConfig) -> Result<Self> {
        let provider = config.effective_provider();
        let profile = config.speaker_profile();

        info!("Initializing Kokoro TTS synthesizer with {} provider", provider);
        info!("TTS voice: {} (speaker ID: {})", profile.voice, profile.speaker_id);

        let tts_config = KokoroTtsConfig {
            model: config.tts_model_path().to_string_lossy().to_string(),
            voices: config.tts_voices_path().to_string_lossy().to_string(),
            tokens: config.tts_tokens_path().to_string_lossy().to_string(),
            data_dir: config.tts_data_dir().to_string_lossy().to_string(),
            dict_dir: config.tts_dict_dir().to_string_lossy().to_string(),
            lexicon: config.tts_lexicon(),
            lang: config.tts_language().to_string(),
            length_scale: 1.0 / profile.speed, // length_scale is inverse of speed
            onnx_config: OnnxConfig {
                provider: provider.as_sherpa_provider().to_string(),
                num_threads: config.tts_threads.try_into().unwrap_or(2),
                debug: config.verbose,
            },
            common_config: CommonTtsConfig { max_num_sentences: 1, ..Default::default() }, // Kokoro only supports 1
        };

        let tts = KokoroTts::new(tts_config);
        info!("TTS sample rate: {} Hz", KOKORO_SAMPLE_RATE);

        Ok(Self { tts, profile })
    }
}

impl SpeechSynthesizer for KokoroSynthesizer {
    fn synthesize(&mut self, text: &str) -> Result<Vec<f32>> {
        debug!("Synthesizing: \"{}\"", text);

        let audio = self
            .tts
            .create(text, self.profile.speaker_id, self.profile.speed)
            .map_err(|e| anyhow::anyhow!("TTS generation failed: {}", e))?;

        debug!("Generated speech ({} samples)", audio.samples.len());
        Ok(audio.samples)
    }

    fn sample_rate(&self) -> u32 {
        KOKORO_SAMPLE_RATE
    }
}

//! Application configuration and CLI argument parsing.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::tts::SpeakerProfile;

/// Hardware acceleration provider for ONNX models.
/// Auto-detected based on platform if not specified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// CPU inference (default fallback, always available)
    #[default]
    Cpu,
    /// NVIDIA CUDA acceleration (Linux only, requires CUDA toolkit)
    Cuda,
    /// Apple CoreML acceleration (macOS only, uses Neural Engine)
    #[value(name = "coreml")]
    CoreMl,
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_sherpa_provider())
    }
}

impl Provider {
    /// Provider string compatible with sherpa-rs.
    pub fn as_sherpa_provider(&self) -> &'static str {
        match self {
            Provider::Cpu => "cpu",
            Provider::Cuda => "cuda",
            Provider::CoreMl => "coreml",
        }
    }
}

/// What a run should do before any model is loaded.
#[derive(Debug)]
pub enum Preflight {
    /// No file was named; print usage and exit successfully.
    Usage,
    /// The named source file is absent; report it and exit successfully.
    MissingSource(PathBuf),
    /// Models or settings are unusable; the run fails.
    InvalidConfig(anyhow::Error),
    /// Narrate `source`, naming outputs after `document`.
    Ready { source: PathBuf, document: String },
}

/// Narrator configuration.
#[derive(Parser, Debug, Clone, Serialize, Deserialize)]
#[command(name = "narrator")]
#[command(author, version, about = "Narrate a text file into a single audio file", long_about = None)]
pub struct AppConfig {
    /// Source text file, resolved under --source-dir unless absolute
    #[arg(long, short = 'f')]
    pub file: Option<String>,

    /// Directory holding source text files
    #[arg(long, env = "NARRATOR_SOURCE_DIR", default_value = "source")]
    pub source_dir: PathBuf,

    /// Directory receiving clips and narrated files
    #[arg(long, env = "NARRATOR_RESULTS_DIR", default_value = "results")]
    pub results_dir: PathBuf,

    /// Directory containing the Kokoro TTS model
    #[arg(long, short = 'd', env = "MODEL_DIR", default_value_os_t = default_model_dir())]
    pub model_dir: PathBuf,

    /// TTS voice name for Kokoro (selects lexicon and language)
    #[arg(long, default_value = "af_bella")]
    pub tts_voice: String,

    /// TTS speaker ID for Kokoro model (af_bella=2 in v1.0, bf_emma=21)
    #[arg(long, default_value = "2")]
    pub tts_speaker_id: i32,

    /// Text-to-speech speed multiplier
    #[arg(long, default_value = "1.0")]
    pub tts_speed: f32,

    /// Hardware acceleration provider (auto-detected if not specified)
    #[arg(long, value_enum)]
    pub provider: Option<Provider>,

    /// TTS threads (0 = auto-detect based on CPU cores)
    #[arg(long, default_value = "0")]
    pub tts_threads: usize,

    /// Sample rate of the written clips
    #[arg(long, default_value = "16000")]
    pub sample_rate: u32,

    /// Zero padding of clip indices (0 keeps bare indices: r_1, r_2, ...)
    #[arg(long, default_value = "5")]
    pub index_width: usize,

    /// Concatenation tool
    #[arg(long, env = "FFMPEG_BIN", default_value = "ffmpeg")]
    pub ffmpeg: PathBuf,

    /// Render clips only, without building the final file
    #[arg(long)]
    pub no_concat: bool,

    /// Enable verbose logging
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

impl AppConfig {
    /// Parse configuration from command line arguments.
    pub fn from_args() -> Self {
        let mut config = Self::parse();
        config.normalize_thread_count();
        config
    }

    /// Pick a TTS thread count when none was given.
    ///
    /// With CUDA a single thread is used since the GPU handles parallelism;
    /// on CPU cores/3 (at least 1) leaves headroom for encoding.
    fn normalize_thread_count(&mut self) {
        if self.tts_threads != 0 {
            return;
        }
        let cpu_cores = num_cpus::get();
        self.tts_threads = if self.effective_provider() == Provider::Cuda { 1 } else { (cpu_cores / 3).max(1) };

        if self.verbose {
            info!("CPU cores: {}, Provider: {}, TTS threads: {}", cpu_cores, self.effective_provider(), self.tts_threads);
        }
    }

    /// Get the effective inference provider.
    pub fn effective_provider(&self) -> Provider {
        self.provider.unwrap_or_else(detect_provider)
    }

    /// Voice applied to every fragment.
    pub fn speaker_profile(&self) -> SpeakerProfile {
        SpeakerProfile { voice: self.tts_voice.clone(), speaker_id: self.tts_speaker_id, speed: self.tts_speed }
    }

    /// Path of the source document, if a file was named.
    pub fn source_path(&self) -> Option<PathBuf> {
        self.file.as_ref().map(|file| self.source_dir.join(file))
    }

    /// Per-document clip directory: `{results}/{file}.parts`.
    pub fn parts_dir(&self, file_name: &str) -> PathBuf {
        self.results_dir.join(format!("{}.parts", file_name))
    }

    /// Final narrated file: `{results}/{file}.{ext}`.
    pub fn output_path(&self, file_name: &str, extension: &str) -> PathBuf {
        self.results_dir.join(format!("{}.{}", file_name, extension))
    }

    fn kokoro_dir(&self) -> PathBuf {
        self.model_dir.join("tts").join("kokoro-multi-lang-v1_0")
    }

    /// Get the path to the Kokoro TTS model (multi-lang v1.0 - supports CoreML).
    pub fn tts_model_path(&self) -> PathBuf {
        self.kokoro_dir().join("model.onnx")
    }

    /// Get the path to the Kokoro TTS voices.bin file.
    pub fn tts_voices_path(&self) -> PathBuf {
        self.kokoro_dir().join("voices.bin")
    }

    /// Get the path to the TTS tokens file.
    pub fn tts_tokens_path(&self) -> PathBuf {
        self.kokoro_dir().join("tokens.txt")
    }

    /// Get the path to the TTS data directory.
    pub fn tts_data_dir(&self) -> PathBuf {
        self.kokoro_dir().join("espeak-ng-data")
    }

    /// Get the path to the TTS dict directory (for Chinese segmentation).
    pub fn tts_dict_dir(&self) -> PathBuf {
        self.kokoro_dir().join("dict")
    }

    /// Lexicon files for the selected voice.
    ///
    /// English and Chinese voices read lexicon files; other languages get an
    /// empty string and rely on [`Self::tts_language`] instead.
    pub fn tts_lexicon(&self) -> String {
        let dir = self.kokoro_dir();
        let lexicon = |name: &str| dir.join(name).to_string_lossy().to_string();
        match self.tts_voice.get(..2) {
            Some("af" | "am") | None => lexicon("lexicon-us-en.txt"),
            Some("bf" | "bm") => lexicon("lexicon-gb-en.txt"),
            Some("zf" | "zm") => format!("{},{}", lexicon("lexicon-us-en.txt"), lexicon("lexicon-zh.txt")),
            Some(_) => String::new(),
        }
    }

    /// espeak-ng language for voices without a lexicon.
    pub fn tts_language(&self) -> &str {
        match self.tts_voice.get(..2) {
            Some("ef" | "em") => "es",
            Some("ff") => "fr",
            Some("hf" | "hm") => "hi",
            Some("if" | "im") => "it",
            Some("jf" | "jm") => "ja",
            Some("pf" | "pm") => "pt-br",
            _ => "",
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if !self.model_dir.exists() {
            anyhow::bail!("Model directory does not exist: {}", self.model_dir.display());
        }

        for path in [self.tts_model_path(), self.tts_voices_path(), self.tts_tokens_path()] {
            if !path.exists() {
                anyhow::bail!("Required model file not found: {}", path.display());
            }
        }

        if self.tts_speed <= 0.0 {
            anyhow::bail!("TTS speed must be positive");
        }

        if self.sample_rate == 0 {
            anyhow::bail!("Sample rate must be positive");
        }

        Ok(())
    }

    /// Decide whether a run can start, in the order the checks are reported.
    pub fn preflight(&self) -> Preflight {
        let (Some(file_name), Some(source)) = (self.file.as_deref(), self.source_path()) else {
            return Preflight::Usage;
        };

        if !source.is_file() {
            return Preflight::MissingSource(source);
        }

        if let Err(e) = self.validate() {
            return Preflight::InvalidConfig(e);
        }

        // Outputs are named after the file itself, wherever it lives
        let document = Path::new(file_name).file_name().map_or_else(|| file_name.to_string(), |name| name.to_string_lossy().into_owned());
        Preflight::Ready { source, document }
    }

    /// Log the current configuration.
    pub fn log_config(&self) {
        info!("Configuration:");
        info!("  Source directory: {}", self.source_dir.display());
        info!("  Results directory: {}", self.results_dir.display());
        info!("  Model directory: {}", self.model_dir.display());
        info!("  TTS voice: {} (speaker ID: {})", self.tts_voice, self.tts_speaker_id);
        info!("  TTS speed: {}", self.tts_speed);
        info!("  TTS provider: {}", self.effective_provider());
        info!("  Clip sample rate: {} Hz", self.sample_rate);
        info!("  Index width: {}", self.index_width);
        if self.no_concat {
            info!("  Concatenation: disabled");
        } else {
            info!("  Concatenation tool: {}", self.ffmpeg.display());
        }
    }
}

/// Get the default model directory (~/.narrator/models).
fn default_model_dir() -> PathBuf {
    if let Some(home_dir) = dirs::home_dir() {
        home_dir.join(".narrator").join("models")
    } else {
        PathBuf::from("models")
    }
}

/// Auto-detect the best hardware acceleration provider.
fn detect_provider() -> Provider {
    #[cfg(target_os = "macos")]
    {
        info!("Detected macOS, using CoreML provider");
        Provider::CoreMl
    }

    #[cfg(target_os = "linux")]
    {
        if has_nvidia_gpu() {
            info!("Detected NVIDIA GPU, using CUDA provider");
            Provider::Cuda
        } else {
            info!("No GPU detected, using CPU provider");
            Provider::Cpu
        }
    }

    #[cfg(not(any(target_os = "macos", target_os = "linux")))]
    {
        info!("Using CPU provider");
        Provider::Cpu
    }
}

/// Check if an NVIDIA GPU is available (Linux only).
#[cfg(target_os = "linux")]
fn has_nvidia_gpu() -> bool {
    // Desktop driver nodes, then Jetson (Tegra) ones
    ["/dev/nvidia0", "/dev/nvidiactl", "/dev/nvidia-uvm", "/dev/nvhost-ctrl", "/dev/nvhost-ctrl-gpu", "/etc/nv_tegra_release"]
        .iter()
        .any(|path| Path::new(path).exists())
}

//! Renders normalized fragments into clip files.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tracing::{info, warn};

use super::cache::ClipCache;
use crate::audio::ClipEncoder;
use crate::tts::SpeechSynthesizer;

/// What happened to one fragment.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderOutcome {
    /// A clip was already present; nothing was synthesized.
    Skipped { path: PathBuf },
    /// A new clip was synthesized and written.
    Rendered { path: PathBuf, encode_time: Duration },
}

impl RenderOutcome {
    pub fn path(&self) -> &Path {
        match self {
            RenderOutcome::Skipped { path } | RenderOutcome::Rendered { path, .. } => path,
        }
    }
}

/// Synthesizes fragments into clips, at most once per clip id.
pub struct Renderer<S, E, C> {
    synthesizer: S, // Loaded synthesis session
    encoder: E,     // Clip file writer
    cache: C,       // Existence check for finished clips
}

impl<S: SpeechSynthesizer, E: ClipEncoder, C: ClipCache> Renderer<S, E, C> {
    pub fn new(synthesizer: S, encoder: E, cache: C) -> Self {
        Self { synthesizer, encoder, cache }
    }

    /// Extension of the clips this renderer writes.
    pub fn extension(&self) -> &str {
        self.encoder.extension()
    }

    /// Target path of clip `id` inside `dir`.
    pub fn clip_path(&self, dir: &Path, id: &str) -> PathBuf {
        dir.join(format!("{}.{}", id, self.encoder.extension()))
    }

    /// Render `text` as clip `id` under `dir` unless that clip already exists.
    ///
    /// # Arguments
    /// * `dir` - Parts directory of the current document
    /// * `id` - Clip identifier (file stem)
    /// * `text` - Normalized text to speak
    ///
    /// # Errors
    /// Synthesis and encoding failures are returned as-is; nothing is retried.
    /// A clip whose encoding failed is removed so the next run renders it again.
    pub fn render(&mut self, dir: &Path, id: &str, text: &str) -> Result<RenderOutcome> {
        let path = self.clip_path(dir, id);

        if self.cache.contains(&path) {
            info!("File {} exists, skipping", path.display());
            return Ok(RenderOutcome::Skipped { path });
        }

        let samples = self.synthesizer.synthesize(text).with_context(|| format!("Failed to synthesize clip {}", id))?;

        let start = Instant::now();
        if let Err(e) = self.encoder.encode(&samples, self.synthesizer.sample_rate(), &path) {
            if path.is_file() {
                warn!("Removing incomplete clip {}", path.display());
                let _ = fs::remove_file(&path);
            }
            return Err(e.context(format!("Failed to encode clip {}", id)));
        }
        let encode_time = start.elapsed();

        info!("🎵 {} ({:.3}s): {}", path.display(), encode_time.as_secs_f64(), text);
        Ok(RenderOutcome::Rendered { path, encode_time })
    }
}

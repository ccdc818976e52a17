//! Document narration: split, normalize, render, concatenate.

use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::audio::ClipEncoder;
use crate::concat::{CommandRunner, Concatenator};
use crate::render::{ClipCache, RenderOutcome, Renderer};
use crate::text;
use crate::tts::SpeechSynthesizer;

/// Summary of one narration run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NarrationReport {
    pub fragments: usize,        // Fragments that reached the renderer
    pub rendered: usize,         // Newly synthesized clips
    pub skipped: usize,          // Clips already on disk
    pub encode_time: Duration,   // Time spent writing new clips
    pub output: Option<PathBuf>, // Final file, when one was written
}

/// Clip identifier for the `index`-th fragment, zero padded to `width`.
pub fn clip_id(index: usize, width: usize) -> String {
    format!("r_{:0width$}", index, width = width)
}

/// Runs the narration pipeline over a document.
pub struct Narrator<S, E, C, R> {
    renderer: Renderer<S, E, C>,
    concatenator: Option<Concatenator<R>>, // None renders clips only
    index_width: usize,
}

impl<S, E, C, R> Narrator<S, E, C, R>
where
    S: SpeechSynthesizer,
    E: ClipEncoder,
    C: ClipCache,
    R: CommandRunner,
{
    pub fn new(renderer: Renderer<S, E, C>, concatenator: Option<Concatenator<R>>, index_width: usize) -> Self {
        Self { renderer, concatenator, index_width }
    }

    /// Extension of the clips and of the final file.
    pub fn extension(&self) -> &str {
        self.renderer.extension()
    }

    /// Narrate `source` into clips under `parts_dir`, then join them into `output`.
    ///
    /// Fragments are numbered from 1 across the whole document. The final file
    /// is only built when at least one fragment was processed.
    ///
    /// # Errors
    /// Stops at the first read, synthesis, encoding or concatenation failure.
    pub fn narrate(&mut self, source: &Path, parts_dir: &Path, output: &Path) -> Result<NarrationReport> {
        let file = File::open(source).with_context(|| format!("Failed to open {}", source.display()))?;
        fs::create_dir_all(parts_dir).with_context(|| format!("Failed to create {}", parts_dir.display()))?;

        let mut report = NarrationReport::default();
        for line in BufReader::new(file).lines() {
            let line = line.with_context(|| format!("Failed to read {}", source.display()))?;

            for fragment in text::split_line(&line) {
                report.fragments += 1;
                let normalized = text::normalize(fragment);
                info!("📖 {}", normalized);

                let id = clip_id(report.fragments, self.index_width);
                let outcome = self.renderer.render(parts_dir, &id, &normalized)?;
                debug!("Clip {} -> {}", id, outcome.path().display());
                match outcome {
                    RenderOutcome::Rendered { encode_time, .. } => {
                        report.rendered += 1;
                        report.encode_time += encode_time;
                    }
                    RenderOutcome::Skipped { .. } => report.skipped += 1,
                }
            }
        }

        if report.fragments == 0 {
            warn!("No fragments in {}, nothing to concatenate", source.display());
            return Ok(report);
        }

        if let Some(concatenator) = &self.concatenator {
            if let Some(parent) = output.parent() {
                fs::create_dir_all(parent).with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            concatenator.concat(parts_dir, self.renderer.extension(), output)?;
            report.output = Some(output.to_path_buf());
        }

        Ok(report)
    }
}

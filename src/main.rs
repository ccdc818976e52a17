//! Narrator - Turns a text file into a single narrated audio file.
//!
//! The document is split into sentence fragments, each fragment is
//! normalized for speech and rendered to a clip with Kokoro TTS (clips that
//! already exist are reused), and the clips are joined with ffmpeg.

mod audio;
mod concat;
mod config;
mod pipeline;
mod render;
mod text;
mod tts;

#[cfg(test)]
mod testing;

use std::time::Instant;

use anyhow::Result;
use clap::CommandFactory;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::LocalTime;

use audio::WavEncoder;
use concat::{Concatenator, SystemRunner};
use config::{AppConfig, Preflight};
use pipeline::Narrator;
use render::{FsClipCache, Renderer};
use tts::KokoroSynthesizer;

fn main() -> Result<()> {
    // Parse command line arguments
    let config = AppConfig::from_args();

    // Respect RUST_LOG env var, fallback to verbose flag, default to info
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| if config.verbose { EnvFilter::new("debug") } else { EnvFilter::new("info") });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_timer(LocalTime::new(time::macros::format_description!("[hour]:[minute]:[second]")))
        .init();

    info!("🎙️  Narrator v{}", env!("CARGO_PKG_VERSION"));

    let (source, document) = match config.preflight() {
        Preflight::Usage => {
            AppConfig::command().print_help()?;
            return Ok(());
        }
        Preflight::MissingSource(source) => {
            println!("Source file {} does not exist", source.display());
            return Ok(());
        }
        Preflight::InvalidConfig(e) => {
            error!("❌ Configuration error: {}", e);
            std::process::exit(1);
        }
        Preflight::Ready { source, document } => (source, document),
    };
    config.log_config();

    let synthesizer = KokoroSynthesizer::new(&config)?;
    let renderer = Renderer::new(synthesizer, WavEncoder::new(config.sample_rate), FsClipCache);
    let concatenator = (!config.no_concat).then(|| Concatenator::new(config.ffmpeg.clone(), SystemRunner));
    let mut narrator = Narrator::new(renderer, concatenator, config.index_width);

    let parts_dir = config.parts_dir(&document);
    let output = config.output_path(&document, narrator.extension());

    info!("Narrating {} into {}", source.display(), parts_dir.display());
    let started = Instant::now();
    let report = narrator.narrate(&source, &parts_dir, &output)?;

    info!(
        "✅ {} fragments ({} rendered, {} reused) in {:.1}s, {:.1}s encoding",
        report.fragments,
        report.rendered,
        report.skipped,
        started.elapsed().as_secs_f64(),
        report.encode_time.as_secs_f64()
    );
    if let Some(output) = report.output {
        info!("Narration written to {}", output.display());
    }

    Ok(())
}

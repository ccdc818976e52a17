//! Test doubles for the synthesis, cache and process seams.

use std::cell::RefCell;
use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::Result;

use crate::audio::ClipEncoder;
use crate::concat::{CommandOutput, CommandRunner, ExternalCommand};
use crate::render::ClipCache;
use crate::tts::SpeechSynthesizer;

/// Synthesizer producing a short constant tone per character and recording its input.
#[derive(Clone, Default)]
pub struct FakeSynthesizer {
    calls: Rc<RefCell<Vec<String>>>,
    fail: bool,
}

impl FakeSynthesizer {
    pub const SAMPLE_RATE: u32 = 16000;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self { fail: true, ..Self::default() }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl SpeechSynthesizer for FakeSynthesizer {
    fn synthesize(&mut self, text: &str) -> Result<Vec<f32>> {
        if self.fail {
            anyhow::bail!("model crashed");
        }
        self.calls.borrow_mut().push(text.to_string());
        Ok(vec![0.1; 100 * text.len()])
    }

    fn sample_rate(&self) -> u32 {
        Self::SAMPLE_RATE
    }
}

/// Encoder that leaves a truncated file at the clip path and then fails,
/// as a crash halfway through a write would.
pub struct TruncatingEncoder;

impl ClipEncoder for TruncatingEncoder {
    fn extension(&self) -> &str {
        "wav"
    }

    fn encode(&self, _samples: &[f32], _source_rate: u32, path: &Path) -> Result<()> {
        std::fs::write(path, b"RIFF")?;
        anyhow::bail!("disk full")
    }
}

/// Cache answering from a fixed set of paths.
pub struct MemoryClipCache(HashSet<PathBuf>);

impl MemoryClipCache {
    pub fn with(paths: &[PathBuf]) -> Self {
        Self(paths.iter().cloned().collect())
    }
}

impl ClipCache for MemoryClipCache {
    fn contains(&self, clip: &Path) -> bool {
        self.0.contains(clip)
    }
}

#[derive(Default)]
struct Recorded {
    commands: Vec<ExternalCommand>,
    manifests: Vec<String>,
    output_existed: Vec<bool>,
}

/// Runner that records concat invocations and returns a canned exit status.
#[derive(Clone)]
pub struct RecordingRunner {
    recorded: Rc<RefCell<Recorded>>,
    code: i32,
    stderr: String,
}

impl RecordingRunner {
    pub fn succeeding() -> Self {
        Self::exiting(0, "")
    }

    pub fn exiting(code: i32, stderr: &str) -> Self {
        Self { recorded: Rc::default(), code, stderr: stderr.to_string() }
    }

    pub fn commands(&self) -> Vec<ExternalCommand> {
        self.recorded.borrow().commands.clone()
    }

    /// Manifest contents as seen while the command ran.
    pub fn manifests(&self) -> Vec<String> {
        self.recorded.borrow().manifests.clone()
    }

    /// Whether the output path existed when each command ran.
    pub fn output_existed_at_run(&self) -> Vec<bool> {
        self.recorded.borrow().output_existed.clone()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, command: &ExternalCommand) -> io::Result<CommandOutput> {
        let mut recorded = self.recorded.borrow_mut();
        if let Some(manifest) = manifest_arg(command) {
            recorded.manifests.push(std::fs::read_to_string(manifest)?);
        }
        if let Some(output) = command.args.last() {
            recorded.output_existed.push(Path::new(output).exists());
        }
        recorded.commands.push(command.clone());
        Ok(CommandOutput { code: Some(self.code), stderr: self.stderr.clone() })
    }
}

/// Runner that performs the concat itself by joining the listed WAV files.
pub struct WavJoinRunner;

impl CommandRunner for WavJoinRunner {
    fn run(&self, command: &ExternalCommand) -> io::Result<CommandOutput> {
        let manifest = manifest_arg(command).ok_or_else(|| io::Error::other("no manifest"))?;
        let output = command.args.last().ok_or_else(|| io::Error::other("no output"))?;

        let mut samples = Vec::new();
        let mut spec = None;
        for line in std::fs::read_to_string(manifest)?.lines() {
            let path = line.trim_start_matches("file '").trim_end_matches('\'').replace(r"'\''", "'");
            let mut reader = hound::WavReader::open(&path).map_err(io::Error::other)?;
            spec.get_or_insert(reader.spec());
            for sample in reader.samples::<i16>() {
                samples.push(sample.map_err(io::Error::other)?);
            }
        }

        let spec = spec.ok_or_else(|| io::Error::other("empty manifest"))?;
        let mut writer = hound::WavWriter::create(Path::new(output), spec).map_err(io::Error::other)?;
        for sample in samples {
            writer.write_sample(sample).map_err(io::Error::other)?;
        }
        writer.finalize().map_err(io::Error::other)?;

        Ok(CommandOutput { code: Some(0), stderr: String::new() })
    }
}

/// Number of frames in a WAV file.
pub fn wav_frames(path: &Path) -> u32 {
    hound::WavReader::open(path).unwrap().duration()
}

fn manifest_arg(command: &ExternalCommand) -> Option<&std::ffi::OsStr> {
    let position = command.args.iter().position(|arg| arg == "-i")?;
    command.args.get(position + 1).map(|arg| arg.as_os_str())
}

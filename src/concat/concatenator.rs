//! Lossless concatenation of rendered clips with ffmpeg's concat demuxer.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use super::command::{CommandRunner, ExternalCommand};

/// Name of the clip list handed to the concat demuxer.
const MANIFEST_NAME: &str = "concat.txt";

/// Concatenation failures.
#[derive(Debug, Error)]
pub enum ConcatError {
    #[error("No .{extension} clips found in {}", .dir.display())]
    NoClips { dir: PathBuf, extension: String },

    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("{program} exited with {}: {}", describe_exit(.code), .stderr.trim())]
    ToolFailed { program: String, code: Option<i32>, stderr: String },
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {}", code),
        None => "a signal".to_string(),
    }
}

/// Joins the clips of a parts directory into one file.
pub struct Concatenator<R> {
    program: OsString, // Concatenation tool (ffmpeg)
    runner: R,         // Process launcher
}

impl<R: CommandRunner> Concatenator<R> {
    pub fn new(program: impl Into<OsString>, runner: R) -> Self {
        Self { program: program.into(), runner }
    }

    /// Concatenate every `.{extension}` clip in `parts_dir` into `output`.
    ///
    /// Clips are joined in lexicographic filename order. Any previous
    /// `output` is removed first and the manifest is removed afterwards,
    /// whether or not the tool succeeded.
    ///
    /// # Returns
    /// The number of clips joined.
    ///
    /// # Errors
    /// Fails if there are no clips, on filesystem errors, or if the tool
    /// cannot start or exits unsuccessfully.
    pub fn concat(&self, parts_dir: &Path, extension: &str, output: &Path) -> Result<usize, ConcatError> {
        let clips = list_clips(parts_dir, extension)?;
        if clips.is_empty() {
            return Err(ConcatError::NoClips { dir: parts_dir.to_path_buf(), extension: extension.to_string() });
        }

        let manifest = parts_dir.join(MANIFEST_NAME);
        write_manifest(&manifest, &clips)?;

        let result = self.run_tool(&manifest, output);

        if let Err(e) = fs::remove_file(&manifest) {
            debug!("Could not remove manifest {}: {}", manifest.display(), e);
        }

        result?;
        info!("📼 Wrote {} ({} clips)", output.display(), clips.len());
        Ok(clips.len())
    }

    fn run_tool(&self, manifest: &Path, output: &Path) -> Result<(), ConcatError> {
        match fs::remove_file(output) {
            Ok(()) => debug!("Removed previous {}", output.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(source) => return Err(ConcatError::Io { path: output.to_path_buf(), source }),
        }

        let command = ExternalCommand::new(self.program.clone())
            .arg("-hide_banner")
            .arg("-loglevel")
            .arg("error")
            .arg("-f")
            .arg("concat")
            .arg("-safe")
            .arg("0")
            .arg("-i")
            .arg(manifest)
            .arg("-c")
            .arg("copy")
            .arg(output);

        debug!("Running: {}", command);
        let program = self.program.to_string_lossy().into_owned();
        let outcome = self.runner.run(&command).map_err(|source| ConcatError::Spawn { program: program.clone(), source })?;

        if !outcome.success() {
            return Err(ConcatError::ToolFailed { program, code: outcome.code, stderr: outcome.stderr });
        }
        Ok(())
    }
}

/// Clip files in `dir` with the given extension, sorted by file name.
fn list_clips(dir: &Path, extension: &str) -> Result<Vec<PathBuf>, ConcatError> {
    let io_err = |source| ConcatError::Io { path: dir.to_path_buf(), source };

    let mut clips = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == extension) {
            clips.push(path);
        }
    }

    clips.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(clips)
}

/// Write the concat demuxer's `file '<path>'` list.
fn write_manifest(manifest: &Path, clips: &[PathBuf]) -> Result<(), ConcatError> {
    let io_err = |source| ConcatError::Io { path: manifest.to_path_buf(), source };

    let mut body = String::new();
    for clip in clips {
        let absolute = std::path::absolute(clip).map_err(io_err)?;
        let quoted = absolute.to_string_lossy().replace('\'', r"'\''");
        body.push_str(&format!("file '{}'\n", quoted));
    }

    fs::write(manifest, body).map_err(io_err)
}

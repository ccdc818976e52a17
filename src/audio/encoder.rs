//! Clip encoding to WAV files using hound.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::resampler::resample;

/// Writes a synthesized waveform to disk.
pub trait ClipEncoder {
    /// File extension (without the dot) of the files this encoder writes.
    fn extension(&self) -> &str;

    /// Encode mono `samples` produced at `source_rate` into `path`.
    ///
    /// # Errors
    /// Returns an error if resampling fails or the file cannot be written.
    fn encode(&self, samples: &[f32], source_rate: u32, path: &Path) -> Result<()>;
}

/// Mono 16-bit PCM WAV encoder at a fixed output rate.
#[derive(Debug, Clone, Copy)]
pub struct WavEncoder {
    sample_rate: u32,
}

impl WavEncoder {
    pub fn new(sample_rate: u32) -> Self {
        Self { sample_rate }
    }
}

impl ClipEncoder for WavEncoder {
    fn extension(&self) -> &str {
        "wav"
    }

    fn encode(&self, samples: &[f32], source_rate: u32, path: &Path) -> Result<()> {
        let samples = resample(samples, source_rate, self.sample_rate)?;

        // The clip only appears under its final name once it is complete
        let partial = partial_path(path);
        let written = self.write_wav(&samples, &partial).and_then(|()| {
            fs::rename(&partial, path).with_context(|| format!("Failed to move '{}' into place", partial.display()))
        });
        if written.is_err() {
            let _ = fs::remove_file(&partial);
        }
        written
    }
}

impl WavEncoder {
    fn write_wav(&self, samples: &[f32], path: &Path) -> Result<()> {
        let spec = hound::WavSpec { channels: 1, sample_rate: self.sample_rate, bits_per_sample: 16, sample_format: hound::SampleFormat::Int };
        let mut writer = hound::WavWriter::create(path, spec).with_context(|| format!("Failed to create '{}'", path.display()))?;

        for &sample in samples {
            let pcm = (sample.clamp(-1.0, 1.0) * f32::from(i16::MAX)) as i16;
            writer.write_sample(pcm).with_context(|| format!("Failed to write sample to '{}'", path.display()))?;
        }

        writer.finalize().with_context(|| format!("Failed to finalize '{}'", path.display()))?;
        Ok(())
    }
}

/// Sibling of `path` used while a clip is being written, e.g. `r_00001.wav.part`.
fn partial_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".part");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_mono_pcm_at_target_rate() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.wav");

        let encoder = WavEncoder::new(16000);
        encoder.encode(&vec![0.5f32; 24000], 24000, &path).unwrap();

        let reader = hound::WavReader::open(&path).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, 16000);
        assert_eq!(spec.bits_per_sample, 16);
        assert_eq!(reader.duration(), 16000);
    }

    #[test]
    fn test_clamps_out_of_range_samples() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("loud.wav");

        WavEncoder::new(16000).encode(&[2.0, -2.0], 16000, &path).unwrap();

        let samples: Vec<i16> = hound::WavReader::open(&path).unwrap().into_samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(samples, vec![i16::MAX, -i16::MAX]);
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent").join("clip.wav");
        assert!(WavEncoder::new(16000).encode(&[0.0], 16000, &path).is_err());
    }

    #[test]
    fn test_no_partial_file_after_success() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("r_00001.wav");

        WavEncoder::new(16000).encode(&[0.1, 0.2, 0.3], 16000, &path).unwrap();

        let names: Vec<_> = fs::read_dir(dir.path()).unwrap().map(|e| e.unwrap().file_name()).collect();
        assert_eq!(names, vec![OsString::from("r_00001.wav")]);
    }

    #[test]
    fn test_failed_write_leaves_nothing_behind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("r_00001.wav");
        // A directory in the clip's place makes the final move fail
        fs::create_dir(&path).unwrap();

        assert!(WavEncoder::new(16000).encode(&[0.1, 0.2], 16000, &path).is_err());
        assert!(!partial_path(&path).exists());
        assert!(path.is_dir());
    }

    #[test]
    fn test_partial_path_appends_suffix() {
        assert_eq!(partial_path(Path::new("/tmp/parts/r_00001.wav")), PathBuf::from("/tmp/parts/r_00001.wav.part"));
    }
}

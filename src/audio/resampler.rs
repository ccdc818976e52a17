//! Sample rate conversion using rubato's FFT-based resampler.

use anyhow::{Context, Result};
use audioadapter_buffers::direct::InterleavedSlice;
use rubato::{Fft, FixedSync, Resampler};

/// Chunk size for FFT-based resampling (provides good quality and performance).
const CHUNK_SIZE: usize = 1024;

/// Number of sub-chunks for FFT processing (higher = better quality but more CPU).
const SUB_CHUNKS: usize = 2;

/// Number of output frames a clip of `input_len` frames should have after conversion.
pub fn converted_len(input_len: usize, from_rate: u32, to_rate: u32) -> usize {
    (input_len as u64 * u64::from(to_rate) / u64::from(from_rate)) as usize
}

/// Convert a whole mono clip from one sample rate to another.
///
/// The input is fed to the resampler chunk by chunk, followed by zero
/// padding until the resampler's output delay has been flushed. The delay
/// is then dropped from the front and the result holds exactly
/// [`converted_len`] frames, so a clip keeps both its duration and its
/// alignment.
///
/// # Arguments
/// * `samples` - Mono input samples
/// * `from_rate` - Input sample rate (e.g., 24000 from Kokoro)
/// * `to_rate` - Output sample rate (e.g., 16000 for narration clips)
///
/// # Errors
/// Returns an error if the resampler cannot be built or fails mid-stream.
pub fn resample(samples: &[f32], from_rate: u32, to_rate: u32) -> Result<Vec<f32>> {
    if from_rate == to_rate {
        return Ok(samples.to_vec());
    }

    let mut resampler = Fft::<f32>::new(from_rate as usize, to_rate as usize, CHUNK_SIZE, SUB_CHUNKS, 1, FixedSync::Input)
        .with_context(|| format!("Failed to create resampler {} Hz -> {} Hz", from_rate, to_rate))?;

    let output_frames_max = resampler.output_frames_max();
    let mut scratch = vec![0.0f32; output_frames_max];
    let delay = resampler.output_delay();
    let target_len = converted_len(samples.len(), from_rate, to_rate);
    let mut output = Vec::with_capacity(delay + target_len + output_frames_max);

    // The resampler may round its input chunk to a multiple of its FFT size
    let mut chunk = Vec::with_capacity(CHUNK_SIZE * 2);
    let mut pos = 0;
    while output.len() < delay + target_len {
        let needed = resampler.input_frames_next();
        let start = pos.min(samples.len());
        let end = (pos + needed).min(samples.len());
        chunk.clear();
        chunk.extend_from_slice(&samples[start..end]);
        chunk.resize(needed, 0.0);

        let input = InterleavedSlice::new(&chunk, 1, needed).context("Failed to create input adapter")?;
        let mut out = InterleavedSlice::new_mut(&mut scratch, 1, output_frames_max).context("Failed to create output adapter")?;

        let (_, frames_written) = resampler
            .process_into_buffer(&input, &mut out, None)
            .map_err(|e| anyhow::anyhow!("Resampling error: {}", e))?;
        output.extend_from_slice(&scratch[..frames_written]);
        pos += needed;
    }

    output.drain(..delay);
    output.truncate(target_len);
    Ok(output)
}

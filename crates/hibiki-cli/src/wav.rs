//! Stereo WAV file I/O.

use std::path::Path;

use anyhow::{Context, bail};
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

/// Deinterleaved stereo audio.
#[derive(Debug, Clone, Default)]
pub struct StereoBuffer {
    /// Left channel.
    pub left: Vec<f32>,
    /// Right channel.
    pub right: Vec<f32>,
}

impl StereoBuffer {
    /// Frames per channel.
    pub fn frames(&self) -> usize {
        self.left.len()
    }

    /// Append `frames` frames of silence.
    pub fn pad(&mut self, frames: usize) {
        self.left.resize(self.left.len() + frames, 0.0);
        self.right.resize(self.right.len() + frames, 0.0);
    }

    /// Samples of both channels.
    pub fn samples(&self) -> impl Iterator<Item = f32> + '_ {
        self.left.iter().chain(&self.right).copied()
    }
}

/// Read a WAV file as stereo.
///
/// Mono is duplicated to both channels; files with more than two channels
/// keep the first two.
pub fn read_wav_stereo(path: &Path) -> anyhow::Result<(StereoBuffer, WavSpec)> {
    let reader =
        WavReader::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let spec = reader.spec();
    let channels = spec.channels as usize;
    if channels == 0 {
        bail!("{} has no channels", path.display());
    }

    let samples: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<Result<Vec<_>, _>>()?,
        SampleFormat::Int => {
            let max_val = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val))
                .collect::<Result<Vec<_>, _>>()?
        }
    };

    let mut buffer = StereoBuffer {
        left: Vec::with_capacity(samples.len() / channels),
        right: Vec::with_capacity(samples.len() / channels),
    };
    for frame in samples.chunks_exact(channels) {
        buffer.left.push(frame[0]);
        buffer.right.push(frame.get(1).copied().unwrap_or(frame[0]));
    }
    Ok((buffer, spec))
}

/// Write stereo audio. 32-bit output is float; 16 and 24 are integer PCM.
pub fn write_wav_stereo(
    path: &Path,
    buffer: &StereoBuffer,
    sample_rate: u32,
    bits_per_sample: u16,
) -> anyhow::Result<()> {
    if !matches!(bits_per_sample, 16 | 24 | 32) {
        bail!("unsupported bit depth {bits_per_sample} (expected 16, 24 or 32)");
    }
    let spec = WavSpec {
        channels: 2,
        sample_rate,
        bits_per_sample,
        sample_format: if bits_per_sample == 32 {
            SampleFormat::Float
        } else {
            SampleFormat::Int
        },
    };
    let mut writer = WavWriter::create(path, spec)
        .with_context(|| format!("failed to create {}", path.display()))?;

    let frames = buffer.left.iter().zip(&buffer.right);
    if bits_per_sample == 32 {
        for (&l, &r) in frames {
            writer.write_sample(l)?;
            writer.write_sample(r)?;
        }
    } else {
        let max_val = (1i32 << (bits_per_sample - 1)) as f32;
        let quantize = |s: f32| (s * max_val).clamp(-max_val, max_val - 1.0) as i32;
        for (&l, &r) in frames {
            writer.write_sample(quantize(l))?;
            writer.write_sample(quantize(r))?;
        }
    }

    writer.finalize()?;
    Ok(())
}

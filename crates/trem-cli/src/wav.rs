//! Stereo WAV reading and writing.

use anyhow::Context;
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::path::Path;

/// Deinterleaved stereo audio.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stereo {
    pub left: Vec<f32>,
    pub right: Vec<f32>,
}

impl Stereo {
    /// Frames per channel.
    pub fn len(&self) -> usize {
        self.left.len()
    }

    /// True if there are no frames.
    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }

    /// Build from interleaved samples with `channels` channels.
    ///
    /// Mono is copied to both sides; channels beyond the second are dropped.
    fn from_interleaved(samples: &[f32], channels: usize) -> Self {
        let frames = samples.len() / channels.max(1);
        let mut left = Vec::with_capacity(frames);
        let mut right = Vec::with_capacity(frames);
        for frame in samples.chunks_exact(channels.max(1)) {
            left.push(frame[0]);
            right.push(frame.get(1).copied().unwrap_or(frame[0]));
        }
        Self { left, right }
    }
}

/// Read a WAV file as stereo, returning its sample rate.
pub fn read_stereo(path: &Path) -> anyhow::Result<(Stereo, u32)> {
    let reader =
        WavReader::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let spec = reader.spec();

    let samples: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader.into_samples::<f32>().collect::<Result<_, _>>()?,
        SampleFormat::Int => {
            let max_val = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val))
                .collect::<Result<_, _>>()?
        }
    };

    Ok((
        Stereo::from_interleaved(&samples, usize::from(spec.channels)),
        spec.sample_rate,
    ))
}

/// Write stereo audio. 32-bit output is float, 16 and 24 are PCM.
pub fn write_stereo(
    path: &Path,
    audio: &Stereo,
    sample_rate: u32,
    bits_per_sample: u16,
) -> anyhow::Result<()> {
    anyhow::ensure!(
        matches!(bits_per_sample, 16 | 24 | 32),
        "unsupported bit depth {bits_per_sample} (use 16, 24 or 32)"
    );

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

    let frames = audio.left.iter().zip(audio.right.iter());
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

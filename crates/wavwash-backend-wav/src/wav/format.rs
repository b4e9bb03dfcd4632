//! WAV output format parameters.

use wavwash_core::format::{WAVE_FORMAT_IEEE_FLOAT, WAVE_FORMAT_PCM};
use wavwash_core::NormalizedSamples;

/// Parameters written to the fmt chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavFormat {
    /// Format code (1 = PCM, 3 = IEEE float).
    pub format_tag: u16,
    /// Number of channels.
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Bits per sample (16 or 32).
    pub bits_per_sample: u16,
}

impl WavFormat {
    /// 16-bit integer PCM.
    pub fn pcm16(channels: u16, sample_rate: u32) -> Self {
        Self {
            format_tag: WAVE_FORMAT_PCM,
            channels,
            sample_rate,
            bits_per_sample: 16,
        }
    }

    /// 32-bit integer PCM.
    pub fn pcm32(channels: u16, sample_rate: u32) -> Self {
        Self {
            bits_per_sample: 32,
            ..Self::pcm16(channels, sample_rate)
        }
    }

    /// 32-bit IEEE float.
    pub fn float32(channels: u16, sample_rate: u32) -> Self {
        Self {
            format_tag: WAVE_FORMAT_IEEE_FLOAT,
            ..Self::pcm32(channels, sample_rate)
        }
    }

    /// The format that stores `samples` without conversion.
    pub fn for_samples(channels: u16, sample_rate: u32, samples: &NormalizedSamples) -> Self {
        match samples {
            NormalizedSamples::I16(_) => Self::pcm16(channels, sample_rate),
            NormalizedSamples::I32(_) => Self::pcm32(channels, sample_rate),
            NormalizedSamples::F32(_) => Self::float32(channels, sample_rate),
        }
    }

    /// Bytes per sample per channel.
    pub(crate) fn bytes_per_sample(&self) -> u16 {
        self.bits_per_sample / 8
    }

    /// Bytes per sample frame.
    pub(crate) fn block_align(&self) -> u16 {
        self.channels * self.bytes_per_sample()
    }

    /// Bytes per second.
    pub(crate) fn byte_rate(&self) -> u32 {
        self.sample_rate * u32::from(self.block_align())
    }
}

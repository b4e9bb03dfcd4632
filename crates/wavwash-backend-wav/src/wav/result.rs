//! Result of encoding one extracted file.

use wavwash_core::ExtractedAudio;

use super::format::WavFormat;
use super::pcm::hash_pcm;
use super::writer::{interleave, write_wav_to_vec};
use crate::error::{EncodeError, EncodeResult};

/// A finished WAV file and what went into it.
#[derive(Debug, Clone)]
pub struct WavResult {
    /// Complete WAV file bytes.
    pub wav_data: Vec<u8>,
    /// BLAKE3 hash of the PCM payload only.
    pub pcm_hash: String,
    /// Format written to the fmt chunk.
    pub format: WavFormat,
    /// Number of samples per channel.
    pub num_samples: usize,
}

impl WavResult {
    /// Interleaves and writes all channels of `audio`.
    pub fn from_audio(audio: &ExtractedAudio) -> EncodeResult<Self> {
        let first = audio.left().ok_or(EncodeError::NoChannels)?;
        let channels = u16::try_from(audio.channels.len()).map_err(|_| {
            EncodeError::TooManyChannels {
                channels: audio.channels.len(),
            }
        })?;

        let format = WavFormat::for_samples(channels, audio.sample_rate(), first);
        let pcm = interleave(&audio.channels)?;
        let pcm_hash = hash_pcm(&pcm);
        let wav_data = write_wav_to_vec(&format, &pcm)?;

        Ok(Self {
            wav_data,
            pcm_hash,
            format,
            num_samples: first.len(),
        })
    }

    /// Whether the output is stereo.
    pub fn is_stereo(&self) -> bool {
        self.format.channels == 2
    }

    /// Duration in seconds.
    pub fn duration_seconds(&self) -> f64 {
        if self.format.sample_rate == 0 {
            return 0.0;
        }
        self.num_samples as f64 / f64::from(self.format.sample_rate)
    }
}

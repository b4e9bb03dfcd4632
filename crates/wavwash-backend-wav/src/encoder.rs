//! [`Encoder`] implementation producing canonical WAV files.

use wavwash_core::{Encoder, ExtractedAudio};

use crate::error::EncodeError;
use crate::wav::WavResult;

/// Encodes each extracted file as one complete WAV file.
///
/// WAV output needs no end-of-stream trailer, so [`Encoder::flush`] returns
/// nothing. The hash of the last encoded payload is kept for reporting.
#[derive(Debug, Default)]
pub struct WavEncoder {
    last_pcm_hash: Option<String>,
}

impl WavEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// BLAKE3 hash of the PCM payload from the last successful encode.
    pub fn pcm_hash(&self) -> Option<&str> {
        self.last_pcm_hash.as_deref()
    }
}

impl Encoder for WavEncoder {
    type Error = EncodeError;

    fn encode(&mut self, audio: &ExtractedAudio) -> Result<Vec<u8>, Self::Error> {
        let result = WavResult::from_audio(audio)?;
        self.last_pcm_hash = Some(result.pcm_hash);
        Ok(result.wav_data)
    }

    fn flush(&mut self) -> Result<Vec<u8>, Self::Error> {
        Ok(Vec::new())
    }
}

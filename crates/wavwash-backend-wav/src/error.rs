//! Error types for the WAV backend.

use thiserror::Error;

/// Result type for encoding operations.
pub type EncodeResult<T> = Result<T, EncodeError>;

/// Errors that can occur while writing WAV output.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Nothing to encode.
    #[error("audio has no channels")]
    NoChannels,

    /// More channels than a WAV header can describe.
    #[error("too many channels: {channels}")]
    TooManyChannels {
        /// Channel count.
        channels: usize,
    },

    /// Channels of different lengths cannot be interleaved.
    #[error("channel {channel} has {found} samples, expected {expected}")]
    ChannelLengthMismatch {
        /// Offending channel index.
        channel: usize,
        /// Length of the first channel.
        expected: usize,
        /// Length of the offending channel.
        found: usize,
    },

    /// Channels carry different sample types.
    #[error("channel {channel} has a different sample type than channel 0")]
    MixedSampleTypes {
        /// Offending channel index.
        channel: usize,
    },

    /// PCM payload does not fit a RIFF size field.
    #[error("PCM data too large for a WAV file: {bytes} bytes")]
    DataTooLarge {
        /// Payload size.
        bytes: u64,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl EncodeError {
    /// Stable error code for reporting.
    pub fn code(&self) -> &'static str {
        match self {
            EncodeError::NoChannels => "ENC_001",
            EncodeError::TooManyChannels { .. } => "ENC_002",
            EncodeError::ChannelLengthMismatch { .. } => "ENC_003",
            EncodeError::MixedSampleTypes { .. } => "ENC_004",
            EncodeError::DataTooLarge { .. } => "ENC_005",
            EncodeError::Io(_) => "ENC_006",
        }
    }
}

//! Error and warning types for WAV extraction.

use serde::Serialize;
use thiserror::Error;

/// Result type for extraction operations.
pub type ExtractResult<T> = Result<T, ExtractError>;

/// Errors that can occur while validating or extracting a WAV stream.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The stream could not be opened, read or seeked.
    #[error("cannot read input stream: {0}")]
    StreamUnreadable(#[from] std::io::Error),

    /// The stream does not start with a RIFF/WAVE container header.
    #[error("not a RIFF/WAVE stream")]
    NotRiffWave,

    /// The chunk scanner reached the end of the stream without finding "fmt ".
    #[error("missing fmt chunk")]
    FormatChunkMissing,

    /// The fmt chunk is present but cannot be decoded.
    #[error("invalid fmt chunk: {reason}")]
    InvalidFormatChunk {
        /// What is wrong with the chunk.
        reason: String,
    },

    /// The chunk scanner reached the end of the stream without finding "data".
    #[error("missing data chunk")]
    DataChunkMissing,

    /// The effective audio format is neither PCM nor IEEE float.
    #[error("unsupported audio format: 0x{format_code:04x}")]
    UnsupportedAudioFormat {
        /// Effective format code.
        format_code: u16,
    },

    /// More than two channels.
    #[error("unsupported channel layout: {channels} channels (at most 2 supported)")]
    UnsupportedChannelLayout {
        /// Declared channel count.
        channels: u16,
    },

    /// Bit depth outside of what the reader can extract.
    #[error("unsupported bit depth: {bits} bits per sample")]
    UnsupportedBitDepth {
        /// Declared bits per sample.
        bits: u16,
    },

    /// A channel index beyond the declared channel count was requested.
    #[error("channel {channel} requested from a {channels}-channel stream")]
    ChannelOutOfRange {
        /// Requested channel index.
        channel: u16,
        /// Declared channel count.
        channels: u16,
    },
}

impl ExtractError {
    /// Creates an invalid fmt chunk error.
    pub fn invalid_format(reason: impl Into<String>) -> Self {
        Self::InvalidFormatChunk {
            reason: reason.into(),
        }
    }

    /// Stable error code for reporting.
    pub fn code(&self) -> &'static str {
        match self {
            ExtractError::StreamUnreadable(_) => "WAV_001",
            ExtractError::NotRiffWave => "WAV_002",
            ExtractError::FormatChunkMissing => "WAV_003",
            ExtractError::InvalidFormatChunk { .. } => "WAV_004",
            ExtractError::DataChunkMissing => "WAV_005",
            ExtractError::UnsupportedAudioFormat { .. } => "WAV_006",
            ExtractError::UnsupportedChannelLayout { .. } => "WAV_007",
            ExtractError::UnsupportedBitDepth { .. } => "WAV_008",
            ExtractError::ChannelOutOfRange { .. } => "WAV_009",
        }
    }

    /// Returns true for failures caused by the file contents rather than I/O.
    pub fn is_format_error(&self) -> bool {
        !matches!(self, ExtractError::StreamUnreadable(_))
    }
}

/// Non-fatal conditions found while extracting samples.
///
/// Extraction is permissive about damaged sample data; anything it had to
/// patch over is reported here so callers can surface it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExtractWarning {
    /// The data chunk extends past the end of the stream.
    TruncatedFrames {
        /// Frames that were only partially present and were zero-filled.
        zero_filled: usize,
        /// Frames that lie entirely beyond the end of the stream.
        dropped: usize,
        /// Declared data bytes that were not available.
        missing_bytes: u64,
    },

    /// The data size is not a whole number of frames.
    TrailingBytes {
        /// Bytes left over after the last whole frame.
        bytes: u32,
    },

    /// `block_align` disagrees with `channels * container bytes`.
    BlockAlignMismatch {
        /// Declared block alignment.
        declared: u16,
        /// Block alignment implied by channels and bit depth.
        expected: u32,
    },
}

impl ExtractWarning {
    /// Stable warning code for reporting.
    pub fn code(&self) -> &'static str {
        match self {
            ExtractWarning::TruncatedFrames { .. } => "WAV_W001",
            ExtractWarning::TrailingBytes { .. } => "WAV_W002",
            ExtractWarning::BlockAlignMismatch { .. } => "WAV_W003",
        }
    }
}

impl std::fmt::Display for ExtractWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractWarning::TruncatedFrames {
                zero_filled,
                dropped,
                missing_bytes,
            } => write!(
                f,
                "data chunk truncated: {} bytes missing ({} frames zero-filled, {} frames dropped)",
                missing_bytes, zero_filled, dropped
            ),
            ExtractWarning::TrailingBytes { bytes } => {
                write!(f, "{} trailing bytes after the last whole frame", bytes)
            }
            ExtractWarning::BlockAlignMismatch { declared, expected } => write!(
                f,
                "block align is {} but channels and bit depth imply {}",
                declared, expected
            ),
        }
    }
}

//! Single-call extraction of normalized audio from a WAV stream.

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use log::{debug, warn};

use crate::error::{ExtractError, ExtractResult, ExtractWarning};
use crate::format::{read_format_descriptor, FormatDescriptor, FormatTag};
use crate::pcm::read_channel;
use crate::riff::{find_data, validate, DataDescriptor};
use crate::scale::NormalizedSamples;

/// Everything an encoder needs from one WAV file.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedAudio {
    /// Decoded fmt chunk.
    pub format: FormatDescriptor,
    /// Location and declared size of the sample data.
    pub data: DataDescriptor,
    /// Frames per channel actually extracted.
    pub number_of_samples: usize,
    /// One normalized, time-aligned sequence per channel.
    pub channels: Vec<NormalizedSamples>,
    /// Problems that were worked around during extraction.
    pub warnings: Vec<ExtractWarning>,
}

impl ExtractedAudio {
    /// Channel count.
    pub fn channel_count(&self) -> u16 {
        self.format.channels
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.format.sample_rate
    }

    /// Source bits per sample.
    pub fn bits_per_sample(&self) -> u16 {
        self.format.bits_per_sample
    }

    /// Effective audio format code.
    pub fn audio_format(&self) -> u16 {
        self.format.effective_format()
    }

    /// Frames declared by the data chunk, before any truncation.
    pub fn declared_frames(&self) -> usize {
        self.data.frame_count(self.format.block_align)
    }

    /// Duration in seconds.
    pub fn duration_seconds(&self) -> f64 {
        if self.format.sample_rate == 0 {
            return 0.0;
        }
        self.number_of_samples as f64 / f64::from(self.format.sample_rate)
    }

    /// First channel.
    pub fn left(&self) -> Option<&NormalizedSamples> {
        self.channels.first()
    }

    /// Second channel, for stereo streams.
    pub fn right(&self) -> Option<&NormalizedSamples> {
        self.channels.get(1)
    }
}

/// Validates a WAV stream and extracts its normalized samples.
///
/// The stream is validated (RIFF/WAVE header, fmt and data chunks present),
/// the format is checked for support, and every channel is read and
/// rescaled. Damage in the sample data is tolerated and reported through
/// [`ExtractedAudio::warnings`]; structural problems are errors.
pub fn extract<R: Read + Seek>(reader: &mut R) -> ExtractResult<ExtractedAudio> {
    validate(reader)?;

    let format = read_format_descriptor(reader)?;
    if format.is_empty() {
        return Err(ExtractError::invalid_format("block align is zero"));
    }
    format.check_supported()?;

    let data = find_data(reader)?.ok_or(ExtractError::DataChunkMissing)?;

    debug!("audio format: {}", FormatTag::from(format.effective_format()));
    debug!("number of channels: {}", format.channels);
    debug!("sample rate: {}", format.sample_rate);
    debug!("byte rate: {}", format.byte_rate);
    debug!("block align: {}", format.block_align);
    debug!("bits per sample: {}", format.bits_per_sample);
    debug!("data size: 0x{:x}", data.data_size);
    debug!(
        "number of samples: 0x{:x}",
        data.frame_count(format.block_align)
    );
    debug!("data index: 0x{:x}", data.data_index);

    let mut warnings = Vec::new();

    let expected = format.expected_block_align();
    if u32::from(format.block_align) != expected {
        warnings.push(ExtractWarning::BlockAlignMismatch {
            declared: format.block_align,
            expected,
        });
    }

    let trailing = data.trailing_bytes(format.block_align);
    if trailing > 0 {
        warnings.push(ExtractWarning::TrailingBytes { bytes: trailing });
    }

    let mut channels = Vec::with_capacity(usize::from(format.channels));
    let mut number_of_samples = 0;

    for channel in 0..format.channels {
        let raw = read_channel(reader, &format, &data, channel)?;

        if channel == 0 {
            number_of_samples = raw.samples.len();
            if raw.is_truncated() {
                warnings.push(ExtractWarning::TruncatedFrames {
                    zero_filled: raw.zero_filled,
                    dropped: raw.dropped,
                    missing_bytes: raw.missing_bytes,
                });
            }
        }

        channels.push(NormalizedSamples::from_raw(&raw.samples, &format));
    }

    for warning in &warnings {
        warn!("{}", warning);
    }

    Ok(ExtractedAudio {
        format,
        data,
        number_of_samples,
        channels,
        warnings,
    })
}

/// Opens `path` and runs [`extract`] on it.
///
/// Each call owns its file handle, so independent files can be extracted
/// from separate threads.
pub fn extract_file(path: impl AsRef<Path>) -> ExtractResult<ExtractedAudio> {
    let file = File::open(path.as_ref())?;
    extract(&mut BufReader::new(file))
}

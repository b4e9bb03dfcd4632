//! WAV serialization and channel interleaving.

use std::io::Write;
use std::mem;

use byteorder::{LittleEndian, WriteBytesExt};
use wavwash_core::riff::{CHUNK_HEADER_SIZE, DATA_ID, FMT_ID, RIFF_ID, WAVE_ID};
use wavwash_core::NormalizedSamples;

use super::format::WavFormat;
use crate::error::{EncodeError, EncodeResult};

const FMT_CHUNK_SIZE: u32 = 16;
/// "WAVE" plus the fmt chunk plus the data chunk header.
const HEADER_OVERHEAD: u32 = 4 + CHUNK_HEADER_SIZE as u32 + FMT_CHUNK_SIZE + CHUNK_HEADER_SIZE as u32;

/// Writes a complete WAV file.
pub fn write_wav<W: Write>(writer: &mut W, format: &WavFormat, pcm_data: &[u8]) -> EncodeResult<()> {
    let too_large = || EncodeError::DataTooLarge {
        bytes: pcm_data.len() as u64,
    };
    let data_size = u32::try_from(pcm_data.len()).map_err(|_| too_large())?;
    // Odd payloads get a pad byte that the RIFF size covers.
    let pad = data_size % 2;
    let riff_size = HEADER_OVERHEAD
        .checked_add(data_size)
        .and_then(|size| size.checked_add(pad))
        .ok_or_else(too_large)?;

    writer.write_all(&RIFF_ID)?;
    writer.write_u32::<LittleEndian>(riff_size)?;
    writer.write_all(&WAVE_ID)?;

    writer.write_all(&FMT_ID)?;
    writer.write_u32::<LittleEndian>(FMT_CHUNK_SIZE)?;
    writer.write_u16::<LittleEndian>(format.format_tag)?;
    writer.write_u16::<LittleEndian>(format.channels)?;
    writer.write_u32::<LittleEndian>(format.sample_rate)?;
    writer.write_u32::<LittleEndian>(format.byte_rate())?;
    writer.write_u16::<LittleEndian>(format.block_align())?;
    writer.write_u16::<LittleEndian>(format.bits_per_sample)?;

    writer.write_all(&DATA_ID)?;
    writer.write_u32::<LittleEndian>(data_size)?;
    writer.write_all(pcm_data)?;
    if pad == 1 {
        writer.write_u8(0)?;
    }

    Ok(())
}

/// Writes a WAV file to a byte vector.
pub fn write_wav_to_vec(format: &WavFormat, pcm_data: &[u8]) -> EncodeResult<Vec<u8>> {
    let mut buffer = Vec::with_capacity(44 + pcm_data.len());
    write_wav(&mut buffer, format, pcm_data)?;
    Ok(buffer)
}

/// Interleaves channels into little-endian frames.
///
/// All channels must have the same length and sample type.
pub fn interleave(channels: &[NormalizedSamples]) -> EncodeResult<Vec<u8>> {
    let first = channels.first().ok_or(EncodeError::NoChannels)?;
    let frames = first.len();

    for (index, channel) in channels.iter().enumerate().skip(1) {
        if mem::discriminant(channel) != mem::discriminant(first) {
            return Err(EncodeError::MixedSampleTypes { channel: index });
        }
        if channel.len() != frames {
            return Err(EncodeError::ChannelLengthMismatch {
                channel: index,
                expected: frames,
                found: channel.len(),
            });
        }
    }

    let bytes_per_sample = usize::from(first.bits() / 8);
    let mut pcm = Vec::with_capacity(frames * channels.len() * bytes_per_sample);

    for frame in 0..frames {
        for channel in channels {
            match channel {
                NormalizedSamples::I16(samples) => {
                    pcm.write_i16::<LittleEndian>(samples[frame])?
                }
                NormalizedSamples::I32(samples) => {
                    pcm.write_i32::<LittleEndian>(samples[frame])?
                }
                NormalizedSamples::F32(samples) => {
                    pcm.write_f32::<LittleEndian>(samples[frame])?
                }
            }
        }
    }

    Ok(pcm)
}

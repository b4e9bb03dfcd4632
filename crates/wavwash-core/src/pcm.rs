//! Deinterleaving of the data chunk into per-channel raw samples.

use std::io::{self, Read, Seek, SeekFrom};

use crate::error::{ExtractError, ExtractResult};
use crate::format::FormatDescriptor;
use crate::riff::DataDescriptor;

/// An undecoded sample: the little-endian bit pattern of one channel's
/// container, right-justified and zero-extended.
pub type RawSample = u32;

/// Raw samples of a single channel, in frame order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawChannel {
    /// One sample per frame that was at least partially present.
    pub samples: Vec<RawSample>,
    /// Frames cut short by the end of the stream and zero-filled.
    pub zero_filled: usize,
    /// Declared frames that lie entirely beyond the end of the stream.
    pub dropped: usize,
    /// Declared data bytes the stream did not contain.
    pub missing_bytes: u64,
}

impl RawChannel {
    /// True when the stream ended before the declared data did.
    pub fn is_truncated(&self) -> bool {
        self.missing_bytes > 0
    }
}

/// Reads every sample of `channel` from the data chunk.
///
/// Each frame is `block_align` bytes; the channel's bytes start at
/// `channel * (block_align / channels)` within the frame and span one
/// container (1, 2 or 4 bytes), clipped to the channel's stride so packed
/// 24-bit frames never bleed into the next channel.
///
/// A frame cut short by the end of the stream is zero-filled and kept.
/// Frames past the end of the stream are counted in
/// [`RawChannel::dropped`] but not produced.
pub fn read_channel<R: Read + Seek>(
    reader: &mut R,
    format: &FormatDescriptor,
    data: &DataDescriptor,
    channel: u16,
) -> ExtractResult<RawChannel> {
    if channel >= format.channels {
        return Err(ExtractError::ChannelOutOfRange {
            channel,
            channels: format.channels,
        });
    }
    if format.is_empty() {
        return Err(ExtractError::invalid_format("block align is zero"));
    }

    let block_align = usize::from(format.block_align);
    let stride = format.channel_stride();
    let offset = (usize::from(channel) * stride).min(block_align - 1);
    let width = format
        .container_bytes()
        .min(stride.max(1))
        .min(block_align - offset);

    let frames = data.frame_count(format.block_align);
    let mut channel_data = RawChannel {
        samples: Vec::with_capacity(frames.min(MAX_PREALLOCATED_FRAMES)),
        ..RawChannel::default()
    };

    reader.seek(SeekFrom::Start(data.data_index))?;
    let mut frame = vec![0u8; block_align];

    for frame_index in 0..frames {
        let filled = read_frame(reader, &mut frame)?;

        if filled == 0 {
            let dropped = frames - frame_index;
            channel_data.dropped = dropped;
            channel_data.missing_bytes += (dropped * block_align) as u64;
            break;
        }

        if filled < block_align {
            frame[filled..].fill(0);
            channel_data.zero_filled += 1;
            channel_data.missing_bytes += (block_align - filled) as u64;
        }

        channel_data
            .samples
            .push(raw_sample(&frame[offset..offset + width]));
    }

    Ok(channel_data)
}

/// Upper bound on up-front allocation; the declared size is not trusted.
const MAX_PREALLOCATED_FRAMES: usize = 1 << 20;

/// Fills `frame` from the reader, returning how many bytes were available.
fn read_frame<R: Read>(reader: &mut R, frame: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < frame.len() {
        match reader.read(&mut frame[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Little-endian bytes to a zero-extended bit pattern.
fn raw_sample(bytes: &[u8]) -> RawSample {
    bytes
        .iter()
        .rev()
        .fold(0, |acc, &byte| (acc << 8) | RawSample::from(byte))
}

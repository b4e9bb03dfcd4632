//! Synthetic WAV builders for unit tests.

use crate::riff::{FourCc, DATA_ID, FMT_ID};

/// Builds a RIFF/WAVE byte stream from an ordered list of chunks.
#[derive(Debug, Default)]
pub(crate) struct TestWav {
    chunks: Vec<(FourCc, Vec<u8>)>,
}

impl TestWav {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Mono or stereo PCM with a canonical fmt chunk.
    pub(crate) fn pcm(channels: u16, sample_rate: u32, bits: u16, data: Vec<u8>) -> Vec<u8> {
        let block_align = channels * bits.div_ceil(8);
        Self::new()
            .chunk(FMT_ID, fmt_body(1, channels, sample_rate, block_align, bits))
            .chunk(DATA_ID, data)
            .build()
    }

    pub(crate) fn chunk(mut self, id: FourCc, body: Vec<u8>) -> Self {
        self.chunks.push((id, body));
        self
    }

    pub(crate) fn build(self) -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(b"WAVE");
        for (id, data) in self.chunks {
            body.extend_from_slice(&id);
            body.extend_from_slice(&(data.len() as u32).to_le_bytes());
            body.extend_from_slice(&data);
            if data.len() % 2 == 1 {
                body.push(0);
            }
        }

        let mut wav = Vec::with_capacity(body.len() + 8);
        wav.extend_from_slice(b"RIFF");
        wav.extend_from_slice(&(body.len() as u32).to_le_bytes());
        wav.extend_from_slice(&body);
        wav
    }
}

/// A 16-byte fmt chunk body.
pub(crate) fn fmt_body(
    format_tag: u16,
    channels: u16,
    sample_rate: u32,
    block_align: u16,
    bits: u16,
) -> Vec<u8> {
    let byte_rate = sample_rate * u32::from(block_align);
    let mut body = Vec::with_capacity(16);
    body.extend_from_slice(&format_tag.to_le_bytes());
    body.extend_from_slice(&channels.to_le_bytes());
    body.extend_from_slice(&sample_rate.to_le_bytes());
    body.extend_from_slice(&byte_rate.to_le_bytes());
    body.extend_from_slice(&block_align.to_le_bytes());
    body.extend_from_slice(&bits.to_le_bytes());
    body
}

/// A 40-byte WAVE_FORMAT_EXTENSIBLE fmt chunk body.
pub(crate) fn extensible_fmt_body(
    channels: u16,
    sample_rate: u32,
    block_align: u16,
    bits: u16,
    valid_bits: u16,
    channel_mask: u32,
    sub_format: u16,
) -> Vec<u8> {
    let mut body = fmt_body(0xFFFE, channels, sample_rate, block_align, bits);
    body.extend_from_slice(&22u16.to_le_bytes());
    body.extend_from_slice(&valid_bits.to_le_bytes());
    body.extend_from_slice(&channel_mask.to_le_bytes());
    body.extend_from_slice(&sub_format.to_le_bytes());
    // Remainder of KSDATAFORMAT_SUBTYPE_* GUID
    body.extend_from_slice(&[
        0x00, 0x00, 0x00, 0x00, 0x10, 0x00, 0x80, 0x00, 0x00, 0xAA, 0x00, 0x38, 0x9B, 0x71,
    ]);
    body
}

//! fmt chunk decoding.

use std::io::{self, Read, Seek, SeekFrom};

use byteorder::{LittleEndian, ReadBytesExt};
use serde::Serialize;

use crate::error::{ExtractError, ExtractResult};
use crate::riff::{find_chunk, ChunkHeader, FMT_ID};

/// Uncompressed integer PCM.
pub const WAVE_FORMAT_PCM: u16 = 0x0001;
/// IEEE 754 floating point.
pub const WAVE_FORMAT_IEEE_FLOAT: u16 = 0x0003;
/// ITU-T G.711 A-law.
pub const WAVE_FORMAT_ALAW: u16 = 0x0006;
/// ITU-T G.711 mu-law.
pub const WAVE_FORMAT_MULAW: u16 = 0x0007;
/// The real format lives in the sub-format GUID.
pub const WAVE_FORMAT_EXTENSIBLE: u16 = 0xFFFE;

/// Size of the fields common to every fmt chunk.
const BASE_FMT_SIZE: u32 = 16;
/// Size of a fmt chunk carrying the extensible fields.
const EXTENSIBLE_FMT_SIZE: u32 = 40;

/// Most channels the reader can deinterleave.
pub const MAX_CHANNELS: u16 = 2;
/// Widest sample container the reader can extract.
pub const MAX_BITS_PER_SAMPLE: u16 = 32;

/// Audio format codes this crate knows by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatTag {
    /// Integer PCM.
    Pcm,
    /// 32/64-bit float.
    IeeeFloat,
    /// G.711 A-law.
    Alaw,
    /// G.711 mu-law.
    Mulaw,
    /// WAVE_FORMAT_EXTENSIBLE marker.
    Extensible,
    /// Any other registered or vendor code.
    Other(u16),
}

impl FormatTag {
    /// Numeric format code.
    pub fn code(self) -> u16 {
        match self {
            FormatTag::Pcm => WAVE_FORMAT_PCM,
            FormatTag::IeeeFloat => WAVE_FORMAT_IEEE_FLOAT,
            FormatTag::Alaw => WAVE_FORMAT_ALAW,
            FormatTag::Mulaw => WAVE_FORMAT_MULAW,
            FormatTag::Extensible => WAVE_FORMAT_EXTENSIBLE,
            FormatTag::Other(code) => code,
        }
    }

    /// Short display name.
    pub fn name(self) -> &'static str {
        match self {
            FormatTag::Pcm => "PCM",
            FormatTag::IeeeFloat => "IEEE float",
            FormatTag::Alaw => "A-law",
            FormatTag::Mulaw => "mu-law",
            FormatTag::Extensible => "extensible",
            FormatTag::Other(_) => "unknown",
        }
    }
}

impl From<u16> for FormatTag {
    fn from(code: u16) -> Self {
        match code {
            WAVE_FORMAT_PCM => FormatTag::Pcm,
            WAVE_FORMAT_IEEE_FLOAT => FormatTag::IeeeFloat,
            WAVE_FORMAT_ALAW => FormatTag::Alaw,
            WAVE_FORMAT_MULAW => FormatTag::Mulaw,
            WAVE_FORMAT_EXTENSIBLE => FormatTag::Extensible,
            other => FormatTag::Other(other),
        }
    }
}

impl std::fmt::Display for FormatTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (0x{:04x})", self.name(), self.code())
    }
}

/// Fields present only when `format_tag` is [`WAVE_FORMAT_EXTENSIBLE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ExtensibleFormat {
    /// Size of the extension (`cbSize`), normally 22.
    pub extension_size: u16,
    /// Bits of actual precision inside each container.
    pub valid_bits_per_sample: u16,
    /// Speaker position bitmask.
    pub channel_mask: u32,
    /// Sub-format GUID; its first two bytes are the real format code.
    pub sub_format: [u8; 16],
}

impl ExtensibleFormat {
    /// The format code embedded in the sub-format GUID.
    pub fn sub_format_code(&self) -> u16 {
        u16::from_le_bytes([self.sub_format[0], self.sub_format[1]])
    }

    fn read<R: Read>(body: &mut R) -> io::Result<Self> {
        let extension_size = body.read_u16::<LittleEndian>()?;
        let valid_bits_per_sample = body.read_u16::<LittleEndian>()?;
        let channel_mask = body.read_u32::<LittleEndian>()?;
        let mut sub_format = [0u8; 16];
        body.read_exact(&mut sub_format)?;

        Ok(Self {
            extension_size,
            valid_bits_per_sample,
            channel_mask,
            sub_format,
        })
    }
}

/// Decoded fmt chunk.
///
/// The all-zero default is what [`read_format_descriptor`] returns when the
/// stream has no fmt chunk; a zero `block_align` must never be divided by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct FormatDescriptor {
    /// Format code as declared in the chunk.
    pub format_tag: u16,
    /// Interleaved channel count.
    pub channels: u16,
    /// Frames per second.
    pub sample_rate: u32,
    /// Declared bytes per second.
    pub byte_rate: u32,
    /// Bytes per interleaved frame across all channels.
    pub block_align: u16,
    /// Container width of each sample in bits.
    pub bits_per_sample: u16,
    /// Extensible fields, when `format_tag` is extensible.
    pub extensible: Option<ExtensibleFormat>,
}

impl FormatDescriptor {
    /// Format code after resolving the extensible indirection.
    pub fn effective_format(&self) -> u16 {
        match (self.format_tag, self.extensible) {
            (WAVE_FORMAT_EXTENSIBLE, Some(ext)) => ext.sub_format_code(),
            (tag, _) => tag,
        }
    }

    /// Named form of [`effective_format`](Self::effective_format).
    pub fn audio_format(&self) -> FormatTag {
        FormatTag::from(self.effective_format())
    }

    /// True for the sentinel returned when no fmt chunk exists.
    pub fn is_empty(&self) -> bool {
        self.block_align == 0
    }

    /// Bytes per sample container as the reader sees it: 1, 2 or 4.
    pub fn container_bytes(&self) -> usize {
        match self.bits_per_sample {
            0..=8 => 1,
            9..=16 => 2,
            _ => 4,
        }
    }

    /// Byte stride between channels inside a frame.
    pub fn channel_stride(&self) -> usize {
        match self.channels {
            0 => 0,
            channels => usize::from(self.block_align) / usize::from(channels),
        }
    }

    /// Block alignment implied by channels and bit depth.
    pub fn expected_block_align(&self) -> u32 {
        u32::from(self.channels) * u32::from(self.bits_per_sample.div_ceil(8))
    }

    /// Checks the descriptor against what extraction supports.
    ///
    /// The effective format must be PCM or IEEE float, there may be at most
    /// two channels and at most 32 bits per sample. Float data must use
    /// 32-bit containers.
    pub fn check_supported(&self) -> ExtractResult<()> {
        if self.is_empty() {
            return Err(ExtractError::invalid_format("block align is zero"));
        }

        let format = self.audio_format();
        if !matches!(format, FormatTag::Pcm | FormatTag::IeeeFloat) {
            return Err(ExtractError::UnsupportedAudioFormat {
                format_code: format.code(),
            });
        }

        if self.channels == 0 || self.channels > MAX_CHANNELS {
            return Err(ExtractError::UnsupportedChannelLayout {
                channels: self.channels,
            });
        }

        if self.bits_per_sample == 0 || self.bits_per_sample > MAX_BITS_PER_SAMPLE {
            return Err(ExtractError::UnsupportedBitDepth {
                bits: self.bits_per_sample,
            });
        }

        if format == FormatTag::IeeeFloat && self.bits_per_sample != 32 {
            return Err(ExtractError::UnsupportedBitDepth {
                bits: self.bits_per_sample,
            });
        }

        Ok(())
    }

    /// Decodes a fmt chunk body of `size` bytes from the reader.
    ///
    /// The extensible fields are only read when the base format tag asks for
    /// them; anything after the fields this crate understands is ignored.
    pub fn read<R: Read>(reader: &mut R, size: u32) -> ExtractResult<Self> {
        if size < BASE_FMT_SIZE {
            return Err(ExtractError::invalid_format(format!(
                "{} bytes, need at least {}",
                size, BASE_FMT_SIZE
            )));
        }

        let mut body = reader.by_ref().take(u64::from(size));
        let mut descriptor = Self::read_base(&mut body).map_err(body_error)?;

        if descriptor.format_tag != WAVE_FORMAT_EXTENSIBLE {
            return Ok(descriptor);
        }

        if size < EXTENSIBLE_FMT_SIZE {
            return Err(ExtractError::invalid_format(format!(
                "extensible fmt chunk is {} bytes, need {}",
                size, EXTENSIBLE_FMT_SIZE
            )));
        }

        descriptor.extensible = Some(ExtensibleFormat::read(&mut body).map_err(body_error)?);
        Ok(descriptor)
    }

    fn read_base<R: Read>(body: &mut R) -> io::Result<Self> {
        Ok(FormatDescriptor {
            format_tag: body.read_u16::<LittleEndian>()?,
            channels: body.read_u16::<LittleEndian>()?,
            sample_rate: body.read_u32::<LittleEndian>()?,
            byte_rate: body.read_u32::<LittleEndian>()?,
            block_align: body.read_u16::<LittleEndian>()?,
            bits_per_sample: body.read_u16::<LittleEndian>()?,
            extensible: None,
        })
    }
}

/// A fmt body cut short by the end of the stream is a format problem, not I/O.
fn body_error(e: io::Error) -> ExtractError {
    match e.kind() {
        io::ErrorKind::UnexpectedEof => ExtractError::invalid_format("truncated"),
        _ => ExtractError::StreamUnreadable(e),
    }
}

/// Locates and decodes the fmt chunk.
///
/// A stream without a fmt chunk yields the all-zero descriptor rather than an
/// error; check [`FormatDescriptor::is_empty`] before using it.
pub fn read_format_descriptor<R: Read + Seek>(reader: &mut R) -> ExtractResult<FormatDescriptor> {
    let Some(offset) = find_chunk(reader, FMT_ID)? else {
        return Ok(FormatDescriptor::default());
    };

    reader.seek(SeekFrom::Start(offset))?;
    let header = ChunkHeader::read(reader)?;
    FormatDescriptor::read(reader, header.size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::riff::DATA_ID;
    use crate::test_wav::{extensible_fmt_body, fmt_body, TestWav};
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    fn descriptor_of(fmt: Vec<u8>) -> ExtractResult<FormatDescriptor> {
        let wav = TestWav::new()
            .chunk(FMT_ID, fmt)
            .chunk(DATA_ID, vec![0; 4])
            .build();
        read_format_descriptor(&mut Cursor::new(wav))
    }

    #[test]
    fn test_decode_pcm_stereo() {
        let format = descriptor_of(fmt_body(1, 2, 44100, 4, 16)).unwrap();
        assert_eq!(
            format,
            FormatDescriptor {
                format_tag: WAVE_FORMAT_PCM,
                channels: 2,
                sample_rate: 44100,
                byte_rate: 44100 * 4,
                block_align: 4,
                bits_per_sample: 16,
                extensible: None,
            }
        );
        assert_eq!(format.effective_format(), WAVE_FORMAT_PCM);
        assert_eq!(format.audio_format(), FormatTag::Pcm);
    }

    #[test]
    fn test_extensible_resolves_sub_format() {
        let fmt = extensible_fmt_body(2, 48000, 8, 32, 32, 0b11, WAVE_FORMAT_IEEE_FLOAT);
        let format = descriptor_of(fmt).unwrap();

        assert_eq!(format.format_tag, WAVE_FORMAT_EXTENSIBLE);
        assert_eq!(format.effective_format(), WAVE_FORMAT_IEEE_FLOAT);
        assert_eq!(format.audio_format(), FormatTag::IeeeFloat);

        let ext = format.extensible.unwrap();
        assert_eq!(ext.extension_size, 22);
        assert_eq!(ext.valid_bits_per_sample, 32);
        assert_eq!(ext.channel_mask, 0b11);
    }

    #[test]
    fn test_extensible_fields_ignored_for_plain_pcm() {
        // A plain PCM chunk with a trailing cbSize of 0
        let mut fmt = fmt_body(1, 1, 22050, 2, 16);
        fmt.extend_from_slice(&0u16.to_le_bytes());
        let format = descriptor_of(fmt).unwrap();
        assert_eq!(format.extensible, None);
        assert_eq!(format.bits_per_sample, 16);
    }

    #[test]
    fn test_missing_fmt_returns_zero_sentinel() {
        let wav = TestWav::new().chunk(DATA_ID, vec![0; 4]).build();
        let format = read_format_descriptor(&mut Cursor::new(wav)).unwrap();
        assert_eq!(format, FormatDescriptor::default());
        assert!(format.is_empty());
    }

    #[test]
    fn test_short_fmt_chunk_is_invalid() {
        let err = descriptor_of(vec![1, 0, 1, 0]).unwrap_err();
        assert!(matches!(err, ExtractError::InvalidFormatChunk { .. }));
    }

    #[test]
    fn test_short_extensible_chunk_is_invalid() {
        let err = descriptor_of(fmt_body(0xFFFE, 2, 48000, 8, 32)).unwrap_err();
        assert!(matches!(err, ExtractError::InvalidFormatChunk { .. }));
    }

    #[test]
    fn test_fmt_body_truncated_by_end_of_stream() {
        let mut wav = TestWav::new()
            .chunk(FMT_ID, fmt_body(1, 1, 8000, 2, 16))
            .build();
        wav.truncate(12 + 8 + 10);
        let err = read_format_descriptor(&mut Cursor::new(wav)).unwrap_err();
        assert!(matches!(err, ExtractError::InvalidFormatChunk { .. }));
    }

    #[test]
    fn test_container_bytes() {
        let mut format = FormatDescriptor::default();
        for (bits, bytes) in [(4, 1), (8, 1), (12, 2), (16, 2), (20, 4), (24, 4), (32, 4)] {
            format.bits_per_sample = bits;
            assert_eq!(format.container_bytes(), bytes, "bits = {}", bits);
        }
    }

    #[test]
    fn test_channel_stride_for_packed_24_bit() {
        let format = descriptor_of(fmt_body(1, 2, 48000, 6, 24)).unwrap();
        assert_eq!(format.channel_stride(), 3);
        assert_eq!(format.expected_block_align(), 6);
    }

    #[test]
    fn test_check_supported() {
        let ok = descriptor_of(fmt_body(1, 2, 44100, 4, 16)).unwrap();
        assert!(ok.check_supported().is_ok());

        let alaw = descriptor_of(fmt_body(6, 1, 8000, 1, 8)).unwrap();
        assert!(matches!(
            alaw.check_supported(),
            Err(ExtractError::UnsupportedAudioFormat { format_code: 6 })
        ));

        let surround = descriptor_of(fmt_body(1, 6, 48000, 12, 16)).unwrap();
        assert!(matches!(
            surround.check_supported(),
            Err(ExtractError::UnsupportedChannelLayout { channels: 6 })
        ));

        let wide = descriptor_of(fmt_body(1, 1, 48000, 8, 64)).unwrap();
        assert!(matches!(
            wide.check_supported(),
            Err(ExtractError::UnsupportedBitDepth { bits: 64 })
        ));

        let double = descriptor_of(fmt_body(3, 1, 48000, 8, 64)).unwrap();
        assert!(matches!(
            double.check_supported(),
            Err(ExtractError::UnsupportedBitDepth { bits: 64 })
        ));

        assert!(FormatDescriptor::default().check_supported().is_err());
    }

    #[test]
    fn test_format_tag_round_trip_names() {
        assert_eq!(FormatTag::from(0xFFFE), FormatTag::Extensible);
        assert_eq!(FormatTag::from(0x0055), FormatTag::Other(0x0055));
        assert_eq!(FormatTag::Pcm.to_string(), "PCM (0x0001)");
    }
}

//! RIFF container parsing.
//!
//! A WAV file is a RIFF container: a 12-byte `RIFF <size> WAVE` header followed
//! by a sequence of sub-chunks, each introduced by an 8-byte header holding a
//! four character tag and a little-endian body size. Sub-chunks may appear in
//! any order, so everything here locates chunks by scanning headers rather than
//! assuming fixed offsets.
//!
//! Every function repositions the stream explicitly before reading; none of
//! them rely on where a previous call left the cursor.

use std::io::{self, Read, Seek, SeekFrom};

use byteorder::{LittleEndian, ReadBytesExt};
use log::trace;
use serde::Serialize;

use crate::error::{ExtractError, ExtractResult};

/// A four character chunk tag.
pub type FourCc = [u8; 4];

/// Tag of the outer container chunk.
pub const RIFF_ID: FourCc = *b"RIFF";
/// Form type of a WAV container.
pub const WAVE_ID: FourCc = *b"WAVE";
/// Tag of the format sub-chunk.
pub const FMT_ID: FourCc = *b"fmt ";
/// Tag of the sample data sub-chunk.
pub const DATA_ID: FourCc = *b"data";

/// Size of the `RIFF <size> WAVE` container header.
pub const RIFF_HEADER_SIZE: u64 = 12;
/// Size of a sub-chunk header (tag + size).
pub const CHUNK_HEADER_SIZE: u64 = 8;

/// A sub-chunk header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkHeader {
    /// Chunk tag.
    pub id: FourCc,
    /// Body length in bytes, excluding this header and any pad byte.
    pub size: u32,
}

impl ChunkHeader {
    /// Reads a chunk header at the current stream position.
    pub fn read<R: Read>(reader: &mut R) -> io::Result<Self> {
        let mut id = [0; 4];
        reader.read_exact(&mut id)?;
        let size = reader.read_u32::<LittleEndian>()?;
        Ok(Self { id, size })
    }

    /// Body length including the pad byte that follows odd-sized bodies.
    pub fn padded_size(&self) -> u64 {
        u64::from(self.size) + u64::from(self.size & 1)
    }
}

/// The outer `RIFF` chunk header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiffContainer {
    /// Container chunk header (`RIFF` + size of everything after it).
    pub header: ChunkHeader,
    /// Form type, `WAVE` for WAV files.
    pub format: FourCc,
}

impl RiffContainer {
    /// Reads exactly 12 bytes at the current position.
    pub fn read<R: Read>(reader: &mut R) -> io::Result<Self> {
        let mut bytes = [0u8; RIFF_HEADER_SIZE as usize];
        reader.read_exact(&mut bytes)?;
        Ok(Self {
            header: ChunkHeader {
                id: [bytes[0], bytes[1], bytes[2], bytes[3]],
                size: u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
            },
            format: [bytes[8], bytes[9], bytes[10], bytes[11]],
        })
    }

    /// True when the header spells `RIFF` ... `WAVE`.
    pub fn is_wave(&self) -> bool {
        self.header.id == RIFF_ID && self.format == WAVE_ID
    }
}

/// Location of the sample data sub-chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DataDescriptor {
    /// Stream offset of the first sample byte.
    pub data_index: u64,
    /// Declared sample byte count.
    pub data_size: u32,
}

impl DataDescriptor {
    /// Number of whole frames in the declared data.
    ///
    /// A partial trailing frame is discarded. Returns 0 for a zero
    /// `block_align` instead of dividing by it.
    pub fn frame_count(&self, block_align: u16) -> usize {
        if block_align == 0 {
            return 0;
        }
        (self.data_size / u32::from(block_align)) as usize
    }

    /// Bytes left over after the last whole frame.
    pub fn trailing_bytes(&self, block_align: u16) -> u32 {
        if block_align == 0 {
            return self.data_size;
        }
        self.data_size % u32::from(block_align)
    }
}

/// Reads and checks the container header at offset 0.
///
/// Reads at most 12 bytes. A stream shorter than that is reported as
/// [`ExtractError::NotRiffWave`].
pub fn read_container<R: Read + Seek>(reader: &mut R) -> ExtractResult<RiffContainer> {
    reader.seek(SeekFrom::Start(0))?;

    let container = match RiffContainer::read(reader) {
        Ok(container) => container,
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
            return Err(ExtractError::NotRiffWave)
        }
        Err(e) => return Err(e.into()),
    };

    if !container.is_wave() {
        return Err(ExtractError::NotRiffWave);
    }

    Ok(container)
}

/// Finds the first sub-chunk tagged `id` after the container header.
///
/// Returns the offset of the chunk's header, or `None` once a header read
/// runs off the end of the stream. Odd-sized bodies are followed by a pad
/// byte, which is skipped.
pub fn find_chunk<R: Read + Seek>(reader: &mut R, id: FourCc) -> io::Result<Option<u64>> {
    let mut offset = reader.seek(SeekFrom::Start(RIFF_HEADER_SIZE))?;

    loop {
        let header = match ChunkHeader::read(reader) {
            Ok(header) => header,
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
            Err(e) => return Err(e),
        };

        trace!(
            "chunk {:?} at 0x{:x}, {} bytes",
            String::from_utf8_lossy(&header.id),
            offset,
            header.size
        );

        if header.id == id {
            return Ok(Some(offset));
        }

        offset += CHUNK_HEADER_SIZE + header.padded_size();
        reader.seek(SeekFrom::Start(offset))?;
    }
}

/// Locates the data sub-chunk.
pub fn find_data<R: Read + Seek>(reader: &mut R) -> io::Result<Option<DataDescriptor>> {
    let Some(offset) = find_chunk(reader, DATA_ID)? else {
        return Ok(None);
    };

    reader.seek(SeekFrom::Start(offset))?;
    let header = ChunkHeader::read(reader)?;

    Ok(Some(DataDescriptor {
        data_index: offset + CHUNK_HEADER_SIZE,
        data_size: header.size,
    }))
}

/// Checks that the stream is a WAV file with both fmt and data chunks.
///
/// Stops at the first failure; a bad container header is detected without
/// reading past the first 12 bytes.
pub fn validate<R: Read + Seek>(reader: &mut R) -> ExtractResult<()> {
    read_container(reader)?;

    if find_chunk(reader, FMT_ID)?.is_none() {
        return Err(ExtractError::FormatChunkMissing);
    }

    if find_chunk(reader, DATA_ID)?.is_none() {
        return Err(ExtractError::DataChunkMissing);
    }

    Ok(())
}

/// Boolean form of [`validate`].
pub fn is_valid_wav<R: Read + Seek>(reader: &mut R) -> bool {
    validate(reader).is_ok()
}

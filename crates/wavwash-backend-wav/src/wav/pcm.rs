//! PCM payload hashing.

use std::io::{Cursor, Read, Seek, SeekFrom};

use wavwash_core::find_data;

/// BLAKE3 hash of the data chunk of a WAV buffer.
///
/// Used to compare files by audio content only. Returns `None` when the
/// buffer has no complete data chunk.
pub fn compute_pcm_hash(wav_data: &[u8]) -> Option<String> {
    let mut cursor = Cursor::new(wav_data);
    let data = find_data(&mut cursor).ok()??;
    cursor.seek(SeekFrom::Start(data.data_index)).ok()?;

    let mut pcm = Vec::new();
    cursor
        .take(u64::from(data.data_size))
        .read_to_end(&mut pcm)
        .ok()?;
    if pcm.len() != data.data_size as usize {
        return None;
    }

    Some(hash_pcm(&pcm))
}

pub(crate) fn hash_pcm(pcm: &[u8]) -> String {
    blake3::hash(pcm).to_hex().to_string()
}

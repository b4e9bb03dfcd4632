//! End-to-end extraction tests over synthetic WAV files.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p wavwash-core --test extraction
//! ```

mod common;

use std::io::Cursor;

use pretty_assertions::assert_eq;
use wavwash_core::{
    extract, extract_file, find_chunk, find_data, is_valid_wav, read_format_descriptor, validate,
    ExtractError, ExtractWarning, FormatTag, NormalizedSamples,
};

use common::{fmt_body, le16, pcm_wav, wav_with_chunks, CountingReader};

#[test]
fn mono_16_bit_round_trips_exactly() {
    let wav = pcm_wav(1, 1, 8000, 16, &le16(&[0, 32767, -32768, -1]));
    let audio = extract(&mut Cursor::new(wav)).unwrap();

    assert_eq!(audio.format.audio_format(), FormatTag::Pcm);
    assert_eq!(audio.format.block_align, 2);
    assert_eq!(audio.number_of_samples, 4);
    assert_eq!(
        audio.left(),
        Some(&NormalizedSamples::I16(vec![0, 32767, -32768, -1]))
    );
    assert_eq!(audio.right(), None);
}

#[test]
fn non_riff_stream_is_rejected_after_header() {
    let mut bytes = b"RIFX".to_vec();
    bytes.resize(4096, 0);
    let mut reader = CountingReader::new(Cursor::new(bytes));

    let err = validate(&mut reader).unwrap_err();
    assert!(matches!(err, ExtractError::NotRiffWave));
    assert!(reader.bytes_read <= 12, "read {} bytes", reader.bytes_read);
}

#[test]
fn chunks_after_data_are_found() {
    let wav = wav_with_chunks(&[
        (*b"data", le16(&[1, 2, 3])),
        (*b"LIST", b"INFOjunk".to_vec()),
        (*b"fmt ", fmt_body(1, 1, 22050, 2, 16)),
    ]);
    let mut cursor = Cursor::new(wav);

    assert!(is_valid_wav(&mut cursor));
    let audio = extract(&mut cursor).unwrap();
    assert_eq!(audio.sample_rate(), 22050);
    assert_eq!(audio.left(), Some(&NormalizedSamples::I16(vec![1, 2, 3])));
}

#[test]
fn odd_sized_chunk_is_skipped_with_pad_byte() {
    let wav = wav_with_chunks(&[
        (*b"junk", vec![0xEE; 3]),
        (*b"fmt ", fmt_body(1, 1, 8000, 1, 8)),
        (*b"data", vec![128, 255, 0]),
    ]);
    let mut cursor = Cursor::new(wav);

    assert_eq!(find_chunk(&mut cursor, *b"fmt ").unwrap(), Some(12 + 8 + 4));
    let data = find_data(&mut cursor).unwrap().unwrap();
    assert_eq!(data.data_size, 3);
}

#[test]
fn missing_chunks_are_reported_in_order() {
    let no_fmt = wav_with_chunks(&[(*b"data", vec![0; 4])]);
    assert!(matches!(
        validate(&mut Cursor::new(no_fmt)),
        Err(ExtractError::FormatChunkMissing)
    ));

    let no_data = wav_with_chunks(&[(*b"fmt ", fmt_body(1, 1, 8000, 2, 16))]);
    assert!(matches!(
        validate(&mut Cursor::new(no_data)),
        Err(ExtractError::DataChunkMissing)
    ));
}

#[test]
fn missing_fmt_chunk_reads_as_empty_descriptor() {
    let wav = wav_with_chunks(&[(*b"data", vec![0; 4])]);
    let format = read_format_descriptor(&mut Cursor::new(wav)).unwrap();
    assert!(format.is_empty());
}

#[test]
fn stereo_8_bit_silence_is_zero() {
    let wav = pcm_wav(1, 2, 11025, 8, &[128; 8]);
    let audio = extract(&mut Cursor::new(wav)).unwrap();

    assert_eq!(audio.channels.len(), 2);
    for channel in &audio.channels {
        assert_eq!(channel, &NormalizedSamples::I16(vec![0; 4]));
    }
}

#[test]
fn eight_bit_zero_and_extremes() {
    let wav = pcm_wav(1, 1, 8000, 8, &[0, 1, 128, 255]);
    let audio = extract(&mut Cursor::new(wav)).unwrap();
    assert_eq!(
        audio.left(),
        Some(&NormalizedSamples::I16(vec![0, -32511, 0, i16::MAX]))
    );
}

#[test]
fn thirty_two_bit_passes_through() {
    let data: Vec<u8> = [0i32, i32::MAX, i32::MIN, -1]
        .iter()
        .flat_map(|s| s.to_le_bytes())
        .collect();
    let audio = extract(&mut Cursor::new(pcm_wav(1, 1, 8000, 32, &data))).unwrap();
    assert_eq!(
        audio.left(),
        Some(&NormalizedSamples::I32(vec![0, i32::MAX, i32::MIN, -1]))
    );
}

#[test]
fn ieee_float_passes_through() {
    let data: Vec<u8> = [1.0f32, -1.0, 0.5]
        .iter()
        .flat_map(|s| s.to_le_bytes())
        .collect();
    let audio = extract(&mut Cursor::new(pcm_wav(3, 1, 8000, 32, &data))).unwrap();
    assert_eq!(
        audio.left(),
        Some(&NormalizedSamples::F32(vec![1.0, -1.0, 0.5]))
    );
}

#[test]
fn unsupported_formats_are_rejected() {
    let mulaw = pcm_wav(7, 1, 8000, 8, &[0; 4]);
    let err = extract(&mut Cursor::new(mulaw)).unwrap_err();
    assert_eq!(err.code(), "WAV_006");

    let surround = pcm_wav(1, 6, 48000, 16, &[0; 24]);
    let err = extract(&mut Cursor::new(surround)).unwrap_err();
    assert!(matches!(
        err,
        ExtractError::UnsupportedChannelLayout { channels: 6 }
    ));

    let wide = pcm_wav(1, 1, 8000, 64, &[0; 16]);
    let err = extract(&mut Cursor::new(wide)).unwrap_err();
    assert!(matches!(err, ExtractError::UnsupportedBitDepth { bits: 64 }));
}

#[test]
fn truncated_data_warns_instead_of_failing() {
    let mut wav = pcm_wav(1, 2, 8000, 16, &le16(&[1, 2, 3, 4, 5, 6, 7, 8]));
    wav.truncate(wav.len() - 8);
    let audio = extract(&mut Cursor::new(wav)).unwrap();

    assert_eq!(audio.number_of_samples, 2);
    assert_eq!(audio.declared_frames(), 4);
    assert_eq!(audio.left(), Some(&NormalizedSamples::I16(vec![1, 3])));
    assert_eq!(audio.right(), Some(&NormalizedSamples::I16(vec![2, 4])));
    assert_eq!(
        audio.warnings,
        vec![ExtractWarning::TruncatedFrames {
            zero_filled: 0,
            dropped: 2,
            missing_bytes: 8,
        }]
    );
}

#[test]
fn extract_file_reads_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tone.wav");
    std::fs::write(&path, pcm_wav(1, 1, 16000, 16, &le16(&[100, -100]))).unwrap();

    let audio = extract_file(&path).unwrap();
    assert_eq!(audio.sample_rate(), 16000);
    assert_eq!(audio.left(), Some(&NormalizedSamples::I16(vec![100, -100])));
}

#[test]
fn operations_are_idempotent() {
    let mut cursor = Cursor::new(pcm_wav(1, 1, 8000, 16, &le16(&[9, 8, 7])));
    let first = extract(&mut cursor).unwrap();
    let second = extract(&mut cursor).unwrap();
    assert_eq!(first, second);
}

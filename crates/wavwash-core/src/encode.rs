//! The seam between extraction and whatever produces the output bytes.

use crate::extract::ExtractedAudio;

/// Turns extracted audio into an encoded byte stream.
///
/// Implementations get the format metadata and one normalized sequence per
/// channel through [`ExtractedAudio`]. The core knows nothing about the
/// output codec.
pub trait Encoder {
    /// Error type for encoding failures.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Encodes all samples of `audio`, returning the bytes produced so far.
    fn encode(&mut self, audio: &ExtractedAudio) -> Result<Vec<u8>, Self::Error>;

    /// Finishes the stream, returning any bytes still buffered.
    fn flush(&mut self) -> Result<Vec<u8>, Self::Error>;
}

/// Runs `encode` followed by `flush` and concatenates the output.
pub fn encode_all<E: Encoder>(encoder: &mut E, audio: &ExtractedAudio) -> Result<Vec<u8>, E::Error> {
    let mut bytes = encoder.encode(audio)?;
    bytes.extend(encoder.flush()?);
    Ok(bytes)
}

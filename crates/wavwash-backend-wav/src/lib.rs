//! wavwash WAV backend
//!
//! Writes normalized samples from [`wavwash_core`] back out as canonical WAV
//! files: a 12-byte RIFF header, a 16-byte fmt chunk and one data chunk, with
//! no other metadata. Identical samples always produce identical bytes.
//!
//! Integer samples are written as PCM at their normalized width (16 or 32
//! bits); float samples are written as 32-bit IEEE float.

pub mod encoder;
pub mod error;
pub mod wav;

pub use encoder::WavEncoder;
pub use error::{EncodeError, EncodeResult};
pub use wav::{compute_pcm_hash, interleave, write_wav, write_wav_to_vec, WavFormat, WavResult};

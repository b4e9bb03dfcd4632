//! Canonical WAV file writer.
//!
//! Output carries no timestamps or optional chunks, so the BLAKE3 hash of the
//! PCM payload identifies the audio content of a converted file.

mod format;
mod pcm;
mod result;
mod writer;


pub use format::WavFormat;
pub use pcm::compute_pcm_hash;
pub use result::WavResult;
pub use writer::{interleave, write_wav, write_wav_to_vec};

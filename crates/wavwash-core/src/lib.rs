//! wavwash core
//!
//! Reads RIFF/WAVE streams and normalizes their samples into a canonical
//! signed-integer PCM representation for downstream encoders.
//!
//! # Overview
//!
//! Extraction runs in five steps, each with its own module:
//!
//! - [`riff`] - container header check and the chunk scanner that locates
//!   `fmt ` and `data` regardless of chunk order
//! - [`format`] - fmt chunk decoding, including the extensible sub-format
//! - [`pcm`] - deinterleaving the data chunk into per-channel raw samples
//! - [`scale`] - amplitude rescaling of any bit depth onto `i16` or `i32`
//! - [`extract`] - the single call that chains all of the above
//!
//! All operations are synchronous and keep no state between calls other than
//! the caller's stream position, which each one resets before reading.
//! Independent streams can be processed from independent threads.
//!
//! # Example
//!
//! ```no_run
//! use wavwash_core::{extract_file, NormalizedSamples};
//!
//! let audio = extract_file("input.wav")?;
//! println!("{} Hz, {} channels", audio.sample_rate(), audio.channel_count());
//!
//! if let Some(NormalizedSamples::I16(left)) = audio.left() {
//!     println!("{} samples", left.len());
//! }
//! # Ok::<(), wavwash_core::ExtractError>(())
//! ```

pub mod encode;
pub mod error;
pub mod extract;
pub mod format;
pub mod pcm;
pub mod riff;
pub mod scale;

#[cfg(test)]
mod test_wav;

// Re-export main types at crate root
pub use encode::{encode_all, Encoder};
pub use error::{ExtractError, ExtractResult, ExtractWarning};
pub use extract::{extract, extract_file, ExtractedAudio};
pub use format::{read_format_descriptor, FormatDescriptor, FormatTag};
pub use pcm::{read_channel, RawChannel, RawSample};
pub use riff::{find_chunk, find_data, is_valid_wav, validate, DataDescriptor};
pub use scale::{rescale, NormalizedSamples, OutputWidth};

//! Amplitude rescaling of raw samples onto fixed-width signed ranges.
//!
//! Sources narrower than 17 bits are normalized to `i16`, wider ones to `i32`,
//! so consumers never have to care about odd bit depths like 12 or 20.
//!
//! The mapping is a linear interpolation of the signed source range
//! `[-2^(bits-1), 2^(bits-1) - 1]` onto the full output range, truncated
//! toward zero. Because both ranges are asymmetric the interpolation does not
//! land on 0 for a 0 input, so zero is special-cased to stay exactly 0.
//!
//! The zero check runs twice: once on the raw bit pattern and once after the
//! source is re-centered to signed. For unsigned sources of 8 bits or fewer
//! this pins both mid-scale (analog silence) and raw 0 to 0, which makes raw
//! 0 the single exception to monotonicity at those depths.

use serde::Serialize;

use crate::format::{FormatDescriptor, FormatTag};
use crate::pcm::RawSample;

/// Width of the normalized output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum OutputWidth {
    /// `i16` samples.
    Bits16,
    /// `i32` samples.
    Bits32,
}

impl OutputWidth {
    /// Output width for a source bit depth: up to 16 bits maps to 16.
    pub fn for_bits_per_sample(bits_per_sample: u16) -> Self {
        if bits_per_sample <= 16 {
            OutputWidth::Bits16
        } else {
            OutputWidth::Bits32
        }
    }

    /// Width in bits.
    pub fn bits(self) -> u16 {
        match self {
            OutputWidth::Bits16 => 16,
            OutputWidth::Bits32 => 32,
        }
    }
}

/// An output sample type for [`rescale`].
pub trait NormalizedSample: Copy {
    /// Smallest representable value.
    const MIN: f64;
    /// Largest representable value.
    const MAX: f64;

    /// Converts an interpolated value, truncating toward zero.
    fn from_scaled(value: f64) -> Self;

    /// The zero sample.
    fn zero() -> Self;
}

impl NormalizedSample for i16 {
    const MIN: f64 = i16::MIN as f64;
    const MAX: f64 = i16::MAX as f64;

    fn from_scaled(value: f64) -> Self {
        value as i16
    }

    fn zero() -> Self {
        0
    }
}

impl NormalizedSample for i32 {
    const MIN: f64 = i32::MIN as f64;
    const MAX: f64 = i32::MAX as f64;

    fn from_scaled(value: f64) -> Self {
        value as i32
    }

    fn zero() -> Self {
        0
    }
}

/// Interprets the low `bits_per_sample` bits of a raw sample as a signed value.
///
/// Sources of 8 bits or fewer are unsigned with a DC offset at mid-scale
/// (128 for 8-bit), which is subtracted. Wider sources are two's complement
/// and are sign-extended from bit `bits_per_sample - 1`; anything above that
/// bit is masked off.
pub fn to_signed(raw: RawSample, bits_per_sample: u16) -> i64 {
    let bits = u32::from(bits_per_sample.clamp(1, 32));
    let value = i64::from(raw) & ((1i64 << bits) - 1);

    if bits <= 8 {
        return value - (1i64 << (bits - 1));
    }

    if value & (1i64 << (bits - 1)) != 0 {
        value - (1i64 << bits)
    } else {
        value
    }
}

/// Rescales one raw sample of the given bit depth onto `S`'s range.
///
/// A raw 0 and a re-centered 0 both come out as exactly 0.
pub fn rescale<S: NormalizedSample>(raw: RawSample, bits_per_sample: u16) -> S {
    if raw == 0 {
        return S::zero();
    }

    let bits = bits_per_sample.clamp(1, 32);
    let input = to_signed(raw, bits);
    if input == 0 {
        return S::zero();
    }

    let in_min = -((1i64 << (bits - 1)) as f64);
    let in_max = ((1i64 << (bits - 1)) - 1) as f64;

    S::from_scaled(S::MIN + (S::MAX - S::MIN) * (input as f64 - in_min) / (in_max - in_min))
}

/// Rescales a whole channel.
pub fn rescale_channel<S: NormalizedSample>(raw: &[RawSample], bits_per_sample: u16) -> Vec<S> {
    raw.iter()
        .map(|&sample| rescale(sample, bits_per_sample))
        .collect()
}

/// One channel of normalized samples.
#[derive(Debug, Clone, PartialEq)]
pub enum NormalizedSamples {
    /// Sources of up to 16 bits.
    I16(Vec<i16>),
    /// Sources of 17 to 32 bits.
    I32(Vec<i32>),
    /// 32-bit IEEE float sources, passed through unscaled.
    F32(Vec<f32>),
}

impl NormalizedSamples {
    /// Normalizes a channel according to the stream's format.
    ///
    /// Integer PCM is rescaled to the width chosen by
    /// [`OutputWidth::for_bits_per_sample`]. Float data is reinterpreted
    /// bit-for-bit as `f32`.
    pub fn from_raw(raw: &[RawSample], format: &FormatDescriptor) -> Self {
        if format.audio_format() == FormatTag::IeeeFloat {
            return NormalizedSamples::F32(raw.iter().map(|&bits| f32::from_bits(bits)).collect());
        }

        match OutputWidth::for_bits_per_sample(format.bits_per_sample) {
            OutputWidth::Bits16 => {
                NormalizedSamples::I16(rescale_channel(raw, format.bits_per_sample))
            }
            OutputWidth::Bits32 => {
                NormalizedSamples::I32(rescale_channel(raw, format.bits_per_sample))
            }
        }
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        match self {
            NormalizedSamples::I16(samples) => samples.len(),
            NormalizedSamples::I32(samples) => samples.len(),
            NormalizedSamples::F32(samples) => samples.len(),
        }
    }

    /// True when there are no samples.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bits per normalized sample.
    pub fn bits(&self) -> u16 {
        match self {
            NormalizedSamples::I16(_) => 16,
            NormalizedSamples::I32(_) | NormalizedSamples::F32(_) => 32,
        }
    }

    /// True for float samples.
    pub fn is_float(&self) -> bool {
        matches!(self, NormalizedSamples::F32(_))
    }
}

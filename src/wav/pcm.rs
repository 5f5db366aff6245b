//! Float to 24-bit PCM conversion.
//!
//! Both policies clamp the input to [-1.0, 1.0] first, so out-of-range
//! samples encode exactly like full scale. They only differ in how the
//! scaled value is rounded to an integer.

use serde::{Deserialize, Serialize};

/// Largest positive 24-bit sample
pub const PCM24_MAX: i32 = 0x7F_FFFF;

/// Most negative 24-bit sample
pub const PCM24_MIN: i32 = -0x80_0000;

/// How a clamped float sample is turned into a 24-bit integer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundingPolicy {
    /// Asymmetric scaling with floor rounding.
    ///
    /// Negative samples scale by 0x800000, the rest by 0x7FFFFF; the result
    /// is rounded toward negative infinity. -1.0 maps to -0x800000 and 1.0
    /// to 0x7FFFFF.
    #[default]
    Floor,
    /// Symmetric scaling by 0x7FFFFF, rounded toward zero.
    ///
    /// -1.0 maps to -0x7FFFFF, so the most negative code is never produced
    /// from in-range input.
    Truncate,
}

impl RoundingPolicy {
    /// Convert one float sample to a 24-bit integer in
    /// [`PCM24_MIN`, `PCM24_MAX`]. NaN encodes as silence.
    pub fn quantize(self, sample: f32) -> i32 {
        let x = if sample.is_nan() {
            0.0
        } else {
            (sample as f64).clamp(-1.0, 1.0)
        };

        let value = match self {
            RoundingPolicy::Floor => {
                if x < 0.0 {
                    (x * 0x80_0000 as f64).floor()
                } else {
                    (x * PCM24_MAX as f64).floor()
                }
            }
            RoundingPolicy::Truncate => (x * PCM24_MAX as f64).trunc(),
        };

        (value as i32).clamp(PCM24_MIN, PCM24_MAX)
    }
}

/// Write a 24-bit two's complement value as 3 little-endian bytes
#[inline]
pub fn pcm24_bytes(value: i32) -> [u8; 3] {
    let [b0, b1, b2, _] = value.to_le_bytes();
    [b0, b1, b2]
}

/// Read 3 little-endian bytes as a sign-extended 24-bit value
#[inline]
pub fn pcm24_from_bytes(bytes: [u8; 3]) -> i32 {
    // shift into the top of an i32 and back to sign-extend
    i32::from_le_bytes([0, bytes[0], bytes[1], bytes[2]]) >> 8
}

/// Append the 24-bit encoding of every sample to `out`
pub fn encode_samples(samples: &[f32], policy: RoundingPolicy, out: &mut Vec<u8>) {
    out.reserve(samples.len() * 3);
    for &sample in samples {
        out.extend_from_slice(&pcm24_bytes(policy.quantize(sample)));
    }
}

/// Decode a 24-bit payload back to floats
///
/// Negative codes are divided by 0x800000 and non-negative codes by
/// 0x7FFFFF, mirroring [`RoundingPolicy::Floor`]. A trailing partial
/// sample is ignored.
pub fn decode_pcm24(pcm: &[u8]) -> Vec<f32> {
    pcm.chunks_exact(3)
        .map(|chunk| {
            let value = pcm24_from_bytes([chunk[0], chunk[1], chunk[2]]);
            if value < 0 {
                (value as f64 / 0x80_0000 as f64) as f32
            } else {
                (value as f64 / PCM24_MAX as f64) as f32
            }
        })
        .collect()
}

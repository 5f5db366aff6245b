//! Sample Buffer
//!
//! The immutable mono sample container passed between the generator, the
//! capture collaborator and the encoder. Samples are 32-bit floats that
//! are nominally in [-1.0, 1.0]; the range is not enforced here because
//! captured audio may overshoot before the encoder clamps it.

// ============================================================================
// Helper Functions
// ============================================================================

/// Convert decibels to linear amplitude
///
/// # Arguments
/// * `db` - Value in decibels
///
/// # Returns
/// Linear amplitude (1.0 at 0 dB)
#[inline]
pub fn db_to_linear(db: f64) -> f64 {
    10.0_f64.powf(db / 20.0)
}

/// Convert linear amplitude to decibels
///
/// # Returns
/// Value in decibels. Returns -f64::INFINITY for zero input.
#[inline]
pub fn linear_to_db(linear: f64) -> f64 {
    if linear <= 0.0 {
        f64::NEG_INFINITY
    } else {
        20.0 * linear.log10()
    }
}

/// Absolute peak of a sample slice (0.0 for an empty slice)
pub fn peak_amplitude(samples: &[f32]) -> f32 {
    samples.iter().map(|s| s.abs()).fold(0.0_f32, f32::max)
}

/// Root mean square of a sample slice (0.0 for an empty slice)
pub fn rms_amplitude(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }

    let sum_squares: f64 = samples.iter().map(|&s| (s as f64) * (s as f64)).sum();
    (sum_squares / samples.len() as f64).sqrt() as f32
}

// ============================================================================
// Sample Buffer
// ============================================================================

/// Immutable single-channel audio buffer
///
/// Once built, the samples can only be read. Every transformation
/// (`normalize`, `with_gain_db`, `clone`) returns a new buffer, so a
/// captured recording stays available for re-deriving other versions.
///
/// # Example
/// ```
/// use impulse_capture::engine::SampleBuffer;
///
/// let buffer = SampleBuffer::new(vec![0.0, 0.25, -0.5], 48000);
/// let louder = buffer.normalize();
/// assert_eq!(buffer.samples(), &[0.0, 0.25, -0.5]);
/// assert_eq!(louder.samples(), &[0.0, 0.5, -1.0]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl SampleBuffer {
    /// Wrap an owned sample vector
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Create a buffer of `len` zero samples
    pub fn silence(len: usize, sample_rate: u32) -> Self {
        Self::new(vec![0.0; len], sample_rate)
    }

    /// Read-only view of the samples
    #[inline]
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Sample rate in Hz
    #[inline]
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of samples
    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Get the duration in seconds
    #[inline]
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.len() as f64 / self.sample_rate as f64
    }

    /// Get a sample by index, or None if out of bounds
    #[inline]
    pub fn get(&self, index: usize) -> Option<f32> {
        self.samples.get(index).copied()
    }

    /// Absolute peak amplitude
    pub fn peak(&self) -> f32 {
        peak_amplitude(&self.samples)
    }

    /// Peak level in dBFS. Returns -f64::INFINITY for silent buffers.
    pub fn peak_dbfs(&self) -> f64 {
        linear_to_db(self.peak() as f64)
    }

    /// RMS level in dBFS. Returns -f64::INFINITY for silent buffers.
    pub fn rms_dbfs(&self) -> f64 {
        linear_to_db(rms_amplitude(&self.samples) as f64)
    }

    /// Peak-normalize to unit scale
    ///
    /// Returns a new buffer whose absolute peak is 1.0. A silent buffer is
    /// returned unchanged. The receiver is never modified.
    pub fn normalize(&self) -> SampleBuffer {
        let peak = self.peak();
        if peak <= 0.0 || !peak.is_finite() {
            return self.clone();
        }

        let scale = 1.0 / peak;
        self.map(|s| s * scale)
    }

    /// Return a copy scaled by a gain in decibels
    pub fn with_gain_db(&self, gain_db: f64) -> SampleBuffer {
        let gain = db_to_linear(gain_db) as f32;
        self.map(|s| s * gain)
    }

    /// Consume the buffer and hand back its samples
    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }

    fn map(&self, f: impl Fn(f32) -> f32) -> SampleBuffer {
        SampleBuffer {
            samples: self.samples.iter().map(|&s| f(s)).collect(),
            sample_rate: self.sample_rate,
        }
    }
}

impl AsRef<[f32]> for SampleBuffer {
    fn as_ref(&self) -> &[f32] {
        &self.samples
    }
}

/// Peak-normalize a buffer without touching the original
///
/// Free-function form of [`SampleBuffer::normalize`].
pub fn normalize(buffer: &SampleBuffer) -> SampleBuffer {
    buffer.normalize()
}

/// De-interleave samples from [L,R,L,R,...] to one buffer per channel
///
/// Trailing samples that do not form a complete frame are dropped.
pub fn deinterleave(samples: &[f32], channels: usize, sample_rate: u32) -> Vec<SampleBuffer> {
    if channels == 0 {
        return Vec::new();
    }

    let frames = samples.len() / channels;
    let mut result = vec![Vec::with_capacity(frames); channels];

    for frame in samples.chunks_exact(channels) {
        for (ch, &sample) in frame.iter().enumerate() {
            result[ch].push(sample);
        }
    }

    result
        .into_iter()
        .map(|data| SampleBuffer::new(data, sample_rate))
        .collect()
}

// ============================================================================
// Tests
// ============================================================================

//! Excitation signal parameters.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::engine::buffer::db_to_linear;
use crate::error::{CaptureError, Result};
use crate::wav::{BYTES_PER_SAMPLE, MAX_DATA_BYTES};

/// Silence played before the signal onset, in seconds
pub const LEAD_SILENCE_SECS: f64 = 0.5;

/// Start frequency of the logarithmic sweep (Hz)
pub const SWEEP_START_HZ: f64 = 20.0;

/// End frequency of the logarithmic sweep (Hz)
pub const SWEEP_END_HZ: f64 = 20000.0;

/// Longest take, in samples, that still fits a mono 24-bit WAV file
pub const MAX_SAMPLES: u64 = MAX_DATA_BYTES / BYTES_PER_SAMPLE as u64;

/// Excitation waveform played through the speakers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalType {
    /// Logarithmic sine sweep from 20 Hz to 20 kHz
    #[default]
    Sweep,
    /// Single full-scale sample
    Impulse,
    /// Uniform white noise burst
    Noise,
}

impl SignalType {
    /// Lowercase name used in file names and on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalType::Sweep => "sweep",
            SignalType::Impulse => "impulse",
            SignalType::Noise => "noise",
        }
    }
}

impl fmt::Display for SignalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignalType {
    type Err = CaptureError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sweep" => Ok(SignalType::Sweep),
            "impulse" => Ok(SignalType::Impulse),
            "noise" => Ok(SignalType::Noise),
            other => Err(CaptureError::InvalidSpec {
                reason: format!("unknown signal type '{}'", other),
            }),
        }
    }
}

/// Full description of one excitation take
///
/// Together with the optional seed this fully determines the generated
/// samples. The playback level is carried along but never baked into the
/// generated buffer; see [`ExcitationSpec::playback_gain`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExcitationSpec {
    pub signal_type: SignalType,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Length of the signal region, excluding the lead silence
    pub duration_secs: f64,
    /// Playback level in dBFS (at or below 0)
    pub level_dbfs: f64,
    /// Seed for the noise generator; entropy is used when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl ExcitationSpec {
    /// Create and validate a spec
    ///
    /// # Errors
    /// * `InvalidSpec` - zero sample rate, non-positive duration or a
    ///   level above 0 dBFS
    pub fn new(
        signal_type: SignalType,
        sample_rate: u32,
        duration_secs: f64,
        level_dbfs: f64,
    ) -> Result<Self> {
        let spec = Self {
            signal_type,
            sample_rate,
            duration_secs,
            level_dbfs,
            seed: None,
        };
        spec.validate()?;
        Ok(spec)
    }

    /// Same spec with a fixed noise seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check every parameter
    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(CaptureError::InvalidSpec {
                reason: "sample rate must be greater than zero".to_string(),
            });
        }
        if !self.duration_secs.is_finite() || self.duration_secs <= 0.0 {
            return Err(CaptureError::InvalidSpec {
                reason: format!(
                    "signal duration must be a positive number of seconds, got {}",
                    self.duration_secs
                ),
            });
        }
        let total = (self.sample_rate as f64 * self.total_duration_secs()).round();
        if total > MAX_SAMPLES as f64 {
            return Err(CaptureError::InvalidSpec {
                reason: format!(
                    "{} s at {} Hz exceeds the largest encodable take of {} samples",
                    self.total_duration_secs(),
                    self.sample_rate,
                    MAX_SAMPLES
                ),
            });
        }
        if self.total_samples() <= self.lead_silence_samples() {
            return Err(CaptureError::InvalidSpec {
                reason: format!(
                    "signal duration {} s is shorter than one sample at {} Hz",
                    self.duration_secs, self.sample_rate
                ),
            });
        }
        if !self.level_dbfs.is_finite() || self.level_dbfs > 0.0 {
            return Err(CaptureError::InvalidSpec {
                reason: format!(
                    "playback level must be at or below 0 dBFS, got {}",
                    self.level_dbfs
                ),
            });
        }
        Ok(())
    }

    /// Number of leading zero samples: `floor(sample_rate × 0.5)`
    pub fn lead_silence_samples(&self) -> usize {
        (self.sample_rate as f64 * LEAD_SILENCE_SECS).floor() as usize
    }

    /// Total buffer length: `round(sample_rate × (0.5 + duration))`
    pub fn total_samples(&self) -> usize {
        (self.sample_rate as f64 * self.total_duration_secs()).round() as usize
    }

    /// Lead silence plus signal duration
    pub fn total_duration_secs(&self) -> f64 {
        LEAD_SILENCE_SECS + self.duration_secs
    }

    /// Linear playback gain, `10^(level_dbfs / 20)`
    pub fn playback_gain(&self) -> f64 {
        db_to_linear(self.level_dbfs)
    }
}

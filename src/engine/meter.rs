//! Input Level Metering
//!
//! Numeric side of the capture monitor: RMS/peak readings of an analysis
//! block, placement on a 70 dB peak meter, a min/max waveform overview and
//! the playback progress of an excitation take. Drawing any of this is the
//! caller's business.

use std::fmt;

use serde::Serialize;

use super::buffer::{linear_to_db, peak_amplitude, rms_amplitude};

/// Samples per analysis block of the live monitor
pub const ANALYSIS_BLOCK_LEN: usize = 2048;

/// Span of the peak meter in dB (left edge is -70 dBFS)
pub const METER_RANGE_DB: f64 = 70.0;

/// Peaks below this are too quiet for a usable capture
pub const METER_QUIET_DBFS: f64 = -50.0;

/// Start of the hot zone
pub const METER_HOT_DBFS: f64 = -12.0;

/// Start of the clipping zone
pub const METER_CLIP_DBFS: f64 = -3.0;

// ============================================================================
// Levels
// ============================================================================

/// RMS and peak level of one block of input
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InputLevels {
    /// RMS level in dBFS (-inf for silence)
    pub rms_dbfs: f64,
    /// Peak level in dBFS (-inf for silence)
    pub peak_dbfs: f64,
}

impl InputLevels {
    /// Measure a block of samples
    pub fn measure(samples: &[f32]) -> Self {
        Self {
            rms_dbfs: linear_to_db(rms_amplitude(samples) as f64),
            peak_dbfs: linear_to_db(peak_amplitude(samples) as f64),
        }
    }

    /// Meter zone of the peak reading
    pub fn zone(&self) -> MeterZone {
        MeterZone::classify(self.peak_dbfs)
    }
}

impl fmt::Display for InputLevels {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Input: {} dBFS (RMS) / {} dBFS (Peak)",
            format_db(self.rms_dbfs),
            format_db(self.peak_dbfs)
        )
    }
}

fn format_db(db: f64) -> String {
    if db == f64::NEG_INFINITY {
        "-∞".to_string()
    } else {
        format!("{:.2}", db)
    }
}

// ============================================================================
// Meter
// ============================================================================

/// Coloured region of the peak meter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MeterZone {
    /// Below -50 dBFS
    TooQuiet,
    /// -50 to -12 dBFS
    Nominal,
    /// -12 to -3 dBFS
    Hot,
    /// -3 dBFS and above
    Clipping,
}

impl MeterZone {
    /// Zone of a peak reading in dBFS; each threshold belongs to the zone above it
    pub fn classify(peak_dbfs: f64) -> Self {
        if peak_dbfs >= METER_CLIP_DBFS {
            MeterZone::Clipping
        } else if peak_dbfs >= METER_HOT_DBFS {
            MeterZone::Hot
        } else if peak_dbfs >= METER_QUIET_DBFS {
            MeterZone::Nominal
        } else {
            MeterZone::TooQuiet
        }
    }
}

impl fmt::Display for MeterZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MeterZone::TooQuiet => "too quiet",
            MeterZone::Nominal => "nominal",
            MeterZone::Hot => "hot",
            MeterZone::Clipping => "clipping",
        };
        f.write_str(name)
    }
}

/// Position of a peak reading on the meter, 0.0 at -70 dBFS
///
/// Not clamped above 1.0 so overs stay visible.
pub fn meter_position(peak_dbfs: f64) -> f64 {
    ((peak_dbfs + METER_RANGE_DB) / METER_RANGE_DB).max(0.0)
}

// ============================================================================
// Waveform Overview
// ============================================================================

/// Per-column extremes of a waveform
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WaveformColumn {
    /// Largest positive sample in the column (0.0 if none)
    pub max: f32,
    /// Most negative sample in the column (0.0 if none)
    pub min: f32,
}

/// Reduce a buffer to `columns` min/max pairs
///
/// Each column covers `ceil(len / columns)` samples; columns past the end
/// of the data are flat.
pub fn waveform_overview(samples: &[f32], columns: usize) -> Vec<WaveformColumn> {
    if columns == 0 {
        return Vec::new();
    }

    let step = samples.len().div_ceil(columns).max(1);
    (0..columns)
        .map(|col| {
            let start = (col * step).min(samples.len());
            let end = (start + step).min(samples.len());
            samples[start..end].iter().fold(
                WaveformColumn { max: 0.0, min: 0.0 },
                |acc, &s| WaveformColumn {
                    max: acc.max.max(s),
                    min: acc.min.min(s),
                },
            )
        })
        .collect()
}

// ============================================================================
// Playback Progress
// ============================================================================

/// Progress of an excitation take while it plays
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackProgress {
    total_secs: f64,
    onset_secs: f64,
}

impl PlaybackProgress {
    /// `onset_secs` is the lead silence, `total_secs` lead plus signal
    pub fn new(onset_secs: f64, total_secs: f64) -> Self {
        Self {
            total_secs,
            onset_secs,
        }
    }

    /// Fraction of the take at which the signal starts
    pub fn onset_fraction(&self) -> f64 {
        if self.total_secs <= 0.0 {
            return 0.0;
        }
        self.onset_secs / self.total_secs
    }

    /// Fraction played after `elapsed_secs`, or None once the take is over
    pub fn fraction_at(&self, elapsed_secs: f64) -> Option<f64> {
        if elapsed_secs < 0.0 || elapsed_secs > self.total_secs || self.total_secs <= 0.0 {
            return None;
        }
        Some(elapsed_secs / self.total_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use test_case::test_case;

    #[test]
    fn test_measure_levels() {
        let levels = InputLevels::measure(&[0.5, -0.5, 0.5, -0.5]);
        assert_relative_eq!(levels.rms_dbfs, -6.0206, epsilon = 1e-4);
        assert_relative_eq!(levels.peak_dbfs, -6.0206, epsilon = 1e-4);
        assert_eq!(levels.zone(), MeterZone::Hot);
    }

    #[test]
    fn test_silence_display() {
        let levels = InputLevels::measure(&[0.0; ANALYSIS_BLOCK_LEN]);
        assert_eq!(
            levels.to_string(),
            "Input: -∞ dBFS (RMS) / -∞ dBFS (Peak)"
        );
        assert_eq!(levels.zone(), MeterZone::TooQuiet);
    }

    #[test_case(-60.0, MeterZone::TooQuiet)]
    #[test_case(-50.0, MeterZone::Nominal)]
    #[test_case(-20.0, MeterZone::Nominal)]
    #[test_case(-12.0, MeterZone::Hot)]
    #[test_case(-3.0, MeterZone::Clipping)]
    #[test_case(0.0, MeterZone::Clipping)]
    fn test_zones(peak: f64, expected: MeterZone) {
        assert_eq!(MeterZone::classify(peak), expected);
    }

    #[test]
    fn test_meter_position() {
        assert_relative_eq!(meter_position(0.0), 1.0);
        assert_relative_eq!(meter_position(-35.0), 0.5);
        assert_eq!(meter_position(-90.0), 0.0);
        assert_eq!(meter_position(f64::NEG_INFINITY), 0.0);
    }

    #[test]
    fn test_waveform_overview() {
        let samples = [0.1, -0.2, 0.3, -0.4, 0.5];
        let overview = waveform_overview(&samples, 3);
        assert_eq!(overview.len(), 3);
        assert_eq!(overview[0], WaveformColumn { max: 0.1, min: -0.2 });
        assert_eq!(overview[1], WaveformColumn { max: 0.3, min: -0.4 });
        assert_eq!(overview[2], WaveformColumn { max: 0.5, min: 0.0 });

        let padded = waveform_overview(&samples, 8);
        assert_eq!(padded[7], WaveformColumn { max: 0.0, min: 0.0 });
        assert!(waveform_overview(&samples, 0).is_empty());
    }

    #[test]
    fn test_playback_progress() {
        let progress = PlaybackProgress::new(0.5, 2.0);
        assert_relative_eq!(progress.onset_fraction(), 0.25);
        assert_eq!(progress.fraction_at(1.0), Some(0.5));
        assert_eq!(progress.fraction_at(2.5), None);
    }
}

//! CLI Command Implementations
//!
//! Implements the actual logic for each CLI command. Every command takes
//! the resolved [`CaptureConfig`] (file values with flag overrides applied)
//! and returns the paths it wrote.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use log::{info, warn};

use crate::config::CaptureConfig;
use crate::engine::meter::ANALYSIS_BLOCK_LEN;
use crate::engine::{
    import_wav, meter_position, read_raw_f32, recording_file_name, waveform_overview,
    write_wav_file, InputLevels, MeterZone, PlaybackProgress, SampleBuffer,
};
use crate::error::{CaptureError, Result};
use crate::signal::{generate as generate_signal, LEAD_SILENCE_SECS};
use crate::wav::{Encoder, RoundingPolicy};

/// Generate the configured excitation and write it as a 24-bit WAV.
pub fn generate(config: &CaptureConfig, bake_level: bool, output: Option<&Path>) -> Result<PathBuf> {
    config.validate()?;
    let spec = config.excitation_spec();
    info!(
        "Generating {} at {} Hz: {} s + {} s lead silence, {} dBFS",
        spec.signal_type, spec.sample_rate, spec.duration_secs, LEAD_SILENCE_SECS, spec.level_dbfs
    );

    let mut buffer = generate_signal(&spec)?;
    if bake_level {
        buffer = buffer.with_gain_db(spec.level_dbfs);
    }

    let bytes = encode_channels(std::slice::from_ref(&buffer), config.rounding)?;
    let path = match output {
        Some(path) => path.to_path_buf(),
        None => config
            .output_dir
            .join(recording_file_name(spec.signal_type, false, Utc::now())),
    };
    let checksum = write_wav_file(&path, &bytes)?;

    let progress = PlaybackProgress::new(LEAD_SILENCE_SECS, spec.total_duration_secs());
    println!("Generated: {}", path.display());
    println!(
        "  {} samples, {:.3} s, onset at {:.1}% of the take",
        buffer.len(),
        buffer.duration_secs(),
        progress.onset_fraction() * 100.0
    );
    if !bake_level {
        println!(
            "  Play back at {} dBFS (gain {:.4})",
            spec.level_dbfs,
            spec.playback_gain()
        );
    }
    println!("  sha256: {}", checksum);

    Ok(path)
}

/// Encode a raw little-endian f32 capture.
pub fn encode(
    config: &CaptureConfig,
    input: &Path,
    channels: u16,
    normalize: bool,
    output: Option<&Path>,
) -> Result<Vec<PathBuf>> {
    config.validate()?;
    info!("Encoding raw capture: {}", input.display());

    let buffers = read_raw_f32(input, channels as usize, config.sample_rate)?;
    write_recording(config, &buffers, normalize, output)
}

/// Re-encode a recorded WAV file as 24-bit PCM.
///
/// The file's own sample rate is kept; the configured rate is ignored.
pub fn import(
    config: &CaptureConfig,
    input: &Path,
    normalize: bool,
    output: Option<&Path>,
) -> Result<Vec<PathBuf>> {
    info!("Importing recording: {}", input.display());

    let buffers = import_wav(input)?;
    if let Some(first) = buffers.first() {
        if first.sample_rate() != config.sample_rate {
            warn!(
                "Recording is {} Hz, config says {} Hz; keeping the recording's rate",
                first.sample_rate(),
                config.sample_rate
            );
        }
    }
    write_recording(config, &buffers, normalize, output)
}

/// Print RMS/peak levels of a WAV file, per channel.
pub fn levels(input: &Path, overview: usize) -> Result<Vec<InputLevels>> {
    info!("Measuring levels: {}", input.display());

    let buffers = import_wav(input)?;
    let mut readings = Vec::with_capacity(buffers.len());

    println!("Levels: {}", input.display());
    println!("{:-<60}", "");

    for (ch, buffer) in buffers.iter().enumerate() {
        let levels = InputLevels::measure(buffer.samples());
        let clipping_blocks = buffer
            .samples()
            .chunks(ANALYSIS_BLOCK_LEN)
            .filter(|block| InputLevels::measure(block).zone() == MeterZone::Clipping)
            .count();

        println!(
            "Channel {}: {} [{}, meter {:.0}%]",
            ch + 1,
            levels,
            levels.zone(),
            meter_position(levels.peak_dbfs) * 100.0
        );
        if clipping_blocks > 0 {
            println!(
                "  {} of {} analysis blocks in the clipping zone",
                clipping_blocks,
                buffer.len().div_ceil(ANALYSIS_BLOCK_LEN)
            );
        }
        if overview > 0 {
            println!("{}", render_overview(buffer, overview));
        }

        readings.push(levels);
    }

    Ok(readings)
}

// ============================================================================
// Internal helper functions
// ============================================================================

fn encode_channels(buffers: &[SampleBuffer], rounding: RoundingPolicy) -> Result<Vec<u8>> {
    let first = buffers.first().ok_or_else(|| CaptureError::InvalidAudio {
        reason: "no channels to encode".to_string(),
        source: None,
    })?;
    let channels = u16::try_from(buffers.len()).map_err(|_| CaptureError::InvalidFormat {
        reason: format!("{} channels exceeds the WAV limit", buffers.len()),
    })?;

    let mut encoder = Encoder::with_rounding(first.sample_rate(), channels, rounding)?;
    encoder.encode(buffers)?;
    encoder.finish()
}

/// Write the original recording and, if asked, a normalized copy.
fn write_recording(
    config: &CaptureConfig,
    buffers: &[SampleBuffer],
    normalize: bool,
    output: Option<&Path>,
) -> Result<Vec<PathBuf>> {
    let now = Utc::now();
    let mut written = Vec::new();

    let original = encode_channels(buffers, config.rounding)?;
    let path = output_path(config, output, false, now);
    let checksum = write_wav_file(&path, &original)?;
    println!("Saved original: {}", path.display());
    println!("  sha256: {}", checksum);
    written.push(path);

    if normalize {
        // each channel to its own peak
        let normalized: Vec<SampleBuffer> = buffers.iter().map(SampleBuffer::normalize).collect();
        let bytes = encode_channels(&normalized, config.rounding)?;
        let path = output_path(config, output, true, now);
        let checksum = write_wav_file(&path, &bytes)?;
        println!("Saved normalized: {}", path.display());
        println!("  sha256: {}", checksum);
        written.push(path);
    }

    Ok(written)
}

fn output_path(
    config: &CaptureConfig,
    output: Option<&Path>,
    normalized: bool,
    at: DateTime<Utc>,
) -> PathBuf {
    match output {
        Some(path) if normalized => {
            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            path.with_file_name(format!("{}_normalized.wav", stem))
        }
        Some(path) => path.to_path_buf(),
        None => config
            .output_dir
            .join(recording_file_name(config.signal_type, normalized, at)),
    }
}

fn render_overview(buffer: &SampleBuffer, columns: usize) -> String {
    let columns = waveform_overview(buffer.samples(), columns);
    let top: String = columns.iter().map(|c| bar(c.max)).collect();
    let bottom: String = columns.iter().map(|c| bar(-c.min)).collect();
    format!("  {}\n  {}", top, bottom)
}

fn bar(level: f32) -> char {
    const BARS: [char; 5] = [' ', '.', ':', '|', '#'];
    let idx = (level.clamp(0.0, 1.0) * (BARS.len() - 1) as f32).round() as usize;
    BARS[idx]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::SignalType;
    use tempfile::tempdir;

    #[test]
    fn test_output_path_variants() {
        let config = CaptureConfig::default();
        let at = Utc::now();

        let explicit = Path::new("out/take.wav");
        assert_eq!(output_path(&config, Some(explicit), false, at), explicit);
        assert_eq!(
            output_path(&config, Some(explicit), true, at),
            Path::new("out/take_normalized.wav")
        );

        let generated = output_path(&config, None, true, at);
        let name = generated.file_name().unwrap().to_string_lossy();
        assert!(name.starts_with("sweep_normalized_"));
    }

    #[test]
    fn test_generate_writes_default_name() {
        let dir = tempdir().unwrap();
        let config = CaptureConfig {
            signal_type: SignalType::Impulse,
            sample_rate: 8000,
            duration_secs: 0.25,
            output_dir: dir.path().to_path_buf(),
            ..CaptureConfig::default()
        };

        let path = generate(&config, false, None).unwrap();
        assert!(path.starts_with(dir.path()));
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("impulse_original_"));

        let reader = hound::WavReader::open(&path).unwrap();
        assert_eq!(reader.spec().bits_per_sample, 24);
        assert_eq!(reader.len(), 6000);
    }

    #[test]
    fn test_encode_without_channels_fails() {
        assert!(encode_channels(&[], RoundingPolicy::Floor).is_err());
    }

    #[test]
    fn test_bar() {
        assert_eq!(bar(0.0), ' ');
        assert_eq!(bar(1.0), '#');
        assert_eq!(bar(2.0), '#');
    }
}

//! Audio file I/O for impulse-capture
//!
//! The core only ever produces and consumes in-memory buffers. This module
//! is the persistence side: it writes encoded WAV bytes, reads raw f32
//! captures and recorded WAV files, and names recordings the way the
//! capture UI's download action does.

use std::fs;
use std::io::{Read, Write};
use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use hound::{SampleFormat, WavReader};
use log::{debug, info};
use sha2::{Digest, Sha256};

use crate::engine::buffer::{deinterleave, SampleBuffer};
use crate::error::{CaptureError, Result};
use crate::signal::SignalType;

/// Write encoded bytes to `path`, creating parent directories
///
/// # Returns
/// SHA-256 of the written bytes as lowercase hex
pub fn write_wav_file(path: &Path, bytes: &[u8]) -> Result<String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut file = fs::File::create(path)?;
    file.write_all(bytes)?;
    file.flush()?;

    let checksum = checksum_bytes(bytes);
    info!("Wrote {} bytes to {} (sha256 {})", bytes.len(), path.display(), checksum);
    Ok(checksum)
}

/// SHA-256 of a byte slice as lowercase hex
pub fn checksum_bytes(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// SHA-256 of a file as lowercase hex
pub fn checksum_file(path: &Path) -> Result<String> {
    let mut file = open_existing(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];

    loop {
        let bytes_read = file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

/// Read a raw capture of little-endian f32 samples
///
/// Multi-channel captures are interleaved; one buffer per channel is
/// returned.
///
/// # Errors
/// * `FileNotFound` - if the file does not exist
/// * `InvalidAudio` - if the length is not a whole number of frames
pub fn read_raw_f32(path: &Path, channels: usize, sample_rate: u32) -> Result<Vec<SampleBuffer>> {
    if channels == 0 {
        return Err(CaptureError::InvalidFormat {
            reason: "channel count must be greater than zero".to_string(),
        });
    }

    let mut bytes = Vec::new();
    open_existing(path)?.read_to_end(&mut bytes)?;

    let frame_bytes = 4 * channels;
    if bytes.len() % frame_bytes != 0 {
        return Err(CaptureError::InvalidAudio {
            reason: format!(
                "{} bytes is not a whole number of {}-channel f32 frames",
                bytes.len(),
                channels
            ),
            source: None,
        });
    }

    let samples: Vec<f32> = bytes
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect();

    debug!(
        "Read {} raw samples ({} channels) from {}",
        samples.len(),
        channels,
        path.display()
    );
    Ok(deinterleave(&samples, channels, sample_rate))
}

/// Import a recorded WAV file as one buffer per channel
///
/// Any bit depth hound can read is converted to f32 at the file's own
/// sample rate.
///
/// # Errors
/// * `FileNotFound` - if the file does not exist
/// * `InvalidAudio` - if the file is not a readable WAV file or holds
///   no samples
pub fn import_wav(path: &Path) -> Result<Vec<SampleBuffer>> {
    if !path.exists() {
        return Err(CaptureError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let reader = WavReader::open(path).map_err(|e| CaptureError::InvalidAudio {
        reason: format!("Failed to open WAV file: {}", e),
        source: Some(Box::new(e)),
    })?;

    let spec = reader.spec();
    let channels = spec.channels as usize;
    let samples = read_samples_as_f32(reader, spec.bits_per_sample, spec.sample_format)?;

    if samples.is_empty() {
        return Err(CaptureError::InvalidAudio {
            reason: "Audio contains no samples".to_string(),
            source: None,
        });
    }

    info!(
        "Imported {}: {} Hz, {} channels, {}-bit",
        path.display(),
        spec.sample_rate,
        channels,
        spec.bits_per_sample
    );
    Ok(deinterleave(&samples, channels, spec.sample_rate))
}

/// File name for a saved recording
///
/// `{signal}_{original|normalized}_{timestamp}.wav`, with the timestamp in
/// ISO 8601 form and colons replaced so the name is valid everywhere.
pub fn recording_file_name(signal: SignalType, normalized: bool, at: DateTime<Utc>) -> String {
    let variant = if normalized { "normalized" } else { "original" };
    let stamp = at
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace(':', "-");
    format!("{}_{}_{}.wav", signal, variant, stamp)
}

// ============================================================================
// Internal helper functions
// ============================================================================

fn open_existing(path: &Path) -> Result<fs::File> {
    if !path.exists() {
        return Err(CaptureError::FileNotFound {
            path: path.display().to_string(),
        });
    }
    Ok(fs::File::open(path)?)
}

/// Read samples from WAV reader and convert to f32
fn read_samples_as_f32<R: std::io::Read>(
    mut reader: WavReader<R>,
    bits_per_sample: u16,
    sample_format: SampleFormat,
) -> Result<Vec<f32>> {
    let invalid = |bits: u16| {
        move |e: hound::Error| CaptureError::InvalidAudio {
            reason: format!("Failed to read {}-bit samples: {}", bits, e),
            source: Some(Box::new(e)),
        }
    };

    match sample_format {
        SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<std::result::Result<Vec<f32>, _>>()
            .map_err(invalid(bits_per_sample)),
        SampleFormat::Int => {
            let scale = match bits_per_sample {
                8 => 128.0,
                16 => 32768.0,
                24 => 8388608.0,
                32 => 2147483648.0,
                _ => {
                    return Err(CaptureError::InvalidAudio {
                        reason: format!("Unsupported {}-bit integer audio", bits_per_sample),
                        source: None,
                    })
                }
            };
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| (v as f64 / scale) as f32))
                .collect::<std::result::Result<Vec<f32>, _>>()
                .map_err(invalid(bits_per_sample))
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::tempdir;

    #[test]
    fn test_recording_file_name() {
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        assert_eq!(
            recording_file_name(SignalType::Sweep, false, at),
            "sweep_original_2024-03-09T14-05-07.000Z.wav"
        );
        assert_eq!(
            recording_file_name(SignalType::Noise, true, at),
            "noise_normalized_2024-03-09T14-05-07.000Z.wav"
        );
    }

    #[test]
    fn test_write_and_checksum() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("out.wav");

        let checksum = write_wav_file(&path, b"RIFF").unwrap();
        assert_eq!(checksum, checksum_file(&path).unwrap());
        assert_eq!(checksum.len(), 64);
        assert_eq!(fs::read(&path).unwrap(), b"RIFF");
    }

    #[test]
    fn test_read_raw_stereo() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("capture.f32");
        let bytes: Vec<u8> = [0.25_f32, -0.25, 0.5, -0.5]
            .iter()
            .flat_map(|s| s.to_le_bytes())
            .collect();
        fs::write(&path, bytes).unwrap();

        let channels = read_raw_f32(&path, 2, 48000).unwrap();
        assert_eq!(channels.len(), 2);
        assert_eq!(channels[0].samples(), &[0.25, 0.5]);
        assert_eq!(channels[1].samples(), &[-0.25, -0.5]);
    }

    #[test]
    fn test_read_raw_partial_frame() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("short.f32");
        fs::write(&path, [0u8; 6]).unwrap();

        let err = read_raw_f32(&path, 1, 48000).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_AUDIO");
    }

    #[test]
    fn test_import_nonexistent_file() {
        let result = import_wav(Path::new("/nonexistent/path/audio.wav"));
        match result.unwrap_err() {
            CaptureError::FileNotFound { path } => {
                assert!(path.contains("nonexistent"));
            }
            other => panic!("Expected FileNotFound error, got: {:?}", other),
        }
    }

    #[test]
    fn test_import_16bit_wav() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("in.wav");
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 22050,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        for v in [0i16, 16384, -16384, -32768] {
            writer.write_sample(v).unwrap();
        }
        writer.finalize().unwrap();

        let channels = import_wav(&path).unwrap();
        assert_eq!(channels.len(), 1);
        assert_eq!(channels[0].sample_rate(), 22050);
        assert_eq!(channels[0].samples(), &[0.0, 0.5, -0.5, -1.0]);
    }
}

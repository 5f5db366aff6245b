//! Integration tests for impulse-capture
//!
//! These tests exercise the full path from excitation spec through
//! encoding to a WAV file that an independent reader accepts.

use std::fs;

use approx::assert_abs_diff_eq;
use hound::{SampleFormat, WavReader};
use pretty_assertions::assert_eq;
use tempfile::tempdir;
use test_case::test_case;

use impulse_capture::cli::commands;
use impulse_capture::engine::{import_wav, write_wav_file};
use impulse_capture::wav::{decode_pcm24, WavHeader, HEADER_LEN, PCM24_MAX};
use impulse_capture::{
    generate, normalize, CaptureConfig, CaptureError, Encoder, EncoderState, ExcitationSpec,
    RoundingPolicy, SampleBuffer, SignalType,
};

fn read_back(bytes: &[u8]) -> (hound::WavSpec, Vec<i32>) {
    let reader = WavReader::new(std::io::Cursor::new(bytes.to_vec())).unwrap();
    let spec = reader.spec();
    let samples = reader
        .into_samples::<i32>()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    (spec, samples)
}

// ============================================================================
// Generator to encoder
// ============================================================================

#[test_case(SignalType::Sweep ; "sweep")]
#[test_case(SignalType::Impulse ; "impulse")]
#[test_case(SignalType::Noise ; "noise")]
fn test_generated_take_parses_with_hound(signal: SignalType) {
    let spec = ExcitationSpec::new(signal, 48000, 1.0, -6.0)
        .unwrap()
        .with_seed(11);
    let buffer = generate(&spec).unwrap();
    assert_eq!(buffer.len(), 72000);

    let mut encoder = Encoder::new(48000, 1).unwrap();
    encoder.encode(&[&buffer]).unwrap();
    let wav = encoder.finish().unwrap();

    let (wav_spec, samples) = read_back(&wav);
    assert_eq!(wav_spec.channels, 1);
    assert_eq!(wav_spec.sample_rate, 48000);
    assert_eq!(wav_spec.bits_per_sample, 24);
    assert_eq!(wav_spec.sample_format, SampleFormat::Int);
    assert_eq!(samples.len(), 72000);

    // lead silence survives encoding
    assert!(samples[..24000].iter().all(|&s| s == 0));
}

#[test]
fn test_impulse_lands_at_onset() {
    let spec = ExcitationSpec::new(SignalType::Impulse, 44100, 0.5, -3.0).unwrap();
    let buffer = generate(&spec).unwrap();

    let mut encoder = Encoder::new(44100, 1).unwrap();
    encoder.encode(&[buffer.samples()]).unwrap();
    let (_, samples) = read_back(&encoder.finish().unwrap());

    let nonzero: Vec<usize> = samples
        .iter()
        .enumerate()
        .filter(|&(_, &s)| s != 0)
        .map(|(i, _)| i)
        .collect();
    assert_eq!(nonzero, vec![22050]);
    assert_eq!(samples[22050], PCM24_MAX);
}

#[test]
fn test_round_trip_within_one_lsb() {
    let spec = ExcitationSpec::new(SignalType::Sweep, 16000, 0.5, -6.0).unwrap();
    let buffer = generate(&spec).unwrap();

    let mut encoder = Encoder::new(16000, 1).unwrap();
    encoder.encode(&[&buffer]).unwrap();
    let wav = encoder.finish().unwrap();

    let decoded = decode_pcm24(&wav[HEADER_LEN..]);
    assert_eq!(decoded.len(), buffer.len());
    for (original, decoded) in buffer.samples().iter().zip(&decoded) {
        assert_abs_diff_eq!(
            *original,
            *decoded,
            epsilon = 1.0 / PCM24_MAX as f32 + f32::EPSILON
        );
    }
}

// ============================================================================
// Header and payload
// ============================================================================

#[test]
fn test_example_bytes() {
    let mut encoder = Encoder::new(44100, 1).unwrap();
    encoder.encode(&[[0.5_f32, -0.5]]).unwrap();
    let wav = encoder.finish().unwrap();

    assert_eq!(wav.len(), 50);
    assert_eq!(&wav[0..4], b"RIFF");
    assert_eq!(&wav[8..16], b"WAVEfmt ");
    assert_eq!(&wav[36..40], b"data");
    assert_eq!(&wav[44..47], &[0xFF, 0xFF, 0x3F]);
    assert_eq!(&wav[47..50], &[0x00, 0x00, 0xC0]);
}

#[test_case(1, 10 ; "mono")]
#[test_case(2, 7 ; "stereo")]
#[test_case(6, 3 ; "surround")]
fn test_header_invariants(channels: u16, frames: usize) {
    let data: Vec<Vec<f32>> = (0..channels)
        .map(|ch| vec![ch as f32 * 0.1; frames])
        .collect();

    let mut encoder = Encoder::new(96000, channels).unwrap();
    encoder.encode(&data).unwrap();
    let wav = encoder.finish().unwrap();

    let header = WavHeader::parse(&wav).unwrap();
    assert_eq!(header.audio_format, 1);
    assert_eq!(header.bits_per_sample, 24);
    assert_eq!(header.channels, channels);
    assert_eq!(header.data_size as usize, channels as usize * frames * 3);
    assert_eq!(header.chunk_size, header.data_size + 36);
    assert_eq!(header.block_align, channels * 3);
    assert_eq!(header.byte_rate, 96000 * channels as u32 * 3);
    assert_eq!(wav.len(), HEADER_LEN + header.data_size as usize);
}

#[test_case(RoundingPolicy::Floor ; "floor")]
#[test_case(RoundingPolicy::Truncate ; "truncate")]
fn test_out_of_range_input_is_clamped(policy: RoundingPolicy) {
    let mut encoder = Encoder::with_rounding(48000, 1, policy).unwrap();
    encoder.encode(&[[2.0_f32, -2.0, 1.0, -1.0]]).unwrap();
    let (_, samples) = read_back(&encoder.finish().unwrap());

    assert_eq!(samples[0], samples[2]);
    assert_eq!(samples[1], samples[3]);
    assert_eq!(samples[0], PCM24_MAX);
}

#[test]
fn test_stereo_channels_stay_separate() {
    let left = SampleBuffer::new(vec![0.25; 100], 48000);
    let right = SampleBuffer::new(vec![-0.75; 100], 48000);

    let mut encoder = Encoder::new(48000, 2).unwrap();
    encoder.encode(&[left, right]).unwrap();
    let (spec, samples) = read_back(&encoder.finish().unwrap());

    assert_eq!(spec.channels, 2);
    for frame in samples.chunks_exact(2) {
        assert!(frame[0] > 0);
        assert!(frame[1] < 0);
    }
}

// ============================================================================
// Lifecycle
// ============================================================================

#[test]
fn test_lifecycle_rejects_use_after_close() {
    let mut finished = Encoder::new(48000, 1).unwrap();
    finished.finish().unwrap();
    assert!(matches!(
        finished.encode(&[[0.0_f32]]),
        Err(CaptureError::EncoderClosed { .. })
    ));

    let mut cancelled = Encoder::new(48000, 1).unwrap();
    cancelled.encode(&[[0.3_f32; 64]]).unwrap();
    cancelled.cancel();
    assert_eq!(cancelled.state(), EncoderState::Cancelled);

    let err = cancelled.finish().unwrap_err();
    assert_eq!(err.error_code(), "ENCODER_CLOSED");
    assert!(!err.is_recoverable());
}

#[test]
fn test_mismatched_channels_leave_encoder_usable() {
    let mut encoder = Encoder::new(48000, 2).unwrap();
    let err = encoder
        .encode(&[vec![0.0_f32; 4], vec![0.0_f32; 5]])
        .unwrap_err();
    assert_eq!(err.error_code(), "CHANNEL_COUNT_MISMATCH");

    encoder
        .encode(&[vec![0.0_f32; 4], vec![0.0_f32; 4]])
        .unwrap();
    let header = WavHeader::parse(&encoder.finish().unwrap()).unwrap();
    assert_eq!(header.data_size, 24);
}

// ============================================================================
// Normalization and files
// ============================================================================

#[test]
fn test_normalize_keeps_original() {
    let original = SampleBuffer::new(vec![0.1, -0.4, 0.2], 48000);
    let normalized = normalize(&original);

    assert_eq!(original.samples(), &[0.1, -0.4, 0.2]);
    assert_abs_diff_eq!(normalized.peak(), 1.0, epsilon = 1e-6);
    assert_abs_diff_eq!(normalized.samples()[0], 0.25, epsilon = 1e-6);
}

#[test]
fn test_written_file_imports_back() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("take.wav");

    let buffer = SampleBuffer::new(vec![0.5, -0.5, 0.25, 0.0], 22050);
    let mut encoder = Encoder::new(22050, 1).unwrap();
    encoder.encode(&[&buffer]).unwrap();
    write_wav_file(&path, &encoder.finish().unwrap()).unwrap();

    let imported = import_wav(&path).unwrap();
    assert_eq!(imported.len(), 1);
    assert_eq!(imported[0].sample_rate(), 22050);
    for (a, b) in buffer.samples().iter().zip(imported[0].samples()) {
        assert_abs_diff_eq!(*a, *b, epsilon = 1.0 / PCM24_MAX as f32 + f32::EPSILON);
    }
}

#[test]
fn test_encode_command_writes_both_variants() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("capture.f32");
    let raw: Vec<u8> = [0.1_f32, -0.2, 0.05, 0.2]
        .iter()
        .flat_map(|s| s.to_le_bytes())
        .collect();
    fs::write(&input, raw).unwrap();

    let config = CaptureConfig {
        sample_rate: 44100,
        output_dir: dir.path().to_path_buf(),
        ..CaptureConfig::default()
    };
    let written = commands::encode(&config, &input, 2, true, None).unwrap();
    assert_eq!(written.len(), 2);

    let original = import_wav(&written[0]).unwrap();
    let normalized = import_wav(&written[1]).unwrap();
    assert_eq!(original.len(), 2);
    assert_abs_diff_eq!(original[0].peak(), 0.1, epsilon = 1e-6);
    assert_abs_diff_eq!(normalized[0].peak(), 1.0, epsilon = 1e-6);
    assert_abs_diff_eq!(normalized[1].peak(), 1.0, epsilon = 1e-6);
}

#[test]
fn test_levels_command_reports_each_channel() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("take.wav");

    let mut encoder = Encoder::new(48000, 2).unwrap();
    encoder
        .encode(&[vec![0.5_f32; 4096], vec![0.0_f32; 4096]])
        .unwrap();
    write_wav_file(&path, &encoder.finish().unwrap()).unwrap();

    let readings = commands::levels(&path, 16).unwrap();
    assert_eq!(readings.len(), 2);
    assert_abs_diff_eq!(readings[0].peak_dbfs, -6.0206, epsilon = 1e-3);
    assert_eq!(readings[1].peak_dbfs, f64::NEG_INFINITY);
}

//! Excitation signal synthesis.
//!
//! A generated take is `lead` samples of silence followed by the signal
//! region. The output is always unit-scale; the playback level is applied
//! by whoever plays the buffer.

use std::f64::consts::PI;

use log::debug;
use rand::Rng;

use super::rng::rng_for_seed;
use super::spec::{ExcitationSpec, SignalType, SWEEP_END_HZ, SWEEP_START_HZ};
use crate::engine::SampleBuffer;
use crate::error::Result;

/// Generate the excitation buffer for a spec
///
/// Noise is drawn from a PCG32 seeded with `spec.seed`, or from entropy
/// when no seed is set.
///
/// # Errors
/// * `InvalidSpec` - if the spec fails validation
pub fn generate(spec: &ExcitationSpec) -> Result<SampleBuffer> {
    let mut rng = rng_for_seed(spec.seed);
    generate_with_rng(spec, &mut rng)
}

/// Generate the excitation buffer using a caller-provided RNG
///
/// The RNG is only consumed for [`SignalType::Noise`].
pub fn generate_with_rng<R: Rng>(
    spec: &ExcitationSpec,
    rng: &mut R,
) -> Result<SampleBuffer> {
    spec.validate()?;

    let total = spec.total_samples();
    let lead = spec.lead_silence_samples().min(total);
    let mut data = vec![0.0_f32; total];

    debug!(
        "Generating {} excitation: {} samples ({} lead) at {} Hz",
        spec.signal_type, total, lead, spec.sample_rate
    );

    let signal = &mut data[lead..];
    match spec.signal_type {
        SignalType::Sweep => fill_sweep(signal, spec.sample_rate, spec.duration_secs),
        SignalType::Impulse => {
            if let Some(first) = signal.first_mut() {
                *first = 1.0;
            }
        }
        SignalType::Noise => {
            for sample in signal.iter_mut() {
                *sample = rng.gen_range(-1.0_f32..1.0);
            }
        }
    }

    Ok(SampleBuffer::new(data, spec.sample_rate))
}

/// Instantaneous frequency of the logarithmic sweep `t` seconds after onset
///
/// `f1 · exp(t / L)` with `L = T / ln(f2 / f1)`, so it reaches 20 kHz at
/// `t = T`.
pub fn sweep_frequency_at(t: f64, duration_secs: f64) -> f64 {
    let l = duration_secs / (SWEEP_END_HZ / SWEEP_START_HZ).ln();
    SWEEP_START_HZ * (t / l).exp()
}

fn fill_sweep(signal: &mut [f32], sample_rate: u32, duration_secs: f64) {
    let ratio_ln = (SWEEP_END_HZ / SWEEP_START_HZ).ln();
    let l = duration_secs / ratio_ln;
    let k = duration_secs * SWEEP_START_HZ / ratio_ln;
    let rate = sample_rate as f64;

    for (i, sample) in signal.iter_mut().enumerate() {
        let t = i as f64 / rate;
        *sample = (2.0 * PI * k * ((t / l).exp() - 1.0)).sin() as f32;
    }
}

// ============================================================================
// Tests
// ============================================================================

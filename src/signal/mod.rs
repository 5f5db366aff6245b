//! Excitation Signal Generator
//!
//! Produces the test signals played through the speakers during a capture:
//! - Logarithmic sine sweep (20 Hz to 20 kHz)
//! - Single-sample impulse
//! - White-noise burst
//!
//! Every take starts with half a second of silence.

mod generator;
mod rng;
mod spec;

pub use generator::{generate, generate_with_rng, sweep_frequency_at};
pub use rng::{create_rng, rng_for_seed};
pub use spec::{
    ExcitationSpec, SignalType, LEAD_SILENCE_SECS, MAX_SAMPLES, SWEEP_END_HZ, SWEEP_START_HZ,
};

//! Impulse Capture - Excitation Signals and 24-bit WAV Encoding
//!
//! The core of an impulse-response capture tool. It provides two pieces:
//! 1. Signal Generator - logarithmic sweep, impulse and noise excitation
//!    signals, each preceded by half a second of silence
//! 2. WAV Encoder - converts float channel data to a 24-bit PCM RIFF/WAVE
//!    byte buffer
//!
//! # Architecture
//!
//! Control flow is one-way:
//! - `signal` builds an immutable [`SampleBuffer`] from an [`ExcitationSpec`]
//! - playback and recording happen outside this crate
//! - `wav` turns captured channels into file bytes
//! - `engine` holds the buffer type, level metering and file I/O, and
//!   `config` the session settings passed to all of them

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod signal;
pub mod wav;

pub use config::CaptureConfig;
pub use engine::{normalize, SampleBuffer};
pub use error::{CaptureError, Result};
pub use signal::{generate, generate_with_rng, ExcitationSpec, SignalType};
pub use wav::{Encoder, EncoderState, RoundingPolicy};

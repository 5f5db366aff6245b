//! CLI Module
//!
//! Command-line interface for generating excitation signals and encoding
//! captured responses as 24-bit WAV files.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::signal::SignalType;

/// Impulse Capture - excitation generator and 24-bit WAV encoder
#[derive(Parser, Debug)]
#[command(name = "impulse-capture")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// JSON capture config; flags override its values
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate an excitation signal and write it as WAV
    #[command(name = "generate")]
    Generate {
        /// Signal type (sweep, impulse, noise)
        #[arg(short, long)]
        signal: Option<SignalType>,

        /// Signal duration in seconds, excluding the 0.5 s lead silence
        #[arg(short, long)]
        duration: Option<f64>,

        /// Playback level in dBFS
        #[arg(short, long, allow_negative_numbers = true)]
        level: Option<f64>,

        /// Sample rate in Hz
        #[arg(long)]
        sample_rate: Option<u32>,

        /// Seed for reproducible noise
        #[arg(long)]
        seed: Option<u64>,

        /// Apply the playback level to the written samples
        #[arg(long)]
        bake_level: bool,

        /// Output file (default: generated name in the output directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Encode a raw little-endian f32 capture as 24-bit WAV
    #[command(name = "encode")]
    Encode {
        /// Raw capture file (interleaved when multi-channel)
        #[arg(short, long)]
        input: PathBuf,

        /// Sample rate of the capture in Hz
        #[arg(long)]
        sample_rate: Option<u32>,

        /// Number of interleaved channels
        #[arg(long, default_value_t = 1)]
        channels: u16,

        /// Excitation the capture was recorded with, used in file names
        #[arg(short, long)]
        signal: Option<SignalType>,

        /// Also write a peak-normalized copy
        #[arg(short, long)]
        normalize: bool,

        /// Output file (default: generated name in the output directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Re-encode a recorded WAV file as 24-bit PCM
    #[command(name = "import")]
    Import {
        /// WAV file to import
        #[arg(short, long)]
        input: PathBuf,

        /// Excitation the recording was made with, used in file names
        #[arg(short, long)]
        signal: Option<SignalType>,

        /// Also write a peak-normalized copy
        #[arg(short, long)]
        normalize: bool,

        /// Output file (default: generated name in the output directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print input levels of a WAV file
    #[command(name = "levels")]
    Levels {
        /// WAV file to measure
        #[arg(short, long)]
        input: PathBuf,

        /// Width of the text waveform overview (0 disables it)
        #[arg(long, default_value_t = 0)]
        overview: usize,
    },
}

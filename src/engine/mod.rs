//! Audio Engine Module
//!
//! Everything around the core that deals with samples rather than
//! synthesis or encoding:
//! - Immutable sample buffers and pure transformations
//! - Input level metering
//! - File I/O operations

pub mod buffer;
pub mod io;
pub mod meter;

pub use buffer::{db_to_linear, deinterleave, linear_to_db, normalize, SampleBuffer};
pub use io::{
    checksum_bytes, checksum_file, import_wav, read_raw_f32, recording_file_name, write_wav_file,
};
pub use meter::{
    meter_position, waveform_overview, InputLevels, MeterZone, PlaybackProgress, WaveformColumn,
};

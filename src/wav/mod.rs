//! 24-bit PCM WAV encoder.
//!
//! Writes the canonical 44-byte RIFF/WAVE header followed by little-endian
//! 24-bit samples. Output is a plain byte buffer; persisting it is up to
//! the caller.

mod encoder;
mod format;
mod pcm;

pub use encoder::{encode_mono, Encoder, EncoderState};
pub use format::{
    extract_pcm_data, write_header, WavFormat, WavHeader, BITS_PER_SAMPLE, BYTES_PER_SAMPLE,
    HEADER_LEN, MAX_DATA_BYTES,
};
pub use pcm::{
    decode_pcm24, encode_samples, pcm24_bytes, pcm24_from_bytes, RoundingPolicy, PCM24_MAX,
    PCM24_MIN,
};
